//! Link annotation for note bodies.
//!
//! Turns URL-like substrings into anchors and leaves every other character
//! exactly as written. The output is treated as pre-built markup and is not
//! escaped again; running it over its own output is not supported.

use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// Prefixes that are kept as the anchor target verbatim.
/// Anything else is assumed to be a bare domain and gets `http://`.
pub const RECOGNIZED_SCHEMES: [&str; 9] = [
    "http://",
    // Not in the historical list; without it https links became `http://https://...`.
    "https://",
    "bitcoin://",
    "file://",
    "magnet://",
    "mailto://",
    "sms://",
    "tel://",
    "smp://",
];

// Trailing punctuation is excluded so "see x.com." links "x.com".
const SCHEMED_URL: &str = r#"[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s<>"']*[^\s<>"'.,;:!?)\]}]"#;
const MAILTO_URL: &str = r#"(?i:mailto):[^\s<>"']*[^\s<>"'.,;:!?)\]}]"#;
const EMAIL: &str = concat!(
    r"[a-zA-Z0-9._%+\-]+@",
    r"(?:[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}\b",
);
const BARE_DOMAIN: &str = concat!(
    r"\b(?:[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?\.)+",
    r"(?i:com|org|net|edu|gov|mil|int|info|biz|name|pro|io|dev|app|xyz|online|site|tech|[a-z]{2})\b",
    r"(?::[0-9]{1,5})?",
    r#"(?:/(?:[^\s<>"']*[^\s<>"'.,;:!?)\]}])?)?"#,
);

static RELAXED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Emails come before bare domains so the local part stays inside the link.
    Regex::new(&format!("{SCHEMED_URL}|{MAILTO_URL}|{EMAIL}|{BARE_DOMAIN}"))
        .expect("relaxed URL pattern compiles")
});

/// Finds URL-like substrings in free text.
pub trait LinkScanner: Send + Sync {
    /// Non-overlapping matches in left-to-right order.
    fn scan<'t>(&self, text: &'t str) -> Vec<&'t str>;
}

/// Permissive scanner: scheme URLs, `mailto:` links, email addresses and
/// bare domains without a scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedScanner;

impl LinkScanner for RelaxedScanner {
    fn scan<'t>(&self, text: &'t str) -> Vec<&'t str> {
        RELAXED_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
    }
}

/// Markup that is already safe to emit as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Annotate `text` using the relaxed scanner.
pub fn annotate(text: &str) -> Markup {
    annotate_with(&RelaxedScanner, text)
}

/// Annotate `text` with the links `scanner` finds.
pub fn annotate_with<S: LinkScanner + ?Sized>(scanner: &S, text: &str) -> Markup {
    let mut links = scanner
        .scan(text)
        .into_iter()
        .filter(|link| !link.is_empty())
        .peekable();

    if links.peek().is_none() {
        return Markup(text.to_string());
    }

    let mut out = String::with_capacity(text.len() * 2);
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(link) = links.peek().copied() {
            if rest.starts_with(link) {
                push_anchor(&mut out, link);
                rest = &rest[link.len()..];
                links.next();
                continue;
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    Markup(out)
}

/// Where an anchor for `link` points.
pub fn link_target(link: &str) -> Cow<'_, str> {
    if RECOGNIZED_SCHEMES.iter().any(|scheme| link.starts_with(scheme)) || is_mailto(link) {
        Cow::Borrowed(link)
    } else if is_email(link) {
        Cow::Owned(format!("mailto:{link}"))
    } else {
        Cow::Owned(format!("http://{link}"))
    }
}

fn is_mailto(link: &str) -> bool {
    link.get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("mailto:"))
}

/// Bare addresses never contain a path, so an `@` after a `/` stays a URL.
fn is_email(link: &str) -> bool {
    link.contains('@') && !link.contains('/')
}

fn push_anchor(out: &mut String, link: &str) {
    out.push_str("<a href=\"");
    out.push_str(&link_target(link));
    out.push_str("\" target=\"_blank\">");
    out.push_str(link);
    out.push_str("</a>");
}
