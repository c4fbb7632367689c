//! HTML pages.
//!
//! User text is escaped everywhere except note bodies, which arrive as
//! link-annotated markup.

use crate::notes::Note;
use crate::render::links::annotate;
use crate::security::tokens::Token;

/// Form field carrying the token id.
pub const TOKEN_ID_FIELD: &str = "share_note_token_id";
/// Form field carrying the token secret.
pub const TOKEN_SECRET_FIELD: &str = "share_note_token_string";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Note table, optionally marked as a filtered view.
pub fn index_page(notes: &[Note], filtered: bool) -> String {
    let rows: String = notes.iter().map(note_row).collect();
    let heading = if filtered {
        r#"<p class="filtered">Filtered view. <a href="/">Show all notes</a></p>"#
    } else {
        ""
    };
    let empty = if notes.is_empty() {
        r#"<p class="empty">No notes yet.</p>"#
    } else {
        ""
    };

    layout(
        "Share Notes",
        &format!(
            r#"<h1>Share Notes</h1>
        <p><a href="/AddNote/" class="button">New note</a></p>
        {heading}
        {empty}
        <table>
            <thead><tr><th>Title</th><th>Text</th><th>Added</th><th>Changed</th></tr></thead>
            <tbody>
{rows}            </tbody>
        </table>"#
        ),
    )
}

fn note_row(note: &Note) -> String {
    format!(
        r#"                <tr><td><a href="/Note/{id}">{title}</a></td><td>{text}</td><td>{added}</td><td>{changed}</td></tr>
"#,
        id = note.id,
        title = html_escape(&note.title),
        text = annotate(&note.text),
        added = note.added.format(DATE_FORMAT),
        changed = note.changed.format(DATE_FORMAT),
    )
}

/// Blank form for a new note.
pub fn add_note_page(token: &Token) -> String {
    layout(
        "New note",
        &format!(
            r#"<h1>New note</h1>
        <form action="/NewNote/" method="post">
            {fields}
            <button type="submit">Save</button>
        </form>
        <a href="/">Cancel</a>"#,
            fields = note_fields("", "", token),
        ),
    )
}

/// Single note view with links to the follow-up actions.
pub fn note_page(note: &Note) -> String {
    layout(
        &note.title,
        &format!(
            r#"<h1>{title}</h1>
        <div class="note-text">{text}</div>
        <p class="dates">Added {added}, changed {changed}</p>
        <p>
            <a href="/EditNote/{id}">Edit</a>
            <a href="/DeleteNote/{id}">Delete</a>
            <a href="/PasteBinNote/{id}">Export to paste service</a>
            <a href="/">Back</a>
        </p>"#,
            id = note.id,
            title = html_escape(&note.title),
            text = annotate(&note.text),
            added = note.added.format(DATE_FORMAT),
            changed = note.changed.format(DATE_FORMAT),
        ),
    )
}

/// Edit form posting to the save route.
pub fn edit_note_page(note: &Note, token: &Token) -> String {
    layout(
        "Edit note",
        &format!(
            r#"<h1>Edit note</h1>
        <form action="/SaveNote/{id}" method="post">
            {fields}
            <button type="submit">Save</button>
        </form>
        <a href="/Note/{id}">Cancel</a>"#,
            id = note.id,
            fields = note_fields(&note.title, &note.text, token),
        ),
    )
}

/// Confirmation before deleting.
pub fn delete_note_page(note: &Note, token: &Token) -> String {
    confirm_page(
        "Delete note",
        &format!("Delete \u{201c}{}\u{201d}?", html_escape(&note.title)),
        &format!("/ConfirmDeleteNote/{}", note.id),
        "Delete",
        note,
        token,
    )
}

/// Confirmation before exporting to the paste service.
pub fn paste_bin_note_page(note: &Note, token: &Token) -> String {
    confirm_page(
        "Export note",
        &format!(
            "Export \u{201c}{}\u{201d} to the public paste service?",
            html_escape(&note.title)
        ),
        &format!("/ConfirmPasteBinNote/{}", note.id),
        "Export",
        note,
        token,
    )
}

fn confirm_page(
    heading: &str,
    question: &str,
    action: &str,
    button: &str,
    note: &Note,
    token: &Token,
) -> String {
    layout(
        heading,
        &format!(
            r#"<h1>{heading}</h1>
        <p>{question}</p>
        <div class="note-text">{text}</div>
        <form action="{action}" method="post">
            {hidden}
            <button type="submit">{button}</button>
        </form>
        <a href="/Note/{id}">Cancel</a>"#,
            id = note.id,
            text = annotate(&note.text),
            hidden = token_fields(token),
        ),
    )
}

fn note_fields(title: &str, text: &str, token: &Token) -> String {
    format!(
        r#"<label for="title">Title</label>
            <input type="text" id="title" name="title" value="{title}">
            <label for="text">Text</label>
            <textarea id="text" name="text" rows="10">{text}</textarea>
            {hidden}"#,
        title = html_escape(title),
        text = html_escape(text),
        hidden = token_fields(token),
    )
}

fn token_fields(token: &Token) -> String {
    format!(
        r#"<input type="hidden" name="{TOKEN_ID_FIELD}" value="{id}">
            <input type="hidden" name="{TOKEN_SECRET_FIELD}" value="{secret}">"#,
        id = token.id,
        secret = html_escape(&token.secret),
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{CSS_STYLES}</style>
</head>
<body>
    <div class="container">
        {body}
    </div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

/// Escape text for element content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const CSS_STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f5f5f5; }
.container { max-width: 960px; margin: 2rem auto; background: #fff; padding: 1.5rem 2rem; border-radius: 8px; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.4rem; border-bottom: 1px solid #e0e0e0; vertical-align: top; }
.note-text { white-space: pre-wrap; margin: 1rem 0; }
label { display: block; margin-top: 0.75rem; }
input[type=text], textarea { width: 100%; }
button, .button { margin-top: 1rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_note() -> Note {
        let now = Utc::now();
        Note {
            id: 7,
            title: "<script>alert(1)</script>".into(),
            text: "read docs.rs today".into(),
            added: now,
            changed: now,
        }
    }

    fn sample_token() -> Token {
        Token { id: 3, secret: "abcXYZ".into() }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }

    #[test]
    fn test_index_escapes_titles_and_links_bodies() {
        let html = index_page(&[sample_note()], false);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<a href="http://docs.rs" target="_blank">docs.rs</a>"#));
        assert!(html.contains(r#"href="/Note/7""#));
        assert!(!html.contains("Filtered view"));
    }

    #[test]
    fn test_filtered_index() {
        let html = index_page(&[], true);
        assert!(html.contains("Filtered view"));
        assert!(html.contains("No notes yet."));
    }

    #[test]
    fn test_forms_embed_token() {
        let token = sample_token();
        let note = sample_note();

        for (html, action) in [
            (add_note_page(&token), r#"action="/NewNote/""#),
            (edit_note_page(&note, &token), r#"action="/SaveNote/7""#),
            (delete_note_page(&note, &token), r#"action="/ConfirmDeleteNote/7""#),
            (paste_bin_note_page(&note, &token), r#"action="/ConfirmPasteBinNote/7""#),
        ] {
            assert!(html.contains(action), "missing {action}");
            assert!(html.contains(r#"name="share_note_token_id" value="3""#));
            assert!(html.contains(r#"name="share_note_token_string" value="abcXYZ""#));
        }
    }

    #[test]
    fn test_note_page_links_actions() {
        let html = note_page(&sample_note());
        for link in ["/EditNote/7", "/DeleteNote/7", "/PasteBinNote/7"] {
            assert!(html.contains(link));
        }
    }
}
