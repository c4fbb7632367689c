//! Form field extraction.
//!
//! Fields are looked up in the urlencoded body first and the query string
//! second; within one source the first occurrence wins.

use std::collections::HashMap;
use url::form_urlencoded;

use crate::render::pages::{TOKEN_ID_FIELD, TOKEN_SECRET_FIELD};
use crate::security::Token;

/// Decoded form fields of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: HashMap<String, String>,
}

impl FormFields {
    pub fn parse(query: Option<&str>, body: &[u8]) -> Self {
        let mut fields = HashMap::new();
        let sources = [body, query.unwrap_or_default().as_bytes()];
        for source in sources {
            for (name, value) in form_urlencoded::parse(source) {
                fields.entry(name.into_owned()).or_insert_with(|| value.into_owned());
            }
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Note title; absent means empty.
    pub fn title(&self) -> &str {
        self.get("title").unwrap_or_default()
    }

    /// Note text; absent means empty.
    pub fn text(&self) -> &str {
        self.get("text").unwrap_or_default()
    }

    /// The submitted token, if both fields are present and the id is a number.
    pub fn token(&self) -> Option<Token> {
        let id = self.get(TOKEN_ID_FIELD)?.parse::<u64>().ok()?;
        let secret = self.get(TOKEN_SECRET_FIELD)?;
        Some(Token {
            id,
            secret: secret.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_fields() {
        let form = FormFields::parse(
            None,
            b"title=Hello+world&text=line%201%0Aline%202&share_note_token_id=12&share_note_token_string=abc",
        );
        assert_eq!(form.title(), "Hello world");
        assert_eq!(form.text(), "line 1\nline 2");
        assert_eq!(form.token(), Some(Token { id: 12, secret: "abc".into() }));
    }

    #[test]
    fn test_body_wins_over_query() {
        let form = FormFields::parse(Some("title=from-query&text=q"), b"title=from-body");
        assert_eq!(form.title(), "from-body");
        assert_eq!(form.text(), "q");
    }

    #[test]
    fn test_first_value_wins() {
        let form = FormFields::parse(None, b"title=a&title=b");
        assert_eq!(form.title(), "a");
    }

    #[test]
    fn test_missing_fields() {
        let form = FormFields::parse(None, b"");
        assert_eq!(form.title(), "");
        assert_eq!(form.text(), "");
        assert_eq!(form.token(), None);
    }

    #[test]
    fn test_malformed_token_id() {
        let form = FormFields::parse(
            None,
            b"share_note_token_id=-1&share_note_token_string=abc",
        );
        assert_eq!(form.token(), None);

        let form = FormFields::parse(None, b"share_note_token_id=4");
        assert_eq!(form.token(), None);
    }
}
