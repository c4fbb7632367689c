//! Export of a note to an external paste service.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::PasteConfig;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Paste export is disabled")]
    Disabled,

    #[error("Invalid paste endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Paste request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Paste service returned status {0}")]
    Status(u16),

    #[error("Paste service returned an unusable reference: {0:?}")]
    InvalidReference(String),
}

/// Publishes a note and returns a reference (URL) to the published copy.
#[async_trait]
pub trait PasteExporter: Send + Sync {
    async fn export(&self, title: &str, body: &str) -> Result<String, ExportError>;
}

/// Posts `content` and `title` as a urlencoded form; the response body is the paste URL.
pub struct HttpPasteExporter {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpPasteExporter {
    pub fn new(config: &PasteConfig) -> Result<Self, ExportError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PasteExporter for HttpPasteExporter {
    async fn export(&self, title: &str, body: &str) -> Result<String, ExportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("content", body), ("title", title)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_reference(&text)
    }
}

/// Paste services answer with the URL plus trailing whitespace.
pub fn parse_reference(raw: &str) -> Result<String, ExportError> {
    let reference = raw.trim();
    match Url::parse(reference) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(reference.to_string()),
        _ => Err(ExportError::InvalidReference(reference.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            parse_reference("http://dpaste.com/ABC123\n").unwrap(),
            "http://dpaste.com/ABC123"
        );
        assert!(matches!(
            parse_reference("  "),
            Err(ExportError::InvalidReference(_))
        ));
        assert!(matches!(
            parse_reference("javascript:alert(1)"),
            Err(ExportError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_endpoint() {
        let config = PasteConfig {
            endpoint: "not a url".into(),
            ..PasteConfig::default()
        };
        assert!(matches!(
            HttpPasteExporter::new(&config),
            Err(ExportError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_new_keeps_endpoint() {
        let exporter = HttpPasteExporter::new(&PasteConfig::default()).unwrap();
        assert_eq!(exporter.endpoint().as_str(), "http://dpaste.com/api/v2/");
    }
}
