use url::Url;

use crate::errors::AppError;

pub const BASE_URL_ENV: &str = "CONTACTS_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Url,
}

impl Config {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url.trim())?;

        match base_url.scheme() {
            "http" | "https" => Ok(Self { base_url }),
            other => Err(AppError::Config(format!(
                "unsupported scheme '{}' in {}, expected http or https",
                other, BASE_URL_ENV
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_urls() {
        let config = Config::new(" https://contacts.example.com/api ").unwrap();

        assert_eq!(config.base_url.as_str(), "https://contacts.example.com/api");
    }

    #[test]
    fn default_base_url_is_valid() {
        assert!(Config::new(DEFAULT_BASE_URL).is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        let err = Config::new("ftp://contacts.example.com").unwrap_err();

        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(Config::new("localhost"), Err(AppError::Config(_))));
    }
}
