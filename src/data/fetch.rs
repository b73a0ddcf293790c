use crate::error::{Result, StockError};
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Upper bound on a whole request, connect to last body byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a JSON snapshot lives: a remote URL or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(String),
}

impl Source {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::File(raw.strip_prefix("file://").unwrap_or(raw).to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Source::Url(url) => url,
            Source::File(path) => path,
        }
    }
}

pub fn http_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Fetches and decodes a snapshot. Remote snapshots are always requested
/// with `Cache-Control: no-store`.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, source: &Source) -> Result<T> {
    let body = match source {
        Source::Url(url) => {
            let res = client
                .get(url)
                .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
                .send()
                .await?;

            let status = res.status();
            if !status.is_success() {
                return Err(StockError::Status {
                    source_name: url.clone(),
                    status,
                });
            }

            res.bytes().await?.to_vec()
        }
        Source::File(path) => tokio::fs::read(path).await.map_err(|err| StockError::Io {
            path: path.clone(),
            err,
        })?,
    };

    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_kinds() {
        assert_eq!(
            Source::parse("https://example.com/stock-chart-data.json"),
            Source::Url("https://example.com/stock-chart-data.json".to_string())
        );
        assert_eq!(
            Source::parse("file:///tmp/ticker.json"),
            Source::File("/tmp/ticker.json".to_string())
        );
        assert_eq!(
            Source::parse(" stock-ticker-data.json "),
            Source::File("stock-ticker-data.json".to_string())
        );
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let client = Client::new();
        let source = Source::File("/nonexistent/stock-chart-data.json".to_string());
        let err = fetch_json::<serde_json::Value>(&client, &source)
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::Io { .. }));
    }

    #[tokio::test]
    async fn reads_json_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticker.json");
        std::fs::write(&path, r#"{"price": "1.00"}"#).unwrap();

        let client = Client::new();
        let source = Source::File(path.to_string_lossy().into_owned());
        let value: serde_json::Value = fetch_json(&client, &source).await.unwrap();
        assert_eq!(value["price"], "1.00");
    }
}
