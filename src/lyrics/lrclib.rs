//! LRCLIB API client
//!
//! Candidates come from `GET /search?track_name=..&artist_name=..`, which
//! returns every record LRCLIB holds for the pair, synced or not.
//! API Documentation: https://lrclib.net/docs

use crate::config::LrclibConfig;
use crate::lyrics::models::CandidateRecord;
use crate::lyrics::provider::SearchProvider;
use anyhow::Context;

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    /// Create a new LRCLIB client
    pub fn new(cfg: &LrclibConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, track_name: &str, artist_name: &str) -> String {
        format!(
            "{}/search?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(track_name),
            urlencoding::encode(artist_name)
        )
    }

    /// Search for lyrics by track and artist
    pub async fn search(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Vec<CandidateRecord>> {
        let url = self.search_url(track_name, artist_name);
        tracing::debug!(%url, "lrclib search");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("send lrclib search request")?;

        let status = response.status();
        let body = response.text().await.context("read lrclib search body")?;
        let results = decode_search(status, &body)?;
        tracing::debug!(%status, count = results.len(), "lrclib search results");
        Ok(results)
    }
}

/// Map a `/search` response to records: 404 means no match, other failures are errors.
fn decode_search(status: reqwest::StatusCode, body: &str) -> anyhow::Result<Vec<CandidateRecord>> {
    if status.is_success() {
        serde_json::from_str(body).context("parse lrclib search json")
    } else if status == reqwest::StatusCode::NOT_FOUND {
        Ok(Vec::new())
    } else {
        anyhow::bail!("LRCLIB search error: {}", status);
    }
}

#[async_trait::async_trait]
impl SearchProvider for LrclibClient {
    async fn find(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Vec<CandidateRecord>> {
        self.search(track_name, artist_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_search_url_is_encoded() {
        let cfg = LrclibConfig {
            base_url: "https://lrclib.net/api/".to_string(),
            ..LrclibConfig::default()
        };
        let client = LrclibClient::new(&cfg).unwrap();
        assert_eq!(
            client.search_url("I Want to Live", "Borislav Slavov"),
            "https://lrclib.net/api/search?track_name=I%20Want%20to%20Live&artist_name=Borislav%20Slavov"
        );
        assert_eq!(
            client.search_url("A&B", "C/D"),
            "https://lrclib.net/api/search?track_name=A%26B&artist_name=C%2FD"
        );
    }

    #[test]
    fn test_decode_search_success() {
        let body = r#"[
            {"id": 1, "trackName": "Song", "artistName": "Artist", "duration": 200.0,
             "instrumental": false, "plainLyrics": "Hi", "syncedLyrics": "[00:01.00]Hi"},
            {"id": 2, "trackName": "Song", "artistName": "Artist", "duration": 260.0,
             "instrumental": false, "plainLyrics": null, "syncedLyrics": null}
        ]"#;
        let records = decode_search(StatusCode::OK, body).unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(records[0].has_synced_lyrics());

        assert!(decode_search(StatusCode::OK, "[]").unwrap().is_empty());
        assert!(decode_search(StatusCode::OK, "<html>").is_err());
    }

    #[test]
    fn test_decode_search_not_found_is_empty() {
        let records = decode_search(StatusCode::NOT_FOUND, r#"{"message":"Not found"}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_decode_search_other_status_is_error() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::TOO_MANY_REQUESTS, StatusCode::INTERNAL_SERVER_ERROR] {
            let err = decode_search(status, "").unwrap_err();
            assert!(err.to_string().contains(status.as_str()));
        }
    }
}
