use serde::{Deserialize, Serialize};

/// One LRCLIB search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: i64,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub album_name: Option<String>,
    /// Declared track length in seconds (may be fractional or zero)
    #[serde(default, deserialize_with = "null_as_zero")]
    pub duration: f64,
    #[serde(default)]
    pub instrumental: bool,
    #[serde(default)]
    pub plain_lyrics: Option<String>,
    #[serde(default)]
    pub synced_lyrics: Option<String>,
}

impl CandidateRecord {
    /// Whether the record carries non-empty `[mm:ss.xx]` lyrics
    pub fn has_synced_lyrics(&self) -> bool {
        self.synced_lyrics.as_deref().is_some_and(|s| !s.is_empty())
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// A lyric line active over `[start, end)`, in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedLine {
    pub start: f64,
    pub end: f64,
    pub text: String,
}
