//! Lyrics lookup for synchronized display
//!
//! This module provides:
//! - LRCLIB API client for fetching candidate records
//! - Duration-based selection of the best candidate
//! - LRC parser turning synced lyrics into timed lines

pub mod error;
pub mod lrclib;
pub mod models;
pub mod parser;
pub mod provider;
pub mod select;

pub use error::{LyricsError, NotFoundReason, Result};
pub use lrclib::LrclibClient;
pub use models::{CandidateRecord, TimedLine};
pub use parser::{line_at, parse_synced_lyrics};
pub use provider::SearchProvider;
pub use select::SelectOptions;

/// Options for a single-record lookup
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookupOptions {
    /// Track length in seconds, used to pick among several matches
    pub duration: Option<f64>,
    pub synced_only: bool,
}

/// Search and optionally keep only records with synced lyrics.
pub async fn query_song_lyrics<P: SearchProvider + ?Sized>(
    provider: &P,
    song: &str,
    artist: &str,
    synced_only: bool,
) -> Result<Vec<CandidateRecord>> {
    let candidates = search(provider, song, artist).await?;
    let eligible = select::filter_synced(candidates, synced_only);
    if eligible.is_empty() {
        return Err(LyricsError::not_found(NotFoundReason::NoneSynced));
    }
    Ok(eligible)
}

/// Search and pick the single best record.
pub async fn get_lyrics<P: SearchProvider + ?Sized>(
    provider: &P,
    song: &str,
    artist: &str,
    options: LookupOptions,
) -> Result<CandidateRecord> {
    select::validate_duration(options.duration)?;

    let candidates = search(provider, song, artist).await?;
    let record = select::select(
        candidates,
        SelectOptions {
            target_duration: options.duration,
            synced_only: options.synced_only,
        },
    )?;

    tracing::info!(
        id = record.id,
        track = %record.track_name,
        artist = %record.artist_name,
        duration = record.duration,
        "selected lyrics"
    );
    Ok(record)
}

/// Search, pick the best synced record and parse it into timed lines.
pub async fn get_lyric_lines<P: SearchProvider + ?Sized>(
    provider: &P,
    song: &str,
    artist: &str,
    duration: Option<f64>,
) -> Result<Vec<TimedLine>> {
    let options = LookupOptions {
        duration,
        synced_only: true,
    };
    let record = get_lyrics(provider, song, artist, options).await?;
    parse_synced_lyrics(&record)
}

/// Ask the provider for candidates; failures and empty results are both "not found".
async fn search<P: SearchProvider + ?Sized>(
    provider: &P,
    song: &str,
    artist: &str,
) -> Result<Vec<CandidateRecord>> {
    match provider.find(song, artist).await {
        Ok(candidates) if candidates.is_empty() => {
            tracing::debug!(song, artist, "no candidates");
            Err(LyricsError::not_found(NotFoundReason::NoCandidates))
        }
        Ok(candidates) => {
            tracing::debug!(song, artist, count = candidates.len(), "candidates found");
            Ok(candidates)
        }
        Err(e) => {
            let msg = format!("{e:#}");
            tracing::warn!(song, artist, error = %msg, "lyrics search failed");
            Err(LyricsError::not_found(NotFoundReason::SearchFailed(msg)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        records: Vec<CandidateRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(records: Vec<CandidateRecord>) -> Self {
            Self {
                records,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new())
            }
        }
    }

    #[async_trait::async_trait]
    impl SearchProvider for FakeProvider {
        async fn find(&self, _track: &str, _artist: &str) -> anyhow::Result<Vec<CandidateRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self.records.clone())
        }
    }

    fn rec(id: i64, duration: f64, synced: Option<&str>) -> CandidateRecord {
        CandidateRecord {
            id,
            track_name: "Song".to_string(),
            artist_name: "Artist".to_string(),
            album_name: Some("Album".to_string()),
            duration,
            instrumental: false,
            plain_lyrics: Some("Hello\nWorld".to_string()),
            synced_lyrics: synced.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_query_keeps_order_and_filters() {
        let p = FakeProvider::new(vec![
            rec(1, 100.0, None),
            rec(2, 200.0, Some("[00:01.00]x")),
            rec(3, 300.0, Some("[00:02.00]y")),
        ]);
        let all = query_song_lyrics(&p, "Song", "Artist", false).await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let synced = query_song_lyrics(&p, "Song", "Artist", true).await.unwrap();
        assert_eq!(synced.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_query_not_found_reasons() {
        let empty = FakeProvider::new(Vec::new());
        let err = query_song_lyrics(&empty, "a", "b", false).await.unwrap_err();
        assert!(matches!(
            err,
            LyricsError::NotFound {
                reason: NotFoundReason::NoCandidates
            }
        ));

        let unsynced = FakeProvider::new(vec![rec(1, 1.0, None)]);
        let err = query_song_lyrics(&unsynced, "a", "b", true).await.unwrap_err();
        assert!(matches!(
            err,
            LyricsError::NotFound {
                reason: NotFoundReason::NoneSynced
            }
        ));
    }

    #[tokio::test]
    async fn test_search_failure_is_not_found() {
        let p = FakeProvider::failing();
        let err = get_lyrics(&p, "a", "b", LookupOptions::default())
            .await
            .unwrap_err();
        match err {
            LyricsError::NotFound {
                reason: NotFoundReason::SearchFailed(msg),
            } => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_lyrics_by_duration() {
        let p = FakeProvider::new(vec![
            rec(1, 200.0, None),
            rec(2, 260.0, None),
            rec(3, 300.0, None),
        ]);
        let options = LookupOptions {
            duration: Some(263.0),
            synced_only: false,
        };
        let record = get_lyrics(&p, "Song", "Artist", options).await.unwrap();
        assert_eq!(record.id, 2);
    }

    #[tokio::test]
    async fn test_invalid_duration_skips_search() {
        let p = FakeProvider::new(vec![rec(1, 200.0, None)]);
        let options = LookupOptions {
            duration: Some(f64::NAN),
            synced_only: false,
        };
        let err = get_lyrics(&p, "Song", "Artist", options).await.unwrap_err();
        assert!(matches!(err, LyricsError::InvalidArgument(_)));
        assert_eq!(p.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_lyric_lines_forces_synced() {
        let p = FakeProvider::new(vec![
            rec(1, 10.0, None),
            rec(2, 10.0, Some("[00:01.50]Hello\n[00:03.00]World")),
        ]);
        let lines = get_lyric_lines(&p, "Song", "Artist", Some(10.0)).await.unwrap();
        assert_eq!(
            lines,
            vec![
                TimedLine {
                    start: 1.5,
                    end: 3.0,
                    text: "Hello".to_string()
                },
                TimedLine {
                    start: 3.0,
                    end: 10.0,
                    text: "World".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_get_lyric_lines_no_synced() {
        let p = FakeProvider::new(vec![rec(1, 10.0, None)]);
        let err = get_lyric_lines(&p, "Song", "Artist", None).await.unwrap_err();
        assert!(matches!(
            err,
            LyricsError::NotFound {
                reason: NotFoundReason::NoneSynced
            }
        ));
    }
}
