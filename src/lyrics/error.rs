use thiserror::Error;

pub type Result<T> = std::result::Result<T, LyricsError>;

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("lyrics not found: {reason}")]
    NotFound { reason: NotFoundReason },

    #[error("record has no synced lyrics")]
    NoSyncedLyrics,
}

impl LyricsError {
    pub fn not_found(reason: NotFoundReason) -> Self {
        Self::NotFound { reason }
    }
}

/// Which stage came up empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundReason {
    #[error("search returned no candidates")]
    NoCandidates,
    #[error("search failed: {0}")]
    SearchFailed(String),
    #[error("no candidate has synced lyrics")]
    NoneSynced,
}
