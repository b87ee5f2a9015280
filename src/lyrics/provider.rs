use crate::lyrics::models::CandidateRecord;

/// Source of candidate lyric records for a (track, artist) pair.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn find(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Vec<CandidateRecord>>;
}
