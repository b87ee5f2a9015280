//! LRC format parser
//!
//! Turns synchronized lyrics into timed lines:
//! [mm:ss.xx]Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.00] Another line
//!
//! Only the exact `[mm:ss.xx]` prefix is recognized. Anything else
//! (metadata tags like `[ti:Title]`, other timestamp precisions, stray text)
//! is skipped.

use crate::lyrics::error::{LyricsError, Result};
use crate::lyrics::models::{CandidateRecord, TimedLine};

/// Text used for lines that carry a timestamp but no words
pub const INSTRUMENTAL_MARKER: &str = "♪";

/// Length of `[mm:ss.xx]`
const PREFIX_LEN: usize = 10;

/// Parse a record's synced lyrics into timed lines.
///
/// Lines keep their order of appearance. Each line ends where the next one
/// starts; the last one ends at the record's declared duration, even if that
/// is earlier than its start.
pub fn parse_synced_lyrics(record: &CandidateRecord) -> Result<Vec<TimedLine>> {
    let raw = match record.synced_lyrics.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => return Err(LyricsError::NoSyncedLyrics),
    };

    let stamped: Vec<(f64, String)> = raw.split('\n').filter_map(parse_line).collect();

    let mut lines = Vec::with_capacity(stamped.len());
    let mut iter = stamped.into_iter().peekable();
    while let Some((start, text)) = iter.next() {
        let end = iter.peek().map_or(record.duration, |(next, _)| *next);
        lines.push(TimedLine { start, end, text });
    }

    tracing::debug!(id = record.id, lines = lines.len(), "parsed synced lyrics");
    Ok(lines)
}

/// Parse one physical line into `(start_secs, text)`.
fn parse_line(line: &str) -> Option<(f64, String)> {
    if line.trim().is_empty() {
        return None;
    }

    let start = parse_timestamp(line)?;
    let text = normalize_text(&line[PREFIX_LEN..]);
    Some((start, text))
}

/// Parse the leading `[mm:ss.xx]` into seconds.
fn parse_timestamp(line: &str) -> Option<f64> {
    let b = line.as_bytes();
    if b.len() < PREFIX_LEN {
        return None;
    }

    let digits = [1, 2, 4, 5, 7, 8];
    let shape_ok = b[0] == b'['
        && b[3] == b':'
        && b[6] == b'.'
        && b[9] == b']'
        && digits.iter().all(|&i| b[i].is_ascii_digit());
    if !shape_ok {
        return None;
    }

    // all ASCII up to here, so slicing on these offsets is safe
    let minutes: f64 = line[1..3].parse().ok()?;
    let seconds: f64 = line[4..9].parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

fn normalize_text(rest: &str) -> String {
    let text = rest.trim();
    if text.is_empty() {
        return INSTRUMENTAL_MARKER.to_string();
    }

    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Index of the line being sung at `position` seconds.
///
/// Scans in emission order and returns the first line whose `[start, end)`
/// interval contains the position.
pub fn line_at(lines: &[TimedLine], position: f64) -> Option<usize> {
    if !position.is_finite() {
        return None;
    }
    lines
        .iter()
        .position(|l| l.start <= position && position < l.end)
}
