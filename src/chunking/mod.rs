//! Fixed-size waveform partitioning.
//!
//! Divides a waveform of known duration into an ordered sequence of
//! contiguous, non-overlapping time ranges. The last chunk is clamped to the
//! total duration and may be shorter than the configured length.

use crate::error::{Result, TolkError};

/// A contiguous time-bounded segment of a waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position of this chunk in the sequence.
    pub index: usize,
    /// Start offset in milliseconds (inclusive).
    pub start_ms: u64,
    /// End offset in milliseconds (exclusive).
    pub end_ms: u64,
}

impl Chunk {
    /// Length of this chunk in milliseconds.
    pub fn len_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Partition `[0, duration_ms)` into chunks of `chunk_ms` milliseconds.
///
/// Produces `ceil(duration_ms / chunk_ms)` chunks covering the duration
/// exactly, with no gaps or overlaps. A zero duration yields no chunks.
pub fn partition(duration_ms: u64, chunk_ms: u64) -> Result<Vec<Chunk>> {
    if chunk_ms == 0 {
        return Err(TolkError::InvalidInput(
            "chunk size must be positive".to_string(),
        ));
    }

    let count = duration_ms.div_ceil(chunk_ms);
    let mut chunks = Vec::with_capacity(count as usize);

    for i in 0..count {
        let start_ms = i * chunk_ms;
        let end_ms = ((i + 1) * chunk_ms).min(duration_ms);
        chunks.push(Chunk {
            index: i as usize,
            start_ms,
            end_ms,
        });
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_uneven_tail() {
        let chunks = partition(40_000, 15_000).unwrap();

        assert_eq!(
            chunks,
            vec![
                Chunk { index: 0, start_ms: 0, end_ms: 15_000 },
                Chunk { index: 1, start_ms: 15_000, end_ms: 30_000 },
                Chunk { index: 2, start_ms: 30_000, end_ms: 40_000 },
            ]
        );
    }

    #[test]
    fn test_partition_zero_duration() {
        let chunks = partition(0, 15_000).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_partition_rejects_zero_chunk_size() {
        assert!(partition(1_000, 0).is_err());
    }

    #[test]
    fn test_partition_exact_multiple() {
        let chunks = partition(30_000, 15_000).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].end_ms, 30_000);
        assert_eq!(chunks[1].len_ms(), 15_000);
    }

    #[test]
    fn test_partition_shorter_than_chunk() {
        let chunks = partition(4_000, 15_000).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_ms, 0);
        assert_eq!(chunks[0].end_ms, 4_000);
    }

    #[test]
    fn test_partition_covers_duration_exactly() {
        for (duration_ms, chunk_ms) in [
            (1u64, 1u64),
            (999, 1_000),
            (1_000, 1_000),
            (1_001, 1_000),
            (3_600_000, 15_000),
            (3_599_999, 15_000),
        ] {
            let chunks = partition(duration_ms, chunk_ms).unwrap();

            assert_eq!(chunks.len() as u64, duration_ms.div_ceil(chunk_ms));

            let mut expected_start = 0;
            for (i, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index, i);
                assert_eq!(chunk.start_ms, expected_start);
                assert!(chunk.end_ms > chunk.start_ms);
                assert!(chunk.len_ms() <= chunk_ms);
                expected_start = chunk.end_ms;
            }
            assert_eq!(expected_start, duration_ms);

            let tail = duration_ms % chunk_ms;
            let expected_tail = if tail == 0 { chunk_ms } else { tail };
            assert_eq!(chunks.last().unwrap().len_ms(), expected_tail);
        }
    }
}
