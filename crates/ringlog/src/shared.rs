use std::sync::{Arc, Mutex};

use crate::{DEFAULT_CAPACITY, Record, Ring, error::SeekError};

/// Cloneable, thread-safe handle to a [`Ring`].
///
/// A single mutex serializes every operation; no caller touches ring state
/// any other way. The lock is never held across I/O: [`SharedLog::read_at`]
/// copies the requested bytes out under the lock, so each call observes one
/// atomic snapshot of the store and the caller sends after release.
#[derive(Clone, Debug, Default)]
pub struct SharedLog<const CAP: usize = DEFAULT_CAPACITY> {
    inner: Arc<Mutex<Ring<CAP>>>,
}

impl<const CAP: usize> SharedLog<CAP> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Ring::new())),
        }
    }

    /// Append one record to the log.
    ///
    /// Empty input is a no-op. If the ring was full, the oldest record is
    /// evicted; its backing memory is released here, after the lock has been
    /// dropped.
    pub fn append_record(&self, bytes: Vec<u8>) {
        let Some(record) = Record::new(bytes) else {
            return;
        };
        let _evicted = self.inner.lock().unwrap().append(record);
    }

    /// Copy up to `max` bytes of the resident window starting at `cursor`.
    ///
    /// The result comes from a single record; its length is the amount to
    /// advance the cursor by. An empty result is end-of-stream: `cursor` lies
    /// at or past the end of the resident window, which is also how a cursor
    /// left behind by eviction reads (it never yields stale bytes).
    pub fn read_at(&self, cursor: u64, max: usize) -> Vec<u8> {
        let ring = self.inner.lock().unwrap();
        match ring.locate(cursor) {
            Some((record, intra)) => {
                let bytes = record.as_bytes();
                let end = bytes.len().min(intra + max);
                bytes[intra..end].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Translate a (record index, intra-record offset) pair into an absolute
    /// byte offset of the resident window.
    ///
    /// # Errors
    ///
    /// Fails if `index` names no resident record, or if `offset` does not
    /// fall strictly inside the named record.
    pub fn resolve_seek(&self, index: u64, offset: u64) -> Result<u64, SeekError> {
        let ring = self.inner.lock().unwrap();
        let n = usize::try_from(index)
            .ok()
            .filter(|&n| n < ring.len())
            .ok_or(SeekError::NoSuchRecord {
                index,
                len: ring.len(),
            })?;
        let (Some(record), Some(base)) = (ring.get(n), ring.byte_offset_of(n)) else {
            return Err(SeekError::NoSuchRecord {
                index,
                len: ring.len(),
            });
        };
        if offset >= record.len() as u64 {
            return Err(SeekError::OffsetOutOfRange {
                offset,
                record_len: record.len() as u64,
            });
        }
        Ok(base + offset)
    }

    /// Size in bytes of the concatenated resident window.
    pub fn total_bytes(&self) -> u64 {
        self.inner.lock().unwrap().total_bytes()
    }

    /// Drop every resident record. Used during teardown.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn seeded_log() -> SharedLog<4> {
        // Sizes 4, 6, 5: the three records "abc\n", "defgh\n", "ijkl\n".
        let log = SharedLog::<4>::new();
        log.append_record(b"abc\n".to_vec());
        log.append_record(b"defgh\n".to_vec());
        log.append_record(b"ijkl\n".to_vec());
        log
    }

    /// Drain the log through `read_at` the way a handler would.
    fn drain_from<const CAP: usize>(log: &SharedLog<CAP>, mut cursor: u64, max: usize) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let chunk = log.read_at(cursor, max);
            if chunk.is_empty() {
                return out;
            }
            cursor += chunk.len() as u64;
            out.extend_from_slice(&chunk);
        }
    }

    #[test]
    fn append_of_empty_bytes_is_a_no_op() {
        let log = SharedLog::<4>::new();
        log.append_record(Vec::new());
        assert_eq!(log.total_bytes(), 0);
    }

    #[test]
    fn read_at_chunks_within_a_single_record() {
        let log = seeded_log();
        assert_eq!(log.read_at(0, 2), b"ab".to_vec());
        // A short `max` never crosses a record boundary.
        assert_eq!(log.read_at(2, 16), b"c\n".to_vec());
        assert_eq!(log.read_at(4, 16), b"defgh\n".to_vec());
    }

    #[test]
    fn read_past_the_window_is_end_of_stream() {
        let log = seeded_log();
        assert_eq!(log.total_bytes(), 15);
        assert_eq!(log.read_at(15, 16), Vec::<u8>::new());
        assert_eq!(log.read_at(1000, 16), Vec::<u8>::new());
        assert_eq!(SharedLog::<4>::new().read_at(0, 16), Vec::<u8>::new());
    }

    #[test]
    fn drain_reassembles_the_window() {
        let log = seeded_log();
        assert_eq!(drain_from(&log, 0, 4), b"abc\ndefgh\nijkl\n".to_vec());
        assert_eq!(drain_from(&log, 6, 1024), b"fgh\nijkl\n".to_vec());
    }

    #[test]
    fn resolve_seek_sums_preceding_records() {
        let log = seeded_log();
        assert_eq!(log.resolve_seek(0, 0), Ok(0));
        assert_eq!(log.resolve_seek(1, 2), Ok(6));
        assert_eq!(log.resolve_seek(2, 4), Ok(14));
    }

    #[test]
    fn resolve_seek_rejects_missing_record() {
        let log = seeded_log();
        assert_eq!(
            log.resolve_seek(9, 0),
            Err(SeekError::NoSuchRecord { index: 9, len: 3 })
        );
        assert_eq!(
            log.resolve_seek(u64::MAX, 0),
            Err(SeekError::NoSuchRecord {
                index: u64::MAX,
                len: 3
            })
        );
    }

    #[test]
    fn resolve_seek_requires_offset_inside_the_record() {
        let log = seeded_log();
        // Intra-record offsets are strictly less than the record size.
        assert_eq!(
            log.resolve_seek(0, 4),
            Err(SeekError::OffsetOutOfRange {
                offset: 4,
                record_len: 4
            })
        );
    }

    #[test]
    fn concurrent_appends_keep_the_store_consistent() {
        let log = SharedLog::<10>::new();
        std::thread::scope(|scope| {
            for worker in 0..4u8 {
                let log = log.clone();
                scope.spawn(move || {
                    for n in 0..50usize {
                        let mut bytes = vec![worker; n % 7 + 1];
                        bytes.push(b'\n');
                        log.append_record(bytes);
                    }
                });
            }
        });
        // A lock-protected observer sees total_bytes equal to the resident
        // window it can actually read.
        let window = drain_from(&log, 0, 1024);
        assert_eq!(window.len() as u64, log.total_bytes());
        assert_eq!(window.iter().filter(|&&b| b == b'\n').count(), 10);
    }
}
