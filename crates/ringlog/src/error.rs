use thiserror::Error;

/// Error returned by [`crate::SharedLog::resolve_seek`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SeekError {
    #[error("no resident record at index={index} (resident records: {len})")]
    NoSuchRecord { index: u64, len: usize },
    #[error("intra-record offset out of range: offset={offset} record-len={record_len}")]
    OffsetOutOfRange { offset: u64, record_len: u64 },
}
