use std::fmt;

/// A single record: an immutable, non-empty byte sequence.
///
/// The store treats record bytes as opaque. Callers that speak the wire
/// protocol guarantee the trailing newline; the store only guarantees that it
/// never splits or merges records.
#[derive(Clone, Eq, PartialEq)]
pub struct Record(Box<[u8]>);

impl Record {
    /// Wrap `bytes` into a record.
    ///
    /// Returns `None` for empty input: the store holds no zero-length
    /// records, so appending nothing is a no-op at the type level.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            None
        } else {
            Some(Self(bytes.into_boxed_slice()))
        }
    }

    /// Size of the record in bytes. Always at least 1.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({:?})", String::from_utf8_lossy(&self.0))
    }
}
