use crate::Record;

/// A record of `len` bytes: `len - 1` copies of `byte` plus the terminating
/// newline.
pub fn record(byte: u8, len: usize) -> Record {
    assert!(len >= 1);
    let mut bytes = vec![byte; len - 1];
    bytes.push(b'\n');
    Record::new(bytes).unwrap()
}

/// Records of the given sizes whose concatenation is a recognizable byte
/// stream: a wrapping counter, with each record newline-terminated.
///
/// Returns the records together with the expected concatenation.
pub fn numbered_records(sizes: &[usize]) -> (Vec<Record>, Vec<u8>) {
    let mut counter = 0u8;
    let mut records = Vec::with_capacity(sizes.len());
    let mut stream = Vec::new();
    for &size in sizes {
        let mut bytes = Vec::with_capacity(size);
        for _ in 0..size - 1 {
            // Skip the newline value so record boundaries stay unambiguous.
            if counter == b'\n' {
                counter = counter.wrapping_add(1);
            }
            bytes.push(counter);
            counter = counter.wrapping_add(1);
        }
        bytes.push(b'\n');
        stream.extend_from_slice(&bytes);
        records.push(Record::new(bytes).unwrap());
    }
    (records, stream)
}

pub fn enable_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .format_timestamp(None)
        .is_test(true)
        .try_init();
}
