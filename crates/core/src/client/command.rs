//! In-band cursor repositioning command.
//!
//! A record whose content is `AESDCHAR_IOCSEEKTO:<index>, <offset>\n` (two
//! unsigned decimals) repositions the sending connection's cursor instead of
//! being appended. The prefix only counts at the start of a record; anywhere
//! else the record is ordinary data.

/// Literal prefix marking a record as a cursor command.
pub(crate) const SEEK_PREFIX: &[u8] = b"AESDCHAR_IOCSEEKTO:";

/// A parsed cursor command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SeekTo {
    /// Index of the target record, counted from the oldest resident one.
    pub index: u64,
    /// Byte offset within the target record.
    pub offset: u64,
}

/// What to do with a completed record.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Dispatch<'a> {
    /// Ordinary data, to be appended.
    Data(&'a [u8]),
    /// Well-formed cursor command.
    Seek(SeekTo),
    /// Carried the command prefix but did not parse; dropped silently.
    Malformed,
}

pub(crate) fn classify(record: &[u8]) -> Dispatch<'_> {
    match record.strip_prefix(SEEK_PREFIX) {
        None => Dispatch::Data(record),
        Some(args) => match parse_args(args) {
            Some(seek) => Dispatch::Seek(seek),
            None => Dispatch::Malformed,
        },
    }
}

/// Parse `<index>, <offset>\n`. ASCII whitespace around either field is
/// tolerated; both fields must be unsigned decimals.
fn parse_args(args: &[u8]) -> Option<SeekTo> {
    let args = args.strip_suffix(b"\n")?;
    let text = std::str::from_utf8(args).ok()?;
    let (index, offset) = text.split_once(',')?;
    Some(SeekTo {
        index: parse_field(index)?,
        offset: parse_field(offset)?,
    })
}

fn parse_field(field: &str) -> Option<u64> {
    let digits = field.trim_matches(|c: char| c.is_ascii_whitespace());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
