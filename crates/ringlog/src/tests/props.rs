//! Property tests of the store invariants.

use proptest::collection::vec;
use proptest::prelude::*;

use super::helpers::enable_logging;
use crate::{Record, Ring};

const CAP: usize = 10;

/// Append sequences of arbitrary non-empty records, sized to exercise both
/// the partial and the saturated ring.
fn arb_appends() -> impl Strategy<Value = Vec<Vec<u8>>> {
    vec(vec(any::<u8>(), 1..48), 0..32)
}

fn filled(appends: &[Vec<u8>]) -> Ring<CAP> {
    let mut ring = Ring::new();
    for bytes in appends {
        ring.append(Record::new(bytes.clone()).unwrap());
    }
    ring
}

/// The byte stream the ring should hold after `appends`: the concatenation of
/// the last `CAP` records.
fn resident_window(appends: &[Vec<u8>]) -> Vec<u8> {
    let start = appends.len().saturating_sub(CAP);
    appends[start..].concat()
}

proptest! {
    #[test]
    fn total_bytes_matches_resident_sizes(appends in arb_appends()) {
        enable_logging();
        let ring = filled(&appends);
        let summed: u64 = ring.iter().map(|r| r.len() as u64).sum();
        prop_assert_eq!(ring.total_bytes(), summed);
        prop_assert_eq!(ring.total_bytes(), resident_window(&appends).len() as u64);
    }

    #[test]
    fn count_is_bounded_by_capacity(appends in arb_appends()) {
        let ring = filled(&appends);
        prop_assert_eq!(ring.len(), appends.len().min(CAP));
        prop_assert_eq!(ring.is_full(), appends.len() >= CAP);
        prop_assert_eq!(ring.is_empty(), appends.is_empty());
    }

    #[test]
    fn locate_matches_the_concatenated_window(
        appends in arb_appends(),
        pick in any::<prop::sample::Index>(),
    ) {
        let ring = filled(&appends);
        let window = resident_window(&appends);
        prop_assume!(!window.is_empty());

        let offset = pick.index(window.len());
        let (record, intra) = ring.locate(offset as u64).expect("offset inside the window");
        prop_assert_eq!(record.as_bytes()[intra], window[offset]);
    }

    #[test]
    fn byte_offsets_round_trip(
        appends in arb_appends(),
        record_pick in any::<prop::sample::Index>(),
        intra_pick in any::<prop::sample::Index>(),
    ) {
        let ring = filled(&appends);
        prop_assume!(!ring.is_empty());

        let n = record_pick.index(ring.len());
        let record = ring.get(n).expect("index is resident");
        let intra = intra_pick.index(record.len());
        let base = ring.byte_offset_of(n).expect("index is resident");

        let (found, found_intra) = ring.locate(base + intra as u64).expect("inside the window");
        prop_assert_eq!(found_intra, intra);
        prop_assert!(std::ptr::eq(found, record));
    }

    #[test]
    fn residents_are_the_last_appends_in_order(appends in arb_appends()) {
        let ring = filled(&appends);
        let start = appends.len().saturating_sub(CAP);
        let expected: Vec<&[u8]> = appends[start..].iter().map(Vec::as_slice).collect();
        let actual: Vec<&[u8]> = ring.iter().map(|r| r.as_bytes()).collect();
        prop_assert_eq!(actual, expected);
    }
}
