//! Bounded, random-access, in-memory record log.
//!
//! A [`Ring`] holds the most recent `CAP` newline-terminated records; once all
//! slots are occupied, each append evicts the oldest resident record. Records
//! are addressed either by index (counted from the oldest) or by absolute byte
//! offset within the concatenation of all resident records.
//!
//! [`SharedLog`] wraps a [`Ring`] behind a single mutex and is the only way
//! concurrent callers may touch the store.

mod record;
mod ring;
mod shared;

pub use crate::{record::Record, ring::Ring, shared::SharedLog};

pub mod error;

#[cfg(test)]
mod tests;

/// Number of record slots a log holds by default.
pub const DEFAULT_CAPACITY: usize = 10;
