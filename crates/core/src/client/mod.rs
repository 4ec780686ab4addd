//! Per-client protocol handling and the handler task registry.

mod command;
mod connection;
mod registry;

pub(crate) use connection::Connection;
pub(crate) use registry::{ClientTask, Registry};

use std::sync::atomic::{AtomicU8, Ordering::SeqCst};

/// Lifecycle status a handler task reports to the reaper.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    Running = 0,
    Succeeded = 1,
    Failed = 2,
}

/// Shared cell a handler writes its terminal [`Status`] into.
#[derive(Debug)]
pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(Status::Running as u8))
    }

    pub fn set(&self, status: Status) {
        self.0.store(status as u8, SeqCst);
    }

    pub fn get(&self) -> Status {
        match self.0.load(SeqCst) {
            0 => Status::Running,
            1 => Status::Succeeded,
            _ => Status::Failed,
        }
    }
}
