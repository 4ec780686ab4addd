use std::sync::atomic::{AtomicBool, Ordering::SeqCst};

use tokio::sync::Notify;

/// Cooperative termination signal shared by every worker task.
///
/// Workers observe the flag by polling [`Shutdown::is_signalled`] on a
/// bounded schedule or by awaiting [`Shutdown::wait`]; only the supervisor
/// and the signal task call [`Shutdown::signal`]. Once set, the flag never
/// clears.
#[derive(Debug, Default)]
pub struct Shutdown {
    flag: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            notify: Notify::const_new(),
        }
    }

    /// Request termination, waking every waiter.
    ///
    /// Returns `true` the first time it is called.
    pub fn signal(&self) -> bool {
        let prev = self.flag.swap(true, SeqCst);
        self.notify.notify_waiters();
        !prev
    }

    pub fn is_signalled(&self) -> bool {
        self.flag.load(SeqCst)
    }

    /// Completes once [`Shutdown::signal`] has been called, however long ago.
    pub async fn wait(&self) {
        while !self.is_signalled() {
            let notified = self.notify.notified();
            // The flag may have been set between the check above and the
            // waiter registering; re-check before parking.
            if self.is_signalled() {
                break;
            }
            notified.await;
        }
    }
}
