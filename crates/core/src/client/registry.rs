use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{Status, StatusCell};

/// One spawned handler task.
pub(crate) struct ClientTask {
    pub peer: SocketAddr,
    pub status: Arc<StatusCell>,
    pub handle: JoinHandle<()>,
}

/// Registry of live handler tasks.
///
/// The acceptor registers every handler it spawns and reaps the finished
/// ones whenever the accept deadline lapses; the supervisor drains whatever
/// remains on shutdown.
#[derive(Default)]
pub(crate) struct Registry {
    tasks: Vec<ClientTask>,
}

impl Registry {
    pub fn register(&mut self, task: ClientTask) {
        self.tasks.push(task);
    }

    /// Join and drop every task that has reported a terminal status.
    /// Running tasks are left alone.
    pub async fn reap(&mut self) {
        let mut idx = 0;
        while idx < self.tasks.len() {
            if self.tasks[idx].status.get() == Status::Running {
                idx += 1;
                continue;
            }
            join(self.tasks.swap_remove(idx)).await;
        }
    }

    /// Join every remaining task, regardless of status. Handlers observe the
    /// shutdown flag themselves; this only waits for them.
    pub async fn join_all(&mut self) {
        for task in self.tasks.drain(..) {
            join(task).await;
        }
    }
}

async fn join(task: ClientTask) {
    if let Err(err) = task.handle.await {
        warn!(peer = %task.peer, "handler task panicked: {err}");
    } else {
        debug!(peer = %task.peer, status = ?task.status.get(), "handler reaped");
    }
}
