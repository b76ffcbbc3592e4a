//! Single threaded task queue the client waits on.
//!
//! Tasks are drained in FIFO order on the thread that calls
//! [`MessageLoop::run`]. A [`LoopTask::Quit`] ends the loop once every task
//! posted before it has run; anything posted after it is dropped.
//!
//! The queue is unbounded: posting only fails once the loop itself is gone.

use tokio::sync::mpsc;
use tracing::debug;
use uectl_core::exit_codes::EXIT_FAILURE;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub enum LoopTask {
    Run(Task),
    Quit(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoopError {
    #[error("message loop is not running")]
    Closed,
}

impl<T> From<mpsc::error::SendError<T>> for LoopError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        LoopError::Closed
    }
}

/// Cloneable sender side of the loop.
#[derive(Clone)]
pub struct LoopHandle {
    tx: mpsc::UnboundedSender<LoopTask>,
}

impl LoopHandle {
    pub fn post_task(&self, task: impl FnOnce() + Send + 'static) -> Result<(), LoopError> {
        self.tx.send(LoopTask::Run(Box::new(task)))?;
        Ok(())
    }

    pub fn post_quit(&self, code: i32) -> Result<(), LoopError> {
        self.tx.send(LoopTask::Quit(code))?;
        Ok(())
    }
}

pub struct MessageLoop {
    tx: mpsc::UnboundedSender<LoopTask>,
    rx: mpsc::UnboundedReceiver<LoopTask>,
}

impl MessageLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            tx: self.tx.clone(),
        }
    }

    /// Runs whatever is queued right now without blocking.
    ///
    /// Returns the exit code if a quit task was reached.
    pub fn tick(&mut self) -> Option<i32> {
        while let Ok(task) = self.rx.try_recv() {
            if let Some(code) = Self::execute(task) {
                return Some(code);
            }
        }
        None
    }

    /// Blocks the calling thread until a quit task runs.
    ///
    /// Must not be called from inside an async runtime. Returns
    /// `EXIT_FAILURE` if every handle is dropped before a quit was posted.
    pub fn run(self) -> i32 {
        let Self { tx, mut rx } = self;
        drop(tx);

        while let Some(task) = rx.blocking_recv() {
            if let Some(code) = Self::execute(task) {
                debug!(code, "message loop quitting");
                return code;
            }
        }

        debug!("message loop closed without an exit code");
        EXIT_FAILURE
    }

    fn execute(task: LoopTask) -> Option<i32> {
        match task {
            LoopTask::Run(f) => {
                f();
                None
            }
            LoopTask::Quit(code) => Some(code),
        }
    }
}

impl Default for MessageLoop {
    fn default() -> Self {
        Self::new()
    }
}
