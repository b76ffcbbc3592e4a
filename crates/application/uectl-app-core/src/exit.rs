use std::sync::{Arc, OnceLock};

use tracing::{debug, error};
use uectl_core::exit_codes::{EX_OK, EX_SOFTWARE};
use uectl_core::RpcStatus;

use crate::event_loop::{LoopError, LoopHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// This call decided the exit code and posted the quit task.
    Scheduled(i32),
    /// An earlier call already decided; nothing was posted.
    AlreadyDecided,
}

/// Decides the process exit code exactly once.
///
/// The first caller of [`ExitCoordinator::exit_when_idle`] wins and posts a
/// quit task to the message loop. Later callers are no-ops, whichever thread
/// they arrive on.
#[derive(Clone)]
pub struct ExitCoordinator {
    decided: Arc<OnceLock<i32>>,
    handle: LoopHandle,
}

impl ExitCoordinator {
    pub fn new(handle: LoopHandle) -> Self {
        Self {
            decided: Arc::new(OnceLock::new()),
            handle,
        }
    }

    pub fn exit_when_idle(&self, code: i32) -> Result<ExitDisposition, LoopError> {
        if self.decided.set(code).is_err() {
            debug!(code, "exit already decided, ignoring");
            return Ok(ExitDisposition::AlreadyDecided);
        }

        self.handle.post_quit(code)?;
        debug!(code, "exit scheduled");
        Ok(ExitDisposition::Scheduled(code))
    }

    pub fn exit_with_status(
        &self,
        status: Result<(), RpcStatus>,
    ) -> Result<ExitDisposition, LoopError> {
        match status {
            Ok(()) => self.exit_when_idle(EX_OK),
            Err(status) => {
                error!("{status}");
                self.exit_when_idle(status.exit_code())
            }
        }
    }

    pub fn is_decided(&self) -> bool {
        self.decided.get().is_some()
    }

    pub fn decided_code(&self) -> Option<i32> {
        self.decided.get().copied()
    }
}

/// Converts the outcome of scheduling an exit into the init return value.
///
/// A scheduled (or earlier) exit lets the loop run so it can deliver the
/// decided code. A failure to schedule ends the process with `EX_SOFTWARE`.
pub fn init_code(result: Result<ExitDisposition, LoopError>) -> i32 {
    match result {
        Ok(_) => EX_OK,
        Err(e) => {
            error!("Failed to schedule exit: {e}");
            EX_SOFTWARE
        }
    }
}
