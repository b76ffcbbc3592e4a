use tracing::{error, info, warn};
use uectl_core::exit_codes::exit_code_for_completion;
use uectl_core::{status_code_to_string, ErrorCode};

use crate::event_loop::LoopHandle;
use crate::exit::ExitCoordinator;
use crate::ports::UpdateEngineCallback;

/// Callback registered with the service in follow mode.
///
/// Notifications are re-posted onto the message loop, so the logging and the
/// exit decision below always run on the loop thread. Once an exit has been
/// decided, new and already queued notifications are dropped without side
/// effects.
pub struct StatusCallbackSink {
    handle: LoopHandle,
    exit: ExitCoordinator,
}

impl StatusCallbackSink {
    pub fn new(handle: LoopHandle, exit: ExitCoordinator) -> Self {
        Self { handle, exit }
    }

    fn post(&self, what: &str, task: impl FnOnce(&ExitCoordinator) + Send + 'static) {
        if self.exit.is_decided() {
            return;
        }

        let exit = self.exit.clone();
        let res = self.handle.post_task(move || {
            if exit.is_decided() {
                return;
            }
            task(&exit);
        });
        if let Err(e) = res {
            warn!("Dropping {what} notification: {e}");
        }
    }
}

impl UpdateEngineCallback for StatusCallbackSink {
    fn on_status_update(&self, status_code: i32, percentage: f32) {
        self.post("onStatusUpdate", move |_| {
            info!(
                "onStatusUpdate({} ({}), {})",
                status_code_to_string(status_code),
                status_code,
                percentage
            );
        });
    }

    fn on_payload_application_complete(&self, error_code: i32) {
        self.post("onPayloadApplicationComplete", move |exit| {
            let code = ErrorCode(error_code);
            info!("onPayloadApplicationComplete({code})");
            if let Err(e) = exit.exit_when_idle(exit_code_for_completion(code)) {
                error!("Failed to schedule exit: {e}");
            }
        });
    }
}
