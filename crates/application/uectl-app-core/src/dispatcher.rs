use std::sync::Arc;

use tracing::{debug, error, info};
use uectl_core::exit_codes::{EXIT_FAILURE, EX_OK};
use uectl_core::{CommandSelection, PayloadRequest};

use crate::callback::StatusCallbackSink;
use crate::event_loop::MessageLoop;
use crate::exit::{init_code, ExitCoordinator};
use crate::ports::{UpdateEngineCallback, UpdateEngineService};

/// Owns one invocation of the client: the service handle, the message loop
/// and the exit coordinator.
pub struct UpdateClient<S> {
    service: Arc<S>,
    message_loop: MessageLoop,
    exit: ExitCoordinator,
    callback: Option<Arc<StatusCallbackSink>>,
}

impl<S> UpdateClient<S>
where
    S: UpdateEngineService,
{
    pub fn new(service: S) -> Self {
        let message_loop = MessageLoop::new();
        let exit = ExitCoordinator::new(message_loop.handle());
        Self {
            service: Arc::new(service),
            message_loop,
            exit,
            callback: None,
        }
    }

    pub fn exit_coordinator(&self) -> ExitCoordinator {
        self.exit.clone()
    }

    /// Issues the requested command and decides whether to wait.
    ///
    /// Returns a non-zero code when the process must end right away without
    /// running the loop. `EX_OK` means the loop must run; it will either
    /// deliver an exit already scheduled here or wait for the service to
    /// report completion.
    pub fn dispatch(&mut self, selection: &CommandSelection, request: &PayloadRequest) -> i32 {
        if selection.suspend {
            debug!("suspending update");
            return init_code(self.exit.exit_with_status(self.service.suspend()));
        }

        if selection.resume {
            debug!("resuming update");
            return init_code(self.exit.exit_with_status(self.service.resume()));
        }

        if selection.cancel {
            debug!("cancelling update");
            return init_code(self.exit.exit_with_status(self.service.cancel()));
        }

        let mut keep_running = false;

        if selection.follow {
            let sink = Arc::new(StatusCallbackSink::new(
                self.message_loop.handle(),
                self.exit.clone(),
            ));
            let callback: Arc<dyn UpdateEngineCallback> = sink.clone();
            match self.service.bind(callback) {
                Ok(true) => {}
                Ok(false) => {
                    error!("Failed to bind() the update engine daemon: registration refused");
                    return EXIT_FAILURE;
                }
                Err(status) => {
                    error!("Failed to bind() the update engine daemon: {status}");
                    return EXIT_FAILURE;
                }
            }
            self.callback = Some(sink);
            keep_running = true;
        }

        if selection.update {
            info!(
                uri = %request.uri,
                headers = request.headers.len(),
                "applying payload"
            );
            if let Err(status) = self.service.apply_payload(&request.uri, &request.headers) {
                return init_code(self.exit.exit_with_status(Err(status)));
            }
        }

        if !keep_running {
            return init_code(self.exit.exit_when_idle(EX_OK));
        }

        debug!("waiting for the update engine to report completion");
        EX_OK
    }

    /// Processes already queued loop tasks without blocking.
    pub fn tick(&mut self) -> Option<i32> {
        self.message_loop.tick()
    }

    /// Dispatches and then waits on the message loop for the exit code.
    pub fn run(mut self, selection: &CommandSelection, request: &PayloadRequest) -> i32 {
        let code = self.dispatch(selection, request);
        if code != EX_OK {
            return code;
        }

        let Self {
            message_loop,
            service: _service,
            exit: _exit,
            callback: _callback,
        } = self;
        message_loop.run()
    }
}
