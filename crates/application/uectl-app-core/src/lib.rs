pub mod callback;
pub mod dispatcher;
pub mod event_loop;
pub mod exit;
pub mod ports;

pub use callback::StatusCallbackSink;
pub use dispatcher::UpdateClient;
pub use event_loop::{LoopError, LoopHandle, LoopTask, MessageLoop};
pub use exit::{init_code, ExitCoordinator, ExitDisposition};
pub use ports::*;
