pub mod command;
pub mod error_code;
pub mod exit_codes;
pub mod payload;
pub mod rpc;
pub mod update_status;

pub use command::CommandSelection;
pub use error_code::ErrorCode;
pub use payload::{parse_headers, PayloadRequest};
pub use rpc::{ExceptionCode, RpcStatus};
pub use update_status::{status_code_to_string, UpdateStatus};
