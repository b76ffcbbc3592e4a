//! Process exit codes used by the client.

use crate::ErrorCode;

/// Successful termination (`EX_OK`).
pub const EX_OK: i32 = 0;

/// Generic failure: usage errors, bind failures, failed updates.
pub const EXIT_FAILURE: i32 = 1;

/// The deferred exit could not be posted to the message loop (`EX_SOFTWARE`).
pub const EX_SOFTWARE: i32 = 70;

/// Maps the terminal error code reported by the service to an exit code.
pub fn exit_code_for_completion(code: ErrorCode) -> i32 {
    if code.is_success() {
        EX_OK
    } else {
        EXIT_FAILURE
    }
}
