use std::sync::OnceLock;

use crate::socket::TransportError;

static RUNTIME: OnceLock<std::result::Result<tokio::runtime::Runtime, String>> = OnceLock::new();

/// Runtime driving the socket I/O.
///
/// One worker thread keeps reading notifications while the caller's thread
/// is blocked on the message loop.
pub(crate) fn runtime() -> Result<&'static tokio::runtime::Runtime, TransportError> {
    let rt = RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("uectl-transport")
            .enable_all()
            .build()
            .map_err(|e| e.to_string())
    });
    match rt {
        Ok(rt) => Ok(rt),
        Err(message) => Err(TransportError::Runtime(message.clone())),
    }
}
