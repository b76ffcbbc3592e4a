use std::sync::Arc;

use uectl_core::RpcStatus;

/// Client side handle to the update engine service.
///
/// Every method blocks until the service has answered.
pub trait UpdateEngineService: Send + Sync + 'static {
    fn apply_payload(&self, url: &str, headers: &[String]) -> Result<(), RpcStatus>;
    fn suspend(&self) -> Result<(), RpcStatus>;
    fn resume(&self) -> Result<(), RpcStatus>;
    fn cancel(&self) -> Result<(), RpcStatus>;
    /// Registers `callback` for status notifications. `Ok(false)` means the
    /// service answered but refused the registration.
    fn bind(&self, callback: Arc<dyn UpdateEngineCallback>) -> Result<bool, RpcStatus>;
}

/// Notifications pushed by the update engine after a successful `bind`.
///
/// Called on whatever thread the transport delivers on.
pub trait UpdateEngineCallback: Send + Sync + 'static {
    fn on_status_update(&self, status_code: i32, percentage: f32);
    fn on_payload_application_complete(&self, error_code: i32);
}

impl<T: UpdateEngineService + ?Sized> UpdateEngineService for Arc<T> {
    fn apply_payload(&self, url: &str, headers: &[String]) -> Result<(), RpcStatus> {
        (**self).apply_payload(url, headers)
    }

    fn suspend(&self) -> Result<(), RpcStatus> {
        (**self).suspend()
    }

    fn resume(&self) -> Result<(), RpcStatus> {
        (**self).resume()
    }

    fn cancel(&self) -> Result<(), RpcStatus> {
        (**self).cancel()
    }

    fn bind(&self, callback: Arc<dyn UpdateEngineCallback>) -> Result<bool, RpcStatus> {
        (**self).bind(callback)
    }
}
