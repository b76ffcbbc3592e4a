//! Central configuration constants for the update engine client.

/// Payload URI used by `--update` when `--payload` is not given.
pub const DEFAULT_PAYLOAD_URI: &str = "http://127.0.0.1:8080/payload";

/// Name the update engine service registers under.
pub const SERVICE_NAME: &str = "android.os.UpdateEngineService";

/// Socket the update engine service listens on.
pub const DEFAULT_SOCKET_PATH: &str = "/run/update_engine/update_engine.sock";

/// Environment variable overriding [`DEFAULT_SOCKET_PATH`].
pub const SOCKET_ENV_VAR: &str = "UPDATE_ENGINE_SOCKET";
