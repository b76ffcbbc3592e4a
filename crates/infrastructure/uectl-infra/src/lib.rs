mod runtime;
pub mod socket;
pub mod wire;

// Re-exports for convenience
pub use socket::{SocketUpdateEngine, TransportError};
pub use wire::{Call, RequestEnvelope, ServerMessage, WireStatus};
