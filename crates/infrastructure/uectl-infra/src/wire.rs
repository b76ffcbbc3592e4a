//! Line delimited JSON messages exchanged with the update engine socket.

use serde::{Deserialize, Serialize};
use uectl_core::RpcStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Call {
    ApplyPayload { url: String, headers: Vec<String> },
    Suspend,
    Resume,
    Cancel,
    Bind,
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::ApplyPayload { .. } => "applyPayload",
            Call::Suspend => "suspend",
            Call::Resume => "resume",
            Call::Cancel => "cancel",
            Call::Bind => "bind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub id: u64,
    #[serde(flatten)]
    pub call: Call,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStatus {
    pub exception: i32,
    #[serde(default)]
    pub message: String,
}

impl WireStatus {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn into_result(self) -> Result<(), RpcStatus> {
        RpcStatus::check(self.exception, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Response {
        id: u64,
        #[serde(default)]
        status: WireStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bound: Option<bool>,
    },
    StatusUpdate {
        status_code: i32,
        percentage: f32,
    },
    PayloadApplicationComplete {
        error_code: i32,
    },
}
