use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uectl_app_core::ports::{UpdateEngineCallback, UpdateEngineService};
use uectl_core::RpcStatus;

use crate::runtime::runtime;
use crate::wire::{Call, RequestEnvelope, ServerMessage, WireStatus};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to connect to the update engine at {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Transport runtime unavailable: {0}")]
    Runtime(String),
}

struct Reply {
    status: WireStatus,
    bound: Option<bool>,
}

/// In-flight calls by request id. `None` once the connection is gone.
type PendingReplies = Arc<Mutex<Option<HashMap<u64, oneshot::Sender<Reply>>>>>;
type CallbackSlot = Arc<Mutex<Option<Arc<dyn UpdateEngineCallback>>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Update engine service reached over a Unix stream socket.
///
/// Calls block the caller until the matching response line arrives. A
/// background reader task routes responses to their callers and hands
/// notifications to the bound callback.
pub struct SocketUpdateEngine {
    rt: &'static tokio::runtime::Runtime,
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: PendingReplies,
    callback: CallbackSlot,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
}

impl SocketUpdateEngine {
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let rt = runtime()?;
        let stream = rt
            .block_on(UnixStream::connect(path))
            .map_err(|source| TransportError::Connect {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("connected to update engine at {}", path.display());

        let (read_half, write_half) = stream.into_split();
        let pending: PendingReplies = Arc::new(Mutex::new(Some(HashMap::new())));
        let callback: CallbackSlot = Arc::new(Mutex::new(None));
        let reader = rt.spawn(read_loop(read_half, pending.clone(), callback.clone()));

        Ok(Self {
            rt,
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            callback,
            next_id: AtomicU64::new(1),
            reader,
        })
    }

    fn call(&self, call: Call) -> Result<Reply, RpcStatus> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let name = call.name();
        let mut line = serde_json::to_string(&RequestEnvelope { id, call })
            .map_err(|e| RpcStatus::transaction_failed(format!("{name}: encode failed: {e}")))?;
        line.push('\n');

        let (tx, rx) = oneshot::channel();
        match lock(&self.pending).as_mut() {
            Some(pending) => {
                pending.insert(id, tx);
            }
            None => {
                return Err(RpcStatus::transaction_failed(format!(
                    "{name}: connection to the update engine is closed"
                )))
            }
        }

        let sent = self.rt.block_on(async {
            let mut writer = self.writer.lock().await;
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await
        });
        if let Err(e) = sent {
            if let Some(pending) = lock(&self.pending).as_mut() {
                pending.remove(&id);
            }
            return Err(RpcStatus::transaction_failed(format!(
                "{name}: send failed: {e}"
            )));
        }

        debug!(id, method = name, "waiting for reply");
        self.rt.block_on(rx).map_err(|_| {
            RpcStatus::transaction_failed(format!("{name}: connection closed before reply"))
        })
    }

    fn simple_call(&self, call: Call) -> Result<(), RpcStatus> {
        self.call(call)?.status.into_result()
    }
}

impl UpdateEngineService for SocketUpdateEngine {
    fn apply_payload(&self, url: &str, headers: &[String]) -> Result<(), RpcStatus> {
        self.simple_call(Call::ApplyPayload {
            url: url.to_string(),
            headers: headers.to_vec(),
        })
    }

    fn suspend(&self) -> Result<(), RpcStatus> {
        self.simple_call(Call::Suspend)
    }

    fn resume(&self) -> Result<(), RpcStatus> {
        self.simple_call(Call::Resume)
    }

    fn cancel(&self) -> Result<(), RpcStatus> {
        self.simple_call(Call::Cancel)
    }

    fn bind(&self, callback: Arc<dyn UpdateEngineCallback>) -> Result<bool, RpcStatus> {
        // Installed first so notifications sent right after the reply are not lost.
        *lock(&self.callback) = Some(callback);

        let bound = self.call(Call::Bind).and_then(|reply| {
            reply.status.into_result()?;
            Ok(reply.bound.unwrap_or(false))
        });
        if !matches!(bound, Ok(true)) {
            *lock(&self.callback) = None;
        }
        bound
    }
}

impl Drop for SocketUpdateEngine {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(read_half: OwnedReadHalf, pending: PendingReplies, callback: CallbackSlot) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                warn!("update engine closed the connection");
                break;
            }
            Err(e) => {
                warn!("reading from update engine failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let msg: ServerMessage = match serde_json::from_str(&line) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("ignoring malformed message from update engine: {e}");
                continue;
            }
        };

        match msg {
            ServerMessage::Response { id, status, bound } => {
                let tx = lock(&pending).as_mut().and_then(|p| p.remove(&id));
                match tx {
                    Some(tx) => {
                        let _ = tx.send(Reply { status, bound });
                    }
                    None => warn!(id, "reply for unknown request"),
                }
            }
            ServerMessage::StatusUpdate {
                status_code,
                percentage,
            } => {
                let cb = lock(&callback).clone();
                if let Some(cb) = cb {
                    cb.on_status_update(status_code, percentage);
                }
            }
            ServerMessage::PayloadApplicationComplete { error_code } => {
                let cb = lock(&callback).clone();
                if let Some(cb) = cb {
                    cb.on_payload_application_complete(error_code);
                }
            }
        }
    }

    // Dropping the senders fails every in-flight call.
    lock(&pending).take();
}
