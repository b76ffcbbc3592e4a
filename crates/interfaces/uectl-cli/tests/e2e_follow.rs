use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::tempdir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use uectl_cli::{connect_service, run_client};
use uectl_infra::{Call, RequestEnvelope, ServerMessage, WireStatus};

struct MockEngine {
    _dir: tempfile::TempDir,
    socket: PathBuf,
    calls: Arc<Mutex<Vec<String>>>,
    _rt: tokio::runtime::Runtime,
}

/// Serves one client. Once a payload is applied it reports progress and
/// then completes with `error_code`.
fn start_mock_engine(error_code: i32) -> MockEngine {
    let dir = tempdir().unwrap();
    let socket = dir.path().join("update_engine.sock");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let listener = {
        let _guard = rt.enter();
        UnixListener::bind(&socket).unwrap()
    };

    let seen = calls.clone();
    rt.spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let req: RequestEnvelope = serde_json::from_str(&line).unwrap();
            seen.lock().unwrap().push(req.call.name().to_string());

            let mut out = vec![ServerMessage::Response {
                id: req.id,
                status: WireStatus::ok(),
                bound: matches!(req.call, Call::Bind).then_some(true),
            }];
            if matches!(req.call, Call::ApplyPayload { .. }) {
                out.push(ServerMessage::StatusUpdate {
                    status_code: 3,
                    percentage: 0.25,
                });
                out.push(ServerMessage::StatusUpdate {
                    status_code: 3,
                    percentage: 1.0,
                });
                out.push(ServerMessage::StatusUpdate {
                    status_code: 6,
                    percentage: 1.0,
                });
                out.push(ServerMessage::PayloadApplicationComplete { error_code });
            }

            for msg in out {
                let mut text = serde_json::to_string(&msg).unwrap();
                text.push('\n');
                write_half.write_all(text.as_bytes()).await.unwrap();
            }
        }
    });

    MockEngine {
        _dir: dir,
        socket,
        calls,
        _rt: rt,
    }
}

fn socket_flag(engine: &MockEngine) -> String {
    format!("--socket={}", engine.socket.display())
}

#[test]
fn update_and_follow_succeeds_end_to_end() {
    let engine = start_mock_engine(0);

    let code = run_client(
        [
            "uectl".to_string(),
            "--update".into(),
            "--follow".into(),
            "--payload=file:///data/ota/payload.bin".into(),
            "--headers=FILE_SIZE=1024\nMETADATA_SIZE=64".into(),
            socket_flag(&engine),
        ],
        connect_service,
    );

    assert_eq!(code, 0);
    assert_eq!(*engine.calls.lock().unwrap(), vec!["bind", "applyPayload"]);
}

#[test]
fn update_and_follow_reports_failure_end_to_end() {
    // kDownloadTransferError
    let engine = start_mock_engine(9);

    let code = run_client(
        [
            "uectl".to_string(),
            "--update".into(),
            "--follow".into(),
            socket_flag(&engine),
        ],
        connect_service,
    );

    assert_eq!(code, 1);
}

#[test]
fn cancel_without_follow_exits_after_the_call() {
    let engine = start_mock_engine(0);

    let code = run_client(
        ["uectl".to_string(), "--cancel".into(), socket_flag(&engine)],
        connect_service,
    );

    assert_eq!(code, 0);
    assert_eq!(*engine.calls.lock().unwrap(), vec!["cancel"]);
}

#[test]
fn missing_service_exits_one() {
    let dir = tempdir().unwrap();
    let socket = dir.path().join("absent.sock");

    let code = run_client(
        [
            "uectl".to_string(),
            "--suspend".into(),
            format!("--socket={}", socket.display()),
        ],
        connect_service,
    );

    assert_eq!(code, 1);
}
