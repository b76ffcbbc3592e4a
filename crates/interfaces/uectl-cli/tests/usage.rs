use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use clap::Parser;
use uectl_app_core::ports::{UpdateEngineCallback, UpdateEngineService};
use uectl_cli::{run_client, Cli};
use uectl_config::DEFAULT_PAYLOAD_URI;
use uectl_core::exit_codes::{EXIT_FAILURE, EX_OK};
use uectl_core::RpcStatus;

#[derive(Default)]
struct DummyService {
    calls: Mutex<Vec<String>>,
    headers: Mutex<Vec<String>>,
}

impl DummyService {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl UpdateEngineService for DummyService {
    fn apply_payload(&self, url: &str, headers: &[String]) -> Result<(), RpcStatus> {
        self.calls.lock().unwrap().push(format!("apply_payload:{url}"));
        *self.headers.lock().unwrap() = headers.to_vec();
        Ok(())
    }

    fn suspend(&self) -> Result<(), RpcStatus> {
        self.calls.lock().unwrap().push("suspend".into());
        Ok(())
    }

    fn resume(&self) -> Result<(), RpcStatus> {
        self.calls.lock().unwrap().push("resume".into());
        Err(RpcStatus::new(-5, "Update not suspended"))
    }

    fn cancel(&self) -> Result<(), RpcStatus> {
        self.calls.lock().unwrap().push("cancel".into());
        Ok(())
    }

    fn bind(&self, callback: Arc<dyn UpdateEngineCallback>) -> Result<bool, RpcStatus> {
        self.calls.lock().unwrap().push("bind".into());
        std::thread::spawn(move || callback.on_payload_application_complete(0));
        Ok(true)
    }
}

#[test]
fn no_arguments_is_nothing_to_do() {
    let connected = AtomicBool::new(false);
    let code = run_client(["uectl"], |_cli: &Cli| {
        connected.store(true, Ordering::SeqCst);
        Ok(DummyService::default())
    });

    assert_eq!(code, EXIT_FAILURE);
    assert!(!connected.load(Ordering::SeqCst), "no service lookup expected");
}

#[test]
fn positional_argument_is_rejected_before_any_call() {
    let service = Arc::new(DummyService::default());
    let code = run_client(["uectl", "--suspend", "foo"], |_cli: &Cli| Ok(service.clone()));

    assert_eq!(code, EXIT_FAILURE);
    assert!(service.calls().is_empty());
}

#[test]
fn lone_positional_argument_is_rejected() {
    let service = Arc::new(DummyService::default());
    let code = run_client(["uectl", "foo"], |_cli: &Cli| Ok(service.clone()));

    assert_eq!(code, EXIT_FAILURE);
    assert!(service.calls().is_empty());
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let service = Arc::new(DummyService::default());
    let code = run_client(["uectl", "--reboot"], |_cli: &Cli| Ok(service.clone()));

    assert_eq!(code, EXIT_FAILURE);
    assert!(service.calls().is_empty());
}

#[test]
fn help_exits_zero() {
    let code = run_client(["uectl", "--help"], |_cli: &Cli| Ok(DummyService::default()));
    assert_eq!(code, EX_OK);
}

#[test]
fn failed_lookup_exits_one() {
    let code = run_client(["uectl", "--cancel"], |_cli: &Cli| -> anyhow::Result<DummyService> {
        anyhow::bail!("service not found")
    });
    assert_eq!(code, EXIT_FAILURE);
}

#[test]
fn suspend_and_resume_map_their_status() {
    let service = Arc::new(DummyService::default());
    assert_eq!(
        run_client(["uectl", "--suspend"], |_cli: &Cli| Ok(service.clone())),
        EX_OK
    );
    assert_eq!(
        run_client(["uectl", "--resume"], |_cli: &Cli| Ok(service.clone())),
        -5
    );
    assert_eq!(service.calls(), vec!["suspend", "resume"]);
}

#[test]
fn flags_without_a_command_exit_zero() {
    let service = Arc::new(DummyService::default());
    let code = run_client(["uectl", "--payload=file:///tmp/x"], |_cli: &Cli| {
        Ok(service.clone())
    });

    assert_eq!(code, EX_OK);
    assert!(service.calls().is_empty());
}

#[test]
fn update_passes_non_empty_header_lines_in_order() {
    let service = Arc::new(DummyService::default());
    let code = run_client(
        [
            "uectl",
            "--update",
            "--payload=file:///data/ota.zip",
            "--headers=FILE_HASH=abc\n\nFILE_SIZE=1024\n\n\nMETADATA_SIZE=12\n",
        ],
        |_cli: &Cli| Ok(service.clone()),
    );

    assert_eq!(code, EX_OK);
    assert_eq!(service.calls(), vec!["apply_payload:file:///data/ota.zip"]);
    assert_eq!(
        *service.headers.lock().unwrap(),
        vec!["FILE_HASH=abc", "FILE_SIZE=1024", "METADATA_SIZE=12"]
    );
}

#[test]
fn update_and_follow_waits_for_completion() {
    let service = Arc::new(DummyService::default());
    let code = run_client(["uectl", "--update", "--follow"], |_cli: &Cli| {
        Ok(service.clone())
    });

    assert_eq!(code, EX_OK);
    assert_eq!(
        service.calls(),
        vec!["bind".to_string(), format!("apply_payload:{DEFAULT_PAYLOAD_URI}")]
    );
}

#[test]
fn payload_defaults_to_the_local_placeholder() {
    let cli = Cli::try_parse_from(["uectl", "--update"]).unwrap();
    let req = cli.payload_request();

    assert_eq!(req.uri, DEFAULT_PAYLOAD_URI);
    assert!(req.headers.is_empty());
    assert!(cli.selection().update);
    assert!(!cli.selection().follow);
}
