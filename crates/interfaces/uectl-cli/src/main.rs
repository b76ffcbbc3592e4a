use uectl_cli::{connect_service, run_client};

fn main() {
    let code = run_client(std::env::args_os(), connect_service);
    std::process::exit(code);
}
