//! Dockstat binary entry point.

fn main() {
    if let Err(e) = dockstat_cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(2);
    }
}
