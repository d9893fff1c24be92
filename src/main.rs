use std::process::ExitCode;

fn main() -> ExitCode {
    // Failures are already logged by `app::run`.
    match quote_report::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(err.exit_code()),
    }
}
