use std::process::ExitCode;

fn main() -> ExitCode {
    artisan_cli::run()
}
