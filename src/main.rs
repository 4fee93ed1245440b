use std::process::ExitCode;

fn main() -> ExitCode {
    match packed_ternary::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
