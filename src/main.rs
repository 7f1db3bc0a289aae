use std::process::ExitCode;

fn main() -> ExitCode {
    match reqconcur::entry::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
