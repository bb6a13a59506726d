use std::process::ExitCode;

fn main() -> ExitCode {
    docwarden::exit_code(docwarden::execute_from_env())
}
