use std::process::ExitCode;

use solsmtr::smt_smtlib;
use solsmtr::smt_solver::SMTSolver;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: solsmtr <smtlib2 file>");
        return ExitCode::FAILURE;
    }
    let input = match std::fs::read_to_string(&args[1]) {
        Ok(input) => input,
        Err(error) => {
            eprintln!("{}: {}", args[1], error);
            return ExitCode::FAILURE;
        }
    };
    let mut solver = SMTSolver::new();
    match smt_smtlib::handle_commands(&input, &mut std::io::stdout(), &mut solver) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
