use std::collections::HashMap;
use std::io::Write;

use crate::error::{Error, Result};
use crate::sexpr_parser::{self, SExpr};
use crate::smt_expr::{self, Scope};
use crate::smt_solver::{CheckResult, Solver, Sort};

/// Runs a whole SMT-LIB2 script against `solver`, writing one verdict
/// line per `check-sat` to `output`. Stops successfully on `exit` or
/// end of input; the first malformed command, unresolved name or
/// unknown instruction aborts the run.
pub fn handle_commands(input: &str, output: &mut impl Write, solver: &mut impl Solver) -> Result<()> {
    let input = sexpr_parser::strip_comments(input);
    let mut declarations: HashMap<String, Sort> = HashMap::new();

    let bytes = input.as_bytes();
    let mut p = 0;
    loop {
        while p < bytes.len() && bytes[p].is_ascii_whitespace() {
            p += 1;
        }
        if p >= bytes.len() {
            return Ok(());
        }

        let (command, rest) = sexpr_parser::parse_sexpr_slice(&input, p)?;
        p = rest;
        //println!("{}", command);
        let SExpr::List(parts) = &command else {
            return Err(Error::MalformedCommand(command.to_string()));
        };
        let Some(SExpr::Atom(cmd)) = parts.first() else {
            return Err(Error::MalformedCommand(command.to_string()));
        };
        match *cmd {
            "set-info" | "set-logic" => {}
            "declare-fun" => {
                let [_, SExpr::Atom(name), SExpr::List(parameters), SExpr::Atom(sort)] =
                    &parts[..]
                else {
                    return Err(Error::MalformedCommand(command.to_string()));
                };
                if !parameters.is_empty() {
                    return Err(Error::MalformedCommand(command.to_string()));
                }
                let sort = match *sort {
                    "Real" => Sort::Real,
                    "Bool" => Sort::Bool,
                    other => return Err(Error::InvalidSort(other.into())),
                };
                declarations.insert((*name).into(), sort);
                solver.declare_variable(name, sort);
            }
            "define-fun" => {
                eprintln!("ignoring 'define-fun'");
            }
            "assert" => {
                let [_, assertion] = &parts[..] else {
                    return Err(Error::MalformedCommand(command.to_string()));
                };
                let assertion = smt_expr::translate(assertion, &Scope::Global(&declarations))?;
                solver.add_assertion(assertion);
            }
            "check-sat" => {
                let (verdict, _model) = solver.check(&[]);
                match verdict {
                    CheckResult::Satisfiable => writeln!(output, "sat")?,
                    CheckResult::Unsatisfiable => writeln!(output, "unsat")?,
                    CheckResult::Unknown => writeln!(output, "unknown")?,
                }
            }
            "exit" => return Ok(()),
            other => return Err(Error::UnknownCommand(other.into())),
        }
    }
}
