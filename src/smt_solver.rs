use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use crate::smt_expr::Expression;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sort {
    #[default]
    Bool,
    Real,
}

impl Display for Sort {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Real => write!(f, "Real"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckResult {
    Satisfiable,
    Unsatisfiable,
    Unknown,
}

/// Variable assignment witnessing satisfiability.
pub type Model = HashMap<String, Expression>;

/// The solving engine this front end drives. Declarations and
/// assertions accumulate; `check` is a query against everything
/// asserted so far plus the given assumptions.
pub trait Solver {
    fn declare_variable(&mut self, name: &str, sort: Sort);
    fn add_assertion(&mut self, assertion: Expression);
    fn check(&mut self, assumptions: &[Expression]) -> (CheckResult, Option<Model>);
}

/// Placeholder engine: records the problem and answers `unknown`.
/// Lets the front end run stand-alone until a real backend is plugged
/// in.
#[derive(Default)]
pub struct SMTSolver {
    variables: HashMap<String, Sort>,
    assertions: Vec<Expression>,
}

impl SMTSolver {
    pub fn new() -> SMTSolver {
        Default::default()
    }
    pub fn assertions(&self) -> &[Expression] {
        &self.assertions
    }
}

impl Solver for SMTSolver {
    fn declare_variable(&mut self, name: &str, sort: Sort) {
        self.variables.insert(name.into(), sort);
    }
    fn add_assertion(&mut self, assertion: Expression) {
        self.assertions.push(assertion);
    }
    fn check(&mut self, _assumptions: &[Expression]) -> (CheckResult, Option<Model>) {
        (CheckResult::Unknown, None)
    }
}
