pub mod error;
pub mod sexpr_parser;
pub mod smt_expr;
pub mod smt_smtlib;
pub mod smt_solver;
