use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::sexpr_parser::{SExpr, MAX_DEPTH};
use crate::smt_solver::Sort;

/// Operators whose application is boolean-sorted regardless of the
/// operand sorts.
const BOOL_OPERATORS: &[&str] = &["and", "or", "not", "=", "<", ">", "<=", ">=", "=>"];

/// A sorted expression tree. Leaves are variable references or numeric
/// literals (no arguments); inner nodes apply `name` to `arguments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub sort: Sort,
}

impl Expression {
    pub fn variable(name: &str, sort: Sort) -> Expression {
        Expression {
            name: name.into(),
            arguments: Vec::new(),
            sort,
        }
    }
    pub fn literal(value: BigUint) -> Expression {
        Expression {
            name: value.to_string(),
            arguments: Vec::new(),
            sort: Sort::Real,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(
                f,
                "({} {})",
                self.name,
                self.arguments
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            )
        }
    }
}

/// Name-to-sort environment. `Global` borrows the run-long declaration
/// table; each `let` pushes a `Nested` frame. Frames are never mutated
/// after construction, so sibling subtrees always see the unmodified
/// parent.
pub enum Scope<'a> {
    Global(&'a HashMap<String, Sort>),
    Nested {
        bindings: HashMap<String, Sort>,
        parent: &'a Scope<'a>,
    },
}

impl<'a> Scope<'a> {
    pub fn lookup(&self, name: &str) -> Option<Sort> {
        match self {
            Scope::Global(table) => table.get(name).copied(),
            Scope::Nested { bindings, parent } => {
                bindings.get(name).copied().or_else(|| parent.lookup(name))
            }
        }
    }
}

/// Parses a numeric literal: an exact `.0` suffix is stripped
/// (repeatedly), then the rest must be a non-negative integer.
/// Anything with a genuine fractional part is rejected.
pub fn parse_numeric(atom: &str) -> Result<BigUint> {
    let mut digits = atom;
    while digits.len() > 2 && digits.ends_with(".0") {
        digits = &digits[..digits.len() - 2];
    }
    digits
        .parse::<BigUint>()
        .map_err(|_| Error::InvalidNumericLiteral(atom.into()))
}

pub fn translate(expr: &SExpr, scope: &Scope) -> Result<Expression> {
    translate_at(expr, scope, 0)
}

fn translate_at(expr: &SExpr, scope: &Scope, depth: usize) -> Result<Expression> {
    if depth > MAX_DEPTH {
        return Err(Error::NestingTooDeep);
    }
    match expr {
        SExpr::Atom(atom) => {
            if atom.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
                Ok(Expression::literal(parse_numeric(atom)?))
            } else {
                match scope.lookup(atom) {
                    Some(sort) => Ok(Expression::variable(atom, sort)),
                    None => Err(Error::UnresolvedVariable((*atom).into())),
                }
            }
        }
        SExpr::List(items) => {
            let op = match items.first() {
                Some(SExpr::Atom(op)) => *op,
                _ => return Err(Error::MalformedExpression(expr.to_string())),
            };
            if op == "let" {
                translate_let(expr, items, scope, depth)
            } else {
                let arguments = items[1..]
                    .iter()
                    .map(|item| translate_at(item, scope, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                let sort = if BOOL_OPERATORS.contains(&op) {
                    Sort::Bool
                } else {
                    // Heuristic: take the sort of the last argument.
                    // Valid only for sort-homogeneous operands.
                    match arguments.last() {
                        Some(argument) => argument.sort,
                        None => return Err(Error::MalformedExpression(expr.to_string())),
                    }
                };
                Ok(Expression {
                    name: op.into(),
                    arguments,
                    sort,
                })
            }
        }
    }
}

/// `(let ((x1 t1) (x2 t2)) T)` becomes `let(x1(t1), x2(t2), T)`.
/// Binding values are translated under the outer scope, so bindings do
/// not see each other (parallel semantics); only the body sees them.
fn translate_let(
    expr: &SExpr,
    items: &[SExpr],
    scope: &Scope,
    depth: usize,
) -> Result<Expression> {
    let [_, SExpr::List(bindings), body] = items else {
        return Err(Error::MalformedExpression(expr.to_string()));
    };
    let mut bound = HashMap::new();
    let mut arguments = Vec::new();
    for binding in bindings {
        let SExpr::List(pair) = binding else {
            return Err(Error::MalformedExpression(expr.to_string()));
        };
        let [SExpr::Atom(name), value] = &pair[..] else {
            return Err(Error::MalformedExpression(expr.to_string()));
        };
        let value = translate_at(value, scope, depth + 1)?;
        let sort = value.sort;
        bound.insert((*name).to_string(), sort);
        arguments.push(Expression {
            name: (*name).into(),
            arguments: vec![value],
            sort,
        });
    }
    let inner = Scope::Nested {
        bindings: bound,
        parent: scope,
    };
    let body = translate_at(body, &inner, depth + 1)?;
    let sort = body.sort;
    arguments.push(body);
    Ok(Expression {
        name: "let".into(),
        arguments,
        sort,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sexpr_parser::parse_sexpr;

    fn translate_str(input: &str, table: &HashMap<String, Sort>) -> Result<Expression> {
        translate(&parse_sexpr(input).unwrap(), &Scope::Global(table))
    }

    fn table(vars: &[(&str, Sort)]) -> HashMap<String, Sort> {
        vars.iter().map(|(n, s)| (n.to_string(), *s)).collect()
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(parse_numeric("7").unwrap(), BigUint::from(7u32));
        assert_eq!(parse_numeric("7.0").unwrap(), BigUint::from(7u32));
        assert_eq!(parse_numeric("7.0.0").unwrap(), BigUint::from(7u32));
        assert_eq!(parse_numeric("0.0").unwrap(), BigUint::from(0u32));
        assert_eq!(
            parse_numeric("123456789012345678901234567890").unwrap(),
            "123456789012345678901234567890".parse::<BigUint>().unwrap()
        );
        assert!(matches!(
            parse_numeric("7.5"),
            Err(Error::InvalidNumericLiteral(_))
        ));
        assert!(matches!(
            parse_numeric(".0"),
            Err(Error::InvalidNumericLiteral(_))
        ));
        assert!(matches!(
            parse_numeric("7.00"),
            Err(Error::InvalidNumericLiteral(_))
        ));
    }

    #[test]
    fn leaves() {
        let table = table(&[("x", Sort::Real), ("b", Sort::Bool)]);
        assert_eq!(
            translate_str("x", &table).unwrap(),
            Expression::variable("x", Sort::Real)
        );
        assert_eq!(
            translate_str("b", &table).unwrap(),
            Expression::variable("b", Sort::Bool)
        );
        assert_eq!(
            translate_str("2.0", &table).unwrap(),
            Expression::literal(BigUint::from(2u32))
        );
        assert!(matches!(
            translate_str("y", &table),
            Err(Error::UnresolvedVariable(name)) if name == "y"
        ));
    }

    #[test]
    fn operator_sorts() {
        let table = table(&[("x", Sort::Real), ("y", Sort::Real)]);
        let cmp = translate_str("(> x 0.0)", &table).unwrap();
        assert_eq!(cmp.sort, Sort::Bool);
        assert_eq!(cmp.name, ">");
        assert_eq!(cmp.arguments.len(), 2);
        // Non-boolean operators take the last argument's sort.
        assert_eq!(translate_str("(+ x y)", &table).unwrap().sort, Sort::Real);
        assert_eq!(
            translate_str("(and (> x y) (< x y))", &table).unwrap().sort,
            Sort::Bool
        );
    }

    #[test]
    fn empty_application_is_malformed() {
        let table = table(&[]);
        assert!(matches!(
            translate_str("(f)", &table),
            Err(Error::MalformedExpression(_))
        ));
        assert!(matches!(
            translate_str("()", &table),
            Err(Error::MalformedExpression(_))
        ));
        assert!(matches!(
            translate_str("((f) x)", &table),
            Err(Error::MalformedExpression(_))
        ));
    }

    #[test]
    fn let_shadowing() {
        let table = table(&[("v", Sort::Real), ("b", Sort::Bool)]);
        // The binding's value is resolved in the outer scope; the body
        // sees the new sort of `v`.
        let expr = translate_str("(let ((v b)) (not v))", &table).unwrap();
        assert_eq!(expr.name, "let");
        assert_eq!(expr.sort, Sort::Bool);
        let binding = &expr.arguments[0];
        assert_eq!(binding.name, "v");
        assert_eq!(binding.sort, Sort::Bool);
        assert_eq!(binding.arguments[0], Expression::variable("b", Sort::Bool));
        let body = &expr.arguments[1];
        assert_eq!(body.arguments[0], Expression::variable("v", Sort::Bool));
        // A sibling expression still sees the outer `v`.
        assert_eq!(
            translate_str("v", &table).unwrap(),
            Expression::variable("v", Sort::Real)
        );
    }

    #[test]
    fn let_bindings_are_parallel() {
        let table = table(&[("x", Sort::Real)]);
        // `b` must not see `a`.
        assert!(matches!(
            translate_str("(let ((a x) (b a)) b)", &table),
            Err(Error::UnresolvedVariable(name)) if name == "a"
        ));
    }

    #[test]
    fn let_nested() {
        let table = table(&[("x", Sort::Real), ("p", Sort::Bool)]);
        let expr = translate_str("(let ((y x)) (let ((y p)) y))", &table).unwrap();
        assert_eq!(expr.sort, Sort::Bool);
        // Outer binding still resolved against the declaration table.
        assert_eq!(expr.arguments[0].sort, Sort::Real);
    }

    #[test]
    fn let_shape_errors() {
        let table = table(&[("x", Sort::Real)]);
        assert!(matches!(
            translate_str("(let ((y x)))", &table),
            Err(Error::MalformedExpression(_))
        ));
        assert!(matches!(
            translate_str("(let ((y x z)) y)", &table),
            Err(Error::MalformedExpression(_))
        ));
        assert!(matches!(
            translate_str("(let x y)", &table),
            Err(Error::MalformedExpression(_))
        ));
    }

    #[test]
    fn let_retains_bindings_in_rendering() {
        let table = table(&[("x", Sort::Real)]);
        let expr = translate_str("(let ((y x)) (> y 1.0))", &table).unwrap();
        assert_eq!(expr.to_string(), "(let (y x) (> y 1))");
    }
}
