use std::fmt::{self, Display, Formatter};

use crate::error::{Error, Result};

/// Nesting limit for the reader (and, by convention, the translator).
/// Deeply nested adversarial input yields an error instead of blowing
/// the call stack.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, PartialEq, Eq)]
pub enum SExpr<'a> {
    Atom(&'a str),
    List(Vec<SExpr<'a>>),
}

/// Removes line comments: a `;` and everything up to and including the
/// next newline. Text outside comments is copied unchanged.
pub fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut in_comment = false;
    for c in input.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
        } else if c == ';' {
            in_comment = true;
        } else {
            result.push(c);
        }
    }
    result
}

pub fn parse_sexpr(input: &str) -> Result<SExpr> {
    let (result, rest) = parse_sexpr_slice(input, 0)?;
    debug_assert!(rest <= input.len());
    Ok(result)
}

/// Parses one expression starting at byte position `p`, returning it
/// together with the position just past its end.
pub fn parse_sexpr_slice(input: &str, p: usize) -> Result<(SExpr, usize)> {
    parse_at(input, p, 0)
}

fn parse_at(input: &str, mut p: usize, depth: usize) -> Result<(SExpr, usize)> {
    if depth > MAX_DEPTH {
        return Err(Error::NestingTooDeep);
    }
    let bytes = input.as_bytes();
    while p < bytes.len() && bytes[p].is_ascii_whitespace() {
        p += 1;
    }
    if p < bytes.len() && bytes[p] == b'(' {
        let mut sub = Vec::new();
        p += 1;
        loop {
            while p < bytes.len() && bytes[p].is_ascii_whitespace() {
                p += 1;
            }
            if p >= bytes.len() {
                // Unterminated list: return what we have.
                break;
            }
            if bytes[p] == b')' {
                p += 1;
                break;
            }
            let next;
            (next, p) = parse_at(input, p, depth + 1)?;
            sub.push(next);
        }
        Ok((SExpr::List(sub), p))
    } else {
        Ok(parse_token(input, p))
    }
}

/// A token starting with `|` runs verbatim to the closing `|` (both
/// delimiters consumed, neither part of the atom); any other token runs
/// to whitespace or a parenthesis.
fn parse_token(input: &str, mut p: usize) -> (SExpr, usize) {
    let bytes = input.as_bytes();
    if p < bytes.len() && bytes[p] == b'|' {
        let start = p + 1;
        p = start;
        while p < bytes.len() && bytes[p] != b'|' {
            p += 1;
        }
        let atom = &input[start..p];
        if p < bytes.len() {
            p += 1;
        }
        (SExpr::Atom(atom), p)
    } else {
        let start = p;
        while p < bytes.len()
            && !matches!(bytes[p], b'(' | b')')
            && !bytes[p].is_ascii_whitespace()
        {
            p += 1;
        }
        (SExpr::Atom(&input[start..p]), p)
    }
}

impl<'a> Display for SExpr<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(s) => write!(f, "{}", s),
            SExpr::List(sub_expr) => write!(
                f,
                "({})",
                sub_expr
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
        }
    }
}
