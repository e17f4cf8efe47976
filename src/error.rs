use std::io;

/// Everything that can abort a run. Any of these stops processing at the
/// point of detection; there is no recovery channel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expression nesting too deep")]
    NestingTooDeep,
    #[error("invalid numeric literal: {0}")]
    InvalidNumericLiteral(String),
    #[error("unknown identifier: {0}")]
    UnresolvedVariable(String),
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    #[error("invalid variable sort: {0}")]
    InvalidSort(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
