use thiserror::Error;

/// Number of characters of unconsumed input kept in [`ParseError::StalledScan`].
pub const STALL_PREVIEW_CHARS: usize = 64;

/// Errors that abort a parse.
///
/// Malformed markup is never an error on its own; it degrades to text. `E` is the
/// handler's error type.
#[derive(Debug, Error)]
pub enum ParseError<E> {
    /// A full classification pass consumed no input.
    #[error("parse error at line {line}: scanner made no progress at {remainder:?}")]
    StalledScan { line: usize, remainder: String },
    /// A handler callback returned an error; the scan stopped right there.
    #[error("event handler aborted the parse")]
    Handler(#[source] E),
}

impl<E> ParseError<E> {
    pub(crate) fn stalled(line: usize, remainder: &str) -> Self {
        ParseError::StalledScan {
            line,
            remainder: remainder.chars().take(STALL_PREVIEW_CHARS).collect(),
        }
    }

    /// Returns the handler error, if that is what stopped the parse.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            ParseError::Handler(err) => Some(err),
            ParseError::StalledScan { .. } => None,
        }
    }
}

impl<E> From<E> for ParseError<E> {
    fn from(err: E) -> Self {
        ParseError::Handler(err)
    }
}
