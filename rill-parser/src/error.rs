/// Represents an error that occurred while tokenizing a command line.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// An unrecognized or malformed escape sequence was encountered.
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// An escape sequence was cut short by the end of the input.
    #[error("unterminated escape sequence")]
    UnterminatedEscape,

    /// A double-quoted string literal was not closed before the end of the
    /// input.
    #[error("unterminated string literal")]
    UnterminatedString,
}
