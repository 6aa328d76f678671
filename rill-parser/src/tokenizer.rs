use crate::error::ParseError;
use crate::escape::{decode_escape, EscapeMode};

/// Delimiters separating the words of one pipeline stage.
pub const WORD_DELIMITERS: &[u8] = b" \t\x0b\n;";

/// Delimiter separating the stages of a pipeline.
pub const STAGE_DELIMITERS: &[u8] = b"|";

/// Splits `line` into words on the given delimiter set, treating
/// double-quoted regions as atomic.
///
/// Consecutive delimiters collapse; no empty tokens are produced. A quoted
/// region adjoins the surrounding unquoted bytes to form a single word. With
/// `keep_quotes`, the surrounding quotes are retained and escape sequences
/// inside the region pass through untouched, so the token reproduces the
/// source byte-for-byte; otherwise quotes are stripped and escapes decoded.
///
/// Escapes may denote arbitrary bytes, so tokens are accumulated as raw bytes
/// and converted to `String` lossily on emission.
pub fn tokenize(line: &str, delimiters: &[u8], keep_quotes: bool) -> Result<Vec<String>, ParseError> {
    let input = line.as_bytes();
    let mut tokens = vec![];
    let mut current: Vec<u8> = vec![];
    let mut pos = 0;

    while pos < input.len() {
        let b = input[pos];
        if delimiters.contains(&b) {
            if !current.is_empty() {
                tokens.push(emit(&mut current));
            }
            pos += 1;
        } else if b == b'"' {
            if keep_quotes {
                current.push(b'"');
            }
            pos = scan_quoted(input, pos + 1, &mut current, keep_quotes)?;
            if keep_quotes {
                current.push(b'"');
            }
        } else {
            current.push(b);
            pos += 1;
        }
    }

    if !current.is_empty() {
        tokens.push(emit(&mut current));
    }

    Ok(tokens)
}

/// Copies a quoted region into `out`, decoding or passing through escapes per
/// `keep_quotes`. `pos` points just past the opening quote; the returned
/// position is just past the closing quote.
fn scan_quoted(
    input: &[u8],
    mut pos: usize,
    out: &mut Vec<u8>,
    keep_quotes: bool,
) -> Result<usize, ParseError> {
    let mode = if keep_quotes {
        EscapeMode::PassThrough
    } else {
        EscapeMode::Decode
    };

    while pos < input.len() {
        match input[pos] {
            b'"' => return Ok(pos + 1),
            b'\\' => pos = decode_escape(input, pos + 1, out, mode)?,
            b => {
                out.push(b);
                pos += 1;
            }
        }
    }

    Err(ParseError::UnterminatedString)
}

fn emit(current: &mut Vec<u8>) -> String {
    String::from_utf8_lossy(&std::mem::take(current)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(line: &str) -> Vec<String> {
        tokenize(line, WORD_DELIMITERS, false).unwrap()
    }

    fn stages(line: &str) -> Vec<String> {
        tokenize(line, STAGE_DELIMITERS, true).unwrap()
    }

    #[test]
    fn test_split_on_whitespace() {
        assert_eq!(words("echo hello world"), ["echo", "hello", "world"]);
        assert_eq!(words("  echo\t\thi ; "), ["echo", "hi"]);
        assert_eq!(words(""), Vec::<String>::new());
        assert_eq!(words(" \t\n"), Vec::<String>::new());
    }

    #[test]
    fn test_quoted_region_is_atomic() {
        assert_eq!(words(r#"echo "hello world""#), ["echo", "hello world"]);
        assert_eq!(words(r#"echo "a|b""#), ["echo", "a|b"]);
        assert_eq!(words(r#"pre"mid dle"post"#), ["premid dlepost"]);
        assert_eq!(words(r#""""#), Vec::<String>::new());
    }

    #[test]
    fn test_quoted_pipe_yields_one_stage() {
        assert_eq!(stages(r#"echo "a|b""#), [r#"echo "a|b""#]);
        assert_eq!(stages("echo hello | tr a-z A-Z"), ["echo hello ", " tr a-z A-Z"]);
    }

    #[test]
    fn test_escapes_decoded_when_quotes_stripped() {
        assert_eq!(words(r#"echo "\x41\x42""#), ["echo", "AB"]);
        assert_eq!(words(r#"echo "a\tb""#), ["echo", "a\tb"]);
        assert_eq!(words(r#"echo "line\n""#), ["echo", "line\n"]);
    }

    #[test]
    fn test_escapes_untouched_when_quotes_kept() {
        let line = r#"echo "\x41 \n \\ | x""#;
        assert_eq!(stages(line), [line]);
    }

    #[test]
    fn test_keep_quotes_preserves_quoted_length() {
        for line in [r#""abc""#, r#"a"b\tc"d"#, r#""\x41\x42""#, r#""a|b" "c;d""#] {
            let joined = stages(line).join("|");
            assert_eq!(joined.len(), line.len(), "line: {line}");
        }
    }

    #[test]
    fn test_split_then_join_is_identity() {
        // Holds whenever the input has no consecutive, leading, or trailing
        // delimiters (and no quoting, which splitting would not disturb
        // anyway).
        for line in ["a b c", "echo x", "one"] {
            assert_eq!(words(line).join(" "), line);
        }
        for line in ["a|b|c", "echo hello |cat"] {
            assert_eq!(stages(line).join("|"), line);
        }
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            tokenize(r#"echo "oops"#, WORD_DELIMITERS, false),
            Err(ParseError::UnterminatedString)
        ));
        assert!(matches!(
            tokenize(r#"echo "oops"#, STAGE_DELIMITERS, true),
            Err(ParseError::UnterminatedString)
        ));
    }

    #[test]
    fn test_invalid_escape_in_quotes() {
        assert!(matches!(
            tokenize(r#"echo "\q""#, WORD_DELIMITERS, false),
            Err(ParseError::InvalidEscape('q'))
        ));
    }

    #[test]
    fn test_backslash_is_literal_outside_quotes() {
        assert_eq!(words(r"echo a\nb"), ["echo", r"a\nb"]);
    }
}
