//! Expansion of `$` constructs within a command line.

use crate::{error, interp, trace_categories, Shell};

/// Expands all `$` constructs in `line`, returning a new string. Substitution
/// happens in a single left-to-right scan and completes fully before the line
/// is split into pipeline stages; it is deliberately quote-blind, so `$`
/// inside double quotes is expanded too.
///
/// A run of consecutive `$` counts as one introducer, and a trailing `$` is
/// dropped. The byte after the introducer selects the construct:
///
/// - `(`: the text up to the matching `)` (depth-counted, so nested `$(...)`
///   works) is run as a full line with its output captured in place of the
///   construct. A failed substitution contributes nothing.
/// - `{`: the text before the next `}` is a key, resolved like a bare
///   fragment below (so `${?}` and `${0}`..`${9}` also work).
/// - a decimal digit: selects a positional parameter. Only the first digit
///   counts; an immediately following run of identifier characters is
///   silently discarded.
/// - `?`: the status of the most recently completed pipeline, as a decimal
///   string; trailing identifier characters are discarded as above.
/// - anything else: the whole fragment — up to the next `$` or the end of
///   the line, spaces included — is an environment variable name, resolved
///   to its value or the empty string.
pub(crate) fn expand_line(shell: &mut Shell, line: &str) -> Result<String, error::Error> {
    let input = line.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        if input[pos] != b'$' {
            out.push(input[pos]);
            pos += 1;
            continue;
        }

        while pos < input.len() && input[pos] == b'$' {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }

        match input[pos] {
            b'(' => {
                let close = find_matching_paren(input, pos)?;
                let command = &line[pos + 1..close];
                tracing::debug!(target: trace_categories::EXPANSION, "substituting command: {command}");

                if let Some(output) = interp::run_captured(shell, command, None)? {
                    out.extend_from_slice(output.as_bytes());
                }
                pos = close + 1;
            }
            b'{' => {
                if let Some(offset) = input[pos + 1..].iter().position(|b| *b == b'}') {
                    let key = &line[pos + 1..pos + 1 + offset];
                    out.extend_from_slice(resolve_key(shell, key).as_bytes());
                    pos += offset + 2;
                } else {
                    // No closing brace; the malformed fragment resolves to
                    // nothing.
                    pos = fragment_end(input, pos);
                }
            }
            b'0'..=b'9' | b'?' => {
                let key = &line[pos..=pos];
                out.extend_from_slice(resolve_key(shell, key).as_bytes());
                pos += 1;
                while pos < input.len() && is_identifier_byte(input[pos]) {
                    pos += 1;
                }
            }
            _ => {
                let end = fragment_end(input, pos);
                let name = &line[pos..end];
                out.extend_from_slice(env_value(name).as_bytes());
                pos = end;
            }
        }
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Resolves an expansion key: `?` yields the last status, a leading digit a
/// positional parameter, anything else an environment lookup.
fn resolve_key(shell: &Shell, key: &str) -> String {
    match key.as_bytes().first() {
        Some(b'?') => shell.last_exit_status.to_string(),
        Some(digit @ b'0'..=b'9') => {
            let index = usize::from(digit - b'0');
            shell
                .positional_parameters
                .get(index)
                .cloned()
                .unwrap_or_default()
        }
        _ => env_value(key),
    }
}

/// Looks up an environment variable, yielding the empty string when it is
/// unset. Names the host environment cannot represent resolve to nothing
/// rather than panicking in `std::env`.
fn env_value(name: &str) -> String {
    if name.is_empty() || name.contains(['=', '\0']) {
        return String::new();
    }

    std::env::var(name).unwrap_or_default()
}

/// Finds the `)` matching the `(` at `open`, counting nesting depth. The
/// count is quote-blind, matching the paren balance test of the fragment
/// form.
fn find_matching_paren(input: &[u8], open: usize) -> Result<usize, error::Error> {
    let mut depth = 0usize;
    for (offset, b) in input[open..].iter().enumerate() {
        match *b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + offset);
                }
            }
            _ => (),
        }
    }

    Err(error::Error::UnbalancedCommandSubstitution)
}

fn fragment_end(input: &[u8], pos: usize) -> usize {
    input[pos..]
        .iter()
        .position(|b| *b == b'$')
        .map_or(input.len(), |offset| pos + offset)
}

const fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CreateOptions;
    use pretty_assertions::assert_eq;

    fn test_shell() -> Shell {
        Shell::new(CreateOptions {
            positional_parameters: vec!["rill".into(), "one".into(), "two".into()],
        })
    }

    fn expand(line: &str) -> String {
        expand_line(&mut test_shell(), line).unwrap()
    }

    #[test]
    fn test_lines_without_dollar_are_unchanged() {
        for line in ["", "echo hello | tr a-z A-Z", "  padded  ", "a\"b c\"d"] {
            assert_eq!(expand(line), line);
        }
    }

    #[test]
    fn test_positional_parameters() {
        assert_eq!(expand("$0"), "rill");
        assert_eq!(expand("$1"), "one");
        assert_eq!(expand("x${2}y"), "xtwoy");
        assert_eq!(expand("$9"), "");
    }

    #[test]
    fn test_digit_discards_identifier_tail() {
        assert_eq!(expand("$1abc"), "one");
        assert_eq!(expand("$1 next"), "one next");
        assert_eq!(expand("${12}"), "one");
    }

    #[test]
    fn test_last_status() {
        let mut shell = test_shell();
        shell.last_exit_status = 42;
        assert_eq!(expand_line(&mut shell, "echo $?").unwrap(), "echo 42");
        assert_eq!(expand_line(&mut shell, "${?}!").unwrap(), "42!");
    }

    #[test]
    fn test_environment_lookup() {
        std::env::set_var("RILL_EXPANSION_TEST", "value");
        assert_eq!(expand("${RILL_EXPANSION_TEST}."), "value.");
        assert_eq!(expand("$RILL_EXPANSION_TEST"), "value");
        assert_eq!(expand("${RILL_EXPANSION_UNSET}."), ".");
    }

    #[test]
    fn test_bare_name_spans_whole_fragment() {
        // Without braces, everything up to the next `$` is the lookup key.
        assert_eq!(expand("$NO SUCH NAME"), "");
        std::env::set_var("RILL_FRAGMENT_A", "a");
        std::env::set_var("RILL_FRAGMENT_B", "b");
        assert_eq!(expand("$RILL_FRAGMENT_A$RILL_FRAGMENT_B"), "ab");
    }

    #[test]
    fn test_dollar_runs_collapse() {
        std::env::set_var("RILL_RUN_TEST", "v");
        assert_eq!(expand("$$RILL_RUN_TEST"), "v");
        assert_eq!(expand("tail$"), "tail");
    }

    #[test]
    fn test_command_substitution() {
        assert_eq!(expand("$(echo hi)"), "hi\n");
        assert_eq!(expand("a$(echo b)c"), "ab\nc");
    }

    #[test]
    fn test_nested_command_substitution() {
        assert_eq!(expand("$(echo $(echo deep))"), "deep\n");
    }

    #[test]
    fn test_failed_substitution_is_empty() {
        let mut shell = test_shell();
        assert_eq!(expand_line(&mut shell, "x$(false)y").unwrap(), "xy");
        assert_eq!(shell.last_exit_status, 1);
    }

    #[test]
    fn test_unbalanced_substitution() {
        assert!(matches!(
            expand_line(&mut test_shell(), "$(echo oops"),
            Err(error::Error::UnbalancedCommandSubstitution)
        ));
    }
}
