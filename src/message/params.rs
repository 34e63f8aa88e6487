//! Helpers for walking space-separated parameter text.

use crate::error::LineError;

/// Remove one leading `:` if present.
#[inline]
pub fn trim_colon(s: &str) -> &str {
    s.strip_prefix(':').unwrap_or(s)
}

/// Take the next space-delimited parameter from `input`, advancing it.
///
/// A leading `:` on the parameter is removed. An empty parameter is an
/// error naming `what` was expected.
pub fn read_param<'a>(input: &mut &'a str, what: &'static str) -> Result<&'a str, LineError> {
    let (param, remainder) = match input.find(' ') {
        Some(index) => (&input[..index], &input[index + 1..]),
        None => (*input, ""),
    };
    *input = remainder;

    let param = trim_colon(param);
    if param.is_empty() {
        return Err(LineError::MissingParameter(what));
    }
    Ok(param)
}
