//! Percent-encoding for free-text query values.

use std::borrow::Cow;

/// Encode `value` for use as a single query-parameter value.
///
/// ASCII alphanumerics and `-_.~` pass through; every other byte (including
/// each byte of a multi-byte UTF-8 sequence) becomes `%XX` with uppercase hex.
pub fn encode_query_value(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
