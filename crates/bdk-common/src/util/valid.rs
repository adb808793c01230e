//! String predicates for request fields

use regex::Regex;
use std::sync::LazyLock;

/// Literal accepted as boolean true by [`is_bool_str`]
pub const BOOL_STR_TRUE: &str = "true";

/// Literal accepted as boolean false by [`is_bool_str`]
pub const BOOL_STR_FALSE: &str = "false";

// Mainland China mobile numbers: 11 digits starting with 1 and a 2-9 carrier digit.
#[allow(clippy::unwrap_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^1[23456789]\d{9}$").unwrap());

/// Whether `value` is an 11 digit mobile number
pub fn is_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Whether `value` is empty or a mobile number
pub fn is_phone_or_empty(value: &str) -> bool {
    value.is_empty() || is_phone(value)
}

/// Whether `value` is exactly `"true"` or `"false"`
pub fn is_bool_str(value: &str) -> bool {
    value == BOOL_STR_TRUE || value == BOOL_STR_FALSE
}
