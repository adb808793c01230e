//! `bdk check` command implementation
//!
//! Prints `ok` and exits with 0 when the value passes, fails with a
//! validation error otherwise.

use crate::error::{CliError, Result};
use crate::CheckKind;
use bdk_common::util::{is_bool_str, is_phone, is_phone_or_empty};

/// Run `bdk check`
pub fn run(kind: CheckKind, value: &str) -> Result<()> {
    if passes(kind, value) {
        println!("ok");
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "'{}' is not a valid {}",
            value,
            describe(kind)
        )))
    }
}

/// Apply the predicate selected by `kind`
pub fn passes(kind: CheckKind, value: &str) -> bool {
    match kind {
        CheckKind::Phone => is_phone(value),
        CheckKind::PhoneOrEmpty => is_phone_or_empty(value),
        CheckKind::Bool => is_bool_str(value),
    }
}

fn describe(kind: CheckKind) -> &'static str {
    match kind {
        CheckKind::Phone => "phone number",
        CheckKind::PhoneOrEmpty => "phone number or empty value",
        CheckKind::Bool => "boolean string",
    }
}
