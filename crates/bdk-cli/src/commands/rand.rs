//! `bdk rand` command implementation

use crate::error::{CliError, Result};
use bdk_common::util::random_alphanum;

/// Run `bdk rand`
pub fn run(length: usize, count: usize) -> Result<()> {
    for token in generate(length, count)? {
        println!("{}", token);
    }
    Ok(())
}

/// Generate `count` random strings of `length` characters
pub fn generate(length: usize, count: usize) -> Result<Vec<String>> {
    if length == 0 {
        return Err(CliError::invalid_argument("length must be at least 1"));
    }
    Ok((0..count).map(|_| random_alphanum(length)).collect())
}
