//! `bdk chunk` command implementation

use crate::error::Result;
use bdk_common::util::arr_chunk;

/// Run `bdk chunk`
///
/// Prints one chunk per line, values separated by spaces, or the whole
/// result as a JSON array of arrays with `--json`.
pub fn run(size: usize, json: bool, values: &[String]) -> Result<()> {
    let chunks = arr_chunk(values, size);

    if json {
        println!("{}", serde_json::to_string(&chunks)?);
    } else {
        for line in render(&chunks) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn render(chunks: &[Vec<String>]) -> Vec<String> {
    chunks.iter().map(|chunk| chunk.join(" ")).collect()
}
