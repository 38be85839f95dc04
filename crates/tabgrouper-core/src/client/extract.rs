//! Fenced-block extraction from the categorizer's free text.

use tabgrouper_protocols::{CategorizeError, RawPartition};

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;

const FENCE: &str = "```";

struct FencedBlock<'a> {
    tag: &'a str,
    body: String,
}

/// Find the JSON payload in `text`.
///
/// The first block tagged `json` wins; otherwise the first untagged block.
/// Blocks tagged with another language are skipped.
pub fn extract_json_block(text: &str) -> Result<String, CategorizeError> {
    let blocks = fenced_blocks(text);

    blocks
        .iter()
        .find(|b| b.tag.eq_ignore_ascii_case("json"))
        .or_else(|| blocks.iter().find(|b| b.tag.is_empty()))
        .map(|b| b.body.clone())
        .ok_or_else(|| {
            CategorizeError::Extraction(if blocks.is_empty() {
                "no fenced block found".to_string()
            } else {
                format!("{} fenced blocks found, none tagged json", blocks.len())
            })
        })
}

/// Extract the fenced block and decode it as a partition.
pub fn extract_partition(text: &str) -> Result<RawPartition, CategorizeError> {
    let body = extract_json_block(text)?;
    RawPartition::from_json(&body).map_err(|e| CategorizeError::Decode(e.to_string()))
}

/// An opening fence carries at most one bare word after the backticks.
fn is_info_string(tag: &str) -> bool {
    !tag.contains(|c: char| c.is_whitespace() || c == '`')
}

/// Line-based scan for closed fenced blocks. An unclosed fence is ignored.
fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut open: Option<(&str, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        match open.take() {
            None => {
                if let Some(tag) = trimmed.strip_prefix(FENCE).map(str::trim) {
                    if is_info_string(tag) {
                        open = Some((tag, Vec::new()));
                    }
                }
            }
            Some((tag, mut body)) => {
                if trimmed == FENCE {
                    blocks.push(FencedBlock {
                        tag,
                        body: body.join("\n"),
                    });
                } else {
                    body.push(line);
                    open = Some((tag, body));
                }
            }
        }
    }

    blocks
}
