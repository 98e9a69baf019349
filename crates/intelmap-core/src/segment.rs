//! Splits report text into header, provenance, and numbered entries.
//!
//! Body lines are grouped into blocks:
//!
//! | Line                         | Effect                                   |
//! |------------------------------|------------------------------------------|
//! | `12. Some text`              | closes the open block, opens index 12    |
//! | other text, block open       | appended to the open block with a space  |
//! | other text, no block open    | becomes its own index-0 block            |
//! | blank                        | ignored                                  |
//!
//! The first block reading `Provenance - ...` (also `:`, `–`, `—`) becomes the
//! report provenance. Index-0 blocks are then dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::extract;
use crate::model::{Entry, Report, ReportHeader};

static RE_NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.*)").unwrap());
static RE_PROVENANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Provenance\s*[-–—:]").unwrap());
static RE_PROVENANCE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Provenance\s*[-–—:]\s*(.+)").unwrap());

#[derive(Debug)]
struct Block {
    index: u64,
    text: String,
}

/// Segment `text` into a [`Report`], running the extractor over every entry.
///
/// Missing header lines come back as empty strings; classification is the
/// caller's job.
pub fn segment(text: &str) -> Report {
    let mut lines = text.lines();
    let mut header_lines = Vec::with_capacity(3);
    for line in lines.by_ref() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        header_lines.push(trimmed.to_string());
        if header_lines.len() == 3 {
            break;
        }
    }
    header_lines.resize(3, String::new());
    let mut header_lines = header_lines.into_iter();
    let header = ReportHeader {
        report_id: header_lines.next().unwrap_or_default(),
        operation_name: header_lines.next().unwrap_or_default(),
        date: header_lines.next().unwrap_or_default(),
    };

    let mut blocks = split_blocks(lines);
    let provenance = take_provenance(&mut blocks);

    let entries = blocks
        .into_iter()
        .filter(|b| b.index > 0)
        .map(|b| Entry {
            index: b.index,
            extracted: extract(&b.text),
            text: b.text,
        })
        .collect();

    Report {
        header,
        entries,
        provenance,
    }
}

fn split_blocks<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // An index too long for u64 still opens its own entry.
        let numbered = RE_NUMBERED
            .captures(trimmed)
            .map(|c| (c[1].parse::<u64>().unwrap_or(u64::MAX), c[2].to_string()));
        if let Some((index, text)) = numbered {
            if let Some(done) = current.replace(Block { index, text }) {
                blocks.push(done);
            }
        } else if let Some(open) = current.as_mut() {
            open.text.push(' ');
            open.text.push_str(trimmed);
        } else {
            blocks.push(Block {
                index: 0,
                text: trimmed.to_string(),
            });
        }
    }
    if let Some(done) = current {
        blocks.push(done);
    }
    blocks
}

fn take_provenance(blocks: &mut Vec<Block>) -> String {
    let Some(pos) = blocks.iter().position(|b| RE_PROVENANCE.is_match(&b.text)) else {
        return String::new();
    };
    let block = blocks.remove(pos);
    match RE_PROVENANCE_BODY.captures(&block.text) {
        Some(c) => c[1].trim().to_string(),
        None => block.text,
    }
}
