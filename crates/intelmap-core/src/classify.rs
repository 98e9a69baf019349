//! Report shape detection.

use std::sync::LazyLock;

use regex::Regex;

static RE_REPORT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^IR\d+").unwrap());
static RE_OPERATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^OP\s+").unwrap());

/// True when `text` looks like an intel report: at least three non-blank
/// lines, the first starting `IR<digits>` and the second `OP <name>`.
pub fn is_recognised_report(text: &str) -> bool {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let (Some(first), Some(second), Some(_)) = (lines.next(), lines.next(), lines.next()) else {
        return false;
    };
    RE_REPORT_ID.is_match(first) && RE_OPERATION.is_match(second)
}
