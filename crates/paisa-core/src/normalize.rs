//! Text normalizer
//!
//! Strips the high-cardinality numeric distractors (phone numbers,
//! transaction IDs, years, account fragments) out of raw OCR/notification
//! text before any "pick the number that looks like a price" heuristic
//! runs. Doing it once here keeps the exclusion logic out of every
//! downstream pattern.

use regex::Regex;

use crate::models::TextBlock;

/// Vertical tolerance (px) within which two blocks count as the same line
const SAME_LINE_TOLERANCE: i32 = 20;

/// Indian mobile numbers: optional +91/leading 0, then a 10-digit run
/// starting 6-9, optionally split 5+5 by a space or hyphen
pub(crate) const PHONE_PATTERN: &str = r"(?i)(\+91|0)?[-\s]?[6-9]\d{4}[-\s]?\d{5}";

/// Normalize raw text by removing numeric noise
///
/// Ordered substitutions; later patterns assume earlier noise is gone.
pub fn normalize(raw: &str) -> String {
    let phone_re = Regex::new(PHONE_PATTERN).expect("valid regex");
    let txn_id_re = Regex::new(r"\b\d{12,}\b").expect("valid regex");
    let year_re = Regex::new(r"\b202[0-9]\b").expect("valid regex");
    let account_re = Regex::new(r"(?i)(?:A/c|Account)\s*\d+").expect("valid regex");

    let text = phone_re.replace_all(raw, " ");
    let text = txn_id_re.replace_all(&text, " ");
    let text = year_re.replace_all(&text, " ");
    let text = account_re.replace_all(&text, " ");

    text.into_owned()
}

/// Reconstruct reading order from OCR text blocks
///
/// Buckets positioned blocks into lines (a new line starts when the
/// vertical gap to the previous block exceeds the 20 px band), sorts line
/// members left-to-right, and joins the block texts with newlines. The
/// pairwise "same line" relation is not transitive, so this buckets first
/// rather than handing a band comparator to a sort. Blocks without
/// geometry keep their input order after the positioned ones. Corrects the
/// failure mode where unordered OCR output separates an amount from its
/// context line.
pub fn reading_order(blocks: &[TextBlock]) -> String {
    let mut positioned: Vec<&TextBlock> = Vec::new();
    let mut unpositioned: Vec<&TextBlock> = Vec::new();
    for block in blocks {
        match block.bounds {
            Some(_) => positioned.push(block),
            None => unpositioned.push(block),
        }
    }

    positioned.sort_by_key(|b| b.bounds.map(|bb| bb.y).unwrap_or(0));

    let mut lines: Vec<Vec<&TextBlock>> = Vec::new();
    let mut last_y: Option<i32> = None;
    for block in positioned {
        let Some(bb) = block.bounds else { continue };
        match last_y {
            Some(prev) if bb.y - prev <= SAME_LINE_TOLERANCE => {
                if let Some(line) = lines.last_mut() {
                    line.push(block);
                }
            }
            _ => lines.push(vec![block]),
        }
        last_y = Some(bb.y);
    }
    for line in &mut lines {
        line.sort_by_key(|b| b.bounds.map(|bb| bb.x).unwrap_or(0));
    }

    let mut out = String::new();
    for block in lines.into_iter().flatten().chain(unpositioned) {
        let text = block.text.trim();
        if !text.is_empty() {
            out.push_str(text);
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}
