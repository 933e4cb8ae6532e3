//! Timestamp-from-text utility
//!
//! Bank forwarding SMS messages carry a parenthesized timestamp in a fixed
//! `(YYYY:MM:DD HH:MM:SS)` format. This is a narrow matching aid for the
//! notification path, independent of the amount/merchant cascade.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

const SMS_TIMESTAMP: &str = r"\((\d{4}):(\d{2}):(\d{2}) (\d{2}):(\d{2}):(\d{2})\)";

/// Extract a `(YYYY:MM:DD HH:MM:SS)` timestamp from SMS-formatted text
///
/// Returns `None` when the token is absent or names an impossible
/// date/time.
pub fn parse_sms_timestamp(text: &str) -> Option<NaiveDateTime> {
    let re = Regex::new(SMS_TIMESTAMP).expect("valid regex");
    let cap = re.captures(text)?;

    let year: i32 = cap[1].parse().ok()?;
    let month: u32 = cap[2].parse().ok()?;
    let day: u32 = cap[3].parse().ok()?;
    let hour: u32 = cap[4].parse().ok()?;
    let minute: u32 = cap[5].parse().ok()?;
    let second: u32 = cap[6].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// True when text follows the bank-SMS shape: an `Rs.<amount>` token plus
/// the parenthesized timestamp
pub fn matches_sms_format(text: &str) -> bool {
    let amount_re = Regex::new(r"Rs\.\d+\.\d{2}").expect("valid regex");
    let ts_re = Regex::new(SMS_TIMESTAMP).expect("valid regex");
    amount_re.is_match(text) && ts_re.is_match(text)
}
