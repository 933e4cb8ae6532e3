//! Financial-text screening
//!
//! Cheap keyword screen hosts run before submitting an observation to the
//! pipeline, so non-payment notifications never reach extraction.

use regex::Regex;

const FINANCIAL_KEYWORDS: &[&str] = &[
    "debited",
    "credited",
    "paid",
    "received",
    "sent",
    "payment",
    "transaction",
    "balance",
    "rs.",
    "rs ",
    "inr",
    "₹",
    "rupee",
];

/// True when text looks like a payment/bank message worth parsing
pub fn is_financial_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    if FINANCIAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }
    // Decimal amounts ("350.00") count even without a keyword
    let decimal_re = Regex::new(r"\d+\.\d{2}").expect("valid regex");
    decimal_re.is_match(&lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_match() {
        assert!(is_financial_text("₹500 debited from your account"));
        assert!(is_financial_text("Payment successful"));
        assert!(is_financial_text("You received Rs. 100"));
    }

    #[test]
    fn test_bare_decimal_amount_matches() {
        assert!(is_financial_text("350.00 at Corner Cafe"));
    }

    #[test]
    fn test_ordinary_text_rejected() {
        assert!(!is_financial_text("Lunch at 1pm?"));
        assert!(!is_financial_text("Your OTP is 482913"));
    }
}
