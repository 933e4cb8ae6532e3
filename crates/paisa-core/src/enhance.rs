//! Currency enhancer
//!
//! OCR engines routinely drop the ₹ glyph. The amount cascade gives its
//! highest-confidence tier to currency-marked numbers, so reinserting the
//! marker where context makes it unambiguous materially improves recall
//! without touching the extraction logic itself.

use regex::Regex;

/// Rewrite battery, applied in order. Each entry inserts or canonicalizes
/// a ₹ marker in front of a bare number.
const REWRITES: &[(&str, &str)] = &[
    // Commerce/food-delivery action buttons: "Add item 245" -> "Add item ₹245"
    (
        r"(?i)(Add item|Add to cart|Add|Buy now|Order now|Item)\s+(\d+)",
        "${1} ₹${2}",
    ),
    // Payment keywords followed by numbers: "Total 245" -> "Total ₹245"
    (
        r"(?i)(Total|Price|Amount|Pay|Paid|Sent|Subtotal|Grand Total)\s*:?\s*(\d+)",
        "${1} ₹${2}",
    ),
    // "Rs245" / "Rs. 245" -> "₹245"
    (r"(?i)Rs\.?\s*(\d+)", "₹${1}"),
    // "INR 500" -> "₹500"
    (r"(?i)INR\s*(\d+)", "₹${1}"),
    // Standalone number on its own line (common in UPI apps); 2-6 digits
    // only, to avoid marking transaction IDs
    (r"(?m)^\s*(\d{2,6}(?:\.\d{2})?)\s*$", "₹${1}"),
    // Keyword on one line, number on the next: "Total\n245" -> "Total\n₹245"
    (
        r"(?m)(Total|Price|Amount|Pay|Subtotal)\s*\n\s*(\d+)",
        "${1}\n₹${2}",
    ),
    // "Debited 500" -> "Debited ₹500"
    (r"(?i)(Debited|Credited|Received|Refund)\s+(\d+)", "${1} ₹${2}"),
];

/// Reinsert missing currency markers
///
/// Pure and idempotent: every rewrite requires a bare number, so text that
/// already carries the marker passes through unchanged.
pub fn enhance(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in REWRITES {
        let re = Regex::new(pattern).expect("valid regex");
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_action_gets_marker() {
        assert_eq!(enhance("Add item 245"), "Add item ₹245");
        assert_eq!(enhance("Buy now 1299"), "Buy now ₹1299");
    }

    #[test]
    fn test_payment_keyword_gets_marker() {
        assert_eq!(enhance("Total: 245"), "Total ₹245");
        assert_eq!(enhance("Pay 500"), "Pay ₹500");
    }

    #[test]
    fn test_rs_and_inr_canonicalized() {
        assert_eq!(enhance("Rs245"), "₹245");
        assert_eq!(enhance("Rs. 245"), "₹245");
        assert_eq!(enhance("INR 500"), "₹500");
    }

    #[test]
    fn test_standalone_line_gets_marker() {
        assert_eq!(enhance("Swiggy\n245\nOrder placed"), "Swiggy\n₹245\nOrder placed");
    }

    #[test]
    fn test_standalone_line_skips_long_ids() {
        // 7+ digits stay untouched (likely an ID, not a price)
        assert_eq!(enhance("4008123"), "4008123");
    }

    #[test]
    fn test_keyword_then_number_on_next_line() {
        assert_eq!(enhance("Total\n245"), "Total\n₹245");
    }

    #[test]
    fn test_debited_gets_marker() {
        assert_eq!(enhance("Debited 500 from account"), "Debited ₹500 from account");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "Add item 245",
            "Total: 245\nPay 500",
            "Rs. 350.00",
            "Swiggy\n245",
            "Debited 500",
            "already marked ₹245",
        ] {
            let once = enhance(input);
            assert_eq!(enhance(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_no_change_without_context() {
        let text = "Thank you for visiting";
        assert_eq!(enhance(text), text);
    }
}
