//! Local heuristic extractor
//!
//! The deterministic fallback behind the remote parser: amount extraction
//! via a tiered, confidence-ranked cascade of regex strategies, merchant
//! extraction via an ordered strategy list, and transaction-direction
//! classification via keyword lookup. All functions are pure, operate on
//! normalized+enhanced text, and have no error path - every branch has a
//! default.

use regex::Regex;
use tracing::debug;

use crate::models::{Direction, UNKNOWN_MERCHANT};
use crate::normalize::PHONE_PATTERN;

/// One ranked strategy within the amount cascade, ordered by reliability.
///
/// Tiers are strictly ordered: a tier-1 match of any value beats every
/// tier-2+ candidate, even when a lower tier's candidate seems more
/// plausible by magnitude. The cascade never blends across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTier {
    /// Number preceded by ₹ / Rs. / INR
    CurrencyMarked,
    /// Number after a commerce action ("Add item", "Buy now", ...)
    CommerceAction,
    /// Number after a payment keyword ("Paid", "Total", "Debited", ...)
    PaymentKeyword,
    /// Entire line is a bare number (UPI-app layout)
    StandaloneLine,
    /// Last-resort scan over every bare number in the text
    BestGuess,
}

impl AmountTier {
    /// Confidence band reported for a match at this tier
    pub fn confidence(&self) -> u8 {
        match self {
            AmountTier::CurrencyMarked => 95,
            AmountTier::CommerceAction => 90,
            AmountTier::PaymentKeyword => 85,
            AmountTier::StandaloneLine => 70,
            AmountTier::BestGuess => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AmountTier::CurrencyMarked => "currency_marked",
            AmountTier::CommerceAction => "commerce_action",
            AmountTier::PaymentKeyword => "payment_keyword",
            AmountTier::StandaloneLine => "standalone_line",
            AmountTier::BestGuess => "best_guess",
        }
    }
}

/// Extraction thresholds
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Upper bound (exclusive) for any accepted amount
    pub max_amount: f64,
    /// Lower bound (inclusive) of the best-guess plausible-price band.
    /// Observed variants disagree on this band; treat it as a tunable
    /// threshold, not a fixed law.
    pub guess_min: f64,
    /// Upper bound (inclusive) of the best-guess plausible-price band
    pub guess_max: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_amount: 1_000_000.0,
            guess_min: 10.0,
            guess_max: 100_000.0,
        }
    }
}

/// Deterministic amount/merchant/direction extractor
#[derive(Debug, Clone, Default)]
pub struct HeuristicExtractor {
    config: ExtractorConfig,
}

/// Brand names matched by the known-merchant strategy
const KNOWN_MERCHANTS: &[&str] = &[
    "Swiggy", "Zomato", "Uber", "Ola", "Amazon", "Flipkart", "Myntra", "BigBasket", "Dunzo",
    "Blinkit", "Zepto", "Starbucks", "McDonald", "KFC", "Domino", "Pizza Hut",
];

/// Boilerplate tokens that disqualify an all-caps line as a merchant name
const CAPS_BOILERPLATE: &[&str] = &["BANK", "UPI", "GOOGLE", "PHONEPE", "PAYTM", "PAY"];

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract the transaction amount, or `0.0` when no tier matches
    ///
    /// The zero return is the "not found" sentinel, not an error.
    pub fn extract_amount(&self, text: &str) -> f64 {
        self.extract_amount_tiered(text)
            .map(|(value, _)| value)
            .unwrap_or(0.0)
    }

    /// Extract the amount together with the tier that matched
    pub fn extract_amount_tiered(&self, text: &str) -> Option<(f64, AmountTier)> {
        if text.trim().is_empty() {
            return None;
        }

        let lines: Vec<&str> = text.lines().collect();

        // Tier 1: currency-marked numbers. All matches are collected and
        // the maximum wins - a small default shown next to the actual
        // total ("₹1 +Add item ₹245") must resolve to the total.
        let currency_re =
            Regex::new(r"(?i)(?:₹|Rs\.?|INR)\s*([\d,]+\.?\d{0,2})").expect("valid regex");
        let mut max_amount = 0.0_f64;
        for line in &lines {
            for cap in currency_re.captures_iter(line) {
                let val = parse_amount(&cap[1]);
                if val > 0.0 && val < self.config.max_amount && val > max_amount {
                    max_amount = val;
                }
            }
        }
        if max_amount > 0.0 {
            debug!(amount = max_amount, tier = "currency_marked", "amount found");
            return Some((max_amount, AmountTier::CurrencyMarked));
        }

        // Tier 2: commerce action phrases ("Add item 245", "Buy now 1299")
        let commerce_re = Regex::new(
            r"(?i)(?:Add item|Add to cart|Add|Buy now|Order now|Pay now)\s*(?:₹|Rs\.?)?\s*([\d,]+\.?\d{0,2})",
        )
        .expect("valid regex");
        for line in &lines {
            if let Some(cap) = commerce_re.captures(line) {
                let val = parse_amount(&cap[1]);
                if val > 0.0 && val < self.config.max_amount {
                    debug!(amount = val, tier = "commerce_action", "amount found");
                    return Some((val, AmountTier::CommerceAction));
                }
            }
        }

        // Tier 3: payment keywords ("Paid 500", "Total: 500")
        let keyword_re = Regex::new(
            r"(?i)(?:Paid|Sent|Total|Amount|Price|Subtotal|Grand Total|Pay|Debited|Credited)\s*[:\-]?\s*(?:₹|Rs\.?)?\s*([\d,]+\.?\d{0,2})",
        )
        .expect("valid regex");
        for line in &lines {
            if let Some(cap) = keyword_re.captures(line) {
                let val = parse_amount(&cap[1]);
                if val > 0.0 && val < self.config.max_amount {
                    debug!(amount = val, tier = "payment_keyword", "amount found");
                    return Some((val, AmountTier::PaymentKeyword));
                }
            }
        }

        // Tier 4: a whole line that is just a number. UPI apps isolate the
        // amount on its own line; even ₹1 is a real payment, so no lower
        // bound is applied here.
        let standalone_re = Regex::new(r"^[\d,]+(?:\.\d{1,2})?$").expect("valid regex");
        for line in &lines {
            let trimmed = line.trim();
            if standalone_re.is_match(trimmed) {
                let val = parse_amount(trimmed);
                if val > 0.0 && val < self.config.max_amount {
                    debug!(amount = val, tier = "standalone_line", "amount found");
                    return Some((val, AmountTier::StandaloneLine));
                }
            }
        }

        // Tier 5: last resort - any bare number inside the plausible-price
        // band, maximum wins
        let any_number_re = Regex::new(r"\b(\d{1,6}(?:\.\d{2})?)\b").expect("valid regex");
        let mut best_guess = 0.0_f64;
        for line in &lines {
            for cap in any_number_re.captures_iter(line) {
                let val = parse_amount(&cap[1]);
                if val >= self.config.guess_min && val <= self.config.guess_max && val > best_guess
                {
                    best_guess = val;
                }
            }
        }
        if best_guess > 0.0 {
            debug!(amount = best_guess, tier = "best_guess", "amount found");
            return Some((best_guess, AmountTier::BestGuess));
        }

        debug!("no amount found by any tier");
        None
    }

    /// Extract the merchant/payee name via an ordered strategy list
    ///
    /// First strategy to produce a usable name wins; falls back to
    /// `"Unknown Merchant"`.
    pub fn extract_merchant(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return UNKNOWN_MERCHANT.to_string();
        }

        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let phone_re = Regex::new(PHONE_PATTERN).expect("valid regex");

        // Strategy 1: "To" / "Paid to" lines (UPI apps). The name is what
        // follows the phrase; when the line is just the keyword (or the
        // remainder is truncated), the name sits on the next line.
        let paid_to_re = Regex::new(r"(?i)paid\s+to[:\s]*").expect("valid regex");
        let to_prefix_re = Regex::new(r"(?i)^to[:\s]*").expect("valid regex");
        for (i, line) in lines.iter().enumerate() {
            let lower = line.to_lowercase();
            let starts_to = lower == "to" || lower.starts_with("to ") || lower.starts_with("to:");
            let rest = if let Some(m) = paid_to_re.find(line) {
                Some(&line[m.end()..])
            } else if starts_to {
                let skip = to_prefix_re.find(line).map(|m| m.end()).unwrap_or(0);
                Some(&line[skip..])
            } else {
                None
            };
            if let Some(rest) = rest {
                let clean = phone_re.replace_all(rest, "").trim().to_string();

                if !clean.is_empty() && !clean.contains("...") && clean.len() > 2 {
                    debug!(merchant = %clean, strategy = "to_line", "merchant found");
                    return clean;
                }
                if let Some(next) = lines.get(i + 1) {
                    let next = phone_re.replace_all(next, "").trim().to_string();
                    if next.len() > 2 {
                        debug!(merchant = %next, strategy = "to_next_line", "merchant found");
                        return next;
                    }
                }
            }
        }

        // Strategy 2: "Received from" lines (credit transactions)
        let from_re = Regex::new(r"(?i)received\s+from[:\s]*").expect("valid regex");
        for (i, line) in lines.iter().enumerate() {
            if let Some(m) = from_re.find(line) {
                let clean = phone_re.replace_all(&line[m.end()..], "").trim().to_string();

                if clean.len() > 2 {
                    debug!(merchant = %clean, strategy = "received_from", "merchant found");
                    return clean;
                }
                if let Some(next) = lines.get(i + 1) {
                    let next = phone_re.replace_all(next, "").trim().to_string();
                    if next.len() > 2 {
                        debug!(merchant = %next, strategy = "received_from_next_line", "merchant found");
                        return next;
                    }
                }
            }
        }

        // Strategy 3: product/merchant name on the line above a commerce
        // keyword or currency-marked price (food delivery, e-commerce)
        let priced_re = Regex::new(r"₹\s*\d+").expect("valid regex");
        let long_id_re = Regex::new(r"\d{10,}").expect("valid regex");
        for (i, line) in lines.iter().enumerate() {
            let Some(next) = lines.get(i + 1) else {
                continue;
            };
            let next_lower = next.to_lowercase();
            let next_is_price = next_lower.contains("add item")
                || next_lower.contains("add to cart")
                || next_lower.contains("buy now")
                || priced_re.is_match(next);
            if next_is_price
                && line.len() >= 3
                && line.len() <= 50
                && !long_id_re.is_match(line)
                && !line.contains("202")
            {
                debug!(merchant = %line, strategy = "product_name", "merchant found");
                return line.to_string();
            }
        }

        // Strategy 4: all-caps line (bank transfer recipient names),
        // excluding payment-brand boilerplate
        let caps_re = Regex::new(r"^[A-Z ]{3,}$").expect("valid regex");
        for line in &lines {
            if caps_re.is_match(line) && !CAPS_BOILERPLATE.iter().any(|t| line.contains(t)) {
                debug!(merchant = %line, strategy = "caps_line", "merchant found");
                return line.to_string();
            }
        }

        // Strategy 5: known brand names
        for line in &lines {
            let lower = line.to_lowercase();
            for brand in KNOWN_MERCHANTS {
                if lower.contains(&brand.to_lowercase()) {
                    debug!(merchant = %brand, strategy = "known_brand", "merchant found");
                    return brand.to_string();
                }
            }
        }

        // Strategy 6: first meaningful line
        let numeric_re = Regex::new(r"^\d+$").expect("valid regex");
        for line in &lines {
            let lower = line.to_lowercase();
            if line.len() >= 3
                && !numeric_re.is_match(line)
                && !long_id_re.is_match(line)
                && !lower.contains("payment")
                && !lower.contains("success")
            {
                debug!(merchant = %line, strategy = "first_meaningful", "merchant found");
                return line.to_string();
            }
        }

        debug!("no merchant found, using default");
        UNKNOWN_MERCHANT.to_string()
    }

    /// Classify the transaction direction by keyword lookup
    ///
    /// Credit keywords are checked first, so text carrying both ("Refund of
    /// amount you paid") resolves to credit. Defaults to debit.
    pub fn classify_direction(&self, text: &str) -> Direction {
        let lower = text.to_lowercase();

        if lower.contains("credited")
            || lower.contains("received")
            || lower.contains("refund")
            || lower.contains("cashback")
        {
            return Direction::Credit;
        }

        if lower.contains("debited")
            || lower.contains("paid")
            || lower.contains("sent")
            || lower.contains("payment successful")
        {
            return Direction::Debit;
        }

        Direction::Debit
    }
}

/// Parse a numeric capture, tolerating thousands separators
fn parse_amount(value: &str) -> f64 {
    value.replace(',', "").parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> HeuristicExtractor {
        HeuristicExtractor::new()
    }

    #[test]
    fn test_currency_marked_amount() {
        assert_eq!(extractor().extract_amount("Paid ₹350 to shop"), 350.0);
        assert_eq!(extractor().extract_amount("₹1,299.50 debited"), 1299.50);
    }

    #[test]
    fn test_currency_marked_picks_maximum() {
        // Tip vs. total: two marked amounts on one line, larger wins
        let (val, tier) = extractor()
            .extract_amount_tiered("₹1 +Add item ₹245")
            .unwrap();
        assert_eq!(val, 245.0);
        assert_eq!(tier, AmountTier::CurrencyMarked);
    }

    #[test]
    fn test_tier_order_is_strict() {
        // A marked ₹5 beats an unmarked 500 even though 500 looks more
        // like a price
        let (val, tier) = extractor()
            .extract_amount_tiered("₹5\nTotal 500")
            .unwrap();
        assert_eq!(val, 5.0);
        assert_eq!(tier, AmountTier::CurrencyMarked);
    }

    #[test]
    fn test_commerce_action_tier() {
        let (val, tier) = extractor().extract_amount_tiered("Buy now 1299").unwrap();
        assert_eq!(val, 1299.0);
        assert_eq!(tier, AmountTier::CommerceAction);
    }

    #[test]
    fn test_payment_keyword_tier() {
        let (val, tier) = extractor().extract_amount_tiered("Total: 450").unwrap();
        assert_eq!(val, 450.0);
        assert_eq!(tier, AmountTier::PaymentKeyword);
    }

    #[test]
    fn test_standalone_line_accepts_tiny_amounts() {
        // Some real payments are ₹1; the standalone tier must not filter
        // by plausible-price range
        let (val, tier) = extractor().extract_amount_tiered("GPay\n1\nDone").unwrap();
        assert_eq!(val, 1.0);
        assert_eq!(tier, AmountTier::StandaloneLine);
    }

    #[test]
    fn test_best_guess_band() {
        let (val, tier) = extractor()
            .extract_amount_tiered("order number 5 worth about 450 rupees total pending")
            .unwrap();
        assert_eq!(val, 450.0);
        assert_eq!(tier, AmountTier::BestGuess);
    }

    #[test]
    fn test_best_guess_rejects_out_of_band() {
        // 5 is below the plausible-price floor
        assert_eq!(extractor().extract_amount("about 5 things arrived ok"), 0.0);
    }

    #[test]
    fn test_no_amount_returns_zero_sentinel() {
        assert_eq!(extractor().extract_amount("Thank you for visiting"), 0.0);
        assert!(extractor()
            .extract_amount_tiered("Thank you for visiting")
            .is_none());
    }

    #[test]
    fn test_amount_never_exceeds_cap() {
        assert_eq!(extractor().extract_amount("₹9999999 marked"), 0.0);
    }

    #[test]
    fn test_tier_confidence_bands() {
        assert_eq!(AmountTier::CurrencyMarked.confidence(), 95);
        assert_eq!(AmountTier::CommerceAction.confidence(), 90);
        assert_eq!(AmountTier::PaymentKeyword.confidence(), 85);
        assert_eq!(AmountTier::StandaloneLine.confidence(), 70);
        assert_eq!(AmountTier::BestGuess.confidence(), 50);
    }

    #[test]
    fn test_merchant_paid_to_line() {
        assert_eq!(extractor().extract_merchant("Paid to Swiggy\n₹350"), "Swiggy");
    }

    #[test]
    fn test_merchant_to_keyword_next_line() {
        assert_eq!(
            extractor().extract_merchant("To\nRAHUL SHARMA\n₹245"),
            "RAHUL SHARMA"
        );
    }

    #[test]
    fn test_merchant_truncated_name_uses_next_line() {
        assert_eq!(
            extractor().extract_merchant("Paid to Ra...\nRamesh Kumar\nDone"),
            "Ramesh Kumar"
        );
    }

    #[test]
    fn test_merchant_received_from() {
        assert_eq!(
            extractor().extract_merchant("Received from Ramesh Kumar\n₹500"),
            "Ramesh Kumar"
        );
    }

    #[test]
    fn test_merchant_product_before_price() {
        assert_eq!(
            extractor().extract_merchant("Chicken Biryani\nAdd item ₹245"),
            "Chicken Biryani"
        );
    }

    #[test]
    fn test_merchant_caps_line_skips_boilerplate() {
        assert_eq!(
            extractor().extract_merchant("GOOGLE PAY\nNISHA SHARMA\nDone"),
            "NISHA SHARMA"
        );
    }

    #[test]
    fn test_merchant_known_brand() {
        assert_eq!(
            extractor().extract_merchant("your swiggy order is on its way"),
            "Swiggy"
        );
    }

    #[test]
    fn test_merchant_first_meaningful_line() {
        assert_eq!(
            extractor().extract_merchant("Payment successful\nCorner Cafe\n42"),
            "Corner Cafe"
        );
    }

    #[test]
    fn test_merchant_default() {
        assert_eq!(extractor().extract_merchant("12\n7"), UNKNOWN_MERCHANT);
    }

    #[test]
    fn test_direction_credit_keywords() {
        assert_eq!(
            extractor().classify_direction("₹500 credited to your account"),
            Direction::Credit
        );
        assert_eq!(
            extractor().classify_direction("Cashback earned"),
            Direction::Credit
        );
    }

    #[test]
    fn test_direction_credit_beats_debit() {
        assert_eq!(
            extractor().classify_direction("Refund of ₹100 you paid"),
            Direction::Credit
        );
    }

    #[test]
    fn test_direction_debit_and_default() {
        assert_eq!(
            extractor().classify_direction("₹500 debited"),
            Direction::Debit
        );
        assert_eq!(
            extractor().classify_direction("Thank you for visiting"),
            Direction::Debit
        );
    }

    #[test]
    fn test_parse_amount_strips_commas() {
        assert_eq!(parse_amount("1,299.50"), 1299.50);
        assert_eq!(parse_amount("garbage"), 0.0);
    }
}
