//! Prompt construction for the generative parse endpoint

/// Build the instructional prompt that embeds OCR text for a generative
/// model and pins the reply to a bare JSON object
pub fn build_parse_prompt(ocr_text: &str) -> String {
    format!(
        r#"You are an expert at parsing financial transaction information from OCR text extracted from payment app screenshots (Google Pay, PhonePe, Paytm, etc.).

Extract the following information from the text below:
1. Amount (numeric value only, no currency symbols)
2. Merchant/Payee name
3. Transaction type (either "debit" or "credit")

OCR Text:
"""
{ocr_text}
"""

Respond ONLY with a valid JSON object in this exact format (no markdown, no explanation):
{{
  "amount": <number>,
  "merchant": "<string>",
  "type": "<debit|credit>",
  "confidence": <0-100>
}}

Rules:
- If amount is not found, set amount to 0
- If merchant is not found, set merchant to "Payment"
- Type should be "debit" for payments/sent money, "credit" for received/refund
- Confidence should be 0-100 based on how clear the information is
- Return ONLY the JSON object, nothing else"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text() {
        let prompt = build_parse_prompt("Paid to Swiggy\n₹350");
        assert!(prompt.contains("Paid to Swiggy\n₹350"));
        assert!(prompt.contains("\"type\": \"<debit|credit>\""));
    }
}
