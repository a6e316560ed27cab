use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d -]{7,}\d").unwrap());
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{6,}\b").unwrap());

/// Strips emails, phone numbers and long digit runs from text headed for the logs.
pub fn redact_pii(text: &str) -> String {
    let text = EMAIL_RE.replace_all(text, "[REDACTED_EMAIL]");
    let text = PHONE_RE.replace_all(&text, "[REDACTED_PHONE]");
    ID_RE.replace_all(&text, "[REDACTED_ID]").into_owned()
}

/// Redacts, then cuts to at most `max_chars` characters.
pub fn log_excerpt(text: &str, max_chars: usize) -> String {
    redact_pii(text).chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_email_and_phone() {
        let out = redact_pii("reach me at jane.doe@example.com or +1 555 123 4567");
        assert_eq!(out, "reach me at [REDACTED_EMAIL] or [REDACTED_PHONE]");
    }

    #[test]
    fn test_redacts_long_ids() {
        assert_eq!(redact_pii("MRN 1234567"), "MRN [REDACTED_ID]");
    }

    #[test]
    fn test_leaves_clinical_text_alone() {
        let text = "fever of 39 for 3 days, pain 7/10";
        assert_eq!(redact_pii(text), text);
    }

    #[test]
    fn test_excerpt_is_char_bounded() {
        assert_eq!(log_excerpt("héllo world", 5), "héllo");
    }
}
