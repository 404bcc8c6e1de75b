use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("invalid email regex");
    static ref PHONE_RE: Regex =
        Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
            .expect("invalid phone regex");
}

/// Masks emails and phone numbers before any text leaves the process.
/// Idempotent: the replacement tokens contain no pattern left to match.
pub fn redact(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let masked = EMAIL_RE.replace_all(text, "[EMAIL_REDACTED]");
    PHONE_RE.replace_all(&masked, "[PHONE_REDACTED]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn test_masks_email() {
        let out = redact("Contact me at jane.doe@example.com for details");
        assert!(!out.contains("jane.doe@example.com"));
        assert_eq!(out, "Contact me at [EMAIL_REDACTED] for details");
    }

    #[test]
    fn test_masks_phone_variants() {
        for input in [
            "call 555-123-4567 now",
            "call (555) 123 4567 now",
            "call +1 202-555-0147 now",
            "call 5551234567 now",
        ] {
            let out = redact(input);
            assert!(out.contains("[PHONE_REDACTED]"), "not masked: {}", input);
        }
    }

    #[test]
    fn test_idempotent() {
        let once = redact("mail: a.b@c.io, tel: +1 (202) 555-0147");
        let twice = redact(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(redact(""), "");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Backend Engineer at Acme, 2020-01 to Present";
        assert_eq!(redact(text), text);
    }
}
