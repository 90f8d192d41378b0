//! Email content normalization.
//!
//! Noon report emails arrive as raw RFC 5322 messages. The backend wants the
//! plain-text body, so this module pulls out the first `text/plain` MIME part
//! in document order. PDF documents need no normalization; the backend
//! consumes them natively.

use mail_parser::{MessagePart, MessageParser, MimeHeaders};
use tracing::debug;

/// Extract the first `text/plain` part of a raw email message.
///
/// Returns `None` when the message cannot be parsed or carries no plain-text
/// part (e.g. an HTML-only report). That outcome short-circuits extraction
/// before the backend is called; it is a cost guard, not a correctness
/// guarantee.
pub fn extract_plain_text(raw_message: &str) -> Option<String> {
    let message = MessageParser::default().parse(raw_message)?;
    // `text_body` falls back to the HTML part when no text/plain part
    // exists, so the resolved part's declared type must be checked.
    let part_id = message.text_body.first()?;
    let part = message.part(*part_id)?;
    if !is_plain_text(part) {
        debug!("message has no text/plain part");
        return None;
    }
    let text = part.text_contents()?;
    if text.trim().is_empty() {
        debug!("plain-text part is blank");
        return None;
    }
    Some(text.to_string())
}

/// A part with no Content-Type header defaults to `text/plain`.
fn is_plain_text(part: &MessagePart) -> bool {
    match part.content_type() {
        None => true,
        Some(ct) => {
            ct.ctype().eq_ignore_ascii_case("text")
                && ct
                    .subtype()
                    .map_or(true, |s| s.eq_ignore_ascii_case("plain"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_EMAIL: &str = "From: master@libra-sun.example\r\n\
        To: ops@coreharbor.example\r\n\
        Subject: Daily Noon Report\r\n\
        Content-Type: text/plain; charset=utf-8\r\n\
        \r\n\
        24th Jan'25/Noon 12:00LT (20:00UTC)\r\n\
        Bunkers consumed in last 24 hours: VLSFO - 0.1mt, MGO - 2.4mt\r\n";

    const MULTIPART_EMAIL: &str = "From: master@libra-sun.example\r\n\
        To: ops@coreharbor.example\r\n\
        Subject: Daily Noon Report\r\n\
        MIME-Version: 1.0\r\n\
        Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
        \r\n\
        --sep\r\n\
        Content-Type: text/plain; charset=utf-8\r\n\
        \r\n\
        Bunkers consumed in last 24 hours: VLSFO - 0.1mt\r\n\
        --sep\r\n\
        Content-Type: text/html; charset=utf-8\r\n\
        \r\n\
        <html><body><p>Bunkers consumed in last 24 hours: VLSFO - 0.1mt</p></body></html>\r\n\
        --sep--\r\n";

    const HTML_ONLY_EMAIL: &str = "From: master@libra-sun.example\r\n\
        To: ops@coreharbor.example\r\n\
        Subject: Daily Noon Report\r\n\
        MIME-Version: 1.0\r\n\
        Content-Type: text/html; charset=utf-8\r\n\
        \r\n\
        <html><body><p>Bunkers consumed: VLSFO - 0.1mt</p></body></html>\r\n";

    #[test]
    fn test_extracts_single_part_body() {
        let text = extract_plain_text(PLAIN_EMAIL).unwrap();
        assert!(text.contains("Bunkers consumed in last 24 hours"));
        assert!(text.contains("24th Jan'25"));
    }

    #[test]
    fn test_extracts_plain_part_of_multipart() {
        let text = extract_plain_text(MULTIPART_EMAIL).unwrap();
        assert!(text.contains("VLSFO - 0.1mt"));
        assert!(!text.contains("<html>"));
    }

    #[test]
    fn test_html_only_message_has_no_content() {
        assert_eq!(extract_plain_text(HTML_ONLY_EMAIL), None);
    }

    #[test]
    fn test_html_only_multipart_has_no_content() {
        // A multipart message whose only body part is HTML must not fall
        // back to the HTML text.
        let email = "From: master@libra-sun.example\r\n\
            Subject: Daily Noon Report\r\n\
            MIME-Version: 1.0\r\n\
            Content-Type: multipart/mixed; boundary=\"sep\"\r\n\
            \r\n\
            --sep\r\n\
            Content-Type: text/html; charset=utf-8\r\n\
            \r\n\
            <html><body><p>Bunkers consumed in last 24 hours: VLSFO - 0.1mt</p></body></html>\r\n\
            --sep--\r\n";
        assert_eq!(extract_plain_text(email), None);
    }

    #[test]
    fn test_missing_content_type_defaults_to_plain() {
        let email = "From: master@libra-sun.example\r\n\
            Subject: Daily Noon Report\r\n\
            \r\n\
            Bunkers consumed in last 24 hours: VLSFO - 0.1mt\r\n";
        let text = extract_plain_text(email).unwrap();
        assert!(text.contains("VLSFO - 0.1mt"));
    }

    #[test]
    fn test_blank_body_has_no_content() {
        let email = "From: a@b.example\r\n\
            Content-Type: text/plain\r\n\
            \r\n\
            \r\n";
        assert_eq!(extract_plain_text(email), None);
    }

    #[test]
    fn test_quoted_printable_body_is_decoded() {
        let email = "From: master@libra-sun.example\r\n\
            Content-Type: text/plain; charset=utf-8\r\n\
            Content-Transfer-Encoding: quoted-printable\r\n\
            \r\n\
            Bunkers consumed: VLSFO =2D 0.1mt\r\n";
        let text = extract_plain_text(email).unwrap();
        assert!(text.contains("VLSFO - 0.1mt"));
    }
}
