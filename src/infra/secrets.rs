use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 6] = [
    "password", "secret", "token", "apikey", "bearer", "authorization",
];

/// JWTs (access tokens, anon keys) all start with an encoded `{"`.
const JWT_PREFIX: &str = "eyJ";

pub fn redact_text(input: &str) -> String {
    input
        .split_whitespace()
        .map(redact_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);
        tracing::error!(code = "PANIC", payload = %scrubbed, "codebluer panicked");

        match panic_info.location() {
            Some(location) => eprintln!(
                "codebluer panic: {scrubbed} at {}:{}",
                location.file(),
                location.line()
            ),
            None => eprintln!("codebluer panic: {scrubbed}"),
        }
    }));
}

fn redact_chunk(chunk: &str) -> String {
    let lowered = chunk.to_ascii_lowercase();
    let cleaned = chunk.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());
    if SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        || cleaned.starts_with(JWT_PREFIX)
        || looks_like_opaque_token(cleaned)
    {
        REDACTED.to_owned()
    } else {
        chunk.to_owned()
    }
}

/// Long mixed letter/digit runs such as refresh tokens.
fn looks_like_opaque_token(value: &str) -> bool {
    value.len() >= 16
        && value.chars().any(|ch| ch.is_ascii_alphabetic())
        && value.chars().any(|ch| ch.is_ascii_digit())
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_text_scrubs_credentials() {
        let input = "sign-in failed password=hunter2 with eyJhbGciOiJIUzI1NiJ9.e30.sig";
        let output = redact_text(input);

        assert!(!output.contains("hunter2"));
        assert!(!output.contains("eyJhbGci"));
        assert!(output.contains("sign-in failed"));
    }

    #[test]
    fn redact_text_scrubs_opaque_refresh_tokens() {
        let output = redact_text("refresh with 7fk2Qm9x81LpZ0aa failed");

        assert_eq!(output, "refresh with [REDACTED] failed");
    }

    #[test]
    fn ordinary_words_survive() {
        assert_eq!(redact_text("room r1 not found"), "room r1 not found");
    }
}
