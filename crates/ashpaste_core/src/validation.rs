//! Content validation applied before a paste is persisted.
//!
//! Every check here is a pure function of its input; nothing touches storage.

use crate::constants::{MAX_EXPIRY_MINUTES, MIN_EXPIRY_MINUTES};
use crate::error::ValidationError;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Language tags accepted at creation. The empty tag means plain text.
pub const LANGUAGE_ALLOWLIST: &[&str] = &[
    "bash",
    "c",
    "cpp",
    "csharp",
    "css",
    "diff",
    "dockerfile",
    "go",
    "html",
    "java",
    "javascript",
    "json",
    "kotlin",
    "lua",
    "markdown",
    "php",
    "python",
    "ruby",
    "rust",
    "scala",
    "shell",
    "sql",
    "swift",
    "toml",
    "typescript",
    "xml",
    "yaml",
];

/// A create request that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPaste {
    pub content: String,
    pub language: String,
    pub burn: bool,
    pub expires_at: DateTime<Utc>,
}

/// Enforces size, encoding, language and expiry constraints.
#[derive(Debug, Clone, Copy)]
pub struct ContentValidator {
    max_size: usize,
}

impl ContentValidator {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Run every check against a create request.
    ///
    /// # Arguments
    /// - `content`: Submitted bytes, not yet known to be UTF-8.
    /// - `language`: Requested language tag.
    /// - `burn`: Burn-after-read flag, passed through.
    /// - `expiry_minutes`: Requested lifetime.
    /// - `now`: Creation instant used to anchor the expiry.
    ///
    /// # Errors
    /// Returns the first failing [`ValidationError`].
    pub fn validate(
        &self,
        content: Vec<u8>,
        language: &str,
        burn: bool,
        expiry_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<ValidatedPaste, ValidationError> {
        let content = self.validate_content(content)?;
        let language = validate_language(language)?;
        let expires_at = resolve_expiry(expiry_minutes, now)?;

        let hits = scan_dangerous_patterns(&content);
        if !hits.is_empty() {
            // Served as text/plain with nosniff, so these stay inert.
            tracing::warn!(patterns = ?hits, "Paste content matches dangerous patterns");
        }

        Ok(ValidatedPaste {
            content,
            language,
            burn,
            expires_at,
        })
    }

    /// Check size, emptiness and encoding, then normalize.
    ///
    /// # Returns
    /// UTF-8 content with NUL bytes removed and line endings folded to LF.
    ///
    /// # Errors
    /// `ContentTooLarge`, `EmptyContent` or `InvalidEncoding`.
    pub fn validate_content(&self, raw: Vec<u8>) -> Result<String, ValidationError> {
        if raw.len() > self.max_size {
            return Err(ValidationError::ContentTooLarge {
                size: raw.len(),
                max: self.max_size,
            });
        }
        if raw.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        let text = String::from_utf8(raw).map_err(|_| ValidationError::InvalidEncoding)?;
        let normalized = normalize_content(&text);
        if normalized.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(normalized)
    }
}

/// Strip NUL bytes and fold CRLF / bare CR into LF.
pub fn normalize_content(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\0' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            other => out.push(other),
        }
    }
    out
}

/// Accept the empty tag or a member of [`LANGUAGE_ALLOWLIST`].
///
/// # Errors
/// `InvalidLanguage` for any other value.
pub fn validate_language(language: &str) -> Result<String, ValidationError> {
    if language.is_empty() || LANGUAGE_ALLOWLIST.contains(&language) {
        Ok(language.to_string())
    } else {
        Err(ValidationError::InvalidLanguage)
    }
}

/// Turn a requested lifetime into an absolute expiry instant.
///
/// # Errors
/// - `InvalidExpiry` for negative durations or an unrepresentable instant.
/// - `ExpiryInPast` for a zero duration.
/// - `ExpiryTooFar` beyond one year.
pub fn resolve_expiry(
    expiry_minutes: i64,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    if expiry_minutes < 0 {
        return Err(ValidationError::InvalidExpiry(expiry_minutes));
    }
    if expiry_minutes < MIN_EXPIRY_MINUTES {
        return Err(ValidationError::ExpiryInPast);
    }
    if expiry_minutes > MAX_EXPIRY_MINUTES {
        return Err(ValidationError::ExpiryTooFar);
    }
    let expires_at = now
        .checked_add_signed(Duration::minutes(expiry_minutes))
        .ok_or(ValidationError::InvalidExpiry(expiry_minutes))?;
    if expires_at <= now {
        return Err(ValidationError::ExpiryInPast);
    }
    Ok(expires_at)
}

struct DangerousPattern {
    name: &'static str,
    regex: Regex,
}

fn dangerous_patterns() -> &'static [DangerousPattern] {
    static PATTERNS: OnceLock<Vec<DangerousPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            ("script-tag", r"(?i)<\s*script\b"),
            ("javascript-uri", r"(?i)javascript\s*:"),
            ("vbscript-uri", r"(?i)vbscript\s*:"),
            ("event-handler", r"(?i)<[^>]*\bon[a-z]+\s*="),
        ]
        .into_iter()
        .filter_map(|(name, pattern)| match Regex::new(pattern) {
            Ok(regex) => Some(DangerousPattern { name, regex }),
            Err(err) => {
                tracing::error!("Invalid dangerous-pattern regex {}: {}", name, err);
                None
            }
        })
        .collect()
    })
}

/// Names of the known-dangerous patterns found in `content`.
///
/// Matches are informational only; they never reject a paste.
pub fn scan_dangerous_patterns(content: &str) -> Vec<&'static str> {
    dangerous_patterns()
        .iter()
        .filter(|pattern| pattern.regex.is_match(content))
        .map(|pattern| pattern.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn size_boundary_accepts_max_and_rejects_one_over() {
        let validator = ContentValidator::new(16);
        assert!(validator.validate_content(vec![b'a'; 16]).is_ok());
        assert_eq!(
            validator.validate_content(vec![b'a'; 17]),
            Err(ValidationError::ContentTooLarge { size: 17, max: 16 })
        );
    }

    #[test]
    fn empty_and_nul_only_content_is_rejected() {
        let validator = ContentValidator::new(1024);
        assert_eq!(
            validator.validate_content(Vec::new()),
            Err(ValidationError::EmptyContent)
        );
        assert_eq!(
            validator.validate_content(vec![0, 0, 0]),
            Err(ValidationError::EmptyContent)
        );
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let validator = ContentValidator::new(1024);
        assert_eq!(
            validator.validate_content(vec![0xff, 0xfe, b'a']),
            Err(ValidationError::InvalidEncoding)
        );
    }

    #[test]
    fn normalization_strips_nul_and_folds_line_endings() {
        let cases = [
            ("a\r\nb", "a\nb"),
            ("a\rb", "a\nb"),
            ("a\r\r\nb", "a\n\nb"),
            ("a\0b\0", "ab"),
            ("line\n", "line\n"),
            ("\r", "\n"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_content(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn language_allowlist_is_exact() {
        assert_eq!(validate_language("").as_deref(), Ok(""));
        assert_eq!(validate_language("rust").as_deref(), Ok("rust"));
        for bad in ["Rust", " rust", "brainfuck", "<script>"] {
            assert_eq!(
                validate_language(bad),
                Err(ValidationError::InvalidLanguage),
                "language: {:?}",
                bad
            );
        }
    }

    #[test]
    fn expiry_boundaries() {
        assert_eq!(
            resolve_expiry(1, now()),
            Ok(now() + Duration::minutes(1))
        );
        assert_eq!(
            resolve_expiry(MAX_EXPIRY_MINUTES, now()),
            Ok(now() + Duration::minutes(525_600))
        );
        assert_eq!(resolve_expiry(0, now()), Err(ValidationError::ExpiryInPast));
        assert_eq!(
            resolve_expiry(MAX_EXPIRY_MINUTES + 1, now()),
            Err(ValidationError::ExpiryTooFar)
        );
        assert_eq!(
            resolve_expiry(-5, now()),
            Err(ValidationError::InvalidExpiry(-5))
        );
    }

    #[test]
    fn dangerous_patterns_are_reported_but_not_rejected() {
        let content = "<SCRIPT>alert(1)</script> <a href=\"javascript:x\" onclick = \"y\">";
        let hits = scan_dangerous_patterns(content);
        assert!(hits.contains(&"script-tag"));
        assert!(hits.contains(&"javascript-uri"));
        assert!(hits.contains(&"event-handler"));
        assert!(!hits.contains(&"vbscript-uri"));

        let validator = ContentValidator::new(1024);
        let validated = validator
            .validate(content.as_bytes().to_vec(), "html", false, 10, now())
            .expect("dangerous content is still accepted");
        assert_eq!(validated.content, content);
    }

    #[test]
    fn plain_text_has_no_pattern_hits() {
        assert!(scan_dangerous_patterns("fn main() { let total = 1; }").is_empty());
        assert!(scan_dangerous_patterns("let one = 1;\nif online == true {}").is_empty());
    }

    #[test]
    fn event_handlers_only_match_inside_tags() {
        assert_eq!(
            scan_dangerous_patterns("<img src=x onerror=alert(1)>"),
            vec!["event-handler"]
        );
        assert!(scan_dangerous_patterns("<p>turn it on = off</p> onload = 1").is_empty());
    }

    #[test]
    fn validate_runs_checks_in_order() {
        let validator = ContentValidator::new(4);
        let err = validator
            .validate(vec![b'a'; 5], "nope", false, 0, now())
            .expect_err("size is checked first");
        assert!(matches!(err, ValidationError::ContentTooLarge { .. }));

        let err = validator
            .validate(b"ok".to_vec(), "nope", false, 0, now())
            .expect_err("language before expiry");
        assert_eq!(err, ValidationError::InvalidLanguage);
    }
}
