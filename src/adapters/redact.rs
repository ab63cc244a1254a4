//! Log redaction for credentials and session material.
//!
//! The client handles login passwords and session cookies. Neither should
//! ever reach a log file, so every formatted log line passes through
//! [`redact`] before it is written (see [`RedactingMakeWriter`]).
//!
//! Rules cover:
//! - `password` values in JSON bodies and `key=value` text
//! - `session` cookies and `Cookie`/`Set-Cookie` headers
//! - bearer tokens and JWTs
//! - email addresses (usernames are often emails)
//!
//! Input longer than `HEARTWISE_REDACT_MAX_BYTES` (default 16 KiB) is cut at
//! that size and marked `[TRUNCATED]`.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_REDACT_MAX_BYTES: usize = 16 * 1024;

/// (pattern, replacement) pairs, applied in order.
const RULES: [(&str, &str); 6] = [
    (
        r#"(?i)("password"\s*:\s*)"(?:[^"\\]|\\.)*""#,
        r#"$1"[REDACTED]""#,
    ),
    (
        r"(?i)\b(password|passwd|pwd)(\s*[=:]\s*)[^\s&,;]+",
        "$1$2[REDACTED]",
    ),
    (
        r"(?i)\b((?:set-)?cookie\s*:\s*).+",
        "$1[REDACTED-COOKIE]",
    ),
    (
        r"(?i)\b(session(?:id)?=)[^\s;,]+",
        "$1[REDACTED-SESSION]",
    ),
    (
        r"(?i)\bbearer\s+[A-Za-z0-9._~+/-]+=*",
        "Bearer [REDACTED-TOKEN]",
    ),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
];

struct Redactor {
    any: RegexSet,
    rules: Vec<(Regex, &'static str)>,
}

fn redactor() -> &'static Redactor {
    static REDACTOR: OnceLock<Redactor> = OnceLock::new();
    REDACTOR.get_or_init(|| Redactor {
        any: RegexSet::new(RULES.iter().map(|(p, _)| *p)).expect("Valid redaction rules"),
        rules: RULES
            .iter()
            .map(|(p, r)| (Regex::new(p).expect("Valid redaction rule"), *r))
            .collect(),
    })
}

fn max_bytes() -> usize {
    std::env::var("HEARTWISE_REDACT_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_REDACT_MAX_BYTES)
}

/// Cut `input` to at most `limit` bytes on a char boundary.
fn clip(input: &str, limit: usize) -> (&str, bool) {
    if input.len() <= limit {
        return (input, false);
    }
    let mut end = limit;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Replace credentials and session material in `input`.
#[must_use]
pub fn redact(input: &str) -> String {
    redact_with_limit(input, max_bytes())
}

fn redact_with_limit(input: &str, limit: usize) -> String {
    let (text, truncated) = clip(input, limit);
    let r = redactor();

    let mut out = if r.any.is_match(text) {
        let hits = r.any.matches(text);
        let mut buf = text.to_string();
        for idx in hits.iter() {
            let (regex, replacement) = &r.rules[idx];
            buf = regex.replace_all(&buf, *replacement).into_owned();
        }
        buf
    } else {
        text.to_string()
    };

    if truncated {
        out.push_str(" [TRUNCATED]");
        if input.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// `MakeWriter` wrapper that redacts each formatted log line before writing it.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W: std::io::Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: std::io::Write> RedactingWriter<W> {
    fn write_redacted(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(redact(&text).as_bytes())
    }

    fn drain_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.write_redacted(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);

        self.drain_lines()?;

        // An unterminated huge line is flushed early (clipped by `redact`).
        if self.pending.len() > max_bytes().saturating_mul(2) {
            let line = std::mem::take(&mut self.pending);
            self.write_redacted(&line)?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_lines()?;
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.write_redacted(&rest)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_redact_json_password() {
        let out = redact(r#"body={"username": "alice", "password": "hunter2"}"#);
        assert!(!out.contains("hunter2"));
        assert!(out.contains(r#""password": "[REDACTED]""#));
        assert!(out.contains("alice"));
    }

    #[test]
    fn test_redact_key_value_password() {
        let out = redact("login attempt password=hunter2 user=bob");
        assert_eq!(out, "login attempt password=[REDACTED] user=bob");
    }

    #[test]
    fn test_redact_session_cookie() {
        let out = redact("cookie jar has session=eyJ1c2VyIjoiYWxpY2UifQ.Z1x2; Path=/");
        assert!(out.contains("session=[REDACTED-SESSION]"));
        assert!(!out.contains("eyJ1c2Vy"));

        let out = redact("Set-Cookie: session=abc123; HttpOnly");
        assert_eq!(out, "Set-Cookie: [REDACTED-COOKIE]");
    }

    #[test]
    fn test_redact_bearer_and_email() {
        let out = redact("Authorization: Bearer abc.def.ghi for alice@example.com");
        assert!(out.contains("Bearer [REDACTED-TOKEN]"));
        assert!(out.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let line = "Prediction complete risk=HIGH percentage=72.4";
        assert_eq!(redact(line), line);
    }

    #[test]
    fn test_truncation_on_char_boundary() {
        let out = redact_with_limit("héllo wörld", 2);
        assert!(out.ends_with("[TRUNCATED]"));
        assert!(out.starts_with('h'));
    }

    #[test]
    fn test_truncation_keeps_line_break() {
        assert_eq!(redact_with_limit("abcdef\n", 3), "abc [TRUNCATED]\n");
        assert_eq!(redact_with_limit("abcdef", 3), "abc [TRUNCATED]");
    }

    #[test]
    fn test_writer_long_line_does_not_swallow_next() {
        let long = "x".repeat(DEFAULT_REDACT_MAX_BYTES + 100);
        let mut sink = Vec::new();
        {
            let mut writer = RedactingWriter {
                inner: &mut sink,
                pending: Vec::new(),
            };
            writer.write_all(format!("{long}\nnext line\n").as_bytes()).expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(sink).expect("utf8");
        assert!(text.ends_with(" [TRUNCATED]\nnext line\n"));
    }

    #[test]
    fn test_writer_redacts_lines() {
        let mut sink = Vec::new();
        {
            let mut writer = RedactingWriter {
                inner: &mut sink,
                pending: Vec::new(),
            };
            writer.write_all(b"first password=abc\nsecond ").expect("write");
            writer.write_all(b"line\n").expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(sink).expect("utf8");
        assert_eq!(text, "first password=[REDACTED]\nsecond line\n");
    }
}
