//! Structured log view of a business error.
//!
//! [`SignalLog`] borrows from the [`ErrorValue`](crate::ErrorValue) that
//! produced it and cannot outlive it. Loggers consume it on the spot: either
//! field by field for structured backends, or through
//! [`SignalLog::write_to`] for line-oriented sinks.
//!
//! ```rust
//! use business_errors::ErrorValue;
//!
//! let value = ErrorValue::new("invalid_token", "Invalid token", 100, 401, None);
//! let mut line = String::new();
//! value.signal_log().write_to(&mut line).unwrap();
//!
//! assert!(line.starts_with("[100] invalid_token http=401"));
//! ```

use crate::payload::Payload;
use std::borrow::Cow;
use std::fmt;

/// Maximum length for any individual field in formatted output.
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Appended to truncated fields.
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Borrowed, structured view of an [`ErrorValue`](crate::ErrorValue).
#[derive(Debug)]
pub struct SignalLog<'a> {
    pub(crate) name: &'a str,
    pub(crate) code: i64,
    pub(crate) http_status: u16,
    pub(crate) format: Option<&'a str>,
    pub(crate) message: &'a str,
    pub(crate) info: &'a Payload,
    pub(crate) signaled: bool,
}

impl<'a> SignalLog<'a> {
    /// Write one log line without intermediate allocation for short fields.
    ///
    /// Format: `[{code}] {name} http={status} [format={id}] [SIGNALED] msg='{msg}' info={json}`.
    /// Message and info are truncated to 1024 bytes on a character boundary.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "[{}] {} http={}", self.code, self.name, self.http_status)?;

        if let Some(format) = self.format {
            write!(f, " format={format}")?;
        }
        if self.signaled {
            f.write_str(" [SIGNALED]")?;
        }

        write!(f, " msg='{}'", truncate_with_indicator(self.message))?;
        write!(f, " info={}", truncate_with_indicator(&self.info.to_string()))
    }

    /// Declared name.
    #[inline]
    pub const fn name(&self) -> &str {
        self.name
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// HTTP status.
    #[inline]
    pub const fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Render format, if any.
    #[inline]
    pub const fn format(&self) -> Option<&str> {
        self.format
    }

    /// Resolved message. Not truncated; that is the sink's job.
    #[inline]
    pub const fn message(&self) -> &str {
        self.message
    }

    /// Current info payload.
    #[inline]
    pub const fn info(&self) -> &Payload {
        self.info
    }

    /// Whether the value went through the render pipeline.
    #[inline]
    pub const fn is_signaled(&self) -> bool {
        self.signaled
    }
}

/// Cap a field at [`MAX_FIELD_OUTPUT_LEN`] bytes, cutting on a UTF-8 boundary
/// and marking the cut.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let mut idx = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
