//! Runtime business errors and the render pipeline.
//!
//! An [`ErrorValue`] is built fresh every time a declared name is invoked. It
//! starts *raw*: the caller may read its fields or its [`ErrorValue::info`]
//! payload. Signaling consumes it and returns `Err(Error::Business(..))`:
//!
//! | operation                 | payload signaled                        |
//! |---------------------------|-----------------------------------------|
//! | [`ErrorValue::throw`]     | rendered with its format, else raw info |
//! | [`ErrorValue::render`]    | `{only: template projection + extra}`   |
//! | [`ErrorValue::with`]      | `info + {data: extra}`                  |
//!
//! # Template Projection
//!
//! A template is an ordered list of output keys. Projection zips it
//! positionally against the info values (`code`, `msg`, `http`, then
//! `format` when set): a two-key template keeps `code` and `msg` only, and
//! keys beyond the number of info fields are dropped.
//!
//! ```rust
//! use business_errors::{Config, Error, ErrorValue, Payload, config};
//!
//! config::install(Config::default().with_format("short", ["c", "m"]));
//!
//! let value = ErrorValue::new("bad_input", "Bad", 1, 400, None);
//! let err = value.render::<()>("short", Payload::new()).unwrap_err();
//!
//! let Error::Business(value) = err else { unreachable!() };
//! assert_eq!(value.info().to_string(), r#"{"only":{"c":1,"m":"Bad"}}"#);
//! ```

use crate::config::{self, Config};
use crate::definition::humanize;
use crate::logging::SignalLog;
use crate::payload::Payload;
use crate::{Error, Result};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

/// An invoked business error.
#[derive(Debug, Clone)]
pub struct ErrorValue {
    name: Cow<'static, str>,
    message: String,
    code: i64,
    http_status: u16,
    format: Option<Cow<'static, str>>,
    info: OnceLock<Payload>,
    signaled: bool,
}

impl ErrorValue {
    /// Build a raw value; a blank message humanizes `name`.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        code: i64,
        http_status: u16,
        format: Option<Cow<'static, str>>,
    ) -> Self {
        let name = name.into();
        let mut message = message.into();
        if message.trim().is_empty() {
            message = humanize(&name);
        }
        Self {
            name,
            message,
            code,
            http_status,
            format,
            info: OnceLock::new(),
            signaled: false,
        }
    }

    /// Declared name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message resolved for the invocation locale.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// HTTP status a boundary layer should answer with.
    #[inline]
    pub const fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Render format used by [`ErrorValue::throw`].
    #[inline]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Whether this value went through the render pipeline.
    #[inline]
    pub const fn is_signaled(&self) -> bool {
        self.signaled
    }

    /// Structured payload, built on first access and cached.
    ///
    /// Raw values yield `{code, msg, http}` (plus `format` when set); signaled
    /// values yield whatever the pipeline stage replaced it with.
    pub fn info(&self) -> &Payload {
        self.info.get_or_init(|| {
            let mut info = Payload::new()
                .with("code", self.code)
                .with("msg", self.message.clone())
                .with("http", self.http_status);
            if let Some(format) = &self.format {
                info.insert("format", format.to_string());
            }
            info
        })
    }

    /// Signal with the default action: render with the value's format when it
    /// has one, otherwise signal the raw value.
    ///
    /// # Errors
    ///
    /// Always returns `Err`: [`Error::Business`] on success, or
    /// [`Error::UnknownFormat`] when the format has no template.
    pub fn throw<T>(self) -> Result<T> {
        match self.format.clone() {
            Some(format) => self.render(&format, Payload::new()),
            None => Err(self.signal()),
        }
    }

    /// Project onto the `template` render format, merge `extra`, and signal.
    ///
    /// # Errors
    ///
    /// Always returns `Err`: [`Error::Business`] carrying
    /// `{only: projection}`, or [`Error::UnknownFormat`] without signaling
    /// when the template is not configured.
    pub fn render<T>(self, template: &str, extra: Payload) -> Result<T> {
        self.render_with(&config::current(), template, extra)
    }

    /// [`ErrorValue::render`] against an explicit config.
    pub fn render_with<T>(mut self, config: &Config, template: &str, extra: Payload) -> Result<T> {
        let Some(keys) = config.template(template) else {
            return Err(Error::UnknownFormat {
                format: Cow::Owned(template.to_owned()),
                name: self.name.clone(),
            });
        };

        let mut projected: Payload = keys
            .iter()
            .zip(self.info().values())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        projected.merge(extra);

        self.info = OnceLock::from(Payload::new().with("only", projected.to_json()));
        Err(self.signal())
    }

    /// Attach `extra` under `data` and signal.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Business`].
    pub fn with<T>(mut self, extra: Payload) -> Result<T> {
        let mut info = self.info().clone();
        info.insert("data", extra.to_json());
        self.info = OnceLock::from(info);
        Err(self.signal())
    }

    fn signal(mut self) -> Error {
        self.signaled = true;
        tracing::debug!(
            name = %self.name,
            code = self.code,
            http = self.http_status,
            format = self.format.as_deref(),
            "business error signaled"
        );
        Error::Business(Box::new(self))
    }

    /// Structured log view borrowing from this value.
    #[inline]
    pub fn signal_log(&self) -> SignalLog<'_> {
        SignalLog {
            name: &self.name,
            code: self.code,
            http_status: self.http_status,
            format: self.format.as_deref(),
            message: &self.message,
            info: self.info(),
            signaled: self.signaled,
        }
    }

    /// Callback-style access to [`ErrorValue::signal_log`].
    #[inline]
    pub fn with_signal_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SignalLog<'_>) -> R,
    {
        f(&self.signal_log())
    }
}

impl fmt::Display for ErrorValue {
    /// The info payload as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.info(), f)
    }
}

impl std::error::Error for ErrorValue {}
