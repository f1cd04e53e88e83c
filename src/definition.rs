//! Declared error templates.
//!
//! An [`ErrorSpec`] is the immutable record a declaration produces: name,
//! message (plain or per-locale), code, HTTP status, optional render format
//! and the group it was declared under. Invoking a declared name turns the
//! spec into a fresh [`ErrorValue`] with the message resolved for a locale.
//!
//! [`ErrorDef`] is the declaration request: every field except the name is
//! optional and falls back to the enclosing scope.

use crate::locale::DEFAULT_LOCALE;
use crate::value::ErrorValue;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

/// Message source of a declared error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// Same text for every locale.
    Text(Cow<'static, str>),
    /// Text per locale, resolved with a fallback to [`DEFAULT_LOCALE`].
    Localized(IndexMap<Cow<'static, str>, Cow<'static, str>>),
}

impl Message {
    /// Build a per-locale message.
    ///
    /// ```rust
    /// use business_errors::Message;
    ///
    /// let msg = Message::localized([("en", "Invalid token"), ("fr", "Jeton invalide")]);
    /// assert_eq!(msg.resolve("fr"), Some("Jeton invalide"));
    /// assert_eq!(msg.resolve("de"), Some("Invalid token"));
    /// ```
    pub fn localized<I, L, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, M)>,
        L: Into<Cow<'static, str>>,
        M: Into<Cow<'static, str>>,
    {
        Self::Localized(
            entries
                .into_iter()
                .map(|(locale, text)| (locale.into(), text.into()))
                .collect(),
        )
    }

    /// Text for `locale`, falling back to [`DEFAULT_LOCALE`].
    ///
    /// Returns `None` when nothing usable exists; callers then humanize the
    /// error name.
    pub fn resolve(&self, locale: &str) -> Option<&str> {
        let text = match self {
            Self::Text(text) => Some(text.as_ref()),
            Self::Localized(entries) => entries
                .get(locale)
                .or_else(|| entries.get(DEFAULT_LOCALE))
                .map(AsRef::as_ref),
        };
        text.filter(|text| !text.trim().is_empty())
    }

    /// Check whether the message carries no text at all.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Localized(entries) => entries.values().all(|text| text.trim().is_empty()),
        }
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<Cow<'static, str>> for Message {
    fn from(text: Cow<'static, str>) -> Self {
        Self::Text(text)
    }
}

/// Turn an error name into a readable sentence.
///
/// Underscores become spaces, only the first word is capitalized, and a
/// trailing `_id` is dropped. Words are split on underscores only, so digits
/// and inner capitals stay attached to their word.
///
/// ```rust
/// use business_errors::humanize;
///
/// assert_eq!(humanize("invalid_token"), "Invalid token");
/// assert_eq!(humanize("missing_user_id"), "Missing user");
/// ```
pub fn humanize(name: &str) -> String {
    let name = name.trim_start_matches(':');
    let base = name.strip_suffix("_id").filter(|base| !base.is_empty()).unwrap_or(name);
    base.from_case(Case::Snake).to_case(Case::Sentence)
}

// ============================================================================
// Declared Template
// ============================================================================

/// Immutable template of one declared error kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSpec {
    pub(crate) name: Cow<'static, str>,
    #[serde(rename = "msg")]
    pub(crate) message: Message,
    pub(crate) code: i64,
    #[serde(rename = "http")]
    pub(crate) http_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) format: Option<Cow<'static, str>>,
    #[serde(skip)]
    pub(crate) group: Cow<'static, str>,
}

impl ErrorSpec {
    /// Declared name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message source.
    #[inline]
    pub const fn message(&self) -> &Message {
        &self.message
    }

    /// Assigned code.
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
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Group the error was declared under.
    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Build a fresh value with the message resolved for `locale`.
    pub fn instantiate(&self, locale: &str) -> ErrorValue {
        let message = self
            .message
            .resolve(locale)
            .map_or_else(|| humanize(&self.name), str::to_owned);
        ErrorValue::new(
            self.name.clone(),
            message,
            self.code,
            self.http_status,
            self.format.clone(),
        )
    }
}

// ============================================================================
// Declaration Request
// ============================================================================

/// A declaration with optional overrides.
///
/// ```rust
/// use business_errors::ErrorDef;
///
/// let def = ErrorDef::new("card_declined")
///     .message("Your card was declined")
///     .code(402_001)
///     .http(402)
///     .format("short");
/// assert_eq!(def.name(), "card_declined");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDef {
    pub(crate) name: Cow<'static, str>,
    pub(crate) message: Option<Message>,
    pub(crate) code: Option<i64>,
    pub(crate) http: Option<u16>,
    pub(crate) group: Option<Cow<'static, str>>,
    pub(crate) format: Option<Cow<'static, str>>,
}

impl ErrorDef {
    /// Declare `name` with every field taken from the scope.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            message: None,
            code: None,
            http: None,
            group: None,
            format: None,
        }
    }

    /// Explicit message; an empty one still humanizes the name.
    #[must_use]
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Explicit code; the scope cursor is not advanced.
    #[must_use]
    pub fn code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Explicit HTTP status.
    #[must_use]
    pub fn http(mut self, status: u16) -> Self {
        self.http = Some(status);
        self
    }

    /// File the error under `group` without entering it.
    #[must_use]
    pub fn group(mut self, group: impl Into<Cow<'static, str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Explicit render format.
    #[must_use]
    pub fn format(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.format = Some(template.into());
        self
    }

    /// Declared name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&'static str> for ErrorDef {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ErrorDef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
