//! Group scopes: the context a declaration inherits its defaults from.
//!
//! A [`Scope`] is a plain value carrying the current group name, code cursor,
//! default HTTP status and default render format. Entering a group derives a
//! fresh child scope from the parent ([`Scope::enter`]); the parent is never
//! touched, so leaving the group (normally or through an early `?` return)
//! leaves the parent exactly as it was before entry.
//!
//! Override rules when entering a group:
//!
//! | field          | child value                                        |
//! |----------------|----------------------------------------------------|
//! | group name     | the group's name                                   |
//! | code cursor    | the group's seed, else a copy of the parent cursor |
//! | HTTP default   | the group's status, else the parent's              |
//! | format default | the group's format, else the parent's              |

use crate::code::CodeCursor;
use std::borrow::Cow;

/// Group used when no enclosing group names one.
pub const PUBLIC_GROUP: &str = "public";

/// Group used by [`Group::private`].
pub const PRIVATE_GROUP: &str = "private";

/// Declaration context for one level of group nesting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scope {
    group: Option<Cow<'static, str>>,
    cursor: CodeCursor,
    http: Option<u16>,
    format: Option<Cow<'static, str>>,
}

impl Scope {
    /// The outermost scope of a declaration session: no group, no seed, no
    /// overrides.
    #[inline]
    pub const fn root() -> Self {
        Self {
            group: None,
            cursor: CodeCursor::UNSEEDED,
            http: None,
            format: None,
        }
    }

    /// Derive the scope for a nested group.
    pub fn enter(&self, group: &Group) -> Self {
        Self {
            group: Some(group.name.clone()),
            cursor: group.code_start_at.map_or(self.cursor, CodeCursor::seeded),
            http: group.http.or(self.http),
            format: group.format.clone().or_else(|| self.format.clone()),
        }
    }

    /// Current group name, [`PUBLIC_GROUP`] outside any group.
    #[inline]
    pub fn group_name(&self) -> &str {
        self.group.as_deref().unwrap_or(PUBLIC_GROUP)
    }

    pub(crate) fn group_cow(&self) -> Cow<'static, str> {
        self.group.clone().unwrap_or(Cow::Borrowed(PUBLIC_GROUP))
    }

    /// Code cursor of this scope.
    #[inline]
    pub const fn cursor(&self) -> CodeCursor {
        self.cursor
    }

    /// Default HTTP status, if this scope or an ancestor set one.
    #[inline]
    pub const fn http_default(&self) -> Option<u16> {
        self.http
    }

    /// Default render format, if this scope or an ancestor set one.
    #[inline]
    pub fn format_default(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub(crate) fn format_cow(&self) -> Option<Cow<'static, str>> {
        self.format.clone()
    }

    pub(crate) fn seed(&mut self, code: i64) {
        self.cursor = CodeCursor::seeded(code);
    }

    pub(crate) fn set_http(&mut self, status: u16) {
        self.http = Some(status);
    }

    pub(crate) fn set_format(&mut self, format: Cow<'static, str>) {
        self.format = Some(format);
    }

    pub(crate) fn next_code(&mut self) -> Option<i64> {
        self.cursor.next()
    }
}

/// Options for entering a nested group.
///
/// ```rust
/// use business_errors::Group;
///
/// let group = Group::new("session").code_start_at(200).http(403);
/// assert_eq!(group.name(), "session");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: Cow<'static, str>,
    code_start_at: Option<i64>,
    http: Option<u16>,
    format: Option<Cow<'static, str>>,
}

impl Group {
    /// A group named `name` that inherits everything else.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            code_start_at: None,
            http: None,
            format: None,
        }
    }

    /// The [`PRIVATE_GROUP`].
    pub fn private() -> Self {
        Self::new(PRIVATE_GROUP)
    }

    /// Seed a fresh code cursor for the group.
    #[must_use]
    pub fn code_start_at(mut self, code: i64) -> Self {
        self.code_start_at = Some(code);
        self
    }

    /// Default HTTP status for the group's declarations.
    #[must_use]
    pub fn http(mut self, status: u16) -> Self {
        self.http = Some(status);
        self
    }

    /// Default render format for the group's declarations.
    #[must_use]
    pub fn format(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.format = Some(template.into());
        self
    }

    /// Group name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&'static str> for Group {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Group {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
