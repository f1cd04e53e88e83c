//! # Business Errors
//!
//! A declarative catalog of "business errors": named, coded, HTTP-tagged error
//! kinds organized into nested groups, with locale-aware messages and
//! pluggable output formats.
//!
//! ## Design Philosophy
//!
//! 1. **Errors are declared once, at startup**, into a process-wide catalog
//! 2. **Codes are allocated by scope**: seed a group once and every implicit
//!    declaration takes the next code
//! 3. **Holders are isolated namespaces**: a derived holder never silently
//!    inherits its parent's errors
//! 4. **Signaling is data**: a raised business error carries its code,
//!    message, HTTP status and rendered payload for the boundary layer
//!
//! ## Quick Start
//!
//! ```rust
//! use business_errors::{Holder, Error, ErrorDef, Result};
//!
//! fn auth() -> Result<Holder> {
//!     Holder::define("Auth", |d| {
//!         d.code_start_at(100).http(401);
//!         d.define("invalid_token")?;
//!         d.define(ErrorDef::new("token_expired").message("Token has expired"))?;
//!         Ok(())
//!     })
//! }
//!
//! let auth = auth()?;
//! let err = auth.get_in("invalid_token", "en")?;
//! assert_eq!(err.code(), 100);
//! assert_eq!(err.http_status(), 401);
//! assert_eq!(err.message(), "Invalid token");
//!
//! // Raising hands the value to the boundary layer as `Error::Business`.
//! let raised: Result<()> = auth.raise("token_expired");
//! match raised {
//!     Err(Error::Business(value)) => assert_eq!(value.code(), 101),
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), business_errors::Error>(())
//! ```
//!
//! ## Declaration Phase
//!
//! Declarations mutate the process-wide catalog and must run during
//! initialization, on one thread, before the catalog is read concurrently.
//! After that, `Holder` values and the catalog are read-only and can be shared
//! freely across threads.
//!
//! ## Features
//!
//! - `tokio`: task-scoped locale overrides via [`locale::scope_locale`]

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::borrow::Cow;

pub mod catalog;
pub mod code;
pub mod config;
pub mod definition;
pub mod holder;
pub mod locale;
pub mod logging;
pub mod macros;
pub mod payload;
pub mod scope;
pub mod value;

pub use catalog::{CatalogStore, GroupTree};
pub use code::{CodeCursor, Direction};
pub use config::{Config, ConfigError};
pub use definition::{ErrorDef, ErrorSpec, Message, humanize};
pub use holder::{Declarer, Holder};
pub use locale::{DEFAULT_LOCALE, clear_locale, current_locale, set_locale};
pub use logging::SignalLog;
pub use payload::Payload;
pub use scope::{Group, PRIVATE_GROUP, PUBLIC_GROUP, Scope};
pub use value::ErrorValue;

/// Type alias for Results using our error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while declaring, invoking or signaling
/// business errors.
///
/// [`Error::Business`] is not a bug: it is the intended outcome of raising a
/// declared error, and a boundary layer is expected to catch it and map
/// [`ErrorValue::http_status`] and [`ErrorValue::info`] onto a response. The
/// other variants are usage errors and indicate a programming or
/// configuration mistake.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declared error that has been signaled.
    #[error("{0}")]
    Business(Box<ErrorValue>),

    /// An implicit code was requested in a scope chain that was never seeded.
    #[error(
        "cannot allocate a code for `{name}` in group `{group}` of `{holder}`: \
         call code_start_at before declaring without an explicit code"
    )]
    MissingCodeSeed {
        /// Holder being declared.
        holder: Cow<'static, str>,
        /// Group the declaration targeted.
        group: Cow<'static, str>,
        /// Name of the offending declaration.
        name: Cow<'static, str>,
    },

    /// A render template id is absent from the configured format table.
    #[error("unknown render format `{format}` requested by `{name}`")]
    UnknownFormat {
        /// The missing template id.
        format: Cow<'static, str>,
        /// Error whose rendering was attempted.
        name: Cow<'static, str>,
    },

    /// A name inherited from a parent holder was invoked on a derived holder.
    #[error(
        "`{name}` belongs to `{parent}` and is not available on `{holder}`; \
         declare or import it explicitly"
    )]
    NotSupported {
        /// Derived holder the call was made on.
        holder: Cow<'static, str>,
        /// Holder the name was originally declared on.
        parent: Cow<'static, str>,
        /// Inert name.
        name: Cow<'static, str>,
    },

    /// A name that was never declared on the holder was invoked.
    #[error("`{name}` is not declared on `{holder}`")]
    Undeclared {
        /// Holder the call was made on.
        holder: Cow<'static, str>,
        /// Unknown name.
        name: Cow<'static, str>,
    },
}

impl Error {
    /// HTTP status a boundary layer should answer with.
    ///
    /// Business errors carry their declared status; usage errors are server
    /// faults and map to 500.
    #[inline]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Business(value) => value.http_status(),
            _ => 500,
        }
    }

    /// Check whether this is a signaled business error.
    #[inline]
    pub const fn is_business(&self) -> bool {
        matches!(self, Self::Business(_))
    }

    /// Borrow the signaled business error, if any.
    #[inline]
    pub fn business(&self) -> Option<&ErrorValue> {
        match self {
            Self::Business(value) => Some(value),
            _ => None,
        }
    }

    /// Take the signaled business error, if any.
    #[inline]
    pub fn into_business(self) -> Option<ErrorValue> {
        match self {
            Self::Business(value) => Some(*value),
            _ => None,
        }
    }
}


#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn business_errors_expose_declared_status() {
        let value = ErrorValue::new("not_found", "Missing", 4, 404, None);
        let err = Error::Business(Box::new(value));

        assert!(err.is_business());
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.business().map(ErrorValue::code), Some(4));
    }

    #[test]
    fn usage_errors_map_to_server_fault() {
        let err = Error::Undeclared {
            holder: "Billing".into(),
            name: "card_declined".into(),
        };

        assert!(!err.is_business());
        assert_eq!(err.http_status(), 500);
        assert!(err.into_business().is_none());
    }

    #[test]
    fn missing_seed_message_names_the_declaration() {
        let err = Error::MissingCodeSeed {
            holder: "Auth".into(),
            group: "public".into(),
            name: "invalid_token".into(),
        };

        let displayed = err.to_string();
        assert!(displayed.contains("invalid_token"));
        assert!(displayed.contains("Auth"));
        assert!(displayed.contains("code_start_at"));
    }

    #[test]
    fn business_display_is_the_payload() {
        let value = ErrorValue::new("bad", "Bad", 1, 400, None);
        let err = Error::Business(Box::new(value));

        assert_eq!(err.to_string(), r#"{"code":1,"msg":"Bad","http":400}"#);
    }
}
