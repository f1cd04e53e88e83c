//! Locale store consulted when a declared error is invoked without an
//! explicit locale.
//!
//! The store is scoped to the current thread (the request-scoped
//! `err_locale` key of a web stack), with an optional task-scoped override
//! under the `tokio` feature for async servers that hop threads.
//!
//! The core only reads the locale. The one write it performs is supplying
//! [`DEFAULT_LOCALE`] when nothing has been set yet.
//!
//! # Example
//!
//! ```rust
//! use business_errors::locale;
//!
//! locale::set_locale("fr");
//! assert_eq!(locale::current_locale(), "fr");
//!
//! locale::clear_locale();
//! assert_eq!(locale::current_locale(), "en");
//! ```

use std::borrow::Cow;
use std::cell::RefCell;

/// Locale used when none has been set and as the fallback for localized
/// messages lacking the requested locale.
pub const DEFAULT_LOCALE: &str = "en";

/// Name of the request-scoped key this store models.
pub const LOCALE_KEY: &str = "err_locale";

// Each thread carries its own locale; nothing is shared across threads.
thread_local! {
    static ERR_LOCALE: RefCell<Option<Cow<'static, str>>> = const { RefCell::new(None) };
}

#[cfg(feature = "tokio")]
tokio::task_local! {
    static TASK_LOCALE: Cow<'static, str>;
}

/// Set the locale for the current thread.
#[inline]
pub fn set_locale(locale: impl Into<Cow<'static, str>>) {
    let locale = locale.into();
    ERR_LOCALE.with(|slot| *slot.borrow_mut() = Some(locale));
}

/// Locale for the current task or thread.
///
/// Resolution order: task-scoped override (with the `tokio` feature), then
/// the thread store. When the thread store is empty it is filled with
/// [`DEFAULT_LOCALE`].
pub fn current_locale() -> Cow<'static, str> {
    #[cfg(feature = "tokio")]
    if let Ok(locale) = TASK_LOCALE.try_with(Clone::clone) {
        return locale;
    }

    ERR_LOCALE.with(|slot| {
        slot.borrow_mut()
            .get_or_insert(Cow::Borrowed(DEFAULT_LOCALE))
            .clone()
    })
}

/// Forget the current thread's locale.
#[inline]
pub fn clear_locale() {
    ERR_LOCALE.with(|slot| *slot.borrow_mut() = None);
}

/// Run `future` with `locale` as its task-scoped locale.
///
/// The override follows the task across worker threads and takes precedence
/// over the thread store for everything polled inside `future`.
///
/// ```rust,ignore
/// let value = scope_locale("de", async { auth.get("invalid_token") }).await?;
/// ```
#[cfg(feature = "tokio")]
pub async fn scope_locale<F>(locale: impl Into<Cow<'static, str>>, future: F) -> F::Output
where
    F: std::future::Future,
{
    TASK_LOCALE.scope(locale.into(), future).await
}
