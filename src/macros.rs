//! Declaration shorthand.

/// Declare several errors on a [`Declarer`](crate::Declarer) at once.
///
/// Each entry is a bare name (humanized message) or `name = message`. Codes,
/// HTTP status and group come from the declarer's scope, in order. Must be
/// used where `?` can propagate [`Error`](crate::Error).
///
/// # Example
///
/// ```rust
/// use business_errors::{Holder, define_errors};
///
/// let billing = Holder::define("MacroBilling", |d| {
///     d.code_start_at(-1).http(402);
///     define_errors!(d => {
///         card_declined,
///         card_expired = "Your card has expired",
///     });
///     Ok(())
/// })?;
///
/// assert_eq!(billing.spec("card_declined")?.code(), -1);
/// assert_eq!(billing.get_in("card_expired", "en")?.message(), "Your card has expired");
/// # Ok::<(), business_errors::Error>(())
/// ```
#[macro_export]
macro_rules! define_errors {
    ($d:ident => { $( $name:ident $(= $message:expr)? ),+ $(,)? }) => {{
        $(
            $d.define($crate::ErrorDef::new(stringify!($name)) $(.message($message))?)?;
        )+
    }};
}
