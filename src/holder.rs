//! Definition holders and declaration sessions.
//!
//! A [`Holder`] is a named namespace of declared errors. It is produced by a
//! declaration session ([`Holder::define`]) in which a [`Declarer`] threads
//! the current [`Scope`] through nested groups:
//!
//! ```rust
//! use business_errors::{ErrorDef, Group, Holder};
//!
//! let orders = Holder::define("Orders", |d| {
//!     d.code_start_at(1000).http(422);
//!     d.define("out_of_stock")?;                              // 1000
//!     d.group(Group::new("payment").code_start_at(-1).http(402), |g| {
//!         g.define("card_declined")?;                         // -1
//!         g.define(ErrorDef::new("card_expired").code(-50))?; // -50, cursor untouched
//!         g.define("insufficient_funds")?;                    // -2
//!         Ok(())
//!     })?;
//!     d.define("address_invalid")?;                           // 1001, parent resumes
//!     Ok(())
//! })?;
//!
//! assert_eq!(orders.spec("insufficient_funds")?.code(), -2);
//! assert_eq!(orders.spec("address_invalid")?.code(), 1001);
//! assert_eq!(orders.spec("address_invalid")?.http_status(), 422);
//! # Ok::<(), business_errors::Error>(())
//! ```
//!
//! # Session Semantics
//!
//! - Specs are committed to the process-wide catalog only when the whole
//!   session succeeds. A failing session (for instance
//!   [`Error::MissingCodeSeed`]) leaves the catalog untouched and produces no
//!   holder.
//! - Each nested group owns a copy of its scope, so the enclosing scope is
//!   never modified by what happens inside the group, including early
//!   returns through `?`.
//! - Redeclaring a name overwrites it in the holder's lookup; the catalog
//!   keeps both entries.
//!
//! # Concurrency
//!
//! Declaration sessions are meant for initialization: run them on one
//! thread, before the catalog is read concurrently. A finished `Holder` is
//! immutable, `Send + Sync`, and every invocation builds an independent
//! [`ErrorValue`].
//!
//! # Derived Holders
//!
//! [`Holder::derive`] creates a holder that does not inherit its parent's
//! errors: every name the parent knows is inert on the child and fails with
//! [`Error::NotSupported`]. The child can redeclare a name or
//! [`Declarer::import`] the parent's spec explicitly.

use crate::catalog::{self, GroupTree};
use crate::config::{self, Config};
use crate::definition::{ErrorDef, ErrorSpec, Message, humanize};
use crate::locale;
use crate::scope::{Group, Scope};
use crate::value::ErrorValue;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::sync::Arc;

/// A namespace of declared errors.
#[derive(Debug, Clone)]
pub struct Holder {
    name: Cow<'static, str>,
    parent: Option<Cow<'static, str>>,
    specs: IndexMap<Cow<'static, str>, Arc<ErrorSpec>>,
    /// Inherited names mapped to the holder they came from.
    inert: IndexMap<Cow<'static, str>, Cow<'static, str>>,
}

impl Holder {
    /// Run a declaration session against the installed config.
    ///
    /// # Errors
    ///
    /// Whatever `body` returns, typically [`Error::MissingCodeSeed`].
    pub fn define<F>(name: impl Into<Cow<'static, str>>, body: F) -> Result<Self>
    where
        F: FnOnce(&mut Declarer<'_>) -> Result<()>,
    {
        Self::define_with(name, config::current(), body)
    }

    /// Run a declaration session against an explicit config.
    pub fn define_with<F>(name: impl Into<Cow<'static, str>>, config: Arc<Config>, body: F) -> Result<Self>
    where
        F: FnOnce(&mut Declarer<'_>) -> Result<()>,
    {
        Self::declare(name.into(), None, config, body)
    }

    /// Declare a holder whose parent's names are inert.
    pub fn derive<F>(&self, name: impl Into<Cow<'static, str>>, body: F) -> Result<Self>
    where
        F: FnOnce(&mut Declarer<'_>) -> Result<()>,
    {
        Self::declare(name.into(), Some(self), config::current(), body)
    }

    fn declare<F>(name: Cow<'static, str>, parent: Option<&Holder>, config: Arc<Config>, body: F) -> Result<Self>
    where
        F: FnOnce(&mut Declarer<'_>) -> Result<()>,
    {
        let mut session = Session {
            holder: name.clone(),
            config,
            specs: IndexMap::new(),
            declared: Vec::new(),
        };
        body(&mut Declarer {
            session: &mut session,
            scope: Scope::root(),
        })?;

        let Session { specs, declared, .. } = session;
        let mut inert = parent.map(Holder::inheritable).unwrap_or_default();
        for declared_name in specs.keys() {
            inert.shift_remove(declared_name);
        }

        catalog::commit(&name, &declared);
        Ok(Self {
            name,
            parent: parent.map(|parent| parent.name.clone()),
            specs,
            inert,
        })
    }

    fn inheritable(&self) -> IndexMap<Cow<'static, str>, Cow<'static, str>> {
        let mut inert = self.inert.clone();
        for name in self.specs.keys() {
            inert.insert(name.clone(), self.name.clone());
        }
        inert
    }

    /// Holder name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the holder this one was derived from.
    #[inline]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Check whether `name` can be invoked on this holder.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Check whether `name` was inherited and is therefore inert.
    #[inline]
    pub fn is_inert(&self, name: &str) -> bool {
        self.inert.contains_key(name)
    }

    /// Invocable names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(AsRef::as_ref)
    }

    /// Invocable specs in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &ErrorSpec> {
        self.specs.values().map(AsRef::as_ref)
    }

    /// Declared template of `name`.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] for inherited names, [`Error::Undeclared`] for
    /// unknown ones.
    pub fn spec(&self, name: &str) -> Result<&ErrorSpec> {
        self.resolve(name).map(AsRef::as_ref)
    }

    fn resolve(&self, name: &str) -> Result<&Arc<ErrorSpec>> {
        if let Some(spec) = self.specs.get(name) {
            return Ok(spec);
        }
        Err(match self.inert.get(name) {
            Some(parent) => Error::NotSupported {
                holder: self.name.clone(),
                parent: parent.clone(),
                name: Cow::Owned(name.to_owned()),
            },
            None => Error::Undeclared {
                holder: self.name.clone(),
                name: Cow::Owned(name.to_owned()),
            },
        })
    }

    /// Build a fresh value for `name` in the current locale.
    pub fn get(&self, name: &str) -> Result<ErrorValue> {
        self.get_in(name, &locale::current_locale())
    }

    /// Build a fresh value for `name` in `locale`.
    pub fn get_in(&self, name: &str, locale: &str) -> Result<ErrorValue> {
        Ok(self.resolve(name)?.instantiate(locale))
    }

    /// Build `name` in the current locale and signal it immediately.
    ///
    /// # Errors
    ///
    /// Always returns `Err`; [`Error::Business`] is the expected outcome.
    pub fn raise<T>(&self, name: &str) -> Result<T> {
        self.get(name)?.throw()
    }

    /// Build `name` in `locale` and signal it immediately.
    pub fn raise_in<T>(&self, name: &str, locale: &str) -> Result<T> {
        self.get_in(name, locale)?.throw()
    }

    /// This holder's tree in the process-wide catalog.
    pub fn lookup_tree(&self) -> Option<GroupTree> {
        catalog::lookup_tree(&self.name)
    }

    /// YAML dump of this holder's catalog entries.
    pub fn dump(&self) -> Option<String> {
        catalog::dump(&self.name)
    }
}

// ============================================================================
// Declaration Session
// ============================================================================

struct Session {
    holder: Cow<'static, str>,
    config: Arc<Config>,
    specs: IndexMap<Cow<'static, str>, Arc<ErrorSpec>>,
    declared: Vec<Arc<ErrorSpec>>,
}

impl Session {
    fn record(&mut self, spec: Arc<ErrorSpec>) {
        if let Some(previous) = self.specs.insert(spec.name.clone(), Arc::clone(&spec)) {
            tracing::warn!(
                holder = %self.holder,
                name = %spec.name,
                previous_code = previous.code,
                code = spec.code,
                "error redeclared, latest declaration wins"
            );
        }
        tracing::debug!(
            holder = %self.holder,
            name = %spec.name,
            group = %spec.group,
            code = spec.code,
            http = spec.http_status,
            "error declared"
        );
        self.declared.push(spec);
    }
}

/// Declaration handle for one scope level of a session.
pub struct Declarer<'s> {
    session: &'s mut Session,
    scope: Scope,
}

impl Declarer<'_> {
    /// Holder being declared.
    #[inline]
    pub fn holder(&self) -> &str {
        &self.session.holder
    }

    /// Current scope.
    #[inline]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Seed this scope's code cursor.
    pub fn code_start_at(&mut self, code: i64) -> &mut Self {
        self.scope.seed(code);
        self
    }

    /// Default HTTP status for this scope.
    pub fn http(&mut self, status: u16) -> &mut Self {
        self.scope.set_http(status);
        self
    }

    /// Default render format for this scope.
    pub fn format(&mut self, template: impl Into<Cow<'static, str>>) -> &mut Self {
        self.scope.set_format(template.into());
        self
    }

    /// Declare one error.
    ///
    /// Unset fields fall back to the scope: the next code from the cursor,
    /// the scope's HTTP status (else the config's), the scope's group (else
    /// `public`), the scope's format (else the config's). A missing or blank
    /// message humanizes the name.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCodeSeed`] when no code is given and the scope chain
    /// was never seeded.
    pub fn define(&mut self, def: impl Into<ErrorDef>) -> Result<Arc<ErrorSpec>> {
        let def = def.into();
        let group = def.group.clone().unwrap_or_else(|| self.scope.group_cow());
        let code = match def.code {
            Some(code) => code,
            None => self.allocate(&def.name, &group)?,
        };
        let http_status = self.resolve_http(def.http);
        let format = def
            .format
            .or_else(|| self.scope.format_cow())
            .or_else(|| self.session.config.default_format.clone());
        let message = match def.message {
            Some(message) if !message.is_blank() => message,
            _ => Message::Text(Cow::Owned(humanize(&def.name))),
        };

        let spec = Arc::new(ErrorSpec {
            name: def.name,
            message,
            code,
            http_status,
            format,
            group,
        });
        self.session.record(Arc::clone(&spec));
        Ok(spec)
    }

    /// Declare an error in the group named by its prefix.
    ///
    /// `auth_invalid_token` lands in group `auth`. Code and HTTP status are
    /// taken from the enclosing scope; a name without `_` is its own group.
    /// The prefix always decides the group: a group set on `def` is ignored.
    pub fn define_px(&mut self, def: impl Into<ErrorDef>) -> Result<Arc<ErrorSpec>> {
        let mut def = def.into();
        let group = prefix_group(&def.name);
        if def.code.is_none() {
            def.code = Some(self.allocate(&def.name, &group)?);
        }
        def.http = Some(self.resolve_http(def.http));
        def.group = Some(group);
        self.define(def)
    }

    /// Declare inside a nested group.
    ///
    /// `body` receives a declarer for the nested scope. Whatever it does,
    /// this declarer's scope is exactly the same afterwards.
    pub fn group<F>(&mut self, group: impl Into<Group>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Declarer<'_>) -> Result<()>,
    {
        let scope = self.scope.enter(&group.into());
        tracing::trace!(
            holder = %self.session.holder,
            group = scope.group_name(),
            cursor = %scope.cursor(),
            "entering group"
        );
        body(&mut Declarer {
            session: &mut *self.session,
            scope,
        })
    }

    /// Re-export a spec declared on another holder, typically the parent of
    /// a derived holder. The spec keeps its code, status and group.
    ///
    /// # Errors
    ///
    /// The lookup errors of [`Holder::spec`] on `from`.
    pub fn import(&mut self, from: &Holder, name: &str) -> Result<Arc<ErrorSpec>> {
        let spec = Arc::clone(from.resolve(name)?);
        self.session.record(Arc::clone(&spec));
        Ok(spec)
    }

    fn allocate(&mut self, name: &Cow<'static, str>, group: &Cow<'static, str>) -> Result<i64> {
        self.scope.next_code().ok_or_else(|| Error::MissingCodeSeed {
            holder: self.session.holder.clone(),
            group: group.clone(),
            name: name.clone(),
        })
    }

    fn resolve_http(&self, explicit: Option<u16>) -> u16 {
        explicit
            .or(self.scope.http_default())
            .unwrap_or(self.session.config.default_http_status)
    }
}

fn prefix_group(name: &Cow<'static, str>) -> Cow<'static, str> {
    match name.split_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => Cow::Owned(prefix.to_owned()),
        _ => name.clone(),
    }
}
