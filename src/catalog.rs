//! Process-wide catalog of every declared error.
//!
//! The catalog maps each holder to its groups, and each group to the ordered
//! list of specs declared under it:
//!
//! ```text
//! holder -> group -> [ErrorSpec, ...]
//! ```
//!
//! It is append-only and lives for the whole process. Declaration sessions
//! write to it once, when they complete successfully; everything afterwards
//! only reads. Redeclaring a name appends a second entry here while the
//! holder's invocation lookup keeps only the latest one.
//!
//! # Export
//!
//! [`dump`] and [`dump_all`] render the catalog as a YAML document for
//! human inspection. Keys are written bare: any leading `:` marker is
//! stripped, and scalars that YAML would misread are double-quoted.
//!
//! ```text
//! ---
//! Auth:
//!   auth:
//!   - name: invalid_token
//!     msg: Invalid token
//!     code: 100
//!     http: 401
//! ```
//!
//! The dump is documentation, not a machine contract. Tooling should
//! serialize [`CatalogStore`] with serde instead.

use crate::definition::{ErrorSpec, Message};
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard};

/// Groups of one holder, in declaration order.
pub type GroupTree = IndexMap<Cow<'static, str>, Vec<Arc<ErrorSpec>>>;

/// Holder → group → specs.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CatalogStore {
    trees: IndexMap<Cow<'static, str>, GroupTree>,
}

impl CatalogStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `spec` to `holder`'s `group`, creating both on demand.
    pub fn register(
        &mut self,
        holder: impl Into<Cow<'static, str>>,
        group: impl Into<Cow<'static, str>>,
        spec: Arc<ErrorSpec>,
    ) {
        self.trees
            .entry(holder.into())
            .or_default()
            .entry(group.into())
            .or_default()
            .push(spec);
    }

    /// Full group tree of one holder.
    pub fn lookup_tree(&self, holder: &str) -> Option<&GroupTree> {
        self.trees.get(holder)
    }

    /// Every holder's tree.
    pub fn all(&self) -> &IndexMap<Cow<'static, str>, GroupTree> {
        &self.trees
    }

    /// Registered holder names.
    pub fn holders(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(AsRef::as_ref)
    }

    /// Number of catalog entries, duplicates included.
    pub fn len(&self) -> usize {
        self.trees
            .values()
            .flat_map(IndexMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Check for an empty catalog.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// YAML dump of one holder's groups.
    pub fn dump(&self, holder: &str) -> Option<String> {
        let tree = self.lookup_tree(holder)?;
        let mut out = String::from("---\n");
        write_groups(&mut out, tree, 0).ok()?;
        Some(out)
    }

    /// YAML dump of every holder.
    pub fn dump_all(&self) -> Option<String> {
        let mut out = String::from("---\n");
        write_holders(&mut out, &self.trees).ok()?;
        Some(out)
    }
}

/// Strip the leading `:` marker symbol-style keys carry.
pub fn normalize_key(key: &str) -> &str {
    key.trim_start_matches(':')
}

fn write_holders(
    out: &mut impl fmt::Write,
    trees: &IndexMap<Cow<'static, str>, GroupTree>,
) -> fmt::Result {
    if trees.is_empty() {
        return out.write_str("{}\n");
    }
    for (holder, tree) in trees {
        writeln!(out, "{}:", YamlScalar(normalize_key(holder)))?;
        write_groups(out, tree, 2)?;
    }
    Ok(())
}

fn write_groups(out: &mut impl fmt::Write, tree: &GroupTree, indent: usize) -> fmt::Result {
    let pad = " ".repeat(indent);
    for (group, specs) in tree {
        let group = YamlScalar(normalize_key(group));
        if specs.is_empty() {
            writeln!(out, "{pad}{group}: []")?;
            continue;
        }
        writeln!(out, "{pad}{group}:")?;
        for spec in specs {
            writeln!(out, "{pad}- name: {}", YamlScalar(normalize_key(spec.name())))?;
            match spec.message() {
                Message::Text(text) => writeln!(out, "{pad}  msg: {}", YamlScalar(text))?,
                Message::Localized(entries) => {
                    writeln!(out, "{pad}  msg:")?;
                    for (locale, text) in entries {
                        writeln!(
                            out,
                            "{pad}    {}: {}",
                            YamlScalar(normalize_key(locale)),
                            YamlScalar(text)
                        )?;
                    }
                }
            }
            writeln!(out, "{pad}  code: {}", spec.code())?;
            writeln!(out, "{pad}  http: {}", spec.http_status())?;
            if let Some(format) = spec.format() {
                writeln!(out, "{pad}  format: {}", YamlScalar(format))?;
            }
        }
    }
    Ok(())
}

/// A YAML plain scalar, double-quoted when YAML would misread it.
struct YamlScalar<'a>(&'a str);

impl YamlScalar<'_> {
    fn needs_quotes(&self) -> bool {
        const INDICATORS: [char; 19] = [
            '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
            '@', '`',
        ];
        let s = self.0;
        s.is_empty()
            || s != s.trim()
            || s.starts_with(INDICATORS)
            || s.contains(": ")
            || s.contains(" #")
            || s.ends_with(':')
            || s.chars().any(char::is_control)
            || matches!(
                s.to_ascii_lowercase().as_str(),
                "~" | "null" | "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n"
            )
            || s.parse::<f64>().is_ok()
    }
}

impl fmt::Display for YamlScalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_quotes() {
            // JSON strings are valid YAML double-quoted scalars.
            let quoted = serde_json::to_string(self.0).map_err(|_| fmt::Error)?;
            f.write_str(&quoted)
        } else {
            f.write_str(self.0)
        }
    }
}

// ============================================================================
// Process-wide Store
// ============================================================================

static CATALOG: LazyLock<RwLock<CatalogStore>> = LazyLock::new(|| RwLock::new(CatalogStore::new()));

/// Read access to the process-wide catalog.
pub fn global() -> RwLockReadGuard<'static, CatalogStore> {
    CATALOG.read().unwrap_or_else(PoisonError::into_inner)
}

/// Record a completed declaration session.
pub(crate) fn commit(holder: &Cow<'static, str>, specs: &[Arc<ErrorSpec>]) {
    let mut store = CATALOG.write().unwrap_or_else(PoisonError::into_inner);
    for spec in specs {
        store.register(holder.clone(), spec.group.clone(), Arc::clone(spec));
    }
    tracing::debug!(holder = %holder, declared = specs.len(), "catalog updated");
}

/// Snapshot of one holder's tree.
pub fn lookup_tree(holder: &str) -> Option<GroupTree> {
    global().lookup_tree(holder).cloned()
}

/// Snapshot of the whole catalog.
pub fn all() -> CatalogStore {
    global().clone()
}

/// YAML dump of one holder from the process-wide catalog.
pub fn dump(holder: &str) -> Option<String> {
    global().dump(holder)
}

/// YAML dump of the whole process-wide catalog.
pub fn dump_all() -> Option<String> {
    global().dump_all()
}
