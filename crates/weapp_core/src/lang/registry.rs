//! Shareable metadata for `weapp_core::lang` registries.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.
//! - Lookups are resolved by the individual registries; this module only defines the shape.

/// Shared metadata shape for registry items.
///
/// - stable identity (`id`)
/// - accepted spellings (`canonical` + `aliases`)
/// - documentation (`description`)
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl<Id: Copy> LangItemInfo<Id> {
    /// Check whether `spelling` names this item, ignoring ASCII case.
    pub fn matches(&self, spelling: &str) -> bool {
        self.canonical.eq_ignore_ascii_case(spelling) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(spelling))
    }
}

/// Resolve a spelling against a registry table.
pub(crate) fn resolve<Id: Copy>(table: &[LangItemInfo<Id>], spelling: &str) -> Option<Id> {
    let spelling = spelling.trim();
    table.iter().find(|info| info.matches(spelling)).map(|info| info.id)
}
