//! Shared metadata types for the vocabulary registries.

/// Generic metadata entry used by the smaller registries (magic methods, builtin types).
///
/// ## Notes
/// - `canonical` is the only accepted spelling; the language has no aliases.
/// - `description` is a short human-readable summary used by tooling output.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub description: &'static str,
}

/// Build a [`LangItemInfo`] in a `const` table.
pub const fn item<Id>(id: Id, canonical: &'static str, description: &'static str) -> LangItemInfo<Id> {
    LangItemInfo {
        id,
        canonical,
        description,
    }
}
