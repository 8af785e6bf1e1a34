//! Variant lookup policy.

use std::collections::BTreeMap;

use crate::part::PartVariant;

/// How a requested variant code is resolved against a category's parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Only an exact variant code is accepted.
    Exact,
    /// An exact code wins; otherwise the closest code sharing the first
    /// character is used (see [`closest_variant`]).
    #[default]
    PrefixFallback,
}

/// The variant a request resolved to.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub variant: &'a PartVariant,
    pub fallback: bool,
}

pub fn resolve<'a>(
    variants: &'a BTreeMap<String, PartVariant>,
    code: &str,
    policy: MatchPolicy,
) -> Option<Resolved<'a>> {
    if let Some(variant) = variants.get(code) {
        return Some(Resolved {
            variant,
            fallback: false,
        });
    }
    match policy {
        MatchPolicy::Exact => None,
        MatchPolicy::PrefixFallback => closest_variant(variants, code).map(|variant| Resolved {
            variant,
            fallback: true,
        }),
    }
}

/// Among variants whose code starts with the first character of `code`,
/// returns the one with the shortest name.
///
/// Ties go to the lexicographically smallest code. An empty `code` matches
/// nothing.
pub fn closest_variant<'a>(
    variants: &'a BTreeMap<String, PartVariant>,
    code: &str,
) -> Option<&'a PartVariant> {
    let first = code.chars().next()?;
    // BTreeMap iterates in code order, so min_by_key keeps the smallest code on ties.
    variants
        .values()
        .filter(|v| v.code.starts_with(first))
        .min_by_key(|v| v.name.len())
}
