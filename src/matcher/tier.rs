//! Tiered match classification.
//!
//! A candidate either matches the full prefix+suffix target, one of the
//! named partial tiers, or nothing. The partial ladder is an explicit ordered
//! list evaluated first-match-wins; the ordering is a behavioral contract
//! that downstream log consumers depend on, so it must not be reordered even
//! where a later tier is shadowed by an earlier one.

use super::pattern::TargetPattern;

/// One partial tier: how many characters of the configured prefix (from the
/// start) and suffix (from the end) must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialTier {
    pub label: &'static str,
    prefix_take: usize,
    suffix_take: usize,
}

impl PartialTier {
    const fn new(label: &'static str, prefix_take: usize, suffix_take: usize) -> Self {
        Self {
            label,
            prefix_take,
            suffix_take,
        }
    }

    /// Whether this tier holds for the given address.
    fn holds(&self, address: &str, pattern: &TargetPattern) -> bool {
        let prefix = &pattern.prefix()[..self.prefix_take];
        let suffix = &pattern.suffix()[pattern.suffix().len() - self.suffix_take..];
        address.starts_with(prefix) && address.ends_with(suffix)
    }
}

/// The partial-match ladder, strongest first.
///
/// "Last 4 Only" precedes the weaker suffix combinations, so an address whose
/// full suffix matches always reports as "Last 4 Only" even when
/// "First 2 + Last 4" or "First 1 + Last 4" would also hold.
pub const PARTIAL_LADDER: &[PartialTier] = &[
    PartialTier::new("First 3 Only", 3, 0),
    PartialTier::new("Last 4 Only", 0, 4),
    PartialTier::new("First 2 + Last 2", 2, 2),
    PartialTier::new("First 2 + Last 3", 2, 3),
    PartialTier::new("First 3 + Last 2", 3, 2),
    PartialTier::new("First 2 + Last 4", 2, 4),
    PartialTier::new("First 1 + Last 4", 1, 4),
];

/// Mutually exclusive classification of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Full prefix and full suffix both match.
    Full,
    /// Exactly one ladder tier, the highest-priority one that holds.
    Partial(&'static PartialTier),
    /// Nothing matched; the candidate is not reported.
    None,
}

impl MatchTier {
    /// Tier label as persisted in the match log.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            MatchTier::Full => Some("FULL"),
            MatchTier::Partial(tier) => Some(tier.label),
            MatchTier::None => None,
        }
    }
}

/// Classifies an address against a target pattern.
///
/// Pure function, safe to call concurrently. `address` must be lowercase hex
/// without the 0x prefix. A full match is checked first and suppresses all
/// partial reporting for that candidate.
pub fn classify(address: &str, pattern: &TargetPattern) -> MatchTier {
    if address.starts_with(pattern.prefix()) && address.ends_with(pattern.suffix()) {
        return MatchTier::Full;
    }

    for tier in PARTIAL_LADDER {
        if tier.holds(address, pattern) {
            return MatchTier::Partial(tier);
        }
    }

    MatchTier::None
}
