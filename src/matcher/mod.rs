//! Pattern derivation and tiered match classification.
//!
//! - `pattern`: derive the prefix/suffix target from a full address
//! - `tier`: classify a candidate address against the target, first-match-wins

mod pattern;
mod tier;

pub use pattern::{search_space, InvalidTarget, TargetPattern, ADDRESS_HEX_LEN, PREFIX_LEN, SUFFIX_LEN};
pub use tier::{classify, MatchTier, PartialTier, PARTIAL_LADDER};
