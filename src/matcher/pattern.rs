//! Target pattern derivation from a full address.

/// Hex characters of the target prefix kept for matching.
pub const PREFIX_LEN: usize = 3;
/// Hex characters of the target suffix kept for matching.
pub const SUFFIX_LEN: usize = 4;
/// Hex length of a full Ethereum address without the 0x prefix.
pub const ADDRESS_HEX_LEN: usize = 40;

/// A malformed target address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTarget {
    #[error("target address must be {ADDRESS_HEX_LEN} hex characters, got {0}")]
    BadLength(usize),
    #[error("target address contains non-hex characters")]
    BadCharset,
}

/// The prefix/suffix pair a run searches for.
///
/// Derived once from a user-supplied full address: the first [`PREFIX_LEN`]
/// and last [`SUFFIX_LEN`] hex characters, lowercased. The two are always set
/// together; a pattern cannot exist with only one side configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPattern {
    prefix: String,
    suffix: String,
}

impl TargetPattern {
    /// Derives a pattern from a full address (`0x` prefix optional).
    pub fn from_address(address: &str) -> Result<Self, InvalidTarget> {
        let trimmed = address.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex_part.len() != ADDRESS_HEX_LEN {
            return Err(InvalidTarget::BadLength(hex_part.len()));
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidTarget::BadCharset);
        }

        let normalized = hex_part.to_lowercase();
        Ok(Self {
            prefix: normalized[..PREFIX_LEN].to_string(),
            suffix: normalized[ADDRESS_HEX_LEN - SUFFIX_LEN..].to_string(),
        })
    }

    /// Returns the target prefix (first [`PREFIX_LEN`] chars, lowercase).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the target suffix (last [`SUFFIX_LEN`] chars, lowercase).
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// Total hex combinations over the matched prefix+suffix positions.
///
/// Used as the expected number of candidates for ETA estimation, treating
/// the space as purely random over those positions.
pub fn search_space() -> u64 {
    16u64.saturating_pow((PREFIX_LEN + SUFFIX_LEN) as u32)
}
