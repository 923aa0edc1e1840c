//! the façade's error surface (§7)
//!
//! The trie core cannot fail: every operation it exposes accepts a
//! structurally valid [`crate::key::Key`]. The one boundary failure is a
//! caller handing a prefix to a family-specific entry point (one typed for
//! IPv4 or IPv6 specifically) whose length doesn't fit that family's key
//! width. Hand-rolled rather than `thiserror`-derived, matching the small,
//! dependency-free enums the teacher writes for its own internal errors
//! (e.g. `InsertPosition`, `WalkedDirection` in `tree/mod.rs`).

use core::fmt;

use crate::family::Family;

/// Error returned by the family-specific entry points of
/// [`crate::PrefixMapBuilder`]/[`crate::PrefixSetBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixError {
	/// The prefix length does not fit the given address family's key width.
	PrefixLengthOverflow {
		/// Address family the prefix was being packed for.
		family: Family,
		/// The offending prefix length, in bits.
		len: u32,
	},
}

impl fmt::Display for PrefixError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::PrefixLengthOverflow { family, len } => {
				write!(f, "prefix length {len} does not fit a {family} key")
			},
		}
	}
}

impl std::error::Error for PrefixError {}
