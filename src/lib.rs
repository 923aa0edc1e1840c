//! immutable prefix map and prefix set over a compressed binary radix trie
//!
//! The core of this crate is a generic radix trie ([`trie::Trie`]) keyed by
//! fixed-width bit strings with path compression. Two independent
//! instantiations back the public types: one over 32-bit keys for IPv4, one
//! over 128-bit keys for IPv6. [`PrefixMap`] and [`PrefixSet`] dispatch
//! between the two tries by address family and never let them interact.
//!
//! Both public types are produced by a mutable builder
//! ([`PrefixMapBuilder`] / [`PrefixSetBuilder`]) that is frozen into an
//! immutable, cheaply cloneable snapshot safe to share between readers
//! without locking.
#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/prefix-trie-rs/0.1.0")]

pub mod builder;
pub mod error;
mod family;
pub mod iter;
pub mod key;
pub mod map;
pub mod node;
pub mod set;
pub mod trie;
mod walk;

pub use crate::{
	builder::{
		PrefixMapBuilder,
		PrefixSetBuilder,
	},
	error::PrefixError,
	family::Family,
	map::PrefixMap,
	set::PrefixSet,
};
