//! mutable construction API (§4.10)
//!
//! [`PrefixMapBuilder<V>`] owns one [`Trie<u32, V>`] and one [`Trie<u128, V>`]
//! and dispatches every call to the matching trie by [`Family`]. It is the
//! only place in the crate that mutates a trie; [`PrefixMap`]/[`PrefixSet`]
//! are read-only snapshots produced by [`PrefixMapBuilder::freeze`].
//!
//! Grounded on the teacher's `Map`/`Set` being thin façades in front of
//! `Tree<TP>` (`map.rs`/`set.rs`), generalized here to own two tries instead
//! of one and to expose a builder/snapshot split the teacher's single
//! always-mutable `Tree` doesn't need.

use std::{
	net::{
		Ipv4Addr,
		Ipv6Addr,
	},
	sync::Arc,
};

use cidr::IpCidr;

use crate::{
	error::PrefixError,
	family::{
		self,
		Family,
	},
	key::{
		Key128,
		Key32,
	},
	map::PrefixMap,
	set::PrefixSet,
	trie::Trie,
};

/// Mutable builder for a [`PrefixMap<V>`].
///
/// Single-threaded: every method here takes `&mut self`. Call [`Self::freeze`]
/// once construction is done to publish a read-only, cheaply cloneable
/// snapshot.
pub struct PrefixMapBuilder<V> {
	pub(crate) v4: Trie<u32, V>,
	pub(crate) v6: Trie<u128, V>,
}

impl<V> PrefixMapBuilder<V> {
	/// An empty builder.
	pub fn new() -> Self {
		Self {
			v4: Trie::new(),
			v6: Trie::new(),
		}
	}

	/// Insert `v` at `cidr`, replacing and returning any previous value.
	pub fn insert(&mut self, cidr: IpCidr, v: V) -> Option<V> {
		match cidr {
			IpCidr::V4(c) => self.v4.insert(family::pack_v4(c), v),
			IpCidr::V6(c) => self.v6.insert(family::pack_v6(c), v),
		}
	}

	/// Insert `v` at the IPv4 prefix `addr/len`.
	///
	/// Fails if `len` does not fit a 32-bit key; unlike [`Self::insert`],
	/// which takes an already-validated `cidr::Ipv4Cidr`, this accepts a raw
	/// address and length pair.
	pub fn insert_v4(&mut self, addr: Ipv4Addr, len: u32, v: V) -> Result<Option<V>, PrefixError> {
		if len > 32 {
			return Err(PrefixError::PrefixLengthOverflow { family: Family::V4, len });
		}
		let bits = u32::from_be_bytes(addr.octets());
		Ok(self.v4.insert(Key32::new(bits, len), v))
	}

	/// Insert `v` at the IPv6 prefix `addr/len`.
	///
	/// Fails if `len` does not fit a 128-bit key.
	pub fn insert_v6(&mut self, addr: Ipv6Addr, len: u32, v: V) -> Result<Option<V>, PrefixError> {
		if len > 128 {
			return Err(PrefixError::PrefixLengthOverflow { family: Family::V6, len });
		}
		let bits = u128::from_be_bytes(addr.octets());
		Ok(self.v6.insert(Key128::new(bits, len), v))
	}

	/// Insert without compressing; see [`Trie::insert_lazy`]. Pair with
	/// [`Self::compress`] once bulk insertion is done.
	pub fn insert_lazy(&mut self, cidr: IpCidr, v: V) -> Option<V> {
		match cidr {
			IpCidr::V4(c) => self.v4.insert_lazy(family::pack_v4(c), v),
			IpCidr::V6(c) => self.v6.insert_lazy(family::pack_v6(c), v),
		}
	}

	/// Collapse degenerate nodes left behind by [`Self::insert_lazy`] in both
	/// tries.
	pub fn compress(&mut self) {
		self.v4.compress();
		self.v6.compress();
	}

	/// Remove the entry at `cidr`, if any, returning its value.
	pub fn remove(&mut self, cidr: IpCidr) -> Option<V> {
		match cidr {
			IpCidr::V4(c) => self.v4.remove(&family::pack_v4(c)),
			IpCidr::V6(c) => self.v6.remove(&family::pack_v6(c)),
		}
	}

	/// Remove `cidr` and all of its descendants, synthesising sibling holes
	/// to preserve surrounding coverage; see [`Trie::subtract_key`].
	pub fn subtract_key(&mut self, cidr: IpCidr)
	where
		V: Clone,
	{
		match cidr {
			IpCidr::V4(c) => self.v4.subtract_key(family::pack_v4(c)),
			IpCidr::V6(c) => self.v6.subtract_key(family::pack_v6(c)),
		}
	}

	/// Remove every key present in `other` from `self`, with hole synthesis.
	///
	/// Values removed are whichever `self` already held; `other`'s values are
	/// never consulted, only its keys.
	pub fn subtract_tree(&mut self, other: &Self)
	where
		V: Clone,
	{
		self.v4.subtract_tree(&other.v4);
		self.v6.subtract_tree(&other.v6);
	}

	/// Import every entry of `other` whose key `self` doesn't already have an
	/// entry for.
	pub fn merge_tree(&mut self, other: &Self)
	where
		V: Clone,
	{
		self.v4.merge_tree(&other.v4);
		self.v6.merge_tree(&other.v6);
	}

	/// Keep exactly the entries shared with, or encompassed by, `other`.
	pub fn intersect_tree(&mut self, other: &Self)
	where
		V: Clone,
	{
		self.v4.intersect_tree(&other.v4);
		self.v6.intersect_tree(&other.v6);
	}

	/// Keep exactly the entries encompassed by some entry of `other`.
	pub fn filter(&mut self, other: &Self) {
		self.v4.filter(&other.v4);
		self.v6.filter(&other.v6);
	}

	/// Publish a read-only snapshot: a deep copy of both tries wrapped in
	/// `Arc`, cheaply cloneable and shareable across threads without
	/// locking.
	pub fn freeze(&self) -> PrefixMap<V>
	where
		V: Clone,
	{
		PrefixMap {
			v4: Arc::new(self.v4.clone()),
			v6: Arc::new(self.v6.clone()),
		}
	}
}

impl<V> Default for PrefixMapBuilder<V> {
	fn default() -> Self {
		Self::new()
	}
}

/// Mutable builder for a [`PrefixSet`].
///
/// A thin wrapper around [`PrefixMapBuilder<()>`], matching the teacher's
/// `Set` being a zero-value `Map`.
pub struct PrefixSetBuilder {
	inner: PrefixMapBuilder<()>,
}

impl PrefixSetBuilder {
	/// An empty builder.
	pub fn new() -> Self {
		Self {
			inner: PrefixMapBuilder::new(),
		}
	}

	/// Insert `cidr`, returning whether it was already present.
	pub fn insert(&mut self, cidr: IpCidr) -> bool {
		self.inner.insert(cidr, ()).is_some()
	}

	/// Insert the IPv4 prefix `addr/len`.
	pub fn insert_v4(&mut self, addr: Ipv4Addr, len: u32) -> Result<bool, PrefixError> {
		self.inner.insert_v4(addr, len, ()).map(|old| old.is_some())
	}

	/// Insert the IPv6 prefix `addr/len`.
	pub fn insert_v6(&mut self, addr: Ipv6Addr, len: u32) -> Result<bool, PrefixError> {
		self.inner.insert_v6(addr, len, ()).map(|old| old.is_some())
	}

	/// Insert without compressing; pair with [`Self::compress`].
	pub fn insert_lazy(&mut self, cidr: IpCidr) -> bool {
		self.inner.insert_lazy(cidr, ()).is_some()
	}

	/// Collapse degenerate nodes left behind by [`Self::insert_lazy`].
	pub fn compress(&mut self) {
		self.inner.compress();
	}

	/// Remove `cidr`, returning whether it was present.
	pub fn remove(&mut self, cidr: IpCidr) -> bool {
		self.inner.remove(cidr).is_some()
	}

	/// Remove `cidr` and all of its descendants, synthesising sibling holes.
	pub fn subtract_key(&mut self, cidr: IpCidr) {
		self.inner.subtract_key(cidr);
	}

	/// Remove every member of `other` from `self`, with hole synthesis.
	pub fn subtract_tree(&mut self, other: &Self) {
		self.inner.subtract_tree(&other.inner);
	}

	/// Union: add every member of `other` to `self`.
	pub fn merge_tree(&mut self, other: &Self) {
		self.inner.merge_tree(&other.inner);
	}

	/// Intersection: keep exactly the members shared with, or encompassed
	/// by, `other`.
	pub fn intersect_tree(&mut self, other: &Self) {
		self.inner.intersect_tree(&other.inner);
	}

	/// Keep exactly the members encompassed by some member of `other`.
	pub fn filter(&mut self, other: &Self) {
		self.inner.filter(&other.inner);
	}

	/// Publish a read-only snapshot.
	pub fn freeze(&self) -> PrefixSet {
		PrefixSet { inner: self.inner.freeze() }
	}
}

impl Default for PrefixSetBuilder {
	fn default() -> Self {
		Self::new()
	}
}
