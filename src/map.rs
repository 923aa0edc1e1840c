//! [`PrefixMap`], the immutable snapshot of a [`crate::PrefixMapBuilder`]
//!
//! Grounded on the teacher's `map.rs`: a thin façade delegating every
//! operation to the tree underneath. Here there are two trees (one per
//! address family, per §3) behind a single handle, and the handle is an
//! `Arc`-wrapped read-only snapshot rather than the teacher's always-mutable
//! `Tree`.

use std::sync::Arc;

use cidr::IpCidr;

use crate::{
	family,
	iter::Iter,
	trie::Trie,
};

/// Immutable, cheaply cloneable snapshot of a prefix-to-value map.
///
/// Produced by [`crate::PrefixMapBuilder::freeze`]. Cloning is O(1) (an
/// `Arc` bump); the underlying tree is shared and never mutated, so a
/// `PrefixMap<V>` is `Send + Sync` whenever `V: Sync`.
pub struct PrefixMap<V> {
	pub(crate) v4: Arc<Trie<u32, V>>,
	pub(crate) v6: Arc<Trie<u128, V>>,
}

impl<V> PrefixMap<V> {
	/// Number of entries across both address families.
	pub fn len(&self) -> usize {
		self.v4.len() + self.v6.len()
	}

	/// Whether the map has no entries at all.
	pub fn is_empty(&self) -> bool {
		self.v4.is_empty() && self.v6.is_empty()
	}

	/// Exact lookup: the value at `cidr`, if `cidr` is itself an entry.
	pub fn get(&self, cidr: IpCidr) -> Option<&V> {
		match cidr {
			IpCidr::V4(c) => self.v4.get(&family::pack_v4(c)),
			IpCidr::V6(c) => self.v6.get(&family::pack_v6(c)),
		}
	}

	/// Whether `cidr` is itself an entry.
	pub fn contains(&self, cidr: IpCidr) -> bool {
		self.get(cidr).is_some()
	}

	/// Whether some entry's key is a (non-strict, unless `strict`) prefix of
	/// `cidr`.
	pub fn encompasses(&self, cidr: IpCidr, strict: bool) -> bool {
		match cidr {
			IpCidr::V4(c) => self.v4.encompasses(&family::pack_v4(c), strict),
			IpCidr::V6(c) => self.v6.encompasses(&family::pack_v6(c), strict),
		}
	}

	/// The shortest entry-bearing ancestor of `cidr` (non-strict unless
	/// `strict`).
	pub fn root_of(&self, cidr: IpCidr, strict: bool) -> Option<(IpCidr, &V)> {
		match cidr {
			IpCidr::V4(c) => self
				.v4
				.root_of(&family::pack_v4(c), strict)
				.map(|(k, v)| (IpCidr::V4(family::unpack_v4(k)), v)),
			IpCidr::V6(c) => self
				.v6
				.root_of(&family::pack_v6(c), strict)
				.map(|(k, v)| (IpCidr::V6(family::unpack_v6(k)), v)),
		}
	}

	/// The longest (most specific) entry-bearing ancestor of `cidr`
	/// (non-strict unless `strict`).
	pub fn parent_of(&self, cidr: IpCidr, strict: bool) -> Option<(IpCidr, &V)> {
		match cidr {
			IpCidr::V4(c) => self
				.v4
				.parent_of(&family::pack_v4(c), strict)
				.map(|(k, v)| (IpCidr::V4(family::unpack_v4(k)), v)),
			IpCidr::V6(c) => self
				.v6
				.parent_of(&family::pack_v6(c), strict)
				.map(|(k, v)| (IpCidr::V6(family::unpack_v6(k)), v)),
		}
	}

	/// Whether some entry's key is a prefix of `cidr`, or `cidr` is a prefix
	/// of some entry's key.
	pub fn overlaps(&self, cidr: IpCidr) -> bool {
		match cidr {
			IpCidr::V4(c) => self.v4.overlaps_key(&family::pack_v4(c)),
			IpCidr::V6(c) => self.v6.overlaps_key(&family::pack_v6(c)),
		}
	}

	/// A fresh map containing every entry-bearing descendant of `cidr`,
	/// including `cidr` itself unless `strict`.
	pub fn descendants_of(&self, cidr: IpCidr, strict: bool) -> Self
	where
		V: Clone,
	{
		match cidr {
			IpCidr::V4(c) => Self {
				v4: Arc::new(self.v4.descendants_of(&family::pack_v4(c), strict)),
				v6: Arc::new(Trie::new()),
			},
			IpCidr::V6(c) => Self {
				v4: Arc::new(Trie::new()),
				v6: Arc::new(self.v6.descendants_of(&family::pack_v6(c), strict)),
			},
		}
	}

	/// A fresh map containing every entry-bearing ancestor of `cidr`
	/// (non-strict unless `strict`).
	pub fn ancestors_of(&self, cidr: IpCidr, strict: bool) -> Self
	where
		V: Clone,
	{
		match cidr {
			IpCidr::V4(c) => Self {
				v4: Arc::new(self.v4.ancestors_of(&family::pack_v4(c), strict)),
				v6: Arc::new(Trie::new()),
			},
			IpCidr::V6(c) => Self {
				v4: Arc::new(Trie::new()),
				v6: Arc::new(self.v6.ancestors_of(&family::pack_v6(c), strict)),
			},
		}
	}

	/// Iterate over every `(IpCidr, &V)` entry, IPv4 before IPv6, in
	/// ascending left-to-right trie order.
	pub fn iter(&self) -> Iter<'_, V> {
		Iter::new(&self.v4, &self.v6)
	}
}

impl<V> Clone for PrefixMap<V> {
	fn clone(&self) -> Self {
		Self {
			v4: Arc::clone(&self.v4),
			v6: Arc::clone(&self.v6),
		}
	}
}

impl<V> Default for PrefixMap<V> {
	fn default() -> Self {
		Self {
			v4: Arc::new(Trie::new()),
			v6: Arc::new(Trie::new()),
		}
	}
}

impl<V> core::fmt::Debug for PrefixMap<V>
where
	V: core::fmt::Debug,
{
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<'a, V> IntoIterator for &'a PrefixMap<V> {
	type IntoIter = Iter<'a, V>;
	type Item = (IpCidr, &'a V);

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
