//! [`PrefixSet`], the immutable snapshot of a [`crate::PrefixSetBuilder`]
//!
//! Grounded on the teacher's `set.rs`: a thin wrapper around the map type
//! specialised to `V = ()`, matching `Set`'s relationship to `Map` there.

use cidr::IpCidr;

use crate::{
	iter::SetIter,
	map::PrefixMap,
};

/// Immutable, cheaply cloneable snapshot of a prefix set.
///
/// Produced by [`crate::PrefixSetBuilder::freeze`].
#[derive(Clone, Default)]
pub struct PrefixSet {
	pub(crate) inner: PrefixMap<()>,
}

impl PrefixSet {
	/// Number of members across both address families.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Whether the set has no members at all.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Whether `cidr` is itself a member.
	pub fn contains(&self, cidr: IpCidr) -> bool {
		self.inner.contains(cidr)
	}

	/// Whether some member's key is a (non-strict, unless `strict`) prefix of
	/// `cidr`.
	pub fn encompasses(&self, cidr: IpCidr, strict: bool) -> bool {
		self.inner.encompasses(cidr, strict)
	}

	/// The shortest member that is an ancestor of `cidr` (non-strict unless
	/// `strict`).
	pub fn root_of(&self, cidr: IpCidr, strict: bool) -> Option<IpCidr> {
		self.inner.root_of(cidr, strict).map(|(k, ())| k)
	}

	/// The longest (most specific) member that is an ancestor of `cidr`
	/// (non-strict unless `strict`).
	pub fn parent_of(&self, cidr: IpCidr, strict: bool) -> Option<IpCidr> {
		self.inner.parent_of(cidr, strict).map(|(k, ())| k)
	}

	/// Whether some member's key is a prefix of `cidr`, or `cidr` is a prefix
	/// of some member's key.
	pub fn overlaps(&self, cidr: IpCidr) -> bool {
		self.inner.overlaps(cidr)
	}

	/// A fresh set containing every member that is a descendant of `cidr`,
	/// including `cidr` itself unless `strict`.
	pub fn descendants_of(&self, cidr: IpCidr, strict: bool) -> Self {
		Self {
			inner: self.inner.descendants_of(cidr, strict),
		}
	}

	/// A fresh set containing every member that is an ancestor of `cidr`
	/// (non-strict unless `strict`).
	pub fn ancestors_of(&self, cidr: IpCidr, strict: bool) -> Self {
		Self {
			inner: self.inner.ancestors_of(cidr, strict),
		}
	}

	/// Iterate over every `IpCidr` member, IPv4 before IPv6, in ascending
	/// left-to-right trie order.
	pub fn iter(&self) -> SetIter<'_> {
		SetIter::new(&self.inner.v4, &self.inner.v6)
	}
}

impl core::fmt::Debug for PrefixSet {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<'a> IntoIterator for &'a PrefixSet {
	type IntoIter = SetIter<'a>;
	type Item = IpCidr;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
