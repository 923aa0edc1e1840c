//! address-family dispatch between the IPv4 and IPv6 tries (§4.9)
//!
//! Grounded on the teacher's `map.rs`/`set.rs`, which are generic over a
//! single `BitString` key type and so never need this dispatch; here
//! [`crate::PrefixMap`]/[`crate::PrefixSet`] own *two* tries (one per
//! family) and this module is the only place that converts between
//! `cidr`'s address types and this crate's [`crate::key::Key32`] /
//! [`crate::key::Key128`].

use std::net::{
	Ipv4Addr,
	Ipv6Addr,
};

use cidr::{
	IpCidr,
	Ipv4Cidr,
	Ipv6Cidr,
};

use crate::key::{
	Key128,
	Key32,
};

/// Which of the two underlying tries a prefix belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
	/// IPv4: backed by [`Key32`].
	V4,
	/// IPv6: backed by [`Key128`].
	V6,
}

impl Family {
	/// Which family `cidr` belongs to.
	pub fn of(cidr: &IpCidr) -> Self {
		match cidr {
			IpCidr::V4(_) => Self::V4,
			IpCidr::V6(_) => Self::V6,
		}
	}
}

impl core::fmt::Display for Family {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(match self {
			Self::V4 => "IPv4",
			Self::V6 => "IPv6",
		})
	}
}

/// Pack an IPv4 prefix into a [`Key32`], normalizing any set host bits away.
pub fn pack_v4(cidr: Ipv4Cidr) -> Key32 {
	let bits = u32::from_be_bytes(cidr.first_address().octets());
	Key32::new(bits, u32::from(cidr.network_length()))
}

/// Pack an IPv6 prefix into a [`Key128`], normalizing any set host bits away.
pub fn pack_v6(cidr: Ipv6Cidr) -> Key128 {
	let bits = u128::from_be_bytes(cidr.first_address().octets());
	Key128::new(bits, u32::from(cidr.network_length()))
}

/// Inverse of [`pack_v4`].
pub fn unpack_v4(key: Key32) -> Ipv4Cidr {
	let addr = Ipv4Addr::from(key.content().to_be_bytes());
	Ipv4Cidr::new(addr, key.len() as u8).expect("key length always fits a 32-bit prefix")
}

/// Inverse of [`pack_v6`].
pub fn unpack_v6(key: Key128) -> Ipv6Cidr {
	let addr = Ipv6Addr::from(key.content().to_be_bytes());
	Ipv6Cidr::new(addr, key.len() as u8).expect("key length always fits a 128-bit prefix")
}
