//! property tests for the round-trip laws (L1, L3, L5) and the size
//! invariant (I4) against the public `Trie` API, generating random IPv4
//! prefixes and operation sequences.
//!
//! The structural invariants (I1-I3, I5) and the remaining laws (L2, L4)
//! need direct access to node internals to check, so they live in
//! `src/trie.rs`'s own `#[cfg(test)]` proptest suite instead.

use prefix_trie_rs::{
	key::Key32,
	trie::Trie,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn arb_key() -> impl Strategy<Value = Key32> {
	(any::<u32>(), 0u32..=32).prop_map(|(bits, len)| Key32::new(bits, len))
}

proptest! {
	#[test]
	fn insert_then_get_returns_the_value(k in arb_key(), v in any::<i32>()) {
		let mut t = Trie::<u32, i32>::new();
		t.insert(k, v);
		prop_assert_eq!(t.get(&k), Some(&v));
	}

	#[test]
	fn remove_after_insert_clears_the_entry(k in arb_key(), v in any::<i32>()) {
		let mut t = Trie::<u32, i32>::new();
		t.insert(k, v);
		t.remove(&k);
		prop_assert_eq!(t.get(&k), None);
	}

	#[test]
	fn size_matches_distinct_key_count(keys in vec(arb_key(), 0..30)) {
		let mut t = Trie::<u32, ()>::new();
		let mut distinct = std::collections::HashSet::new();
		for k in keys {
			t.insert(k, ());
			distinct.insert((k.content(), k.len()));
		}
		prop_assert_eq!(t.len(), distinct.len());
	}

	#[test]
	fn subtract_key_removes_overlap_but_keeps_surrounding_coverage(
		ancestor_len in 0u32..28,
		extra in 1u32..4,
		bits in any::<u32>(),
	) {
		let ancestor = Key32::new(bits, ancestor_len);
		let hole = Key32::new(bits, ancestor_len + extra);
		let mut t = Trie::<u32, i32>::new();
		t.insert(ancestor, 7);
		t.subtract_key(hole);
		prop_assert!(!t.overlaps_key(&hole) || hole.len() == 0);
		prop_assert!(t.encompasses(&Key32::new(bits, ancestor_len + extra + 1), false) || ancestor_len + extra >= 32);
	}

	#[test]
	fn merge_with_empty_is_identity(keys in vec(arb_key(), 0..20)) {
		let mut t = Trie::<u32, i32>::new();
		for (i, k) in keys.iter().enumerate() {
			t.insert(*k, i as i32);
		}
		let before: Vec<_> = collect(&t);
		let empty = Trie::<u32, i32>::new();
		t.merge_tree(&empty);
		let after: Vec<_> = collect(&t);
		prop_assert_eq!(before, after);
	}

	#[test]
	fn intersect_with_self_is_identity(keys in vec(arb_key(), 0..20)) {
		let mut t = Trie::<u32, i32>::new();
		for (i, k) in keys.iter().enumerate() {
			t.insert(*k, i as i32);
		}
		let clone = t.clone();
		let before: Vec<_> = collect(&t);
		t.intersect_tree(&clone);
		let after: Vec<_> = collect(&t);
		prop_assert_eq!(before, after);
	}
}

fn collect<V: Clone>(t: &Trie<u32, V>) -> Vec<(u32, u32, V)> {
	let mut out = Vec::new();
	t.for_each_entry(|k, v| out.push((k.content(), k.len(), v.clone())));
	out
}
