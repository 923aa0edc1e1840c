//! the generic compressed radix trie (§3, §4.2, §4.4–§4.7)
//!
//! `Trie<B, V>` owns a single root [`Node`] (the all-zero, zero-length key)
//! and a cached entry count. Every operation below is either a direct
//! compressed descent/splice (insertion, removal, point queries — grounded
//! on the teacher's `Node::insert_leaf_value` branch-or-split decision tree
//! in `tree/mod.rs`) or composes on [`crate::walk::walk`], the single
//! traversal primitive from §4.3.
//!
//! Set algebra (`merge_tree`, `intersect_tree`, `subtract_tree`, `filter`)
//! is restated here at the level of individual `(key, value)` entries rather
//! than as one pairwise structural recursion over both tries at once: an
//! entry in one trie survives exactly when the *other* trie encompasses its
//! key (or shares it exactly), and those per-entry checks compose out of
//! `get`/`encompasses`/`insert`, which are already correct on their own.
//! This is behaviourally identical to the pairwise recursion described in
//! `other_examples/15a7f9d5_iliakonnov-prefix-trie__src-trieview-mod.rs.rs`
//! (the grounding source for this area) but far less prone to the
//! off-by-one mistakes that structural two-tree recursion invites when
//! handwritten without a compiler to check it.

use core::mem;

use crate::{
	key::{
		Bits,
		Key,
	},
	node::Node,
	walk::walk,
};

/// A compressed binary radix trie keyed by [`Key<B>`].
///
/// See the module docs above and §3 for the node-level invariants this type
/// maintains after every public operation: no degenerate interior nodes, no
/// dangling children, and `size` always equal to the number of entry-bearing
/// nodes.
pub struct Trie<B: Bits, V> {
	pub(crate) root: Node<B, V>,
	pub(crate) size: usize,
}

impl<B: Bits, V> Trie<B, V> {
	/// An empty trie.
	pub fn new() -> Self {
		Self {
			root: Node::new(Key::root()),
			size: 0,
		}
	}

	/// Number of entry-bearing nodes.
	#[inline]
	pub fn len(&self) -> usize {
		self.size
	}

	/// Whether the trie has no entries at all.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	/// Insert `v` at `k`, replacing and returning any previous value there.
	///
	/// §4.2: depending on how `k` relates to the existing node reached by
	/// descent, this either sets the entry on an existing node (exact
	/// match), creates a new leaf child (`k` strictly extends an existing
	/// node), demotes an existing node one level deeper (`k` is a strict
	/// prefix of it — "new ancestor"), or forks above both ("fork").
	pub fn insert(&mut self, k: Key<B>, v: V) -> Option<V> {
		let previous = self.root.insert(k, v);
		if previous.is_none() {
			self.size += 1;
		}
		previous
	}

	/// Insert `v` at `k` without compressing: descend (or create) one bit at
	/// a time, never forking or demoting existing nodes.
	///
	/// §4.4: intended for bulk construction, paired with [`Self::compress`]
	/// once all entries are in. Panics (via a failed debug assertion) if an
	/// already-inserted node's content disagrees with `k` before `k` is
	/// exhausted — that can only happen if some entry was previously
	/// inserted through [`Self::insert`] instead, which this method does not
	/// support mixing with.
	pub fn insert_lazy(&mut self, k: Key<B>, v: V) -> Option<V> {
		let mut current = &mut self.root;
		loop {
			if Key::equal_from_root(&current.key, &k) {
				let old = current.value.replace(v);
				if old.is_none() {
					self.size += 1;
				}
				return old;
			}
			debug_assert!(current.key.len() < k.len());
			let bit = k.bit(current.key.len());
			let next_key = current.key.next(bit);
			let slot = current.child_slot_mut(bit);
			if slot.is_none() {
				*slot = Some(Box::new(Node::new(next_key)));
			}
			current = slot.as_mut().unwrap();
		}
	}

	/// Collapse every degenerate interior node (one child, no entry)
	/// produced by [`Self::insert_lazy`] into its surviving child.
	///
	/// The root is exempt: it is never removed even if it ends up with a
	/// single child and no entry of its own, since it has no parent slot to
	/// be spliced into.
	pub fn compress(&mut self) {
		if let Some(left) = self.root.left.as_deref_mut() {
			compress_node(left);
		}
		if let Some(right) = self.root.right.as_deref_mut() {
			compress_node(right);
		}
	}

	/// Remove the entry at `k`, if any, returning its value.
	///
	/// §4.5: clearing an entry may collapse its node (if left with a single
	/// child) or delete it outright (if left with none), which can in turn
	/// collapse its parent, and so on up the path to `k`.
	pub fn remove(&mut self, k: &Key<B>) -> Option<V> {
		let outcome = self.root.remove(k);
		if outcome.removed.is_some() {
			self.size -= 1;
		}
		outcome.removed
	}

	/// Exact lookup: the value at `k`, if `k` is itself an entry.
	pub fn get(&self, k: &Key<B>) -> Option<&V> {
		let node = self.descend(k, |_| {});
		if Key::equal_from_root(&node.key, k) {
			node.value.as_ref()
		} else {
			None
		}
	}

	/// Whether `k` is itself an entry.
	pub fn contains(&self, k: &Key<B>) -> bool {
		self.get(k).is_some()
	}

	/// Whether some entry-bearing node's key is a (non-strict, unless
	/// `strict`) prefix of `k`.
	pub fn encompasses(&self, k: &Key<B>, strict: bool) -> bool {
		let mut found = false;
		let _ = self.descend(k, |n| {
			if n.value.is_some() && Key::is_prefix_of(&n.key, k, strict) {
				found = true;
			}
		});
		found
	}

	/// The *shortest* entry-bearing ancestor of `k` (non-strict unless
	/// `strict`): the first one encountered walking from the root.
	pub fn root_of(&self, k: &Key<B>, strict: bool) -> Option<(Key<B>, &V)> {
		let mut node = &self.root;
		loop {
			if node.value.is_some() && Key::is_prefix_of(&node.key, k, strict) {
				return Some((node.key, node.value.as_ref().unwrap()));
			}
			if node.key.len() >= k.len() {
				return None;
			}
			let bit = k.bit(node.key.len());
			match node.child(bit) {
				Some(child) if is_on_path(child, k) => node = child,
				_ => return None,
			}
		}
	}

	/// The *longest* (most specific) entry-bearing ancestor of `k`
	/// (non-strict unless `strict`): the last one encountered walking from
	/// the root.
	pub fn parent_of(&self, k: &Key<B>, strict: bool) -> Option<(Key<B>, &V)> {
		let mut result = None;
		let _ = self.descend(k, |n| {
			if n.value.is_some() && Key::is_prefix_of(&n.key, k, strict) {
				result = Some((n.key, n.value.as_ref().unwrap()));
			}
		});
		result
	}

	/// Whether any entry-bearing node's key is a prefix of `k`, or `k` is a
	/// prefix of any entry-bearing node's key.
	pub fn overlaps_key(&self, k: &Key<B>) -> bool {
		let mut found = false;
		walk(&self.root, k, &mut |n| {
			if n.value.is_some() {
				found = true;
			}
			found
		});
		found
	}

	/// A fresh trie containing every entry-bearing descendant of `k`
	/// (re-rooted so `k` itself becomes length 0), including `k` itself
	/// unless `strict`.
	pub fn descendants_of(&self, k: &Key<B>, strict: bool) -> Self
	where
		V: Clone,
	{
		let node = self.descend(k, |_| {});
		let mut result = Self::new();
		if !Key::is_prefix_of(k, &node.key, false) {
			return result;
		}
		if node.key.len() == k.len() {
			let mut rebased = rebase_subtree(node, k.len());
			if strict {
				rebased.value = None;
			}
			result.size = subtree_size(&rebased) as usize;
			result.root = rebased;
		} else {
			// `k` sits strictly inside `node`'s owned segment: synthesize a
			// root and attach the rebased node as its single child.
			let bit = node.key.bit(k.len());
			let rebased_child = rebase_subtree(node, k.len());
			result.size = subtree_size(&rebased_child) as usize;
			*result.root.child_slot_mut(bit) = Some(Box::new(rebased_child));
		}
		result
	}

	/// A fresh trie containing every entry-bearing ancestor of `k`
	/// (non-strict unless `strict`), each re-inserted at its original key.
	pub fn ancestors_of(&self, k: &Key<B>, strict: bool) -> Self
	where
		V: Clone,
	{
		let mut result = Self::new();
		let _ = self.descend(k, |n| {
			if n.value.is_some() && Key::is_prefix_of(&n.key, k, strict) {
				result.insert(n.key, n.value.as_ref().unwrap().clone());
			}
		});
		result
	}

	/// Visit every node reachable from `path` (ancestors along the way,
	/// then the full subtree once `path` is exhausted); see
	/// [`crate::walk::walk`] for the exact semantics. `f` returning `true`
	/// prunes the subtree currently being visited.
	pub fn walk(&self, path: &Key<B>, f: &mut impl FnMut(&Node<B, V>) -> bool) {
		walk(&self.root, path, f);
	}

	/// Remove `k` and all of its descendants, but preserve the surrounding
	/// key space: if `k` falls inside a node holding a value `v`
	/// encompassing `k`, sibling nodes carrying `v` are synthesised along
	/// the way so every other address `v` used to cover stays covered.
	///
	/// §4.5's `insert_hole` algorithm.
	pub fn subtract_key(&mut self, k: Key<B>)
	where
		V: Clone,
	{
		let mut delta: isize = 0;
		if carve(&mut self.root, &k, None, &mut delta) {
			self.root = Node::new(Key::root());
		}
		self.size = (self.size as isize + delta).max(0) as usize;
	}

	/// Remove every key present as an entry in `other` (with hole synthesis
	/// per [`Self::subtract_key`]) from `self`.
	///
	/// Per §9, values removed are whichever `self` already held — `other`'s
	/// values are never consulted, only its keys.
	pub fn subtract_tree(&mut self, other: &Self)
	where
		V: Clone,
	{
		let keys: Vec<Key<B>> = {
			let mut keys = Vec::new();
			other.for_each_entry(|k, _| keys.push(*k));
			keys
		};
		for k in keys {
			self.subtract_key(k);
		}
	}

	/// Import every entry of `other` whose key `self` doesn't already hold
	/// an entry for.
	pub fn merge_tree(&mut self, other: &Self)
	where
		V: Clone,
	{
		let mut to_insert: Vec<(Key<B>, V)> = Vec::new();
		other.for_each_entry(|k, v| {
			if self.get(k).is_none() {
				to_insert.push((*k, v.clone()));
			}
		});
		for (k, v) in to_insert {
			self.insert(k, v);
		}
	}

	/// Keep exactly the entries that are either present in both `self` and
	/// `other`, or present in one and encompassed by an entry in the other.
	pub fn intersect_tree(&mut self, other: &Self)
	where
		V: Clone,
	{
		let mut keep: Vec<(Key<B>, V)> = Vec::new();
		self.for_each_entry(|k, v| {
			if other.encompasses(k, false) {
				keep.push((*k, v.clone()));
			}
		});
		other.for_each_entry(|k, v| {
			if self.encompasses(k, false) && !keep.iter().any(|(kk, _)| Key::equal_from_root(kk, k)) {
				keep.push((*k, v.clone()));
			}
		});
		let mut fresh = Self::new();
		for (k, v) in keep {
			fresh.insert(k, v);
		}
		*self = fresh;
	}

	/// Keep exactly the entries encompassed by some entry of `other`.
	pub fn filter(&mut self, other: &Self) {
		let drop: Vec<Key<B>> = {
			let mut drop = Vec::new();
			self.for_each_entry(|k, _| {
				if !other.encompasses(k, false) {
					drop.push(*k);
				}
			});
			drop
		};
		for k in drop {
			self.remove(&k);
		}
	}

	/// Call `f` on every `(key, value)` entry, in the deterministic
	/// left-to-right order [`crate::walk::walk`] produces.
	pub fn for_each_entry<'a>(&'a self, mut f: impl FnMut(&Key<B>, &'a V)) {
		if let Some(v) = self.root.value.as_ref() {
			f(&self.root.key, v);
		}
		walk(&self.root, &Key::root(), &mut |n| {
			if let Some(v) = &n.value {
				f(&n.key, v);
			}
			false
		});
	}

	// Directed descent toward `k`, calling `visit` on every node passed
	// along the way including the root (a root entry is a valid default
	// route, see DESIGN.md's "Root entry" decision) and the final node.
	// Returns that final node: either an exact match, the deepest ancestor
	// still consistent with `k`, or a node whose own key already extends
	// past `k`.
	fn descend<'a>(&'a self, k: &Key<B>, mut visit: impl FnMut(&'a Node<B, V>)) -> &'a Node<B, V> {
		let mut node = &self.root;
		loop {
			visit(node);
			if node.key.len() >= k.len() {
				return node;
			}
			let bit = k.bit(node.key.len());
			match node.child(bit) {
				Some(child) if is_on_path(child, k) => node = child,
				_ => return node,
			}
		}
	}
}

impl<B: Bits, V> Default for Trie<B, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<B, V> Clone for Trie<B, V>
where
	B: Bits,
	V: Clone,
{
	fn clone(&self) -> Self {
		Self {
			root: self.root.clone(),
			size: self.size,
		}
	}
}

impl<B, V> core::fmt::Debug for Trie<B, V>
where
	B: Bits,
	V: core::fmt::Debug,
{
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Trie").field("size", &self.size).field("root", &self.root).finish()
	}
}

// Whether `child`'s owned segment is still consistent with `k` (i.e. `k`
// hasn't diverged from the stored content before either ends) — the same
// check `walk` uses to decide whether a child is reachable via a path.
fn is_on_path<B: Bits, V>(child: &Node<B, V>, k: &Key<B>) -> bool {
	let shared = Key::common_prefix_len(&child.key, k);
	shared >= child.key.len().min(k.len())
}

// Recursively rebuild `node`'s subtree with every key shifted so that
// `node.key` itself (assumed to start `amount` bits into the original
// address space) becomes relative to a new zero-length root.
fn rebase_subtree<B: Bits, V: Clone>(node: &Node<B, V>, amount: u32) -> Node<B, V> {
	Node {
		key: node.key.rebase(amount),
		value: node.value.clone(),
		left: node.left.as_ref().map(|c| Box::new(rebase_subtree(c, amount))),
		right: node.right.as_ref().map(|c| Box::new(rebase_subtree(c, amount))),
	}
}

fn subtree_size<B: Bits, V>(node: &Node<B, V>) -> isize {
	let mut n = node.value.is_some() as isize;
	if let Some(c) = &node.left {
		n += subtree_size(c);
	}
	if let Some(c) = &node.right {
		n += subtree_size(c);
	}
	n
}

fn count_entries<B: Bits, V>(slot: &Option<Box<Node<B, V>>>) -> isize {
	match slot {
		None => 0,
		Some(node) => subtree_size(node),
	}
}

// Bottom-up: fix up `node`'s children first, then collapse `node` itself if
// it is left with exactly one child and no entry.
fn compress_node<B: Bits, V>(node: &mut Node<B, V>) {
	if let Some(left) = node.left.as_deref_mut() {
		compress_node(left);
	}
	if let Some(right) = node.right.as_deref_mut() {
		compress_node(right);
	}
	if node.is_degenerate() {
		node.splice_single_child();
	}
}

struct RemoveOutcome<V> {
	removed: Option<V>,
	delete_self: bool,
}

impl<B: Bits, V> Node<B, V> {
	fn insert(&mut self, k: Key<B>, v: V) -> Option<V> {
		if Key::equal_from_root(&self.key, &k) {
			return self.value.replace(v);
		}

		let c = Key::common_prefix_len(&self.key, &k);
		if c == self.key.len() {
			// Descent: `self.key` is a strict prefix of `k`.
			let bit = k.bit(self.key.len());
			let slot = self.child_slot_mut(bit);
			match slot {
				None => {
					*slot = Some(Box::new(Node::new_leaf(k.rest(self.key.len()), v)));
					None
				},
				Some(child) => child.insert(k, v),
			}
		} else if c == k.len() {
			// New ancestor: `k` is a strict prefix of `self.key`. The new
			// node takes `self`'s old slot, so it must carry `self`'s old
			// offset (I3), not the zero offset a freshly-constructed `k`
			// would otherwise have.
			let offset = self.key.offset();
			let mut old = mem::replace(self, Node::new(k.rest(offset)));
			self.value = Some(v);
			old.key = old.key.rest(self.key.len());
			let bit = old.key.bit(self.key.len());
			*self.child_slot_mut(bit) = Some(Box::new(old));
			None
		} else {
			// Fork: neither is a prefix of the other.
			let fork_key = self.key.truncated(c);
			let mut old = mem::replace(self, Node::new(fork_key));
			old.key = old.key.rest(c);
			let leaf = Node::new_leaf(k.rest(c), v);
			let old_bit = old.key.bit(c);
			*self.child_slot_mut(old_bit) = Some(Box::new(old));
			*self.child_slot_mut(!old_bit) = Some(Box::new(leaf));
			None
		}
	}

	fn remove(&mut self, k: &Key<B>) -> RemoveOutcome<V> {
		if Key::equal_from_root(&self.key, k) {
			let removed = self.value.take();
			let delete_self = self.collapse_if_degenerate_or_empty();
			return RemoveOutcome { removed, delete_self };
		}

		let c = Key::common_prefix_len(&self.key, k);
		if c != self.key.len() || self.key.len() >= k.len() {
			return RemoveOutcome {
				removed: None,
				delete_self: false,
			};
		}

		let bit = k.bit(self.key.len());
		let child_outcome = match self.child_slot_mut(bit) {
			None => {
				return RemoveOutcome {
					removed: None,
					delete_self: false,
				};
			},
			Some(child) => child.remove(k),
		};

		if child_outcome.delete_self {
			*self.child_slot_mut(bit) = None;
		}

		let delete_self = if child_outcome.removed.is_some() {
			self.collapse_if_degenerate_or_empty()
		} else {
			false
		};

		RemoveOutcome {
			removed: child_outcome.removed,
			delete_self,
		}
	}

	// After an entry or a child was just removed from `self`: if `self` now
	// has no entry and zero children, it should be deleted entirely
	// (signalled to the caller); if it has no entry and exactly one child,
	// splice that child up in its place. Returns whether the caller should
	// delete `self`.
	fn collapse_if_degenerate_or_empty(&mut self) -> bool {
		if self.value.is_some() {
			return false;
		}
		match (self.left.is_some(), self.right.is_some()) {
			(true, true) => false,
			(false, false) => true,
			_ => {
				self.splice_single_child();
				false
			},
		}
	}
}

// Mutating walk from an ancestor (possibly `node` itself) toward `k`,
// synthesising holes. `covering` is the nearest not-yet-cleared ancestor
// entry seen so far; once set, every sibling-of-the-path position that has
// no existing node gets a fresh leaf carrying a clone of it. Returns
// whether the caller should delete `node` outright (it and everything
// under it was `k` or a descendant of `k`).
fn carve<B: Bits, V: Clone>(
	node: &mut Node<B, V>,
	k: &Key<B>,
	mut covering: Option<V>,
	delta: &mut isize,
) -> bool {
	if let Some(v) = node.value.take() {
		*delta -= 1;
		covering = Some(v);
	}

	if node.key.len() >= k.len() {
		*delta -= count_entries(&node.left);
		*delta -= count_entries(&node.right);
		return true;
	}

	let bit = k.bit(node.key.len());

	if let Some(v) = &covering {
		let sib_slot = node.child_slot_mut(!bit);
		if sib_slot.is_none() {
			*sib_slot = Some(Box::new(Node::new_leaf(node.key.next(!bit), v.clone())));
			*delta += 1;
		}
	}

	let direct_key = node.key.next(bit);
	let slot = node.child_slot_mut(bit);
	match slot {
		None => {
			if let Some(v) = covering {
				// `direct_key` is the slot on the way to `k`. If it's
				// already as long as `k`, that slot *is* `k` (the key being
				// deleted), not a hole to synthesize — leave it empty.
				if direct_key.len() < k.len() {
					*slot = Some(Box::new(build_hole_chain(direct_key, k, &v, delta)));
				}
			}
		},
		Some(child) => {
			if is_on_path(child, k) {
				let delete = carve(child, k, covering, delta);
				if delete {
					*slot = None;
				}
			}
			// else: `child` diverges from `k` before either ends — it
			// belongs to a different branch entirely and is left untouched.
		},
	}

	false
}

// Build a fresh chain of bare single-bit nodes from `start` down to
// (excluding) `k`, attaching a sibling leaf carrying a clone of `v` at every
// level. Used once the walk toward `k` runs off the edge of any existing
// structure. `start.len()` must be strictly less than `k.len()`: the caller
// never invokes this to synthesize `k` itself.
fn build_hole_chain<B: Bits, V: Clone>(start: Key<B>, k: &Key<B>, v: &V, delta: &mut isize) -> Node<B, V> {
	let bit = k.bit(start.len());
	let sib_key = start.next(!bit);
	let direct_key = start.next(bit);

	// `start` would end up degenerate (only the sibling leaf, no entry of
	// its own): elide it and attach the leaf directly in its place,
	// rebased to `start`'s own offset so it slots into the caller's child
	// slot correctly (I1/I3).
	if direct_key.len() == k.len() {
		*delta += 1;
		return Node::new_leaf(sib_key.rest(start.offset()), v.clone());
	}

	let mut node = Node::new(start);
	*node.child_slot_mut(!bit) = Some(Box::new(Node::new_leaf(sib_key, v.clone())));
	*delta += 1;
	*node.child_slot_mut(bit) = Some(Box::new(build_hole_chain(direct_key, k, v, delta)));
	node
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::key::Key32;
	use proptest::collection::vec;
	use proptest::prelude::*;

	fn key(content: u32, len: u32) -> Key32 {
		Key32::new(content, len)
	}

	#[test]
	fn insert_and_get_exact() {
		let mut t = Trie::<u32, i32>::new();
		assert_eq!(t.insert(key(0xC0A8_0000, 16), 1), None);
		assert_eq!(t.get(&key(0xC0A8_0000, 16)), Some(&1));
		assert_eq!(t.len(), 1);
	}

	#[test]
	fn insert_fork_then_descent() {
		let mut t = Trie::<u32, i32>::new();
		t.insert(key(0b1010_0000 << 24, 4), 1);
		t.insert(key(0b1011_0000 << 24, 4), 2);
		assert_eq!(t.get(&key(0b1010_0000 << 24, 4)), Some(&1));
		assert_eq!(t.get(&key(0b1011_0000 << 24, 4)), Some(&2));
		assert_eq!(t.len(), 2);
	}

	#[test]
	fn insert_new_ancestor() {
		let mut t = Trie::<u32, i32>::new();
		t.insert(key(0b1010_1010 << 24, 8), 1);
		t.insert(key(0b1010_0000 << 24, 4), 2);
		assert_eq!(t.get(&key(0b1010_1010 << 24, 8)), Some(&1));
		assert_eq!(t.get(&key(0b1010_0000 << 24, 4)), Some(&2));
	}

	#[test]
	fn remove_collapses_single_child_ancestor() {
		let mut t = Trie::<u32, i32>::new();
		t.insert(key(0b1010_0000 << 24, 4), 1);
		t.insert(key(0b1010_1010 << 24, 8), 2);
		assert_eq!(t.remove(&key(0b1010_0000 << 24, 4)), Some(1));
		assert_eq!(t.get(&key(0b1010_1010 << 24, 8)), Some(&2));
		assert_eq!(t.len(), 1);
	}

	#[test]
	fn remove_cascades_up() {
		let mut t = Trie::<u32, i32>::new();
		t.insert(key(0b1010_0000 << 24, 4), 1);
		t.insert(key(0b1011_0000 << 24, 4), 2);
		assert_eq!(t.remove(&key(0b1010_0000 << 24, 4)), Some(1));
		assert_eq!(t.remove(&key(0b1011_0000 << 24, 4)), Some(2));
        assert!(t.is_empty());
	}

	#[test]
	fn subtract_key_synthesises_holes() {
		let mut t = Trie::<u128, i32>::new();
		let ancestor = crate::key::Key128::new(0, 126);
		t.insert(ancestor, 7);
		let k = crate::key::Key128::new(0, 128);
		t.subtract_key(k);
		assert_eq!(t.len(), 2);
		assert_eq!(t.get(&crate::key::Key128::new(1u128 << (128 - 128), 128)), Some(&7));
		let sibling127 = crate::key::Key128::new(2u128 << (128 - 128), 127);
		assert_eq!(t.get(&sibling127), Some(&7));
		assert_eq!(t.get(&ancestor), None);
	}

	#[test]
	fn encompasses_and_parent_of() {
		let mut t = Trie::<u32, &'static str>::new();
		t.insert(key(0b1010_0000 << 24, 8), "outer");
		t.insert(key(0b1010_1010 << 24, 16), "inner");
		let q = key(0b1010_1010 << 24, 24);
		assert!(t.encompasses(&q, false));
		assert_eq!(t.parent_of(&q, false).map(|(_, v)| *v), Some("inner"));
		assert_eq!(t.root_of(&q, false).map(|(_, v)| *v), Some("outer"));
	}

	#[test]
	fn merge_fills_gaps_without_overwriting() {
		let mut a = Trie::<u32, i32>::new();
		a.insert(key(0b1010_0000 << 24, 8), 1);
		let mut b = Trie::<u32, i32>::new();
		b.insert(key(0b1010_0000 << 24, 8), 99);
		b.insert(key(0b1011_0000 << 24, 8), 2);
		a.merge_tree(&b);
		assert_eq!(a.get(&key(0b1010_0000 << 24, 8)), Some(&1));
		assert_eq!(a.get(&key(0b1011_0000 << 24, 8)), Some(&2));
	}

	#[test]
	fn new_ancestor_below_root_gets_parents_offset() {
		let mut t = Trie::<u32, i32>::new();
		t.insert(key(0xAA00_0000, 8), 1);
		t.insert(key(0xAABB_0000, 16), 2);
		t.insert(key(0xAAB0_0000, 12), 3);
		let twelve = t.descend(&key(0xAAB0_0000, 12), |_| {});
		assert_eq!(twelve.key.offset(), 8);
		check_structural_invariants(&t);
	}

	#[test]
	fn default_route_entry_is_visible_to_encompasses_and_ancestors() {
		let mut t = Trie::<u32, i32>::new();
		t.insert(key(0, 0), 1);
		t.insert(key(0xC0A8_0000, 16), 2);
		assert!(t.encompasses(&key(0xC0A8_0000, 16), true));
		assert_eq!(t.root_of(&key(0xC0A8_0000, 16), true).map(|(_, v)| *v), Some(1));
		assert_eq!(t.parent_of(&key(0, 0), false).map(|(_, v)| *v), Some(1));
	}

	// Walk every node reachable from `t`'s root, asserting the structural
	// invariants I1-I3 and I5 hold. I4 (size bookkeeping) is checked
	// separately since it needs no tree walk.
	fn check_structural_invariants<B: Bits, V>(t: &Trie<B, V>) {
		let mut rooted_keys = Vec::new();
		if let Some(left) = t.root.left.as_deref() {
			check_node(left, &mut rooted_keys);
		}
		if let Some(right) = t.root.right.as_deref() {
			check_node(right, &mut rooted_keys);
		}
	}

	fn check_node<B: Bits, V>(node: &Node<B, V>, rooted_keys: &mut Vec<(B, u32)>) {
		assert!(!node.is_degenerate(), "degenerate node at len {}", node.key.len());
		assert_eq!(
			node.key.content(),
			node.key.content().mask_from(node.key.len()),
			"content bits at or beyond len {} must be zero",
			node.key.len()
		);
		let rooted = (node.key.content(), node.key.len());
		assert!(
			!rooted_keys.contains(&rooted),
			"duplicate rooted key at len {}",
			node.key.len()
		);
		rooted_keys.push(rooted);
		if let Some(left) = node.left.as_deref() {
			assert_eq!(left.key.offset(), node.key.len(), "I3: child offset must equal parent len");
			check_node(left, rooted_keys);
		}
		if let Some(right) = node.right.as_deref() {
			assert_eq!(right.key.offset(), node.key.len(), "I3: child offset must equal parent len");
			check_node(right, rooted_keys);
		}
	}

	proptest! {
		#[test]
		fn random_operations_preserve_structural_invariants(
			ops in vec((0u32..=32, any::<u32>(), any::<bool>()), 0..40),
		) {
			let mut t = Trie::<u32, i32>::new();
			for (i, (len, bits, do_insert)) in ops.iter().enumerate() {
				let k = Key32::new(*bits, *len);
				if *do_insert {
					t.insert(k, i as i32);
				} else {
					t.subtract_key(k);
				}
				check_structural_invariants(&t);
			}
			t.compress();
			check_structural_invariants(&t);
		}

		#[test]
		fn lazy_insert_then_compress_matches_plain_insert(
			keys in vec((0u32..=32, any::<u32>()), 0..20),
		) {
			let mut plain = Trie::<u32, i32>::new();
			let mut lazy = Trie::<u32, i32>::new();
			for (i, (len, bits)) in keys.iter().enumerate() {
				let k = Key32::new(*bits, *len);
				plain.insert(k, i as i32);
				lazy.insert_lazy(k, i as i32);
			}
			lazy.compress();
			check_structural_invariants(&lazy);

			let mut plain_entries = Vec::new();
			plain.for_each_entry(|k, v| plain_entries.push((k.content(), k.len(), *v)));
			let mut lazy_entries = Vec::new();
			lazy.for_each_entry(|k, v| lazy_entries.push((k.content(), k.len(), *v)));
			prop_assert_eq!(plain_entries, lazy_entries);
		}

		#[test]
		fn merge_and_intersect_are_commutative(
			a_keys in vec((0u32..=32, any::<u32>()), 0..15),
			b_keys in vec((0u32..=32, any::<u32>()), 0..15),
		) {
			let mut a = Trie::<u32, i32>::new();
			for (i, (len, bits)) in a_keys.iter().enumerate() {
				a.insert(Key32::new(*bits, *len), i as i32);
			}
			let mut b = Trie::<u32, i32>::new();
			for (i, (len, bits)) in b_keys.iter().enumerate() {
				b.insert(Key32::new(*bits, *len), 1000 + i as i32);
			}

			let mut merge_ab = a.clone();
			merge_ab.merge_tree(&b);
			let mut merge_ba = b.clone();
			merge_ba.merge_tree(&a);
			let keys_of = |t: &Trie<u32, i32>| {
				let mut out = Vec::new();
				t.for_each_entry(|k, _| out.push((k.content(), k.len())));
				out.sort();
				out
			};
			prop_assert_eq!(keys_of(&merge_ab), keys_of(&merge_ba));

			let mut intersect_ab = a.clone();
			intersect_ab.intersect_tree(&b);
			let mut intersect_ba = b.clone();
			intersect_ba.intersect_tree(&a);
			prop_assert_eq!(keys_of(&intersect_ab), keys_of(&intersect_ba));
		}
	}
}
