//! An unbalanced binary search tree whose nodes live in an [`Arena`]. Nothing
//! rebalances it, so an adversarial insertion order degrades it into a linked
//! list; every walk below is iterative so that a tall tree costs time but never
//! the call stack.

use std::{
    borrow::Borrow,
    cmp::Ordering,
    mem,
    ops::Bound,
};

use crate::arena::{Arena, Handle};

/// A node in the tree. Children are handles into the same arena.
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
}

/// The slot a subtree hangs from: the root pointer, or one side of a parent.
#[derive(Copy, Clone)]
enum Link {
    Root,
    Left(Handle),
    Right(Handle),
}

/// A map kept in key order by a plain binary search tree.
///
/// Keys are unique: putting a key which is already present overwrites that
/// node's value. Callers which need several values under one logical key
/// should fold a tie-breaker into the key itself.
pub struct OrderedMap<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<Handle>,
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts a value under key, returning the previous value if the key was
    /// already present. An existing node keeps its place in the tree.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let mut link = Link::Root;
        let mut cur = self.root;

        while let Some(h) = cur {
            let node = &mut self.nodes[h];
            match key.cmp(&node.key) {
                Ordering::Less => {
                    link = Link::Left(h);
                    cur = node.left;
                }
                Ordering::Greater => {
                    link = Link::Right(h);
                    cur = node.right;
                }
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
            }
        }

        let h = self.nodes.alloc(Node {
            key,
            value,
            left: None,
            right: None,
        });
        self.set_link(link, Some(h));

        #[cfg(test)]
        self.check_invariants();

        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|(_, h)| &self.nodes[h].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (_, h) = self.find(key)?;
        Some(&mut self.nodes[h].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes the node holding key and returns its value. A node with two
    /// children takes over the key and value of the smallest node in its right
    /// subtree, which is unlinked in its place (Hibbard deletion).
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (link, h) = self.find(key)?;
        let (left, right) = {
            let node = &self.nodes[h];
            (node.left, node.right)
        };

        let removed = match (left, right) {
            (_, None) => {
                self.set_link(link, left);
                self.nodes.remove(h).map(|node| node.value)
            }
            (None, Some(_)) => {
                self.set_link(link, right);
                self.nodes.remove(h).map(|node| node.value)
            }
            (Some(_), Some(r)) => {
                let mut min_link = Link::Right(h);
                let mut min = r;
                while let Some(l) = self.nodes[min].left {
                    min_link = Link::Left(min);
                    min = l;
                }

                // the minimum has no left child, so its right subtree simply
                // moves up a level
                let min_right = self.nodes[min].right;
                self.set_link(min_link, min_right);
                let successor = self.nodes.remove(min)?;

                let node = &mut self.nodes[h];
                node.key = successor.key;
                Some(mem::replace(&mut node.value, successor.value))
            }
        };

        #[cfg(test)]
        self.check_invariants();

        removed
    }

    /// The entry with the smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut h = self.root?;
        while let Some(l) = self.nodes[h].left {
            h = l;
        }
        let node = &self.nodes[h];
        Some((&node.key, &node.value))
    }

    /// The entry with the largest key.
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut h = self.root?;
        while let Some(r) = self.nodes[h].right {
            h = r;
        }
        let node = &self.nodes[h];
        Some((&node.key, &node.value))
    }

    /// Every entry with `lo <= key <= hi`, in ascending key order. Subtrees
    /// lying wholly outside the range are never visited. Yields nothing when
    /// `lo > hi`.
    pub fn range_search(&self, lo: K, hi: K) -> Range<'_, K, V> {
        if lo > hi {
            return Range::empty(&self.nodes);
        }

        Range::new(
            &self.nodes,
            self.root,
            Bound::Included(lo),
            Bound::Included(hi),
        )
    }

    /// Every entry whose key is strictly greater than key, in ascending key
    /// order.
    pub fn successors(&self, key: K) -> Range<'_, K, V> {
        Range::new(&self.nodes, self.root, Bound::Excluded(key), Bound::Unbounded)
    }

    /// Every entry in ascending key order.
    pub fn iter(&self) -> Range<'_, K, V> {
        Range::new(&self.nodes, self.root, Bound::Unbounded, Bound::Unbounded)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    fn find<Q>(&self, key: &Q) -> Option<(Link, Handle)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut link = Link::Root;
        let mut cur = self.root;

        while let Some(h) = cur {
            let node = &self.nodes[h];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => {
                    link = Link::Left(h);
                    cur = node.left;
                }
                Ordering::Greater => {
                    link = Link::Right(h);
                    cur = node.right;
                }
                Ordering::Equal => return Some((link, h)),
            }
        }

        None
    }

    fn set_link(&mut self, link: Link, child: Option<Handle>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.nodes[parent].left = child,
            Link::Right(parent) => self.nodes[parent].right = child,
        }
    }

    /// Walks the whole tree checking the search-tree ordering and that every
    /// live node is reachable from the root.
    #[cfg(test)]
    fn check_invariants(&self) {
        let mut count = 0;
        let mut stack: Vec<(Handle, Option<&K>, Option<&K>)> = Vec::new();

        if let Some(root) = self.root {
            stack.push((root, None, None));
        }

        while let Some((h, lo, hi)) = stack.pop() {
            count += 1;
            assert!(count <= self.len());

            let node = &self.nodes[h];
            if let Some(lo) = lo {
                assert!(lo < &node.key);
            }
            if let Some(hi) = hi {
                assert!(&node.key < hi);
            }

            if let Some(l) = node.left {
                stack.push((l, lo, Some(&node.key)));
            }
            if let Some(r) = node.right {
                stack.push((r, Some(&node.key), hi));
            }
        }

        assert_eq!(self.len(), count);
    }

    #[cfg(test)]
    fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(Handle, usize)> = self.root.map(|h| (h, 1)).into_iter().collect();

        while let Some((h, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[h];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }

        height
    }
}

/// An in-order walk over the part of an [`OrderedMap`] lying between two
/// bounds.
///
/// The stack holds the path of nodes whose left side has been explored but
/// which haven't been yielded yet. A node's left subtree is only entered when
/// the lower bound sits below the node's key, and its right subtree only when
/// the upper bound sits above it, so the walk costs the height of the tree plus
/// the number of entries yielded.
pub struct Range<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    lower: Bound<K>,
    upper: Bound<K>,
    stack: Vec<Handle>,
}

impl<'a, K, V> Range<'a, K, V>
where
    K: Ord,
{
    fn new(
        nodes: &'a Arena<Node<K, V>>,
        root: Option<Handle>,
        lower: Bound<K>,
        upper: Bound<K>,
    ) -> Self {
        let mut range = Self {
            nodes,
            lower,
            upper,
            stack: Vec::new(),
        };
        range.descend(root);
        range
    }

    fn empty(nodes: &'a Arena<Node<K, V>>) -> Self {
        Self {
            nodes,
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
            stack: Vec::new(),
        }
    }

    /// Could the left subtree of a node with this key hold anything in range?
    fn goes_left(&self, key: &K) -> bool {
        match &self.lower {
            Bound::Included(lo) | Bound::Excluded(lo) => lo < key,
            Bound::Unbounded => true,
        }
    }

    /// Could the right subtree of a node with this key hold anything in range?
    fn goes_right(&self, key: &K) -> bool {
        match &self.upper {
            Bound::Included(hi) | Bound::Excluded(hi) => hi > key,
            Bound::Unbounded => true,
        }
    }

    fn contains(&self, key: &K) -> bool {
        let above = match &self.lower {
            Bound::Included(lo) => lo <= key,
            Bound::Excluded(lo) => lo < key,
            Bound::Unbounded => true,
        };
        let below = match &self.upper {
            Bound::Included(hi) => key <= hi,
            Bound::Excluded(hi) => key < hi,
            Bound::Unbounded => true,
        };
        above && below
    }

    fn descend(&mut self, mut cur: Option<Handle>) {
        let nodes = self.nodes;
        while let Some(h) = cur {
            self.stack.push(h);
            let node = &nodes[h];
            cur = if self.goes_left(&node.key) {
                node.left
            } else {
                None
            };
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V>
where
    K: Ord,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;

        while let Some(h) = self.stack.pop() {
            let node = &nodes[h];
            if self.goes_right(&node.key) {
                self.descend(node.right);
            }

            if self.contains(&node.key) {
                return Some((&node.key, &node.value));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::OrderedMap;

    /// Builds this tree, which gives every kind of node something to do:
    ///
    /// ```text
    ///            50
    ///         /      \
    ///       30        70
    ///      /  \      /  \
    ///    20    40  60    80
    /// ```
    fn sample_tree() -> OrderedMap<i32, &'static str> {
        let mut map = OrderedMap::new();
        for (k, v) in [
            (50, "fifty"),
            (30, "thirty"),
            (70, "seventy"),
            (20, "twenty"),
            (40, "forty"),
            (60, "sixty"),
            (80, "eighty"),
        ] {
            assert_eq!(None, map.put(k, v));
        }
        map
    }

    fn keys<'a, I>(iter: I) -> Vec<i32>
    where
        I: Iterator<Item = (&'a i32, &'a &'static str)>,
    {
        iter.map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_put_and_get() {
        let mut map = sample_tree();
        assert_eq!(7, map.len());

        assert_eq!(Some(&"forty"), map.get(&40));
        assert_eq!(None, map.get(&45));
        assert!(map.contains_key(&80));

        // an equal key overwrites in place instead of adding a node
        assert_eq!(Some("forty"), map.put(40, "quarante"));
        assert_eq!(7, map.len());
        assert_eq!(Some(&"quarante"), map.get(&40));

        if let Some(v) = map.get_mut(&20) {
            *v = "vingt";
        }
        assert_eq!(Some(&"vingt"), map.get(&20));
    }

    #[test]
    fn test_delete_leaf() {
        let mut map = sample_tree();
        assert_eq!(Some("twenty"), map.delete(&20));
        assert_eq!(None, map.get(&20));
        assert_eq!(vec![30, 40, 50, 60, 70, 80], keys(map.iter()));
    }

    #[test]
    fn test_delete_single_child() {
        let mut map = sample_tree();
        map.delete(&20);

        // 30 now only has a right child
        assert_eq!(Some("thirty"), map.delete(&30));
        assert_eq!(vec![40, 50, 60, 70, 80], keys(map.iter()));

        map.delete(&80);
        // 70 now only has a left child
        assert_eq!(Some("seventy"), map.delete(&70));
        assert_eq!(vec![40, 50, 60], keys(map.iter()));
    }

    #[test]
    fn test_delete_two_children() {
        let mut map = sample_tree();

        // the root has two children, 60 should take its place
        assert_eq!(Some("fifty"), map.delete(&50));
        assert_eq!(6, map.len());
        let root = map.root.and_then(|h| map.nodes.get(h));
        assert_eq!(Some(&60), root.map(|node| &node.key));
        assert_eq!(vec![20, 30, 40, 60, 70, 80], keys(map.iter()));

        // 70's successor is its direct right child
        assert_eq!(Some("seventy"), map.delete(&70));
        assert_eq!(vec![20, 30, 40, 60, 80], keys(map.iter()));
    }

    #[test]
    fn test_delete_missing() {
        let mut empty: OrderedMap<i32, ()> = OrderedMap::new();
        assert_eq!(None, empty.delete(&1));
        assert!(empty.is_empty());

        let mut map = sample_tree();
        assert_eq!(None, map.delete(&55));
        assert_eq!(7, map.len());

        for k in [50, 30, 70, 20, 40, 60, 80] {
            assert!(map.delete(&k).is_some());
        }
        assert!(map.is_empty());
        assert_eq!(None, map.min());
    }

    #[test]
    fn test_min_max() {
        let map = sample_tree();
        assert_eq!(Some((&20, &"twenty")), map.min());
        assert_eq!(Some((&80, &"eighty")), map.max());
    }

    #[test]
    fn test_range_search() {
        let map = sample_tree();

        assert_eq!(vec![40, 50, 60], keys(map.range_search(35, 65)));
        assert_eq!(vec![30, 40, 50], keys(map.range_search(30, 50)));
        assert_eq!(vec![50], keys(map.range_search(50, 50)));
        assert_eq!(
            vec![20, 30, 40, 50, 60, 70, 80],
            keys(map.range_search(i32::MIN, i32::MAX))
        );
        assert!(map.range_search(81, 100).next().is_none());
        assert!(map.range_search(51, 59).next().is_none());

        // backwards ranges are empty rather than an error
        assert!(map.range_search(65, 35).next().is_none());
    }

    #[test]
    fn test_successors() {
        let map = sample_tree();

        // everything under the right side of an included node shows up too
        assert_eq!(vec![30, 40, 50, 60, 70, 80], keys(map.successors(25)));
        assert_eq!(vec![50, 60, 70, 80], keys(map.successors(40)));
        assert_eq!(vec![60, 70, 80], keys(map.successors(50)));
        assert_eq!(
            vec![20, 30, 40, 50, 60, 70, 80],
            keys(map.successors(i32::MIN))
        );
        assert!(map.successors(80).next().is_none());
        assert!(map.successors(1000).next().is_none());
    }

    #[test]
    fn test_degenerate_tree() {
        // ascending inserts turn the tree into a right-leaning list
        let mut map = OrderedMap::new();
        for k in 0..10_000u32 {
            map.put(k, k);
        }
        assert_eq!(10_000, map.height());

        assert_eq!(Some(&9_999), map.get(&9_999));
        assert_eq!(1_000, map.range_search(5_000, 5_999).count());
        assert_eq!(10, map.successors(9_989).count());

        for k in (0..10_000u32).step_by(2) {
            assert_eq!(Some(k), map.delete(&k));
        }
        assert_eq!(5_000, map.len());
        assert_eq!(Some((&1, &1)), map.min());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8, u16),
        Delete(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..48, any::<u16>()).prop_map(|(k, v)| Op::Put(k, v)),
            (0u8..48).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn behaves_like_btree_map(
            ops in prop::collection::vec(op(), 0..256),
            lo in 0u8..48,
            hi in 0u8..48,
        ) {
            let mut map = OrderedMap::new();
            let mut model = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        prop_assert_eq!(model.insert(k, v), map.put(k, v));
                    }
                    Op::Delete(k) => {
                        prop_assert_eq!(model.remove(&k), map.delete(&k));
                    }
                }
            }

            prop_assert_eq!(model.len(), map.len());
            prop_assert!(map.iter().eq(model.iter()));

            let expected: Vec<_> = model.iter().filter(|(k, _)| lo <= **k && **k <= hi).collect();
            let actual: Vec<_> = map.range_search(lo, hi).collect();
            prop_assert_eq!(expected, actual);

            let expected: Vec<_> = model.iter().filter(|(k, _)| **k > lo).collect();
            let actual: Vec<_> = map.successors(lo).collect();
            prop_assert_eq!(expected, actual);
        }
    }
}
