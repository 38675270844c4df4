use crate::error::InvariantViolation;

use indexmap::{set, IndexSet};

use std::borrow::Borrow;
use std::hash::Hash;

pub type Iter<'a, K, V> = std::iter::Zip<set::Iter<'a, K>, std::slice::Iter<'a, V>>;
pub type IterMut<'a, K, V> = std::iter::Zip<set::Iter<'a, K>, std::slice::IterMut<'a, V>>;
pub type IntoIter<K, V> = std::iter::Zip<set::IntoIter<K>, std::vec::IntoIter<V>>;

/// A map that iterates in insertion order.
///
/// Keys live in an index that resolves a key to its position, values in a
/// vector ordered by that same position. Re-inserting an existing key
/// replaces its value without moving it.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    keys: IndexSet<K>,
    values: Vec<V>,
}

impl<K, V> OrderedMap<K, V> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.keys.iter().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.keys.iter().zip(self.values.iter_mut())
    }

    pub fn keys(&self) -> set::Iter<'_, K> {
        self.keys.iter()
    }

    pub fn values(&self) -> std::slice::Iter<'_, V> {
        self.values.iter()
    }

    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, V> {
        self.values.iter_mut()
    }

    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        Some((self.keys.get_index(index)?, self.values.get(index)?))
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    pub fn reverse(&mut self) {
        self.keys.reverse();
        self.values.reverse();
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            keys: IndexSet::new(),
            values: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: IndexSet::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn get_index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.keys.get_index_of(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.keys.contains(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.get_index_of(key)?;
        self.values.get(index)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.get_index_of(key)?;
        self.values.get_mut(index)
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// A new key is appended at the end; an existing key keeps its position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.find(&key) {
            Some(index) => Some(std::mem::replace(&mut self.values[index], value)),
            None => {
                self.insert_new(key);
                self.append_value(value);
                None
            }
        }
    }

    /// Removes `key`, shifting every later entry down by one.
    pub fn shift_remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (index, _) = self.keys.shift_remove_full(key)?;
        Some(self.values.remove(index))
    }

    pub fn pop(&mut self) -> Option<(K, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        Some((key, value))
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let keys = std::mem::take(&mut self.keys);
        let values = std::mem::take(&mut self.values);

        for (key, mut value) in keys.into_iter().zip(values) {
            if keep(&key, &mut value) {
                self.keys.insert(key);
                self.values.push(value);
            }
        }
    }

    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&K, &V, &K, &V) -> std::cmp::Ordering,
    {
        let mut entries: Vec<(K, V)> = std::mem::take(self).into_iter().collect();
        entries.sort_by(|x, y| compare(&x.0, &x.1, &y.0, &y.1));
        *self = entries.into_iter().collect();
    }

    pub fn sort_keys(&mut self)
    where
        K: Ord,
    {
        self.sort_by(|k1, _, k2, _| k1.cmp(k2))
    }

    pub(crate) fn find(&self, key: &K) -> Option<usize> {
        self.keys.get_index_of(key)
    }

    /// Registers a key that `find` reported absent. Must be followed by
    /// `append_value` before the map is used again.
    pub(crate) fn insert_new(&mut self, key: K) -> usize {
        let (index, inserted) = self.keys.insert_full(key);
        debug_assert!(inserted, "insert_new called with a key already present");
        index
    }

    pub(crate) fn append_value(&mut self, value: V) {
        self.values.push(value);
    }

    /// Checks that the key index and the value sequence agree.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.keys.len() != self.values.len() {
            return Err(InvariantViolation::LengthMismatch {
                keys: self.keys.len(),
                values: self.values.len(),
            });
        }

        for (position, key) in self.keys.iter().enumerate() {
            if self.keys.get_index_of(key) != Some(position) {
                return Err(InvariantViolation::MisplacedKey { position });
            }
        }

        Ok(())
    }
}

impl<K: Hash + Eq, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// Equality includes order.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Hash, V: Hash> Hash for OrderedMap<K, V> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K, V, Q> std::ops::Index<&Q> for OrderedMap<K, V>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not present in OrderedMap")
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut OrderedMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(feature = "fuzz")]
impl<'a, K, V> arbitrary::Arbitrary<'a> for OrderedMap<K, V>
where
    K: arbitrary::Arbitrary<'a> + Hash + Eq,
    V: arbitrary::Arbitrary<'a>,
{
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        u.arbitrary_iter::<(K, V)>()?.collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> OrderedMap<&'static str, i32> {
        OrderedMap::from([("spam", 1), ("eggs", 2), ("ham", 3)])
    }

    #[test]
    fn iterates_in_insertion_order() {
        let map = sample();

        assert_eq!(vec![&"spam", &"eggs", &"ham"], map.keys().collect::<Vec<_>>());
        assert_eq!(vec![&1, &2, &3], map.values().collect::<Vec<_>>());
        assert_eq!(Some((&"eggs", &2)), map.get_index(1));
    }

    #[test]
    fn replacing_a_value_keeps_its_position() {
        let mut map = sample();

        assert_eq!(Some(1), map.insert("spam", 10));
        assert_eq!(None, map.insert("toast", 4));

        assert_eq!(Some(0), map.get_index_of("spam"));
        assert_eq!(10, map["spam"]);
        assert_eq!(Some((&"toast", &4)), map.get_index(3));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn later_duplicates_update_in_place() {
        let map: OrderedMap<_, _> = vec![("a", 1), ("b", 2), ("a", 3)].into_iter().collect();

        assert_eq!(OrderedMap::from([("a", 3), ("b", 2)]), map);
    }

    #[test]
    fn shift_remove_preserves_order() {
        let mut map = sample();

        assert_eq!(Some(2), map.shift_remove("eggs"));
        assert_eq!(None, map.shift_remove("eggs"));

        assert_eq!(OrderedMap::from([("spam", 1), ("ham", 3)]), map);
        assert_eq!(Some(1), map.get_index_of("ham"));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn pops_from_the_end() {
        let mut map = sample();

        assert_eq!(Some(("ham", 3)), map.pop());
        assert_eq!(2, map.len());
        assert!(!map.contains_key("ham"));
    }

    #[test]
    fn retains_matching_entries() {
        let mut map = sample();
        map.retain(|_, v| {
            *v *= 10;
            *v != 20
        });

        assert_eq!(OrderedMap::from([("spam", 10), ("ham", 30)]), map);
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn sorts_and_reverses() {
        let mut map = sample();

        map.sort_keys();
        assert_eq!(vec![&"eggs", &"ham", &"spam"], map.keys().collect::<Vec<_>>());

        map.reverse();
        assert_eq!(vec![&"spam", &"ham", &"eggs"], map.keys().collect::<Vec<_>>());
        assert_eq!(Some(&1), map.get("spam"));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn equality_includes_order() {
        let forward = OrderedMap::from([(1, "a"), (2, "b")]);
        let backward = OrderedMap::from([(2, "b"), (1, "a")]);

        assert_ne!(forward, backward);
        assert_eq!(forward, forward.clone());
    }

    #[test]
    fn mutates_values_through_iterators() {
        let mut map = sample();
        for (_, v) in &mut map {
            *v += 1;
        }
        if let Some(v) = map.get_mut("ham") {
            *v = 0;
        }

        assert_eq!(vec![2, 3, 0], map.into_iter().map(|(_, v)| v).collect::<Vec<_>>());
    }

    #[test]
    fn detects_a_length_mismatch() {
        let mut map = sample();
        map.append_value(4);

        assert_eq!(
            Err(InvariantViolation::LengthMismatch { keys: 3, values: 4 }),
            map.check_invariants()
        );
    }

    #[test]
    fn debug_formats_as_a_map() {
        assert_eq!(
            r#"{"spam": 1, "eggs": 2, "ham": 3}"#,
            format!("{:?}", sample())
        );
    }
}
