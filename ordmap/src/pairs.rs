//! Always encode an [`OrderedMap`] as a pair sequence, whatever its key type.
//!
//! For use with `#[serde(with = "ordmap::pairs")]` on fields whose keys do
//! not implement [`MapKey`](crate::MapKey), or when the exact entry order has
//! to survive a host format that sorts field-named containers.

use crate::de::PairsVisitor;
use crate::OrderedMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::hash::Hash;

pub fn serialize<K, V, S>(map: &OrderedMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize,
    V: Serialize,
    S: Serializer,
{
    crate::ser::serialize_pairs(map, serializer)
}

pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<OrderedMap<K, V>, D::Error>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
    D: Deserializer<'de>,
{
    deserializer.deserialize_seq(PairsVisitor::new())
}
