use crate::{DecodeError, FieldName, MapKey, OrderedMap, Strategy};

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use std::hash::Hash;
use std::marker::PhantomData;

// Upper bound on preallocation from untrusted size hints.
const MAX_PREALLOCATED: usize = 4096;

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: MapKey + Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strategy = Strategy::of::<K>();
        tracing::trace!(?strategy, "decoding ordered map");

        match strategy {
            Strategy::StringKeyed => deserializer.deserialize_map(OrderedMapVisitor::new()),
            // The encoder falls back to pairs when a key refuses conversion,
            // so both shapes are accepted here.
            Strategy::StringConvertible => deserializer.deserialize_any(OrderedMapVisitor::new()),
            Strategy::PairSequence => deserializer.deserialize_seq(OrderedMapVisitor::new()),
        }
    }
}

pub(crate) struct OrderedMapVisitor<K, V> {
    marker: PhantomData<fn() -> OrderedMap<K, V>>,
}

impl<K, V> OrderedMapVisitor<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: MapKey + Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match K::STRATEGY {
            Strategy::StringKeyed => f.write_str("a map of field names to values"),
            Strategy::StringConvertible => {
                f.write_str("a map of field names to values or a sequence of key-value pairs")
            }
            Strategy::PairSequence => f.write_str("a sequence of key-value pairs"),
        }
    }

    fn visit_map<A>(self, access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        if !K::STRATEGY.is_field_named() {
            return Err(de::Error::invalid_type(de::Unexpected::Map, &self));
        }

        decode_fields(access)
    }

    fn visit_seq<A>(self, access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        if K::STRATEGY == Strategy::StringKeyed {
            return Err(de::Error::invalid_type(de::Unexpected::Seq, &self));
        }

        decode_pairs(access)
    }
}

/// Pair-sequence decoding for any key type, used by [`crate::pairs`].
pub(crate) struct PairsVisitor<K, V> {
    marker: PhantomData<fn() -> OrderedMap<K, V>>,
}

impl<K, V> PairsVisitor<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<'de, K, V> Visitor<'de> for PairsVisitor<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a sequence of key-value pairs")
    }

    fn visit_seq<A>(self, access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        decode_pairs(access)
    }
}

fn decode_fields<'de, K, V, A>(mut access: A) -> Result<OrderedMap<K, V>, A::Error>
where
    K: MapKey + Hash + Eq,
    V: Deserialize<'de>,
    A: MapAccess<'de>,
{
    let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED);
    let mut map = OrderedMap::with_capacity(capacity);
    let mut offset = 0;

    while let Some(name) = access.next_key::<FieldName<'de>>()? {
        let key = K::from_field_name(name.as_str()).ok_or_else(|| {
            DecodeError::TypeMismatch {
                field: name.as_str().to_string(),
                expected: std::any::type_name::<K>(),
            }
            .raise::<A::Error>()
        })?;

        if map.find(&key).is_some() {
            return Err(DecodeError::DuplicateKey { offset }.raise());
        }

        let value = access.next_value::<V>()?;

        map.insert_new(key);
        map.append_value(value);
        offset += 1;
    }

    finish(map)
}

/// Read position within a pair sequence.
struct PairCursor<A> {
    access: A,
    offset: usize,
}

impl<'de, A: SeqAccess<'de>> PairCursor<A> {
    fn read<T: Deserialize<'de>>(&mut self) -> Result<Option<T>, A::Error> {
        let element = self.access.next_element()?;
        if element.is_some() {
            self.offset += 1;
        }
        Ok(element)
    }

    fn current_offset(&self) -> usize {
        self.offset
    }
}

fn decode_pairs<'de, K, V, A>(access: A) -> Result<OrderedMap<K, V>, A::Error>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
    A: SeqAccess<'de>,
{
    let capacity = (access.size_hint().unwrap_or(0) / 2).min(MAX_PREALLOCATED);
    let mut map = OrderedMap::with_capacity(capacity);
    let mut cursor = PairCursor { access, offset: 0 };

    loop {
        let offset = cursor.current_offset();

        let Some(key) = cursor.read::<K>()? else {
            break;
        };

        if map.find(&key).is_some() {
            return Err(DecodeError::DuplicateKey { offset }.raise());
        }

        let Some(value) = cursor.read::<V>()? else {
            return Err(DecodeError::TruncatedPairSequence { offset }.raise());
        };

        map.insert_new(key);
        map.append_value(value);
    }

    finish(map)
}

fn finish<K: Hash + Eq, V, E: de::Error>(map: OrderedMap<K, V>) -> Result<OrderedMap<K, V>, E> {
    map.check_invariants().map_err(E::custom)?;
    Ok(map)
}
