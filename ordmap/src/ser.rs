use crate::key::field_names;
use crate::{FieldName, MapKey, OrderedMap, Strategy};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

impl<K: MapKey, V> OrderedMap<K, V> {
    /// The strategy serialization will use for the keys currently in the map.
    ///
    /// Unlike [`Strategy::of`] this looks at the keys themselves: a single key
    /// refusing its string conversion selects [`Strategy::PairSequence`].
    pub fn strategy(&self) -> Strategy {
        match field_names(self.keys()) {
            Some(_) => K::STRATEGY,
            None => Strategy::PairSequence,
        }
    }
}

impl<K, V> Serialize for OrderedMap<K, V>
where
    K: MapKey + Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match field_names(self.keys()) {
            Some(names) => {
                tracing::trace!(strategy = ?K::STRATEGY, len = self.len(), "encoding ordered map");
                serialize_fields(&names, self, serializer)
            }
            None => {
                tracing::trace!(strategy = ?Strategy::PairSequence, len = self.len(), "encoding ordered map");
                serialize_pairs(self, serializer)
            }
        }
    }
}

fn serialize_fields<K, V, S>(
    names: &[FieldName<'_>],
    map: &OrderedMap<K, V>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    let mut fields = serializer.serialize_map(Some(names.len()))?;

    for (name, value) in names.iter().zip(map.values()) {
        fields.serialize_entry(name, value)?;
    }

    fields.end()
}

pub(crate) fn serialize_pairs<K, V, S>(map: &OrderedMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize,
    V: Serialize,
    S: Serializer,
{
    let mut pairs = serializer.serialize_seq(Some(2 * map.len()))?;

    for (k, v) in map {
        pairs.serialize_element(k)?;
        pairs.serialize_element(v)?;
    }

    pairs.end()
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::test::Slug;

    #[test]
    fn writes_string_keys_as_field_names() {
        let map = OrderedMap::from([("b".to_string(), 1), ("a".to_string(), 2)]);

        assert_eq!(Strategy::StringKeyed, map.strategy());
        assert_eq!(r#"{"b":1,"a":2}"#, serde_json::to_string(&map).unwrap());
    }

    #[test]
    fn writes_converted_keys_as_field_names() {
        let map = OrderedMap::from([(10u16, "ten"), (9, "nine")]);

        assert_eq!(Strategy::StringConvertible, map.strategy());
        assert_eq!(
            r#"{"10":"ten","9":"nine"}"#,
            serde_json::to_string(&map).unwrap()
        );
    }

    #[test]
    fn writes_other_keys_as_a_flat_pair_sequence() {
        let map = OrderedMap::from([((1, 2), "a"), ((0, 0), "b")]);

        assert_eq!(Strategy::PairSequence, map.strategy());
        assert_eq!(
            r#"[[1,2],"a",[0,0],"b"]"#,
            serde_json::to_string(&map).unwrap()
        );
    }

    #[test]
    fn falls_back_when_one_key_refuses_conversion() {
        let map = OrderedMap::from([(Slug("spam".into()), 1), (Slug(String::new()), 2)]);

        assert_eq!(Strategy::StringConvertible, Strategy::of::<Slug>());
        assert_eq!(Strategy::PairSequence, map.strategy());
        assert_eq!(r#"["spam",1,"",2]"#, serde_json::to_string(&map).unwrap());
    }

    #[test]
    fn encodes_empty_maps_per_strategy() {
        assert_eq!(
            "{}",
            serde_json::to_string(&OrderedMap::<String, i32>::new()).unwrap()
        );
        assert_eq!(
            "{}",
            serde_json::to_string(&OrderedMap::<i32, i32>::new()).unwrap()
        );
        assert_eq!(
            "[]",
            serde_json::to_string(&OrderedMap::<(i32, i32), i32>::new()).unwrap()
        );
    }

    #[test]
    fn encoding_is_repeatable() {
        let map = OrderedMap::from([("x".to_string(), vec![1, 2]), ("y".to_string(), vec![])]);

        assert_eq!(
            serde_json::to_vec(&map).unwrap(),
            serde_json::to_vec(&map).unwrap()
        );
        assert_eq!(
            ordmap_bencode::to_bytes(&map).unwrap(),
            ordmap_bencode::to_bytes(&map).unwrap()
        );
    }

    #[test]
    fn bencode_sorts_field_names_but_keeps_pair_order() {
        let fields = OrderedMap::from([("spam".to_string(), 1), ("eggs".to_string(), 2)]);
        assert_eq!(
            &b"d4:eggsi2e4:spami1ee"[..],
            ordmap_bencode::to_bytes(&fields).unwrap()
        );

        let pairs = OrderedMap::from([(vec![2u8], 1), (vec![1u8], 2)]);
        assert_eq!(
            &b"lli2eei1eli1eei2ee"[..],
            ordmap_bencode::to_bytes(&pairs).unwrap()
        );
    }
}
