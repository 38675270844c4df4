//! Bencode as a serde data format.
//!
//! Dictionaries are always written with their keys sorted, so a serialized
//! map does not keep the order its entries were written in. Lists keep
//! their order.

mod decode;
mod encode;
mod repr;

pub use decode::{from_bytes, parse, Deserializer, Error as DecodeError, Parser};
pub use encode::{to_bytes, Error as EncodeError};
pub use repr::{Element, Elements};

#[cfg(test)]
mod test {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn round_trips_nested_values() {
        let mut value = BTreeMap::new();
        value.insert("spam".to_string(), vec![(1i64, "a".to_string())]);
        value.insert("eggs".to_string(), vec![]);

        let encoded = to_bytes(&value).unwrap();
        let decoded: BTreeMap<String, Vec<(i64, String)>> = from_bytes(&encoded).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn parses_what_it_encodes() {
        let encoded = to_bytes(&vec![vec!["a"], vec![]]).unwrap();

        assert_eq!(
            vec![
                &Element::ListBegin(2),
                &Element::ListBegin(1),
                &Element::Bytes("a".as_bytes()),
                &Element::ListBegin(0),
            ],
            (&parse(&encoded).unwrap()).into_iter().collect::<Vec<_>>()
        );
    }
}
