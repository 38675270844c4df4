use super::{parse, Error};
use crate::{Element, Elements};

use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Other(msg.to_string())
    }
}

/// A serde deserializer over a parsed bencode document.
///
/// Byte strings are offered to visitors as borrowed bytes, or as borrowed
/// `str` when the visitor asks for a string and the bytes are valid UTF-8.
pub struct Deserializer<'de> {
    elements: std::vec::IntoIter<Element<&'de [u8]>>,
}

impl<'de> Deserializer<'de> {
    pub fn from_elements(elements: Elements<&'de [u8]>) -> Self {
        Self {
            elements: elements.into_iter(),
        }
    }

    /// Fails if any elements were left unconsumed.
    pub fn end(&self) -> Result<(), Error> {
        match self.elements.len() {
            0 => Ok(()),
            n => Err(Error::TrailingElements(n)),
        }
    }

    fn next(&mut self) -> Result<Element<&'de [u8]>, Error> {
        self.elements
            .next()
            .ok_or_else(|| Error::UnexpectedEnd("element".to_string()))
    }

    fn peek(&self) -> Option<&Element<&'de [u8]>> {
        self.elements.as_slice().first()
    }

    fn skip(&mut self) -> Result<(), Error> {
        match self.next()? {
            Element::Int(_) | Element::Bytes(_) => {}
            Element::ListBegin(ct) => {
                for _ in 0..ct {
                    self.skip()?;
                }
            }
            Element::DictBegin(ct) => {
                for _ in 0..ct {
                    self.skip()?;
                    self.skip()?;
                }
            }
        }
        Ok(())
    }

    fn visit_list<V>(&mut self, ct: usize, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let mut access = ListAccess {
            de: self,
            remaining: ct,
        };
        let value = visitor.visit_seq(&mut access)?;
        match access.remaining {
            0 => Ok(value),
            n => Err(Error::TrailingElements(n)),
        }
    }

    fn visit_dict<V>(&mut self, ct: usize, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let mut access = DictAccess {
            de: self,
            remaining: ct,
        };
        let value = visitor.visit_map(&mut access)?;
        match access.remaining {
            0 => Ok(value),
            n => Err(Error::TrailingElements(n)),
        }
    }
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.next()? {
            Element::Int(i) => visitor.visit_i64(i),
            Element::Bytes(bs) => visitor.visit_borrowed_bytes(bs),
            Element::ListBegin(ct) => self.visit_list(ct, visitor),
            Element::DictBegin(ct) => self.visit_dict(ct, visitor),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if let Some(Element::Bytes(bs)) = self.peek() {
            let bs: &'de [u8] = *bs;
            self.elements.next();

            return match std::str::from_utf8(bs) {
                Ok(s) => visitor.visit_borrowed_str(s),
                Err(_) => visitor.visit_borrowed_bytes(bs),
            };
        }

        self.deserialize_any(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    // Bencode has no null, so anything present is `Some`.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.next()? {
            Element::Bytes(bs) => {
                let variant = std::str::from_utf8(bs)
                    .map_err(|_| Error::Other("enum variant is not valid utf-8".to_string()))?;
                visitor.visit_enum(variant.into_deserializer())
            }
            Element::DictBegin(1) => visitor.visit_enum(EnumAccess { de: self }),
            _ => Err(Error::Other(
                "expected a string or a single entry dict for an enum".to_string(),
            )),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.skip()?;
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool
        u8
        u16
        u32
        u64
        i8
        i16
        i32
        i64
        f32
        f64
        bytes
        byte_buf
        unit
        unit_struct
        seq
        tuple
        tuple_struct
        map
        struct
    }
}

struct ListAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'de, 'a> de::SeqAccess<'de> for ListAccess<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct DictAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'de, 'a> de::MapAccess<'de> for DictAccess<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct EnumAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumAccess<'a, 'de> {
    type Error = Error;

    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let v = seed.deserialize(&mut *self.de)?;
        Ok((v, self))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for EnumAccess<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Err(Error::Other("expected a newtype variant".to_string()))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(&mut *self.de, visitor)
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_map(&mut *self.de, visitor)
    }
}

pub fn from_bytes<'de, T: serde::Deserialize<'de>>(input: &'de [u8]) -> Result<T, Error> {
    let elements = parse(input)?;
    let mut deserializer = Deserializer::from_elements(elements);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;

    Ok(value)
}

#[cfg(test)]
mod test {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn deserializes_scalars() {
        assert_eq!(127i64, from_bytes::<i64>(b"i127e").unwrap());
        assert_eq!(7u8, from_bytes::<u8>(b"i7e").unwrap());
        assert_eq!("spam", from_bytes::<&str>(b"4:spam").unwrap());
        assert_eq!('x', from_bytes::<char>(b"1:x").unwrap());
    }

    #[test]
    fn rejects_out_of_range_ints() {
        assert!(from_bytes::<u8>(b"i256e").is_err());
    }

    #[test]
    fn deserializes_structs() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Announce<'a> {
            interval: u32,
            #[serde(with = "serde_bytes")]
            peers: &'a [u8],
            tracker_id: Option<String>,
        }

        let value: Announce<'_> =
            from_bytes(b"d8:intervali1800e5:peers6:\x7f\x00\x00\x01\x1a\xe1e").unwrap();

        assert_eq!(
            Announce {
                interval: 1800,
                peers: b"\x7f\x00\x00\x01\x1a\xe1",
                tracker_id: None
            },
            value
        );
    }

    #[test]
    fn skips_unknown_fields() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Reply {
            complete: i64,
        }

        let value: Reply = from_bytes(b"d8:completei4e5:extrald1:ai1eeee").unwrap();

        assert_eq!(Reply { complete: 4 }, value);
    }

    #[test]
    fn deserializes_dicts_in_document_order() {
        let pairs: Vec<(String, i64)> = from_bytes::<BTreeMap<String, i64>>(b"d1:ai1e1:bi2ee")
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(vec![("a".to_string(), 1), ("b".to_string(), 2)], pairs);
    }

    #[test]
    fn rejects_unread_list_elements() {
        assert_eq!(
            Err(Error::TrailingElements(1)),
            from_bytes::<(i64, i64)>(b"li1ei2ei3ee")
        );
    }

    #[test]
    fn deserializes_enums() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        enum Event {
            Started,
            Completed(i64),
        }

        assert_eq!(Event::Started, from_bytes(b"7:Started").unwrap());
        assert_eq!(Event::Completed(7), from_bytes(b"d9:Completedi7ee").unwrap());
    }
}
