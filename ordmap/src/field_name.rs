use serde::de::{self, Unexpected, Visitor};

use std::borrow::Cow;

/// A string used as the name of an entry in a field-named container.
///
/// Field names here are always derived from strings, so there is no integer
/// form: `int_value` is always `None` and an integer never becomes a
/// `FieldName`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldName<'a> {
    ByName(Cow<'a, str>),
}

impl<'a> FieldName<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>) -> Self {
        Self::ByName(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ByName(name) => name.as_ref(),
        }
    }

    pub fn into_name(self) -> Cow<'a, str> {
        match self {
            Self::ByName(name) => name,
        }
    }

    pub fn int_value(&self) -> Option<i64> {
        None
    }

    pub fn from_int_value(_value: i64) -> Option<Self> {
        None
    }
}

impl serde::Serialize for FieldName<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de: 'a, 'a> serde::Deserialize<'de> for FieldName<'a> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(FieldNameVisitor)
    }
}

struct FieldNameVisitor;

impl<'de> Visitor<'de> for FieldNameVisitor {
    type Value = FieldName<'de>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a field name")
    }

    fn visit_borrowed_str<E: de::Error>(self, v: &'de str) -> Result<Self::Value, E> {
        Ok(FieldName::new(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(FieldName::new(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(FieldName::new(v))
    }

    fn visit_borrowed_bytes<E: de::Error>(self, v: &'de [u8]) -> Result<Self::Value, E> {
        match std::str::from_utf8(v) {
            Ok(s) => Ok(FieldName::new(s)),
            Err(_) => Err(E::invalid_value(Unexpected::Bytes(v), &self)),
        }
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        match std::str::from_utf8(v) {
            Ok(s) => Ok(FieldName::new(s.to_owned())),
            Err(_) => Err(E::invalid_value(Unexpected::Bytes(v), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        FieldName::from_int_value(v).ok_or_else(|| E::invalid_type(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .ok()
            .and_then(FieldName::from_int_value)
            .ok_or_else(|| E::invalid_type(Unexpected::Unsigned(v), &self))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use serde::de::value::U64Deserializer;
    use serde::de::IntoDeserializer;
    use serde::Deserialize;

    #[test]
    fn serializes_as_a_plain_string() {
        assert_eq!(
            r#""spam""#,
            serde_json::to_string(&FieldName::new("spam")).unwrap()
        );
    }

    #[test]
    fn borrows_from_the_input_when_it_can() {
        let name: FieldName<'_> = serde_json::from_str(r#""spam""#).unwrap();
        assert!(matches!(name, FieldName::ByName(Cow::Borrowed("spam"))));

        let escaped: FieldName<'_> = serde_json::from_str(r#""sp\"am""#).unwrap();
        assert_eq!("sp\"am", escaped.as_str());
    }

    #[test]
    fn accepts_utf8_byte_strings() {
        let name: FieldName<'_> = ordmap_bencode::from_bytes(b"4:spam").unwrap();
        assert_eq!("spam", name.as_str());

        assert!(ordmap_bencode::from_bytes::<FieldName<'_>>(b"2:\xff\xfe").is_err());
    }

    #[test]
    fn has_no_integer_identity() {
        assert_eq!(None, FieldName::new("7").int_value());
        assert_eq!(None, FieldName::from_int_value(7));

        let integer: U64Deserializer<serde::de::value::Error> = 7u64.into_deserializer();
        let err = FieldName::deserialize(integer).unwrap_err();
        assert_eq!(
            "invalid type: integer `7`, expected a field name",
            err.to_string()
        );
    }
}
