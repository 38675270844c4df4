use super::{encode_dict_begin, encode_end, encode_integer, encode_list_begin, encode_string};

use bytes::{BufMut, Bytes, BytesMut};
use serde::ser::{self, Impossible, Serialize};

struct Serializer {
    buf: BytesMut,
}

impl Serializer {
    fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    UnsupportedElement(Option<String>),
    InvalidMapKey,
    DuplicateMapKey(Vec<u8>),
    IntegerOutOfRange(u64),
    Other(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedElement(w) => {
                if let Some(w) = w {
                    f.write_fmt(format_args!("unsupported element: {}", w))
                } else {
                    f.write_str("unsupported element")
                }
            }
            Self::InvalidMapKey => f.write_str("invalid map key: keys must be strings"),
            Self::DuplicateMapKey(k) => f.write_fmt(format_args!(
                "duplicate map key: {}",
                String::from_utf8_lossy(k)
            )),
            Self::IntegerOutOfRange(i) => {
                f.write_fmt(format_args!("integer out of range: {}", i))
            }
            Self::Other(s) => f.write_fmt(format_args!("other error: {}", s)),
        }
    }
}

fn unsupported_element<T>(which: Option<&str>) -> Result<T, Error> {
    Err(Error::UnsupportedElement(which.map(ToString::to_string)))
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Other(msg.to_string())
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();

    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;

    type SerializeTuple = SeqSerializer<'a>;

    type SerializeTupleStruct = SeqSerializer<'a>;

    type SerializeTupleVariant = Impossible<(), Error>;

    type SerializeMap = MapSerializer<'a>;

    type SerializeStruct = MapSerializer<'a>;

    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok, Self::Error> {
        unsupported_element(Some("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        encode_integer(v, &mut self.buf);

        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        let v = i64::try_from(v).map_err(|_| Error::IntegerOutOfRange(v))?;
        self.serialize_i64(v)
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        unsupported_element(Some("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        unsupported_element(Some("f64"))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut tmp = [0; 4];
        self.serialize_str(v.encode_utf8(&mut tmp))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        encode_string(v.as_bytes(), &mut self.buf);

        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        encode_string(v, &mut self.buf);

        Ok(())
    }

    // Bencode has no null.
    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        unsupported_element(Some("none"))
    }

    fn serialize_some<T: ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        unsupported_element(Some("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        unsupported_element(Some("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        encode_dict_begin(&mut self.buf);
        encode_string(variant.as_bytes(), &mut self.buf);
        value.serialize(&mut *self)?;
        encode_end(&mut self.buf);

        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(SeqSerializer::new(self))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(SeqSerializer::new(self))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(SeqSerializer::new(self))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        unsupported_element(Some("tuple variant"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(MapSerializer::new(self, len.unwrap_or(0)))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(MapSerializer::new(self, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        unsupported_element(Some("struct variant"))
    }
}

struct SeqSerializer<'a> {
    serializer: &'a mut Serializer,
}

impl<'a> SeqSerializer<'a> {
    fn new(serializer: &'a mut Serializer) -> Self {
        encode_list_begin(&mut serializer.buf);
        Self { serializer }
    }

    fn element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        value.serialize(&mut *self.serializer)
    }

    fn finish(self) -> Result<(), Error> {
        encode_end(&mut self.serializer.buf);
        Ok(())
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();

    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ();

    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = ();

    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

/// Buffers every entry so the dict can be written with its keys sorted, as
/// bencode requires. Write order is not preserved.
struct MapSerializer<'a> {
    serializer: &'a mut Serializer,
    entries: Vec<(Vec<u8>, BytesMut)>,
    pending_key: Option<Vec<u8>>,
}

impl<'a> MapSerializer<'a> {
    fn new(serializer: &'a mut Serializer, len: usize) -> Self {
        Self {
            serializer,
            entries: Vec::with_capacity(len),
            pending_key: None,
        }
    }

    fn entry<T: ?Sized + Serialize>(&mut self, key: Vec<u8>, value: &T) -> Result<(), Error> {
        let mut value_serializer = Serializer::new();
        value.serialize(&mut value_serializer)?;

        self.entries.push((key, value_serializer.buf));

        Ok(())
    }

    fn finish(mut self) -> Result<(), Error> {
        self.entries.sort_by(|x, y| x.0.cmp(&y.0));

        if let Some(w) = self.entries.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::DuplicateMapKey(w[0].0.clone()));
        }

        let buf = &mut self.serializer.buf;
        encode_dict_begin(buf);
        for (k, v) in &self.entries {
            encode_string(k, buf);
            buf.put_slice(v);
        }
        encode_end(buf);

        Ok(())
    }
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();

    type Error = Error;

    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.pending_key = Some(key.serialize(MapKeySerializer)?);

        Ok(())
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::Other("map value written before its key".to_string()))?;

        self.entry(key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl<'a> ser::SerializeStruct for MapSerializer<'a> {
    type Ok = ();

    type Error = Error;

    fn serialize_field<T: ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.entry(key.as_bytes().to_vec(), value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

/// Captures the raw bytes of a dict key. Only strings (and things that
/// serialize as strings) are accepted.
struct MapKeySerializer;

fn invalid_map_key<T>() -> Result<T, Error> {
    Err(Error::InvalidMapKey)
}

impl ser::Serializer for MapKeySerializer {
    type Ok = Vec<u8>;

    type Error = Error;

    type SerializeSeq = Impossible<Vec<u8>, Error>;

    type SerializeTuple = Impossible<Vec<u8>, Error>;

    type SerializeTupleStruct = Impossible<Vec<u8>, Error>;

    type SerializeTupleVariant = Impossible<Vec<u8>, Error>;

    type SerializeMap = Impossible<Vec<u8>, Error>;

    type SerializeStruct = Impossible<Vec<u8>, Error>;

    type SerializeStructVariant = Impossible<Vec<u8>, Error>;

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(v.as_bytes().to_vec())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(v.to_vec())
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut tmp = [0; 4];
        self.serialize_str(v.encode_utf8(&mut tmp))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_u8(self, _v: u8) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_u16(self, _v: u16) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_u32(self, _v: u32) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_some<T: ?Sized>(self, _value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        invalid_map_key()
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        invalid_map_key()
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        invalid_map_key()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        invalid_map_key()
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        invalid_map_key()
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        invalid_map_key()
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        invalid_map_key()
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        invalid_map_key()
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        invalid_map_key()
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        invalid_map_key()
    }
}

pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Bytes, Error> {
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer)?;

    Ok(serializer.buf.freeze())
}
