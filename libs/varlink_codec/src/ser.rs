//! Exposes a serializer that drives an [`Encoder`] and serialization helper
//! methods.

use bytes::Bytes;
use serde::ser;

use crate::config::EncoderConfig;
use crate::encoder::{Checkpoint, Encoder};
use crate::error::{Error, Result};

/// Serializes a value to a framed message, using the default
/// [`EncoderConfig`].
///
/// `value` should be a flat struct or tuple of supported fields, or a single
/// supported value. See the crate root for the type mapping.
///
/// # Errors
///
/// Returns `Err` if `value` contains a type without a flat encoding or if its
/// [`Serialize`](ser::Serialize) implementation fails.
pub fn to_bytes<T>(value: &T) -> Result<Bytes>
where
    T: ?Sized + ser::Serialize,
{
    to_bytes_with_config(&EncoderConfig::default(), value)
}

/// Serializes a value to a framed message, pre-allocating according to
/// `config`.
///
/// # Errors
///
/// Same as [`to_bytes`].
pub fn to_bytes_with_config<T>(config: &EncoderConfig, value: &T) -> Result<Bytes>
where
    T: ?Sized + ser::Serialize,
{
    let mut encoder = Encoder::with_config(config);
    value.serialize(Serializer::new(&mut encoder))?;
    encoder.close()
}

/// A [`Serializer`] that writes into an [`Encoder`].
///
/// Struct and tuple fields become writes into the same frame, so only the
/// outermost value may be a struct or tuple.
///
/// [`Serializer`]: serde::ser::Serializer
#[derive(Debug)]
pub struct Serializer<'a> {
    encoder: &'a mut Encoder,
    nested: bool,
}

impl<'a> Serializer<'a> {
    /// Creates a new serializer that writes into `encoder`.
    ///
    /// The encoder is not closed when serialization finishes, so more values
    /// may be written afterwards. If a struct or tuple fails partway through,
    /// its already written fields are discarded again.
    pub fn new(encoder: &'a mut Encoder) -> Self {
        Self {
            encoder,
            nested: false,
        }
    }

    fn field(&mut self) -> Serializer<'_> {
        Serializer {
            encoder: &mut *self.encoder,
            nested: true,
        }
    }

    fn begin_struct(self, what: &'static str) -> Result<Compound<'a>> {
        if self.nested {
            return Err(Error::Unsupported(what));
        }

        let checkpoint = self.encoder.checkpoint();
        Ok(Compound {
            ser: self,
            checkpoint,
        })
    }
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ser::Impossible<(), Error>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = ser::Impossible<(), Error>;
    type SerializeMap = ser::Impossible<(), Error>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = ser::Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.encoder.write_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.encoder.write_i8(v)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.encoder.write_i16(v)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.encoder.write_i32(v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.encoder.write_i64(v)
    }

    fn serialize_i128(self, _v: i128) -> Result<()> {
        Err(Error::Unsupported("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.encoder.write_u8(v)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.encoder.write_u16(v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.encoder.write_u32(v)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.encoder.write_u64(v)
    }

    fn serialize_u128(self, _v: u128) -> Result<()> {
        Err(Error::Unsupported("u128"))
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(Error::Unsupported("f32"))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.encoder.write_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.encoder.write_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.encoder.write_str(v)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(Error::Unsupported("byte array"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(Error::Unsupported("option"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        Err(Error::Unsupported("option"))
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(Error::Unsupported("enum"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        Err(Error::Unsupported("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::Unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.begin_struct("nested tuple")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.begin_struct("nested tuple struct")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::Unsupported("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::Unsupported("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.begin_struct("nested struct")
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::Unsupported("enum"))
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Writes the fields of a struct or tuple into the enclosing frame.
#[doc(hidden)]
pub struct Compound<'a> {
    ser: Serializer<'a>,
    checkpoint: Checkpoint,
}

impl Compound<'_> {
    fn write_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        let res = value.serialize(self.ser.field());
        if res.is_err() {
            self.ser.encoder.rollback(self.checkpoint);
        }

        res
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        self.write_field(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        self.write_field(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        self.write_field(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}
