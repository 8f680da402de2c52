use std::io;

use byteorder::{BigEndian, WriteBytesExt};

use crate::{Amf0Marker, Amf0Value, Amf0WriteError};

/// Encodes [`Amf0Value`]s into a writer.
///
/// The counterpart of [`Amf0Decoder`](crate::Amf0Decoder); strings longer
/// than a u16 length are emitted as long strings.
pub struct Amf0Encoder;

impl Amf0Encoder {
    /// Encodes any value.
    pub fn encode(writer: &mut impl io::Write, value: &Amf0Value) -> Result<(), Amf0WriteError> {
        match value {
            Amf0Value::Number(n) => Self::encode_number(writer, *n),
            Amf0Value::Boolean(b) => Self::encode_bool(writer, *b),
            Amf0Value::String(s) => Self::encode_string(writer, s),
            Amf0Value::Object(properties) => Self::encode_object(writer, properties),
            Amf0Value::StrictArray(values) => Self::encode_strict_array(writer, values),
            Amf0Value::Date(unix_ms) => Self::encode_date(writer, *unix_ms),
            Amf0Value::Null => Self::encode_null(writer),
            Amf0Value::Undefined => Self::encode_undefined(writer),
        }
    }

    /// Encodes a number.
    pub fn encode_number(writer: &mut impl io::Write, value: f64) -> Result<(), Amf0WriteError> {
        writer.write_u8(Amf0Marker::Number as u8)?;
        writer.write_f64::<BigEndian>(value)?;
        Ok(())
    }

    /// Encodes a boolean.
    pub fn encode_bool(writer: &mut impl io::Write, value: bool) -> Result<(), Amf0WriteError> {
        writer.write_u8(Amf0Marker::Boolean as u8)?;
        writer.write_u8(value as u8)?;
        Ok(())
    }

    /// Encodes a string, choosing the long form when it does not fit a u16
    /// length.
    pub fn encode_string(writer: &mut impl io::Write, value: &str) -> Result<(), Amf0WriteError> {
        if value.len() > u16::MAX as usize {
            writer.write_u8(Amf0Marker::LongString as u8)?;
            writer.write_u32::<BigEndian>(value.len() as u32)?;
        } else {
            writer.write_u8(Amf0Marker::String as u8)?;
            writer.write_u16::<BigEndian>(value.len() as u16)?;
        }
        writer.write_all(value.as_bytes())?;
        Ok(())
    }

    /// Encodes a null.
    pub fn encode_null(writer: &mut impl io::Write) -> Result<(), Amf0WriteError> {
        writer.write_u8(Amf0Marker::Null as u8)?;
        Ok(())
    }

    /// Encodes an undefined.
    pub fn encode_undefined(writer: &mut impl io::Write) -> Result<(), Amf0WriteError> {
        writer.write_u8(Amf0Marker::Undefined as u8)?;
        Ok(())
    }

    /// Encodes a date (milliseconds since the Unix epoch, timezone 0).
    pub fn encode_date(writer: &mut impl io::Write, unix_ms: f64) -> Result<(), Amf0WriteError> {
        writer.write_u8(Amf0Marker::Date as u8)?;
        writer.write_f64::<BigEndian>(unix_ms)?;
        writer.write_i16::<BigEndian>(0)?;
        Ok(())
    }

    /// Encodes an anonymous object.
    pub fn encode_object(
        writer: &mut impl io::Write,
        properties: &[(String, Amf0Value)],
    ) -> Result<(), Amf0WriteError> {
        writer.write_u8(Amf0Marker::Object as u8)?;
        for (key, value) in properties {
            Self::encode_property_key(writer, key)?;
            Self::encode(writer, value)?;
        }
        writer.write_u24::<BigEndian>(Amf0Marker::ObjectEnd as u32)?;
        Ok(())
    }

    /// Encodes a strict array.
    pub fn encode_strict_array(
        writer: &mut impl io::Write,
        values: &[Amf0Value],
    ) -> Result<(), Amf0WriteError> {
        writer.write_u8(Amf0Marker::StrictArray as u8)?;
        writer.write_u32::<BigEndian>(values.len() as u32)?;
        for value in values {
            Self::encode(writer, value)?;
        }
        Ok(())
    }

    fn encode_property_key(
        writer: &mut impl io::Write,
        key: &str,
    ) -> Result<(), Amf0WriteError> {
        writer.write_u16::<BigEndian>(key.len() as u16)?;
        writer.write_all(key.as_bytes())?;
        Ok(())
    }
}
