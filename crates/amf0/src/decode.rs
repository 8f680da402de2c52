use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use num_traits::FromPrimitive;

use crate::{Amf0Marker, Amf0ReadError, Amf0Value};

/// Walks a byte slice of AMF0-encoded values.
///
/// Values are decoded into owned [`Amf0Value`]s. [`position`](Self::position)
/// tells how many bytes have been consumed, so a caller parsing a larger
/// structure knows where the AMF0 data ended.
pub struct Amf0Decoder<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Amf0Decoder<'a> {
    /// Creates a decoder over `buf`.
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
        }
    }

    /// Whether all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.cursor.position() as usize >= self.cursor.get_ref().len()
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Decodes the next value.
    pub fn decode(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        let byte = self.cursor.read_u8()?;
        let marker = Amf0Marker::from_u8(byte).ok_or(Amf0ReadError::UnknownMarker(byte))?;

        match marker {
            Amf0Marker::Number => Ok(Amf0Value::Number(self.cursor.read_f64::<BigEndian>()?)),
            Amf0Marker::Boolean => Ok(Amf0Value::Boolean(self.cursor.read_u8()? != 0)),
            Amf0Marker::String => Ok(Amf0Value::String(self.read_string()?)),
            Amf0Marker::LongString => Ok(Amf0Value::String(self.read_long_string()?)),
            Amf0Marker::Object => Ok(Amf0Value::Object(self.read_object()?)),
            Amf0Marker::EcmaArray => Ok(Amf0Value::Object(self.read_ecma_array()?)),
            Amf0Marker::StrictArray => Ok(Amf0Value::StrictArray(self.read_strict_array()?)),
            Amf0Marker::Date => Ok(self.read_date()?),
            Amf0Marker::Null => Ok(Amf0Value::Null),
            Amf0Marker::Undefined => Ok(Amf0Value::Undefined),
            _ => Err(Amf0ReadError::UnsupportedType(marker)),
        }
    }

    /// Decodes the next value, requiring it to carry `expected`.
    pub fn decode_with_type(&mut self, expected: Amf0Marker) -> Result<Amf0Value, Amf0ReadError> {
        let pos = self.cursor.position();
        let byte = self.cursor.read_u8()?;
        self.cursor.set_position(pos);

        let got = Amf0Marker::from_u8(byte).ok_or(Amf0ReadError::UnknownMarker(byte))?;
        if got != expected {
            return Err(Amf0ReadError::WrongType { expected, got });
        }

        self.decode()
    }

    /// Decodes values until the buffer is exhausted.
    pub fn decode_all(&mut self) -> Result<Vec<Amf0Value>, Amf0ReadError> {
        let mut values = Vec::new();
        while !self.is_empty() {
            values.push(self.decode()?);
        }
        Ok(values)
    }

    fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, Amf0ReadError> {
        let mut buf = vec![0; len];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_string(&mut self) -> Result<String, Amf0ReadError> {
        let len = self.cursor.read_u16::<BigEndian>()? as usize;
        let raw = self.read_raw(len)?;
        Ok(std::str::from_utf8(&raw)?.to_string())
    }

    fn read_long_string(&mut self) -> Result<String, Amf0ReadError> {
        let len = self.cursor.read_u32::<BigEndian>()? as usize;
        let raw = self.read_raw(len)?;
        Ok(std::str::from_utf8(&raw)?.to_string())
    }

    fn read_date(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        let unix_ms = self.cursor.read_f64::<BigEndian>()?;
        // reserved timezone field, always 0x0000
        self.cursor.read_i16::<BigEndian>()?;
        Ok(Amf0Value::Date(unix_ms))
    }

    /// Consumes an object-end marker (`00 00 09`) if one is next.
    fn eat_object_end(&mut self) -> bool {
        let pos = self.cursor.position();
        match self.cursor.read_u24::<BigEndian>() {
            Ok(v) if v == Amf0Marker::ObjectEnd as u32 => true,
            _ => {
                self.cursor.set_position(pos);
                false
            }
        }
    }

    fn read_object(&mut self) -> Result<Vec<(String, Amf0Value)>, Amf0ReadError> {
        let mut properties = Vec::new();
        while !self.eat_object_end() {
            let key = self.read_string()?;
            let value = self.decode()?;
            properties.push((key, value));
        }
        Ok(properties)
    }

    fn read_ecma_array(&mut self) -> Result<Vec<(String, Amf0Value)>, Amf0ReadError> {
        let count = self.cursor.read_u32::<BigEndian>()?;

        let mut properties = Vec::new();
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.decode()?;
            properties.push((key, value));
        }

        // Some muxers terminate ECMA arrays with an object-end marker even
        // though the count already delimits them; consume it if present.
        self.eat_object_end();

        Ok(properties)
    }

    fn read_strict_array(&mut self) -> Result<Vec<Amf0Value>, Amf0ReadError> {
        let count = self.cursor.read_u32::<BigEndian>()?;

        let mut values = Vec::new();
        for _ in 0..count {
            values.push(self.decode()?);
        }
        Ok(values)
    }
}

impl Iterator for Amf0Decoder<'_> {
    type Item = Result<Amf0Value, Amf0ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }
        Some(self.decode())
    }
}
