use num_derive::FromPrimitive;

/// AMF0 marker bytes.
/// Defined in amf0-file-format-specification.pdf section 2.1
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive)]
#[repr(u8)]
pub enum Amf0Marker {
    /// number-marker
    Number = 0x00,
    /// boolean-marker
    Boolean = 0x01,
    /// string-marker
    String = 0x02,
    /// object-marker
    Object = 0x03,
    /// movieclip-marker (reserved, not supported)
    MovieClip = 0x04,
    /// null-marker
    Null = 0x05,
    /// undefined-marker
    Undefined = 0x06,
    /// reference-marker (not supported)
    Reference = 0x07,
    /// ecma-array-marker
    EcmaArray = 0x08,
    /// object-end-marker
    ObjectEnd = 0x09,
    /// strict-array-marker
    StrictArray = 0x0a,
    /// date-marker
    Date = 0x0b,
    /// long-string-marker
    LongString = 0x0c,
    /// unsupported-marker
    Unsupported = 0x0d,
    /// recordset-marker (reserved, not supported)
    Recordset = 0x0e,
    /// xml-document-marker (not supported)
    XmlDocument = 0x0f,
    /// typed-object-marker (not supported)
    TypedObject = 0x10,
    /// avmplus-object-marker (AMF3 escape, not supported)
    AvmPlusObject = 0x11,
}

/// A decoded AMF0 value.
///
/// Values are fully owned; a decoded metadata tree can outlive the buffer it
/// was decoded from. Long strings decode into [`Amf0Value::String`] and ECMA
/// arrays into [`Amf0Value::Object`].
#[derive(Debug, Clone, PartialEq)]
pub enum Amf0Value {
    /// Number type, section 2.2 (all AMF0 numbers are f64)
    Number(f64),
    /// Boolean type, section 2.3
    Boolean(bool),
    /// String (2.4) or long string (2.14) type
    String(String),
    /// Object (2.5) or ECMA array (2.10) type: ordered key/value pairs
    Object(Vec<(String, Amf0Value)>),
    /// Strict array type, section 2.12
    StrictArray(Vec<Amf0Value>),
    /// Date type, section 2.13: milliseconds since the Unix epoch (the
    /// reserved timezone field is discarded)
    Date(f64),
    /// Null type, section 2.7
    Null,
    /// Undefined type, section 2.8
    Undefined,
}

impl Amf0Value {
    /// The marker this value encodes with.
    pub fn marker(&self) -> Amf0Marker {
        match self {
            Self::Number(_) => Amf0Marker::Number,
            Self::Boolean(_) => Amf0Marker::Boolean,
            Self::String(s) if s.len() > u16::MAX as usize => Amf0Marker::LongString,
            Self::String(_) => Amf0Marker::String,
            Self::Object(_) => Amf0Marker::Object,
            Self::StrictArray(_) => Amf0Marker::StrictArray,
            Self::Date(_) => Amf0Marker::Date,
            Self::Null => Amf0Marker::Null,
            Self::Undefined => Amf0Marker::Undefined,
        }
    }

    /// Looks up a property of an [`Amf0Value::Object`] by key.
    pub fn get(&self, key: &str) -> Option<&Amf0Value> {
        match self {
            Self::Object(properties) => {
                properties.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// The contained number, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The contained boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The contained string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use num_traits::FromPrimitive;

    use super::*;

    #[test]
    fn test_markers() {
        let cases = [
            (Amf0Marker::Number, 0x00),
            (Amf0Marker::Boolean, 0x01),
            (Amf0Marker::String, 0x02),
            (Amf0Marker::Object, 0x03),
            (Amf0Marker::MovieClip, 0x04),
            (Amf0Marker::Null, 0x05),
            (Amf0Marker::Undefined, 0x06),
            (Amf0Marker::Reference, 0x07),
            (Amf0Marker::EcmaArray, 0x08),
            (Amf0Marker::ObjectEnd, 0x09),
            (Amf0Marker::StrictArray, 0x0a),
            (Amf0Marker::Date, 0x0b),
            (Amf0Marker::LongString, 0x0c),
            (Amf0Marker::Unsupported, 0x0d),
            (Amf0Marker::Recordset, 0x0e),
            (Amf0Marker::XmlDocument, 0x0f),
            (Amf0Marker::TypedObject, 0x10),
            (Amf0Marker::AvmPlusObject, 0x11),
        ];

        for (marker, byte) in cases {
            assert_eq!(marker as u8, byte);
            assert_eq!(Amf0Marker::from_u8(byte), Some(marker));
        }

        assert!(Amf0Marker::from_u8(0x12).is_none());
    }

    #[test]
    fn test_object_get() {
        let value = Amf0Value::Object(vec![
            ("width".to_string(), Amf0Value::Number(1280.0)),
            ("stereo".to_string(), Amf0Value::Boolean(true)),
        ]);

        assert_eq!(value.get("width").and_then(Amf0Value::as_number), Some(1280.0));
        assert_eq!(value.get("stereo").and_then(Amf0Value::as_bool), Some(true));
        assert!(value.get("height").is_none());
        assert!(Amf0Value::Null.get("width").is_none());
    }

    #[test]
    fn test_string_marker_by_length() {
        assert_eq!(
            Amf0Value::String("short".into()).marker(),
            Amf0Marker::String
        );
        assert_eq!(
            Amf0Value::String("x".repeat(u16::MAX as usize + 1)).marker(),
            Amf0Marker::LongString
        );
    }
}
