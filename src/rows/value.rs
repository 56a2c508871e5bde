// Cell values
// A closed set of scalar types that a result set cell can hold, plus the
// text formatting shared by the CSV and JSON writers

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine;
use std::io::Write;

/// A single cell of a result set row
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Any unsigned integer, widened to 64 bits
    UInt(u64),
    /// Any signed integer, widened to 64 bits
    Int(i64),
    /// 32-bit float, kept apart so it prints with 32-bit precision
    Float32(f32),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Opaque bytes, written as base64
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Append to dst the UTF-8 text form of a value
///
/// Strings are double quoted with JSON escaping and blobs are written as
/// quoted RFC 4648 base64. `Null` is written as `null`; CSV callers skip it
/// to leave the field empty.
pub fn append_value(dst: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Null => dst.extend_from_slice(b"null"),
        Value::UInt(n) => write!(dst, "{}", n)?,
        Value::Int(n) => write!(dst, "{}", n)?,
        Value::Float32(f) => {
            if append_non_finite(dst, *f as f64) {
                return Ok(());
            }
            let start = dst.len();
            write!(dst, "{:E}", f)?;
            pad_exponent(dst, start);
        }
        Value::Float(f) => {
            if append_non_finite(dst, *f) {
                return Ok(());
            }
            let start = dst.len();
            write!(dst, "{:E}", f)?;
            pad_exponent(dst, start);
        }
        Value::Bool(true) => dst.extend_from_slice(b"true"),
        Value::Bool(false) => dst.extend_from_slice(b"false"),
        Value::Text(s) => serde_json::to_writer(&mut *dst, s)?,
        Value::Blob(bytes) => {
            dst.push(b'"');
            dst.extend_from_slice(BASE64_ENGINE.encode(bytes).as_bytes());
            dst.push(b'"');
        }
    }

    Ok(())
}

/// Write `NaN`, `+Inf` or `-Inf` for non-finite values. Returns false and
/// writes nothing for finite ones.
fn append_non_finite(dst: &mut Vec<u8>, value: f64) -> bool {
    if value.is_nan() {
        dst.extend_from_slice(b"NaN");
    } else if value.is_infinite() {
        let text: &[u8] = if value > 0.0 { b"+Inf" } else { b"-Inf" };
        dst.extend_from_slice(text);
    } else {
        return false;
    }
    true
}

/// Rewrite the exponent of the float written at `dst[start..]` from Rust's
/// `1.5E0` form into a signed, at least two digit exponent (`1.5E+00`,
/// `-2.5E-07`)
fn pad_exponent(dst: &mut Vec<u8>, start: usize) {
    let Some(e) = dst[start..].iter().position(|&b| b == b'E') else {
        return;
    };
    let e = start + e;

    let negative = dst.get(e + 1) == Some(&b'-');
    let digits_at = if negative { e + 2 } else { e + 1 };

    // f64 exponents have at most three digits
    let mut digits = [0u8; 3];
    let len = (dst.len() - digits_at).min(digits.len());
    digits[..len].copy_from_slice(&dst[digits_at..digits_at + len]);

    dst.truncate(e + 1);
    dst.push(if negative { b'-' } else { b'+' });
    if len < 2 {
        dst.push(b'0');
    }
    dst.extend_from_slice(&digits[..len]);
}

macro_rules! impl_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from!(UInt, u64, u8, u16, u32, u64, usize);
impl_from!(Int, i64, i8, i16, i32, i64, isize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a decoded JSON cell
///
/// Arrays and objects have no scalar form and are rejected.
impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    fn try_from(v: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        match v {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Value::UInt(u))
                } else if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else {
                    n.as_f64().map(Value::Float).ok_or_else(|| Error::UnknownValueType {
                        type_name: "number".to_string(),
                    })
                }
            }
            Json::String(s) => Ok(Value::Text(s)),
            Json::Array(_) => Err(Error::UnknownValueType {
                type_name: "array".to_string(),
            }),
            Json::Object(_) => Err(Error::UnknownValueType {
                type_name: "object".to_string(),
            }),
        }
    }
}
