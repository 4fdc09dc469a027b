//! FromValue trait for converting database values to Rust types

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Trait for types that can be constructed from a database value.
pub trait FromValue: Sized {
    /// Convert a database value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, value: &Value) -> Error {
    if value.is_null() {
        return Error::UnexpectedNull(String::new());
    }
    Error::TypeConversion {
        expected,
        actual: value.type_name().to_string(),
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            Value::Decimal(v) => Ok(!v.is_zero()),
            // Oracle dictionary flags ('Y' / 'N', 'YES' / 'NO')
            Value::String(ref v) => match v.trim().to_ascii_uppercase().as_str() {
                "Y" | "YES" | "TRUE" | "1" => Ok(true),
                "N" | "NO" | "FALSE" | "0" => Ok(false),
                _ => Err(Error::TypeConversion {
                    expected: "bool",
                    actual: format!("string({})", v),
                }),
            },
            _ => Err(mismatch("bool", &value)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::Bool(v) => Ok(v.into()),
            Value::Decimal(v) => {
                if !v.fract().is_zero() {
                    return Err(Error::TypeConversion {
                        expected: "i64",
                        actual: format!("decimal({}) has a fraction", v),
                    });
                }
                v.to_i64().ok_or_else(|| Error::TypeConversion {
                    expected: "i64",
                    actual: format!("decimal({}) out of range", v),
                })
            }
            Value::String(ref v) => v.trim().parse().map_err(|_| Error::TypeConversion {
                expected: "i64",
                actual: format!("string({})", v),
            }),
            _ => Err(mismatch("i64", &value)),
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Result<Self> {
        let v = i64::from_value(value)?;
        v.try_into().map_err(|_| Error::TypeConversion {
            expected: "u32",
            actual: format!("i64({}) out of range", v),
        })
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I64(v) => Ok(v as f64),
            Value::Decimal(v) => v.to_f64().ok_or_else(|| Error::TypeConversion {
                expected: "f64",
                actual: format!("decimal({})", v),
            }),
            _ => Err(mismatch("f64", &value)),
        }
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::I64(v) => Ok(Decimal::from(v)),
            Value::String(ref v) => v.parse().map_err(|_| Error::TypeConversion {
                expected: "decimal",
                actual: format!("invalid decimal string: {}", v),
            }),
            _ => Err(mismatch("decimal", &value)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Decimal(v) => Ok(v.to_string()),
            Value::I64(v) => Ok(v.to_string()),
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| Error::TypeConversion {
                expected: "utf8 string",
                actual: format!("invalid utf8: {}", e),
            }),
            _ => Err(mismatch("string", &value)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::String(v) => Ok(v.into_bytes()),
            _ => Err(mismatch("bytes", &value)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::DateTimeTz(v) => Ok(v.naive_local()),
            _ => Err(mismatch("datetime", &value)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}
