//! Type conversion utilities for Oracle

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use oracle::sql_type::{OracleType, ToSql};
use oracle::SqlValue;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::value::Value;

/// Convert a bound `Value` into an owned Oracle bind parameter.
pub fn to_sql_param(value: &Value) -> Box<dyn ToSql> {
    match value {
        Value::Null => Box::new(None::<String>),
        Value::Bool(v) => Box::new(i64::from(*v)),
        Value::I64(v) => Box::new(*v),
        Value::F64(v) => Box::new(*v),
        // Oracle converts the text implicitly where a NUMBER is expected
        Value::Decimal(v) => Box::new(v.to_string()),
        Value::String(v) => Box::new(v.clone()),
        Value::Bytes(v) => Box::new(v.clone()),
        Value::DateTime(v) => Box::new(*v),
        Value::DateTimeTz(v) => Box::new(*v),
    }
}

/// Convert an Oracle column value to a `Value`, driven by its runtime type.
pub fn from_sql_value(sql_value: &SqlValue) -> Result<Value> {
    if sql_value.is_null()? {
        return Ok(Value::Null);
    }

    let value = match sql_value.oracle_type()? {
        OracleType::Number(_, _) | OracleType::Float(_) => {
            parse_number(&sql_value.get::<String>()?)
        }
        OracleType::BinaryFloat | OracleType::BinaryDouble => Value::F64(sql_value.get::<f64>()?),
        OracleType::Int64 => Value::I64(sql_value.get::<i64>()?),
        OracleType::UInt64 => {
            let v = sql_value.get::<u64>()?;
            i64::try_from(v)
                .map(Value::I64)
                .unwrap_or_else(|_| Value::Decimal(Decimal::from(v)))
        }
        OracleType::Boolean => Value::Bool(sql_value.get::<bool>()?),
        OracleType::Date | OracleType::Timestamp(_) => {
            Value::DateTime(sql_value.get::<NaiveDateTime>()?)
        }
        OracleType::TimestampTZ(_) | OracleType::TimestampLTZ(_) => {
            Value::DateTimeTz(sql_value.get::<DateTime<FixedOffset>>()?)
        }
        OracleType::Raw(_) | OracleType::LongRaw | OracleType::BLOB => {
            Value::Bytes(sql_value.get::<Vec<u8>>()?)
        }
        // VARCHAR2, CHAR, CLOB, LONG, ROWID, INTERVAL, serialized XML, ...
        _ => Value::String(sql_value.get::<String>()?),
    };

    Ok(value)
}

/// Parse Oracle's textual NUMBER into an exact decimal.
///
/// Values that do not fit a 96-bit decimal without rounding (very large
/// magnitudes, exponent notation, more than 28 digits) stay text.
pub fn parse_number(text: &str) -> Value {
    let trimmed = text.trim();
    let normalized = if let Some(rest) = trimmed.strip_prefix("-.") {
        format!("-0.{}", rest)
    } else if let Some(rest) = trimmed.strip_prefix('.') {
        format!("0.{}", rest)
    } else {
        trimmed.to_string()
    };

    match Decimal::from_str_exact(&normalized) {
        Ok(d) => Value::Decimal(d),
        Err(_) => Value::String(trimmed.to_string()),
    }
}
