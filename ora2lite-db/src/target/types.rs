//! Type conversion utilities for SQLite

use chrono::Timelike;
use rusqlite::types::Value as SqliteValue;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::value::Value;

/// Most significant digits an f64 carries without loss.
const REAL_DIGITS: usize = 15;

/// Convert a `Value` into the SQLite storage class it is written as.
pub fn to_sqlite_value(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(v) => SqliteValue::Integer(i64::from(*v)),
        Value::I64(v) => SqliteValue::Integer(*v),
        Value::F64(v) => SqliteValue::Real(*v),
        Value::Decimal(v) => decimal_to_sqlite(v),
        Value::String(v) => SqliteValue::Text(v.clone()),
        Value::Bytes(v) => SqliteValue::Blob(v.clone()),
        Value::DateTime(v) => {
            SqliteValue::Text(v.format(&timestamp_format(v.nanosecond(), "")).to_string())
        }
        Value::DateTimeTz(v) => {
            SqliteValue::Text(v.format(&timestamp_format(v.nanosecond(), "%:z")).to_string())
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS`, with microseconds only when the fraction is
/// non-zero.
fn timestamp_format(nanosecond: u32, offset: &str) -> String {
    let fraction = if nanosecond == 0 { "" } else { "%.6f" };
    format!("%Y-%m-%d %H:%M:%S{}{}", fraction, offset)
}

/// Integral values within `i64` become INTEGER, values with at most 15
/// significant digits become REAL, anything else is kept exact as TEXT.
fn decimal_to_sqlite(value: &Decimal) -> SqliteValue {
    let normalized = value.normalize();

    if normalized.fract().is_zero() {
        if let Some(v) = normalized.to_i64() {
            return SqliteValue::Integer(v);
        }
    }

    let digits = normalized.mantissa().unsigned_abs().to_string().len();
    if digits <= REAL_DIGITS {
        if let Some(v) = normalized.to_f64() {
            return SqliteValue::Real(v);
        }
    }

    SqliteValue::Text(normalized.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};
    use std::str::FromStr;

    fn dec(s: &str) -> Value {
        Value::Decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_integral_decimal_is_integer() {
        assert_eq!(to_sqlite_value(&dec("7839")), SqliteValue::Integer(7839));
        assert_eq!(to_sqlite_value(&dec("20.000")), SqliteValue::Integer(20));
    }

    #[test]
    fn test_fractional_decimal_is_real() {
        assert_eq!(to_sqlite_value(&dec("1250.5")), SqliteValue::Real(1250.5));
    }

    #[test]
    fn test_wide_decimal_stays_exact() {
        assert_eq!(
            to_sqlite_value(&dec("3.1415926535897932384626")),
            SqliteValue::Text("3.1415926535897932384626".into())
        );
        assert_eq!(
            to_sqlite_value(&dec("123456789012345678901234")),
            SqliteValue::Text("123456789012345678901234".into())
        );
    }

    #[test]
    fn test_datetime_as_iso_text() {
        let dt = NaiveDate::from_ymd_opt(1981, 11, 17)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            to_sqlite_value(&Value::DateTime(dt)),
            SqliteValue::Text("1981-11-17 00:00:00".into())
        );

        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_micro_opt(13, 45, 1, 250_000)
            .unwrap();
        assert_eq!(
            to_sqlite_value(&Value::DateTime(dt)),
            SqliteValue::Text("2024-02-29 13:45:01.250000".into())
        );

        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_nano_opt(13, 45, 1, 123_456_789)
            .unwrap();
        assert_eq!(
            to_sqlite_value(&Value::DateTime(dt)),
            SqliteValue::Text("2024-02-29 13:45:01.123456".into())
        );
    }

    #[test]
    fn test_datetime_with_offset() {
        let dt = DateTime::parse_from_rfc3339("2024-05-01T08:30:00+02:00").unwrap();
        assert_eq!(
            to_sqlite_value(&Value::DateTimeTz(dt)),
            SqliteValue::Text("2024-05-01 08:30:00+02:00".into())
        );

        let dt = DateTime::parse_from_rfc3339("2024-05-01T08:30:00.5-05:00").unwrap();
        assert_eq!(
            to_sqlite_value(&Value::DateTimeTz(dt)),
            SqliteValue::Text("2024-05-01 08:30:00.500000-05:00".into())
        );
    }

    #[test]
    fn test_bool_and_null() {
        assert_eq!(to_sqlite_value(&Value::Bool(true)), SqliteValue::Integer(1));
        assert_eq!(to_sqlite_value(&Value::Null), SqliteValue::Null);
    }
}
