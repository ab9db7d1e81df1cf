
use std::fmt::Display;

use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};

use super::{DataType, DataValue};

/// Textual formats accepted when parsing a timestamp from a string
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

impl DataValue {
    /// Tries to coerce the data value into the supplied type.
    ///
    /// The conversions mirror the typed column accessors of a SQL driver:
    /// integer narrowing must stay in range, strings are parsed into the
    /// target type and temporal values narrow by truncation.
    pub fn try_coerce_into(self, r#type: &DataType) -> Result<Self> {
        // Nulls are type-independent
        if self.is_null() || *r#type == DataType::Null {
            return Ok(self);
        }

        Ok(match self {
            DataValue::Null => unreachable!(),
            DataValue::Utf8String(data) => Self::try_coerce_utf8_string(data, r#type)?,
            DataValue::Binary(data) => Self::try_coerce_binary(data, r#type)?,
            DataValue::Boolean(data) => Self::try_coerce_boolean(data, r#type)?,
            DataValue::Int8(data) => Self::try_coerce_integer(data as i64, "int8", r#type)?,
            DataValue::Int16(data) => Self::try_coerce_integer(data as i64, "int16", r#type)?,
            DataValue::Int32(data) => Self::try_coerce_integer(data as i64, "int32", r#type)?,
            DataValue::Int64(data) => Self::try_coerce_integer(data, "int64", r#type)?,
            DataValue::Float32(data) => Self::try_coerce_float32(data, r#type)?,
            DataValue::Float64(data) => Self::try_coerce_float64(data, r#type)?,
            DataValue::Decimal(data) => Self::try_coerce_decimal(data, r#type)?,
            DataValue::Date(data) => Self::try_coerce_date(data, r#type)?,
            DataValue::Time(data) => Self::try_coerce_time(data, r#type)?,
            DataValue::DateTime(data) => Self::try_coerce_date_time(data, r#type)?,
        })
    }

    fn try_coerce_utf8_string(data: String, r#type: &DataType) -> Result<DataValue> {
        let text = data.trim();

        let parsed = match r#type {
            DataType::Utf8String => return Ok(Self::Utf8String(data)),
            DataType::Binary => return Ok(Self::Binary(data.into_bytes())),
            DataType::Boolean => match text.to_lowercase().as_str() {
                "1" | "true" => Some(Self::Boolean(true)),
                "0" | "false" => Some(Self::Boolean(false)),
                _ => None,
            },
            DataType::Int8 => text.parse().ok().map(Self::Int8),
            DataType::Int16 => text.parse().ok().map(Self::Int16),
            DataType::Int32 => text.parse().ok().map(Self::Int32),
            DataType::Int64 => text.parse().ok().map(Self::Int64),
            DataType::Float32 => text.parse().ok().map(Self::Float32),
            DataType::Float64 => text.parse().ok().map(Self::Float64),
            DataType::Decimal => text.parse().ok().map(Self::Decimal),
            DataType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().map(Self::Date),
            DataType::Time => NaiveTime::parse_from_str(text, "%H:%M:%S%.f").ok().map(Self::Time),
            DataType::DateTime => Self::parse_date_time(text).map(Self::DateTime),
            DataType::Null => None,
        };

        match parsed {
            Some(val) => Ok(val),
            None => bail!(
                "Cannot read string \"{}\" as {:?}",
                data.chars().take(50).collect::<String>(),
                r#type
            ),
        }
    }

    fn parse_date_time(data: &str) -> Option<NaiveDateTime> {
        DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(data, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(data, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    fn try_coerce_binary(data: Vec<u8>, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::Binary => Self::Binary(data),
            _ => {
                // Textual data may be stored in binary columns, so try to decode it first
                if let Ok(str) = String::from_utf8(data) {
                    return Self::Utf8String(str).try_coerce_into(r#type);
                }

                bail!("Failed to coerce binary data to {:?}: data is not valid utf-8 encoded", r#type)
            }
        })
    }

    fn try_coerce_boolean(data: bool, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::Boolean => Self::Boolean(data),
            DataType::Float32 => Self::Float32(if data { 1.0 } else { 0.0 }),
            DataType::Float64 => Self::Float64(if data { 1.0 } else { 0.0 }),
            DataType::Utf8String => Self::Utf8String(if data { "1" } else { "0" }.to_string()),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::Decimal => Self::try_coerce_integer(data as i64, "boolean", r#type)?,
            _ => return Err(Self::no_coercion("boolean", data, r#type)),
        })
    }

    fn try_coerce_integer(data: i64, name: &str, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::Int64 => Self::Int64(data),
            DataType::Boolean if data == 0 => Self::Boolean(false),
            DataType::Boolean if data == 1 => Self::Boolean(true),
            DataType::Int8 if data >= i8::MIN as _ && data <= i8::MAX as _ => {
                Self::Int8(data as i8)
            }
            DataType::Int16 if data >= i16::MIN as _ && data <= i16::MAX as _ => {
                Self::Int16(data as i16)
            }
            DataType::Int32 if data >= i32::MIN as _ && data <= i32::MAX as _ => {
                Self::Int32(data as i32)
            }
            DataType::Float32 if (data as f32) as i64 == data => Self::Float32(data as f32),
            DataType::Float64 if (data as f64) as i64 == data => Self::Float64(data as f64),
            DataType::Decimal => Self::Decimal(Decimal::new(data, 0)),
            DataType::Utf8String => Self::Utf8String(data.to_string()),
            _ => return Err(Self::no_coercion(name, data, r#type)),
        })
    }

    fn try_coerce_float32(data: f32, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::Float32 => Self::Float32(data),
            DataType::Utf8String => Self::Utf8String(data.to_string()),
            // Widen through the decimal rendering so 0.1f32 becomes 0.1f64
            _ => Self::try_coerce_float64(data.to_string().parse()?, r#type)?,
        })
    }

    fn try_coerce_float64(data: f64, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::Float64 => Self::Float64(data),
            DataType::Float32 if !data.is_finite() || data.abs() <= f32::MAX as f64 => {
                Self::Float32(data as f32)
            }
            DataType::Decimal if data.is_finite() => match Decimal::from_f64(data) {
                Some(d) => Self::Decimal(d),
                None => bail!("Failed to coerce float64 ({}) to decimal", data),
            },
            DataType::Utf8String => Self::Utf8String(data.to_string()),
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 | DataType::Boolean
                if data.fract() == 0.0 && data >= i64::MIN as f64 && data <= i64::MAX as f64 =>
            {
                Self::try_coerce_integer(data as i64, "float64", r#type)?
            }
            _ => return Err(Self::no_coercion("float64", data, r#type)),
        })
    }

    fn try_coerce_decimal(data: Decimal, r#type: &DataType) -> Result<DataValue> {
        let integral = if data.fract().is_zero() {
            data.to_i64()
        } else {
            None
        };

        Ok(match r#type {
            DataType::Decimal => Self::Decimal(data),
            DataType::Utf8String => Self::Utf8String(data.to_string()),
            DataType::Float64 if data.to_f64().is_some() => {
                Self::Float64(data.to_f64().unwrap_or_default())
            }
            DataType::Float32 if data.to_f32().is_some() => {
                Self::Float32(data.to_f32().unwrap_or_default())
            }
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 | DataType::Boolean
                if integral.is_some() =>
            {
                Self::try_coerce_integer(integral.unwrap_or_default(), "decimal", r#type)?
            }
            _ => return Err(Self::no_coercion("decimal", data, r#type)),
        })
    }

    fn try_coerce_date(data: NaiveDate, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::Date => Self::Date(data),
            DataType::DateTime => match data.and_hms_opt(0, 0, 0) {
                Some(dt) => Self::DateTime(dt),
                None => bail!("Failed to coerce date ({}) to timestamp", data),
            },
            DataType::Utf8String => Self::Utf8String(data.format("%Y-%m-%d").to_string()),
            _ => return Err(Self::no_coercion("date", data, r#type)),
        })
    }

    fn try_coerce_time(data: NaiveTime, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::Time => Self::Time(data),
            DataType::Utf8String => Self::Utf8String(data.format("%H:%M:%S").to_string()),
            _ => return Err(Self::no_coercion("time", data, r#type)),
        })
    }

    fn try_coerce_date_time(data: NaiveDateTime, r#type: &DataType) -> Result<DataValue> {
        Ok(match r#type {
            DataType::DateTime => Self::DateTime(data),
            DataType::Date => Self::Date(data.date()),
            DataType::Time => Self::Time(data.time()),
            DataType::Utf8String => Self::Utf8String(Self::format_timestamp(&data)),
            _ => return Err(Self::no_coercion("date time", data, r#type)),
        })
    }

    fn no_coercion(from: &str, data: impl Display, r#type: &DataType) -> anyhow::Error {
        anyhow!("Cannot convert {} value ({}) to {:?}", from, data, r#type)
    }

    /// Renders a timestamp with at least one fractional digit, "2008-01-01 12:00:00.0"
    pub fn format_timestamp(data: &NaiveDateTime) -> String {
        let base = data.format("%Y-%m-%d %H:%M:%S").to_string();
        let nanos = data.nanosecond() % 1_000_000_000;

        if nanos == 0 {
            return format!("{}.0", base);
        }

        let frac = format!("{:09}", nanos);
        format!("{}.{}", base, frac.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn test_data_value_coerce_null() {
        assert_eq!(
            DataValue::Null.try_coerce_into(&DataType::Int32).unwrap(),
            DataValue::Null
        );
        assert_eq!(
            DataValue::Int32(5).try_coerce_into(&DataType::Null).unwrap(),
            DataValue::Int32(5)
        );
    }

    #[test]
    fn test_data_value_coerce_utf8_string() {
        let cases = vec![
            ("123", DataType::Int32, DataValue::Int32(123)),
            (" 42 ", DataType::Int64, DataValue::Int64(42)),
            ("-8", DataType::Int8, DataValue::Int8(-8)),
            ("1.5", DataType::Float64, DataValue::Float64(1.5)),
            ("true", DataType::Boolean, DataValue::Boolean(true)),
            ("0", DataType::Boolean, DataValue::Boolean(false)),
            (
                "12.3400",
                DataType::Decimal,
                DataValue::Decimal("12.3400".parse().unwrap()),
            ),
            (
                "2008-01-01",
                DataType::Date,
                DataValue::Date(NaiveDate::from_ymd_opt(2008, 1, 1).unwrap()),
            ),
            (
                "12:30:01",
                DataType::Time,
                DataValue::Time(NaiveTime::from_hms_opt(12, 30, 1).unwrap()),
            ),
            (
                "2008-01-01 12:00:00.0",
                DataType::DateTime,
                DataValue::DateTime(dt("2008-01-01 12:00:00")),
            ),
            (
                "2008-01-01T12:00:00",
                DataType::DateTime,
                DataValue::DateTime(dt("2008-01-01 12:00:00")),
            ),
            ("abc", DataType::Binary, DataValue::Binary(b"abc".to_vec())),
        ];

        for (input, r#type, expected) in cases {
            assert_eq!(
                DataValue::from(input).try_coerce_into(&r#type).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_data_value_coerce_utf8_string_invalid() {
        DataValue::from("abc").try_coerce_into(&DataType::Int32).unwrap_err();
        DataValue::from("2").try_coerce_into(&DataType::Boolean).unwrap_err();
        DataValue::from("300").try_coerce_into(&DataType::Int8).unwrap_err();
    }

    #[test]
    fn test_data_value_coerce_binary() {
        assert_eq!(
            DataValue::Binary(b"15".to_vec())
                .try_coerce_into(&DataType::Int32)
                .unwrap(),
            DataValue::Int32(15)
        );
        DataValue::Binary(vec![0xff, 0xfe])
            .try_coerce_into(&DataType::Utf8String)
            .unwrap_err();
    }

    #[test]
    fn test_data_value_coerce_integer() {
        assert_eq!(
            DataValue::Int64(25).try_coerce_into(&DataType::Int32).unwrap(),
            DataValue::Int32(25)
        );
        assert_eq!(
            DataValue::Int64(1).try_coerce_into(&DataType::Boolean).unwrap(),
            DataValue::Boolean(true)
        );
        assert_eq!(
            DataValue::Int32(7).try_coerce_into(&DataType::Utf8String).unwrap(),
            DataValue::from("7")
        );
        DataValue::Int64(i64::MAX)
            .try_coerce_into(&DataType::Int32)
            .unwrap_err();
        DataValue::Int64(5).try_coerce_into(&DataType::Boolean).unwrap_err();
    }

    #[test]
    fn test_data_value_coerce_float() {
        assert_eq!(
            DataValue::Float64(2.5).try_coerce_into(&DataType::Float32).unwrap(),
            DataValue::Float32(2.5)
        );
        assert_eq!(
            DataValue::Float32(0.1).try_coerce_into(&DataType::Float64).unwrap(),
            DataValue::Float64(0.1)
        );
        assert_eq!(
            DataValue::Float64(3.0).try_coerce_into(&DataType::Int32).unwrap(),
            DataValue::Int32(3)
        );
        DataValue::Float64(3.5)
            .try_coerce_into(&DataType::Int32)
            .unwrap_err();
    }

    #[test]
    fn test_data_value_coerce_decimal() {
        let d: Decimal = "1000.50".parse().unwrap();

        assert_eq!(
            DataValue::Decimal(d).try_coerce_into(&DataType::Float64).unwrap(),
            DataValue::Float64(1000.5)
        );
        assert_eq!(
            DataValue::Decimal(d).try_coerce_into(&DataType::Utf8String).unwrap(),
            DataValue::from("1000.50")
        );
        DataValue::Decimal(d)
            .try_coerce_into(&DataType::Int64)
            .unwrap_err();
    }

    #[test]
    fn test_data_value_coerce_temporal() {
        let ts = dt("2008-01-01 12:00:00.25");

        assert_eq!(
            DataValue::DateTime(ts).try_coerce_into(&DataType::Utf8String).unwrap(),
            DataValue::from("2008-01-01 12:00:00.25")
        );
        assert_eq!(
            DataValue::DateTime(ts).try_coerce_into(&DataType::Date).unwrap(),
            DataValue::Date(NaiveDate::from_ymd_opt(2008, 1, 1).unwrap())
        );
        assert_eq!(
            DataValue::Date(NaiveDate::from_ymd_opt(2008, 1, 1).unwrap())
                .try_coerce_into(&DataType::DateTime)
                .unwrap(),
            DataValue::DateTime(dt("2008-01-01 00:00:00"))
        );
        DataValue::Time(NaiveTime::from_hms_opt(1, 0, 0).unwrap())
            .try_coerce_into(&DataType::Date)
            .unwrap_err();
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            DataValue::format_timestamp(&dt("2008-01-01 12:00:00")),
            "2008-01-01 12:00:00.0"
        );
        assert_eq!(
            DataValue::format_timestamp(&dt("2008-01-01 12:00:00.123")),
            "2008-01-01 12:00:00.123"
        );
    }
}
