//! Typed tool arguments.
//!
//! [`parse`] is the single entry point: it validates the raw argument object against the tool's
//! schema, then extracts typed values and checks what a schema cannot express (calendar validity,
//! coordinate ranges).

use crate::catalog::AladhanTool;
use crate::error::{Result, ToolError};
use crate::validation::validate_arguments;
use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const DMY_DATE_FORMAT: &str = "%d-%m-%Y";

/// A point as the caller wrote it. The numbers keep their JSON text (`21.0`, `-0.0`), which is
/// what goes into the upstream path and the reply header.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub latitude: Number,
    pub longitude: Number,
}

impl Coordinates {
    fn checked(latitude: Number, longitude: Number) -> Result<Self> {
        let in_range =
            |n: &Number, limit: f64| n.as_f64().is_some_and(|v| (-limit..=limit).contains(&v));
        if !in_range(&latitude, 90.0) {
            return Err(ToolError::InvalidArguments(format!(
                "latitude {latitude} is out of range [-90, 90]"
            )));
        }
        if !in_range(&longitude, 180.0) {
            return Err(ToolError::InvalidArguments(format!(
                "longitude {longitude} is out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Optional prayer-time tuning passed through to the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingOptions {
    /// Calculation method id.
    pub method: Option<u32>,
    /// Asr juristic school: 0 = Shafi, 1 = Hanafi.
    pub school: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolArgs {
    PrayerTimesByCity {
        city: String,
        country: String,
        date: NaiveDate,
        options: TimingOptions,
    },
    PrayerTimesByCoordinates {
        coordinates: Coordinates,
        date: NaiveDate,
        options: TimingOptions,
    },
    GregorianToHijri {
        date: NaiveDate,
    },
    QiblaDirection {
        coordinates: Coordinates,
    },
    CalculationMethods,
}

#[derive(Deserialize)]
struct CityArgs {
    city: String,
    country: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    method: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    school: Option<u8>,
}

#[derive(Deserialize)]
struct CoordinateArgs {
    latitude: Number,
    longitude: Number,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    method: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    school: Option<u8>,
}

/// JSON Schema `integer` also admits `2.0`; accept any whole number that fits `T`.
fn whole_number<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let Some(n) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let whole = n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(f))
            .map(|f| f as u64)
    });
    whole
        .and_then(|w| T::try_from(w).ok())
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("{n} is not a supported whole number")))
}

#[derive(Deserialize)]
struct HijriArgs {
    date: String,
}

/// Validate and extract the arguments for `tool`.
///
/// `arguments` may be `None` (treated as `{}`); `null` members are treated as absent.
/// `today` is used when an optional `date` is not supplied.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] on any schema violation, impossible calendar date or
/// out-of-range coordinate.
pub fn parse(tool: AladhanTool, arguments: Option<&Value>, today: NaiveDate) -> Result<ToolArgs> {
    let args = normalize(arguments)?;
    validate_arguments(&tool.input_schema(), &args)?;

    match tool {
        AladhanTool::PrayerTimesByCity => {
            let a: CityArgs = extract(args)?;
            Ok(ToolArgs::PrayerTimesByCity {
                city: a.city,
                country: a.country,
                date: resolve_date(a.date.as_deref(), today)?,
                options: TimingOptions {
                    method: a.method,
                    school: a.school,
                },
            })
        }
        AladhanTool::PrayerTimesByCoordinates => {
            let a: CoordinateArgs = extract(args)?;
            Ok(ToolArgs::PrayerTimesByCoordinates {
                coordinates: Coordinates::checked(a.latitude, a.longitude)?,
                date: resolve_date(a.date.as_deref(), today)?,
                options: TimingOptions {
                    method: a.method,
                    school: a.school,
                },
            })
        }
        AladhanTool::GregorianToHijri => {
            let a: HijriArgs = extract(args)?;
            Ok(ToolArgs::GregorianToHijri {
                date: parse_date(&a.date, DMY_DATE_FORMAT)?,
            })
        }
        AladhanTool::QiblaDirection => {
            let a: CoordinateArgs = extract(args)?;
            Ok(ToolArgs::QiblaDirection {
                coordinates: Coordinates::checked(a.latitude, a.longitude)?,
            })
        }
        AladhanTool::CalculationMethods => Ok(ToolArgs::CalculationMethods),
    }
}

/// Resolve an optional `YYYY-MM-DD` argument, defaulting to `today`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] if the string is not a real calendar date.
pub fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s, ISO_DATE_FORMAT),
        None => Ok(today),
    }
}

fn parse_date(s: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, format).map_err(|e| {
        ToolError::InvalidArguments(format!("date '{s}' is not a valid calendar date: {e}"))
    })
}

fn normalize(arguments: Option<&Value>) -> Result<Map<String, Value>> {
    match arguments {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
        Some(_) => Err(ToolError::InvalidArguments(
            "arguments must be a JSON object".to_string(),
        )),
    }
}

fn extract<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[cfg(test)]
pub(crate) fn coords(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates {
        latitude: Number::from_f64(latitude).expect("finite latitude"),
        longitude: Number::from_f64(longitude).expect("finite longitude"),
    }
}
