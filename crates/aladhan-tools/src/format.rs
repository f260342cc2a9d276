//! Human-readable rendering of Aladhan responses.
//!
//! Each formatter takes the full upstream document (`{"code": .., "data": {..}}`). A missing
//! top-level section yields a fixed "no data" message; a missing nested field the output needs is
//! a [`ToolError::UnexpectedResponse`].

use crate::args::Coordinates;
use crate::error::{Result, ToolError};
use serde_json::Value;
use std::fmt::Write as _;

pub const NO_PRAYER_TIMES: &str = "No prayer time data found in response";
pub const NO_DATE_CONVERSION: &str = "No date conversion data found";
pub const NO_QIBLA_DIRECTION: &str = "No Qibla direction data found";
pub const NO_CALCULATION_METHODS: &str = "No calculation methods data found";

/// Known prayer keys in display order, with their labels.
const PRAYERS: [(&str, &str); 7] = [
    ("Fajr", "🌅 Fajr (Dawn)"),
    ("Sunrise", "☀️ Sunrise"),
    ("Dhuhr", "🌞 Dhuhr (Noon)"),
    ("Asr", "🌤️ Asr (Afternoon)"),
    ("Sunset", "🌇 Sunset"),
    ("Maghrib", "🌆 Maghrib (Evening)"),
    ("Isha", "🌙 Isha (Night)"),
];

/// The `error` message of a document that reports one at top level.
#[must_use]
pub fn upstream_error(body: &Value) -> Option<String> {
    body.get("error").map(value_to_string)
}

/// Location line for a city lookup.
#[must_use]
pub fn city_location(city: &str, country: &str) -> String {
    format!("{city}, {country}")
}

/// Location line for a coordinate lookup.
#[must_use]
pub fn coordinate_location(coordinates: &Coordinates) -> String {
    format!(
        "coordinates ({}, {})",
        coordinates.latitude, coordinates.longitude
    )
}

/// Render a `timings` / `timingsByCity` response.
///
/// # Errors
///
/// Returns [`ToolError::UnexpectedResponse`] if `data.timings` is present but the date block is
/// incomplete.
pub fn prayer_times(location: &str, body: &Value) -> Result<String> {
    let Some(timings) = body.get("data").and_then(|d| d.get("timings")) else {
        return Ok(NO_PRAYER_TIMES.to_string());
    };
    let date = require(body, &["data", "date"])?;

    let mut out = format!("🕌 Prayer Times for {location}\n");
    let _ = writeln!(
        out,
        "📅 Date: {} ({} {} {} AH)\n",
        text(date, &["readable"], "data.date")?,
        text(date, &["hijri", "date"], "data.date")?,
        text(date, &["hijri", "month", "en"], "data.date")?,
        text(date, &["hijri", "year"], "data.date")?,
    );

    for (key, label) in PRAYERS {
        if let Some(time) = timings.get(key) {
            let _ = writeln!(out, "{label}: {}", value_to_string(time));
        }
    }

    Ok(out)
}

/// Render a `gToH` response.
///
/// # Errors
///
/// Returns [`ToolError::UnexpectedResponse`] if `data.hijri` is present but `data.gregorian` or
/// a nested field is missing.
pub fn hijri_conversion(body: &Value) -> Result<String> {
    let Some(hijri) = body.get("data").and_then(|d| d.get("hijri")) else {
        return Ok(NO_DATE_CONVERSION.to_string());
    };
    let gregorian = require(body, &["data", "gregorian"])?;

    let month_en = text(hijri, &["month", "en"], "data.hijri")?;
    let mut out = String::from("📅 Date Conversion\n\n");
    let _ = writeln!(
        out,
        "Gregorian: {} {} {}",
        text(gregorian, &["date"], "data.gregorian")?,
        text(gregorian, &["month", "en"], "data.gregorian")?,
        text(gregorian, &["year"], "data.gregorian")?,
    );
    let _ = writeln!(
        out,
        "Hijri: {} {month_en} {} AH",
        text(hijri, &["date"], "data.hijri")?,
        text(hijri, &["year"], "data.hijri")?,
    );
    let _ = writeln!(
        out,
        "Islamic Month: {} ({month_en})",
        text(hijri, &["month", "ar"], "data.hijri")?
    );
    let _ = writeln!(
        out,
        "Weekday: {}",
        text(hijri, &["weekday", "en"], "data.hijri")?
    );

    Ok(out)
}

/// Render a `qibla` response.
///
/// # Errors
///
/// Returns [`ToolError::UnexpectedResponse`] if `data.direction` is not a number.
pub fn qibla_direction(coordinates: &Coordinates, body: &Value) -> Result<String> {
    let Some(direction) = body.get("data").and_then(|d| d.get("direction")) else {
        return Ok(NO_QIBLA_DIRECTION.to_string());
    };
    let direction = direction.as_f64().ok_or_else(|| {
        ToolError::UnexpectedResponse("'data.direction' is not a number".to_string())
    })?;

    let mut out = String::from("🧭 Qibla Direction\n\n");
    let _ = writeln!(
        out,
        "📍 Location: ({}, {})",
        coordinates.latitude, coordinates.longitude
    );
    let _ = writeln!(out, "🕋 Qibla Direction: {direction:.2}° from North\n");
    let _ = write!(out, "Compass Direction: {}", compass_point(direction));

    Ok(out)
}

/// Render a `methods` response.
///
/// Entries without a `name` are skipped; an empty `data` object yields just the header.
///
/// # Errors
///
/// Returns [`ToolError::UnexpectedResponse`] if `data` is not an object.
pub fn calculation_methods(body: &Value) -> Result<String> {
    let Some(data) = body.get("data") else {
        return Ok(NO_CALCULATION_METHODS.to_string());
    };
    let methods = data.as_object().ok_or_else(|| {
        ToolError::UnexpectedResponse("'data' is not an object".to_string())
    })?;

    let mut out = String::from("🕌 Prayer Time Calculation Methods\n\n");
    for (id, info) in methods {
        let Some(name) = info.get("name") else {
            continue;
        };
        let _ = writeln!(out, "{id}. {}", value_to_string(name));
        if let Some(params) = info.get("params").and_then(Value::as_object) {
            for angle in ["Fajr", "Isha"] {
                if let Some(v) = params.get(angle) {
                    let _ = writeln!(out, "   - {angle}: {}°", value_to_string(v));
                }
            }
        }
        out.push('\n');
    }

    Ok(out)
}

/// Eight-point compass label for a bearing in degrees from North.
///
/// Sectors are 45° wide and centred on each point; North covers `[337.5, 360) ∪ [0, 22.5)`.
/// Bearings outside `[0, 360)` are wrapped first.
#[must_use]
pub fn compass_point(direction: f64) -> &'static str {
    const POINTS: [&str; 8] = [
        "North",
        "Northeast",
        "East",
        "Southeast",
        "South",
        "Southwest",
        "West",
        "Northwest",
    ];
    let d = direction.rem_euclid(360.0);
    // Shift by half a sector so each bucket starts on a boundary.
    let shifted = (d + 22.5).rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = (shifted / 45.0).floor() as usize;
    POINTS[idx % POINTS.len()]
}

fn require<'a>(body: &'a Value, path: &[&str]) -> Result<&'a Value> {
    lookup(body, path).ok_or_else(|| {
        ToolError::UnexpectedResponse(format!("missing '{}'", path.join(".")))
    })
}

fn text(section: &Value, path: &[&str], prefix: &str) -> Result<String> {
    lookup(section, path).map(value_to_string).ok_or_else(|| {
        ToolError::UnexpectedResponse(format!("missing '{prefix}.{}'", path.join(".")))
    })
}

fn lookup<'a>(v: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(v, |cur, key| cur.get(key))
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::coords;
    use serde_json::json;

    fn date_block() -> Value {
        json!({
            "readable": "20 Jul 2024",
            "hijri": {
                "date": "14-01-1446",
                "year": "1446",
                "month": {"number": 1, "en": "Muḥarram", "ar": "مُحَرَّم"}
            }
        })
    }

    #[test]
    fn compass_points_at_sector_boundaries() {
        assert_eq!(compass_point(0.0), "North");
        assert_eq!(compass_point(44.9), "Northeast");
        assert_eq!(compass_point(90.0), "East");
        assert_eq!(compass_point(337.5), "North");
        assert_eq!(compass_point(22.49), "North");
        assert_eq!(compass_point(22.5), "Northeast");
        assert_eq!(compass_point(67.5), "East");
        assert_eq!(compass_point(180.0), "South");
        assert_eq!(compass_point(202.5), "Southwest");
        assert_eq!(compass_point(292.5), "Northwest");
        assert_eq!(compass_point(337.49), "Northwest");
        assert_eq!(compass_point(359.99), "North");
    }

    #[test]
    fn compass_wraps_out_of_range_bearings() {
        assert_eq!(compass_point(360.0), "North");
        assert_eq!(compass_point(450.0), "East");
        assert_eq!(compass_point(-90.0), "West");
    }

    #[test]
    fn prayer_times_follow_fixed_order_and_skip_unknown_keys() {
        let body = json!({
            "data": {
                "timings": {"Sunrise": "06:00", "Junk": "07:00", "Fajr": "05:00"},
                "date": date_block()
            }
        });
        let text = prayer_times(&city_location("London", "UK"), &body).expect("format");

        assert_eq!(
            text,
            "🕌 Prayer Times for London, UK\n\
             📅 Date: 20 Jul 2024 (14-01-1446 Muḥarram 1446 AH)\n\n\
             🌅 Fajr (Dawn): 05:00\n\
             ☀️ Sunrise: 06:00\n"
        );
        assert!(!text.contains("Junk"));
    }

    #[test]
    fn prayer_times_for_coordinates_names_the_point() {
        let body = json!({
            "data": {
                "timings": {
                    "Fajr": "03:01", "Sunrise": "04:59", "Dhuhr": "13:10", "Asr": "17:25",
                    "Sunset": "21:20", "Maghrib": "21:20", "Isha": "23:10", "Imsak": "02:51"
                },
                "date": date_block()
            }
        });
        let text = prayer_times(&coordinate_location(&coords(51.5, -0.12)), &body).expect("format");
        assert!(text.starts_with("🕌 Prayer Times for coordinates (51.5, -0.12)\n"));
        let labels: Vec<&str> = text
            .lines()
            .skip(3)
            .filter_map(|l| l.split(':').next())
            .collect();
        assert_eq!(
            labels,
            vec![
                "🌅 Fajr (Dawn)",
                "☀️ Sunrise",
                "🌞 Dhuhr (Noon)",
                "🌤️ Asr (Afternoon)",
                "🌇 Sunset",
                "🌆 Maghrib (Evening)",
                "🌙 Isha (Night)",
            ]
        );
    }

    #[test]
    fn prayer_times_without_timings_is_no_data() {
        let body = json!({"data": {"date": date_block()}});
        assert_eq!(prayer_times("x", &body).expect("format"), NO_PRAYER_TIMES);
        assert_eq!(prayer_times("x", &json!({})).expect("format"), NO_PRAYER_TIMES);
    }

    #[test]
    fn prayer_times_without_date_is_a_shape_error() {
        let body = json!({"data": {"timings": {"Fajr": "05:00"}}});
        let err = prayer_times("x", &body).expect_err("shape");
        assert_eq!(
            err.to_string(),
            "unexpected response shape: missing 'data.date'"
        );
    }

    #[test]
    fn hijri_conversion_renders_both_calendars() {
        let body = json!({
            "data": {
                "hijri": {
                    "date": "14-01-1446",
                    "year": "1446",
                    "month": {"en": "Muḥarram", "ar": "مُحَرَّم"},
                    "weekday": {"en": "Al Sabt", "ar": "السبت"}
                },
                "gregorian": {
                    "date": "20-07-2024",
                    "year": "2024",
                    "month": {"number": 7, "en": "July"}
                }
            }
        });
        assert_eq!(
            hijri_conversion(&body).expect("format"),
            "📅 Date Conversion\n\n\
             Gregorian: 20-07-2024 July 2024\n\
             Hijri: 14-01-1446 Muḥarram 1446 AH\n\
             Islamic Month: مُحَرَّم (Muḥarram)\n\
             Weekday: Al Sabt\n"
        );
    }

    #[test]
    fn hijri_conversion_missing_sections() {
        assert_eq!(
            hijri_conversion(&json!({"data": {}})).expect("format"),
            NO_DATE_CONVERSION
        );
        let err = hijri_conversion(&json!({"data": {"hijri": {}}})).expect_err("shape");
        assert!(err.to_string().contains("data.gregorian"));
    }

    #[test]
    fn coordinates_render_their_json_text() {
        let point = Coordinates {
            latitude: serde_json::Number::from(21),
            longitude: serde_json::Number::from_f64(-0.0).expect("finite"),
        };
        assert_eq!(coordinate_location(&point), "coordinates (21, -0.0)");
        assert_eq!(
            coordinate_location(&coords(21.0, 39.5)),
            "coordinates (21.0, 39.5)"
        );
    }

    #[test]
    fn qibla_direction_rounds_to_two_places() {
        let body = json!({"data": {"latitude": 51.5, "longitude": -0.12, "direction": 118.987_218}});
        assert_eq!(
            qibla_direction(&coords(51.5, -0.12), &body).expect("format"),
            "🧭 Qibla Direction\n\n\
             📍 Location: (51.5, -0.12)\n\
             🕋 Qibla Direction: 118.99° from North\n\n\
             Compass Direction: Southeast"
        );
    }

    #[test]
    fn qibla_direction_missing_or_malformed() {
        let coords = coords(0.0, 0.0);
        assert_eq!(
            qibla_direction(&coords, &json!({"data": {}})).expect("format"),
            NO_QIBLA_DIRECTION
        );
        let err = qibla_direction(&coords, &json!({"data": {"direction": "east"}}))
            .expect_err("shape");
        assert!(matches!(err, ToolError::UnexpectedResponse(_)));
    }

    #[test]
    fn calculation_methods_skip_unnamed_entries() {
        let body = json!({
            "data": {
                "1": {
                    "name": "University of Islamic Sciences, Karachi",
                    "params": {"Fajr": "18", "Isha": "18"}
                },
                "2": {"notname": true}
            }
        });
        assert_eq!(
            calculation_methods(&body).expect("format"),
            "🕌 Prayer Time Calculation Methods\n\n\
             1. University of Islamic Sciences, Karachi\n   \
             - Fajr: 18°\n   \
             - Isha: 18°\n\n"
        );
    }

    #[test]
    fn calculation_methods_with_partial_params() {
        let body = json!({
            "data": {
                "4": {"name": "Umm Al-Qura University, Makkah", "params": {"Fajr": 18.5, "Isha": "90 min"}},
                "99": {"name": "Custom", "params": []}
            }
        });
        let text = calculation_methods(&body).expect("format");
        assert!(text.contains("4. Umm Al-Qura University, Makkah\n   - Fajr: 18.5°\n   - Isha: 90 min°\n"));
        assert!(text.contains("99. Custom\n\n"));
    }

    #[test]
    fn calculation_methods_empty_data_is_header_only() {
        assert_eq!(
            calculation_methods(&json!({"data": {}})).expect("format"),
            "🕌 Prayer Time Calculation Methods\n\n"
        );
        assert_eq!(
            calculation_methods(&json!({})).expect("format"),
            NO_CALCULATION_METHODS
        );
        assert!(calculation_methods(&json!({"data": []})).is_err());
    }

    #[test]
    fn upstream_error_reads_top_level_key() {
        assert_eq!(
            upstream_error(&json!({"error": "boom", "details": "x"})),
            Some("boom".to_string())
        );
        assert_eq!(upstream_error(&json!({"data": {}})), None);
    }
}
