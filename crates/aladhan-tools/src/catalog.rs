//! Fixed tool catalog.
//!
//! The catalog never changes at runtime; every descriptor is rebuilt from the static tables below.

use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};
use std::sync::Arc;

const ISO_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const DMY_DATE_PATTERN: &str = r"^\d{2}-\d{2}-\d{4}$";

/// The operations this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AladhanTool {
    PrayerTimesByCity,
    PrayerTimesByCoordinates,
    GregorianToHijri,
    QiblaDirection,
    CalculationMethods,
}

impl AladhanTool {
    /// Catalog order, as advertised by `tools/list`.
    pub const ALL: [Self; 5] = [
        Self::PrayerTimesByCity,
        Self::PrayerTimesByCoordinates,
        Self::GregorianToHijri,
        Self::QiblaDirection,
        Self::CalculationMethods,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PrayerTimesByCity => "get_prayer_times_by_city",
            Self::PrayerTimesByCoordinates => "get_prayer_times_by_coordinates",
            Self::GregorianToHijri => "convert_gregorian_to_hijri",
            Self::QiblaDirection => "get_qibla_direction",
            Self::CalculationMethods => "get_calculation_methods",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            Self::PrayerTimesByCity => "Get Islamic prayer times for a specific city and date",
            Self::PrayerTimesByCoordinates => {
                "Get Islamic prayer times for specific geographic coordinates and date"
            }
            Self::GregorianToHijri => "Convert a Gregorian date to Hijri (Islamic) date",
            Self::QiblaDirection => {
                "Get the Qibla direction (degrees from North) for given coordinates"
            }
            Self::CalculationMethods => "Get available prayer time calculation methods",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::PrayerTimesByCity => "Prayer times by city",
            Self::PrayerTimesByCoordinates => "Prayer times by coordinates",
            Self::GregorianToHijri => "Gregorian to Hijri date",
            Self::QiblaDirection => "Qibla direction",
            Self::CalculationMethods => "Prayer time calculation methods",
        }
    }

    /// JSON Schema for the tool's arguments.
    #[must_use]
    pub fn input_schema(self) -> Value {
        match self {
            Self::PrayerTimesByCity => {
                let mut properties = json!({
                    "city": {
                        "type": "string",
                        "description": "Name of the city (e.g., London)"
                    },
                    "country": {
                        "type": "string",
                        "description": "Name of the country (e.g., UK)"
                    },
                });
                add_timing_options(&mut properties);
                object_schema(properties, &["city", "country"])
            }
            Self::PrayerTimesByCoordinates => {
                let mut properties = coordinate_properties();
                add_timing_options(&mut properties);
                object_schema(properties, &["latitude", "longitude"])
            }
            Self::GregorianToHijri => object_schema(
                json!({
                    "date": {
                        "type": "string",
                        "description": "Gregorian date in DD-MM-YYYY format (e.g., 20-07-2024)",
                        "pattern": DMY_DATE_PATTERN
                    }
                }),
                &["date"],
            ),
            Self::QiblaDirection => {
                object_schema(coordinate_properties(), &["latitude", "longitude"])
            }
            Self::CalculationMethods => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    /// The MCP descriptor advertised for this tool.
    #[must_use]
    pub fn descriptor(self) -> Tool {
        let schema_obj = self
            .input_schema()
            .as_object()
            .cloned()
            .unwrap_or_else(JsonObject::new);
        let mut tool = Tool::new(self.name(), self.description(), Arc::new(schema_obj));
        tool.annotations = Some(lookup_annotations(self.title()));
        tool
    }
}

/// All descriptors in catalog order.
#[must_use]
pub fn list_tools() -> Vec<Tool> {
    AladhanTool::ALL
        .into_iter()
        .map(AladhanTool::descriptor)
        .collect()
}

/// Every tool is a single upstream GET: read-only, repeatable, and talks to an external system.
fn lookup_annotations(title: &str) -> ToolAnnotations {
    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}

fn coordinate_properties() -> Value {
    json!({
        "latitude": {
            "type": "number",
            "description": "Latitude of the location"
        },
        "longitude": {
            "type": "number",
            "description": "Longitude of the location"
        },
    })
}

fn add_timing_options(properties: &mut Value) {
    properties["date"] = json!({
        "type": "string",
        "description": "Date in YYYY-MM-DD format (optional, defaults to today)",
        "pattern": ISO_DATE_PATTERN
    });
    properties["method"] = json!({
        "type": "integer",
        "minimum": 0,
        "maximum": 99,
        "description": "Calculation method ID (optional, 1-15)"
    });
    properties["school"] = json!({
        "type": "integer",
        "enum": [0, 1],
        "description": "Asr juristic method: 0 for Shafi, 1 for Hanafi (optional)"
    });
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
