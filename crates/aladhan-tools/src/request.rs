//! Upstream request building.

use crate::args::{TimingOptions, ToolArgs};
use chrono::NaiveDate;
use url::Url;

/// A single upstream GET: a path relative to the API root plus query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Map validated arguments onto one of the fixed endpoint templates.
    #[must_use]
    pub fn for_args(args: &ToolArgs) -> Self {
        match args {
            ToolArgs::PrayerTimesByCity {
                city,
                country,
                date,
                options,
            } => {
                let mut query = vec![
                    ("city".to_string(), city.clone()),
                    ("country".to_string(), country.clone()),
                ];
                push_timing_options(&mut query, *options);
                Self {
                    path: format!("timingsByCity/{}", api_date(*date)),
                    query,
                }
            }
            ToolArgs::PrayerTimesByCoordinates {
                coordinates,
                date,
                options,
            } => {
                let mut query = vec![
                    ("latitude".to_string(), coordinates.latitude.to_string()),
                    ("longitude".to_string(), coordinates.longitude.to_string()),
                ];
                push_timing_options(&mut query, *options);
                Self {
                    path: format!("timings/{}", api_date(*date)),
                    query,
                }
            }
            ToolArgs::GregorianToHijri { date } => Self {
                path: "gToH".to_string(),
                query: vec![("date".to_string(), api_date(*date))],
            },
            ToolArgs::QiblaDirection { coordinates } => Self {
                path: format!("qibla/{}/{}", coordinates.latitude, coordinates.longitude),
                query: Vec::new(),
            },
            ToolArgs::CalculationMethods => Self {
                path: "methods".to_string(),
                query: Vec::new(),
            },
        }
    }

    /// Resolve against the API root.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the joined URL is invalid.
    pub fn url(&self, base_url: &Url) -> Result<Url, url::ParseError> {
        let joined = format!(
            "{}/{}",
            base_url.as_str().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Upstream date format (`DD-MM-YYYY`).
#[must_use]
pub fn api_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

fn push_timing_options(query: &mut Vec<(String, String)>, options: TimingOptions) {
    if let Some(method) = options.method {
        query.push(("method".to_string(), method.to_string()));
    }
    if let Some(school) = options.school {
        query.push(("school".to_string(), school.to_string()));
    }
}
