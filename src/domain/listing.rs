use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the rental dataset. Field names match the CSV header exactly,
/// so serde maps columns by name in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub name: Option<String>,
    pub host_id: i64,
    pub host_name: Option<String>,
    pub neighbourhood_group: String,
    pub neighbourhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub room_type: String,
    pub price: i64,
    pub minimum_nights: i64,
    pub number_of_reviews: i64,
    #[serde(deserialize_with = "de_last_review")]
    pub last_review: Option<NaiveDate>,
    pub reviews_per_month: Option<f64>,
    pub calculated_host_listings_count: i64,
    pub availability_365: i64,
}

/// Coerce the raw `last_review` field to a date. Blank and unparseable
/// values both become `None` (the source data has plenty of each).
fn de_last_review<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_review_date))
}

/// ISO first (what the export writes), then the US formats that show up in
/// hand-edited copies of the dataset.
pub fn parse_review_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Column tables used by the profiler
// ---------------------------------------------------------------------------

pub type NumericGetter = fn(&Listing) -> Option<f64>;
pub type TextGetter = fn(&Listing) -> Option<String>;

pub const NUMERIC_COLUMNS: &[(&str, NumericGetter)] = &[
    ("id", |l| Some(l.id as f64)),
    ("host_id", |l| Some(l.host_id as f64)),
    ("latitude", |l| Some(l.latitude)),
    ("longitude", |l| Some(l.longitude)),
    ("price", |l| Some(l.price as f64)),
    ("minimum_nights", |l| Some(l.minimum_nights as f64)),
    ("number_of_reviews", |l| Some(l.number_of_reviews as f64)),
    ("reviews_per_month", |l| l.reviews_per_month),
    ("calculated_host_listings_count", |l| {
        Some(l.calculated_host_listings_count as f64)
    }),
    ("availability_365", |l| Some(l.availability_365 as f64)),
];

pub const CATEGORICAL_COLUMNS: &[(&str, TextGetter)] = &[
    ("name", |l| l.name.clone()),
    ("neighbourhood_group", |l| {
        Some(l.neighbourhood_group.clone())
    }),
    ("neighbourhood", |l| Some(l.neighbourhood.clone())),
    ("room_type", |l| Some(l.room_type.clone())),
    ("host_name", |l| l.host_name.clone()),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_review_date("2019-05-21"),
            NaiveDate::from_ymd_opt(2019, 5, 21)
        );
    }

    #[test]
    fn parses_us_dates() {
        assert_eq!(
            parse_review_date("05/21/2019"),
            NaiveDate::from_ymd_opt(2019, 5, 21)
        );
        assert_eq!(
            parse_review_date("2019/05/21"),
            NaiveDate::from_ymd_opt(2019, 5, 21)
        );
    }

    #[test]
    fn blank_and_garbage_become_none() {
        assert_eq!(parse_review_date(""), None);
        assert_eq!(parse_review_date("   "), None);
        assert_eq!(parse_review_date("not a date"), None);
        assert_eq!(parse_review_date("2019-13-45"), None);
    }
}
