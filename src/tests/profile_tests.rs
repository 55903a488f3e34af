use crate::profile::{ColumnProfile, DatasetProfile};
use crate::spreadsheets::export_profile_xlsx;
use crate::templates::profile_page;
use crate::tests::utils::listing;

fn fixture() -> Vec<crate::domain::listing::Listing> {
    let mut rows = Vec::new();
    for (i, price) in [10i64, 20, 30, 40].iter().enumerate() {
        let mut l = listing(i as i64, *price);
        // minimum_nights tracks price exactly, so the pair correlates at r = 1
        l.minimum_nights = price / 10;
        l.room_type = if i % 2 == 0 {
            "Private room".to_string()
        } else {
            "Entire home/apt".to_string()
        };
        rows.push(l);
    }
    rows
}

#[test]
fn numeric_column_stats() {
    let profile = DatasetProfile::build(&fixture());
    assert_eq!(profile.rows, 4);

    let price = match profile.column("price") {
        Some(ColumnProfile::Numeric(p)) => p,
        other => panic!("price should be numeric, got {other:?}"),
    };

    assert_eq!(price.count, 4);
    assert_eq!(price.missing, 0);
    assert_eq!(price.distinct, 4);
    assert_eq!(price.mean, Some(25.0));
    assert_eq!(price.min, Some(10.0));
    assert_eq!(price.max, Some(40.0));
    assert_eq!(price.median, Some(25.0));
}

#[test]
fn missing_values_are_counted() {
    let mut rows = fixture();
    rows[0].reviews_per_month = None;
    rows[1].reviews_per_month = None;
    rows[2].last_review = None;

    let profile = DatasetProfile::build(&rows);

    match profile.column("reviews_per_month") {
        Some(ColumnProfile::Numeric(p)) => {
            assert_eq!(p.missing, 2);
            assert_eq!(p.count, 2);
        }
        other => panic!("unexpected: {other:?}"),
    }
    match profile.column("last_review") {
        Some(ColumnProfile::Date(p)) => {
            assert_eq!(p.missing, 1);
            assert_eq!(p.count, 3);
        }
        other => panic!("unexpected: {other:?}"),
    }

    assert!(profile.missing_cells >= 3);
}

#[test]
fn categorical_top_values_sorted_by_count() {
    let mut rows = fixture();
    rows.push(listing(99, 50)); // one more "Private room"

    let profile = DatasetProfile::build(&rows);
    let room_type = match profile.column("room_type") {
        Some(ColumnProfile::Categorical(p)) => p,
        other => panic!("unexpected: {other:?}"),
    };

    assert_eq!(room_type.distinct, 2);
    assert_eq!(room_type.top[0].0, "Private room");
    assert_eq!(room_type.top[0].1, 3);
    assert!(room_type.top[0].1 >= room_type.top[1].1);
}

#[test]
fn correlations_include_linked_columns() {
    let profile = DatasetProfile::build(&fixture());

    let pair = profile
        .correlations
        .iter()
        .find(|c| c.a == "price" && c.b == "minimum_nights")
        .expect("price/minimum_nights pair missing");
    assert!((pair.r - 1.0).abs() < 1e-9);

    // Constant columns (latitude is identical across the fixture) have no
    // defined correlation and must be skipped, not reported as NaN.
    assert!(profile
        .correlations
        .iter()
        .all(|c| c.a != "latitude" && c.b != "latitude"));
    assert!(profile.correlations.iter().all(|c| c.r.is_finite()));
}

#[test]
fn empty_dataset_profiles_cleanly() {
    let profile = DatasetProfile::build(&[]);

    assert_eq!(profile.rows, 0);
    assert_eq!(profile.missing_cells, 0);
    assert!(profile.correlations.is_empty());
    match profile.column("price") {
        Some(ColumnProfile::Numeric(p)) => {
            assert_eq!(p.count, 0);
            assert_eq!(p.mean, None);
            assert_eq!(p.min, None);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn all_sixteen_columns_are_profiled() {
    let profile = DatasetProfile::build(&fixture());
    assert_eq!(profile.columns.len(), 16);
    for name in [
        "id",
        "name",
        "host_id",
        "host_name",
        "neighbourhood_group",
        "neighbourhood",
        "latitude",
        "longitude",
        "room_type",
        "price",
        "minimum_nights",
        "number_of_reviews",
        "last_review",
        "reviews_per_month",
        "calculated_host_listings_count",
        "availability_365",
    ] {
        assert!(profile.column(name).is_some(), "missing column {name}");
    }
}

#[test]
fn html_report_mentions_every_column() {
    let profile = DatasetProfile::build(&fixture());
    let html = profile_page(&profile, "sample.csv:v0").into_string();

    assert!(html.contains("sample.csv:v0"));
    for col in &profile.columns {
        assert!(html.contains(col.name()), "report missing {}", col.name());
    }
}

#[test]
fn xlsx_export_is_a_zip() {
    let profile = DatasetProfile::build(&fixture());
    let buffer = export_profile_xlsx(&profile, "sample.csv:v0").unwrap();

    // XLSX is a zip container: PK magic
    assert!(buffer.len() > 4);
    assert_eq!(&buffer[..2], b"PK");
}
