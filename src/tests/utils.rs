use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;

use crate::db::connection::{init_db, Database};
use crate::domain::listing::Listing;
use crate::store::ArtifactStore;

fn nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

/// Returns a fresh test database using the production schema.
pub fn make_db() -> Database {
    let path = std::env::temp_dir().join(format!("eda_test_{}.sqlite", nanos()));
    let db = Database::new(path);
    init_db(&db).expect("Failed to initialize DB");
    db
}

/// Artifact store rooted in a fresh temp directory.
pub fn make_store(db: &Database) -> ArtifactStore {
    let root = std::env::temp_dir().join(format!("eda_store_{}", nanos()));
    ArtifactStore::new(db.clone(), root).expect("Failed to open store")
}

/// A listing with sane defaults; tests override the fields they care about.
pub fn listing(id: i64, price: i64) -> Listing {
    Listing {
        id,
        name: Some(format!("Listing {id}")),
        host_id: 1000 + id,
        host_name: Some("Alex".to_string()),
        neighbourhood_group: "Manhattan".to_string(),
        neighbourhood: "Harlem".to_string(),
        latitude: 40.80,
        longitude: -73.95,
        room_type: "Private room".to_string(),
        price,
        minimum_nights: 2,
        number_of_reviews: 10,
        last_review: NaiveDate::from_ymd_opt(2019, 5, 21),
        reviews_per_month: Some(0.40),
        calculated_host_listings_count: 1,
        availability_365: 180,
    }
}

pub const CSV_HEADER: &str = "id,name,host_id,host_name,neighbourhood_group,neighbourhood,latitude,longitude,room_type,price,minimum_nights,number_of_reviews,last_review,reviews_per_month,calculated_host_listings_count,availability_365";

/// Write a CSV fixture (header + given data rows) and return its path.
pub fn write_sample_csv(rows: &[&str]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("eda_fixture_{}.csv", nanos()));
    let mut content = String::from(CSV_HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).expect("write fixture");
    path
}

/// Write an arbitrary file fixture and return its path.
pub fn write_file(name_hint: &str, content: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("eda_{}_{}", nanos(), name_hint));
    std::fs::write(&path, content).expect("write fixture");
    path
}
