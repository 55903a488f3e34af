use crate::dataset::{load_listings, write_listings};
use crate::domain::logic::{clean_listings, price_in_range};
use crate::tests::utils::{listing, write_sample_csv};

#[test]
fn retained_rows_stay_within_bounds() {
    let input: Vec<_> = [5, 9, 10, 60, 349, 350, 351, 5000]
        .iter()
        .enumerate()
        .map(|(i, price)| listing(i as i64, *price))
        .collect();
    let rows_in = input.len();

    let (cleaned, summary) = clean_listings(input, 10.0, 350.0);

    assert!(cleaned.iter().all(|l| l.price >= 10 && l.price <= 350));
    // Boundaries are inclusive
    assert!(cleaned.iter().any(|l| l.price == 10));
    assert!(cleaned.iter().any(|l| l.price == 350));

    assert_eq!(summary.rows_in, rows_in);
    assert_eq!(summary.rows_out, 4);
    assert_eq!(summary.dropped_out_of_range, 4);
    assert!(summary.rows_out <= summary.rows_in);
}

#[test]
fn null_reviews_are_counted_not_dropped() {
    let mut a = listing(1, 100);
    a.last_review = None;
    let b = listing(2, 100);

    let (cleaned, summary) = clean_listings(vec![a, b], 10.0, 350.0);

    assert_eq!(cleaned.len(), 2);
    assert_eq!(summary.null_last_review, 1);
}

#[test]
fn price_range_is_inclusive() {
    assert!(price_in_range(&listing(1, 10), 10.0, 350.0));
    assert!(price_in_range(&listing(1, 350), 10.0, 350.0));
    assert!(!price_in_range(&listing(1, 9), 10.0, 350.0));
    assert!(!price_in_range(&listing(1, 351), 10.0, 350.0));
}

#[test]
fn csv_load_coerces_last_review() {
    let path = write_sample_csv(&[
        "1,Cozy room,101,Ann,Brooklyn,Williamsburg,40.71,-73.95,Private room,60,2,10,2019-05-21,0.40,1,180",
        "2,Loft,102,Bo,Manhattan,Midtown,40.75,-73.98,Entire home/apt,200,3,0,not-a-date,,2,300",
        "3,,103,,Queens,Astoria,40.76,-73.92,Shared room,45,1,5,,,1,90",
    ]);

    let listings = load_listings(&path).unwrap();
    assert_eq!(listings.len(), 3);

    // Valid date parses, garbage and blank both coerce to None
    assert!(listings[0].last_review.is_some());
    assert_eq!(listings[1].last_review, None);
    assert_eq!(listings[2].last_review, None);

    // Blank optional fields come through as None
    assert_eq!(listings[1].reviews_per_month, None);
    assert_eq!(listings[2].name, None);
    assert_eq!(listings[2].host_name, None);

    let _ = std::fs::remove_file(path);
}

#[test]
fn csv_round_trip_preserves_rows() {
    let path = write_sample_csv(&[
        "1,Cozy room,101,Ann,Brooklyn,Williamsburg,40.71,-73.95,Private room,60,2,10,2019-05-21,0.40,1,180",
        "3,,103,,Queens,Astoria,40.76,-73.92,Shared room,45,1,5,,,1,90",
    ]);
    let listings = load_listings(&path).unwrap();

    let out = std::env::temp_dir().join("eda_round_trip.csv");
    write_listings(&out, &listings).unwrap();
    let reloaded = load_listings(&out).unwrap();

    assert_eq!(reloaded.len(), listings.len());
    for (a, b) in listings.iter().zip(reloaded.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.price, b.price);
        assert_eq!(a.last_review, b.last_review);
        assert_eq!(a.reviews_per_month, b.reviews_per_month);
    }

    let _ = std::fs::remove_file(path);
    let _ = std::fs::remove_file(out);
}

#[test]
fn malformed_rows_are_load_errors() {
    // price is not a number
    let path = write_sample_csv(&[
        "1,Cozy room,101,Ann,Brooklyn,Williamsburg,40.71,-73.95,Private room,cheap,2,10,2019-05-21,0.40,1,180",
    ]);

    let err = load_listings(&path).unwrap_err();
    assert!(err.to_string().contains("row 1"), "got: {err}");

    let _ = std::fs::remove_file(path);
}
