// src/domain/logic.rs

use super::listing::Listing;

/// Inclusive price-range check. The bounds arrive as floats from the CLI
/// (the price column itself is integer dollars).
pub fn price_in_range(listing: &Listing, min_price: f64, max_price: f64) -> bool {
    let price = listing.price as f64;
    price >= min_price && price <= max_price
}

/// Counters reported back to the run tracker after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped_out_of_range: usize,
    pub null_last_review: usize,
}

/// Drop price outliers outside `[min_price, max_price]`. Date coercion for
/// `last_review` already happened when the CSV was parsed, so here we only
/// count how many retained rows have no review date.
pub fn clean_listings(
    listings: Vec<Listing>,
    min_price: f64,
    max_price: f64,
) -> (Vec<Listing>, CleaningSummary) {
    let rows_in = listings.len();

    let retained: Vec<Listing> = listings
        .into_iter()
        .filter(|l| price_in_range(l, min_price, max_price))
        .collect();

    let summary = CleaningSummary {
        rows_in,
        rows_out: retained.len(),
        dropped_out_of_range: rows_in - retained.len(),
        null_last_review: retained.iter().filter(|l| l.last_review.is_none()).count(),
    };

    (retained, summary)
}
