pub mod stats;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::listing::{Listing, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use self::stats::{mean, pearson, quantile, sample_std};

/// How many of the most frequent values a categorical column reports.
const TOP_VALUES: usize = 5;

#[derive(Debug, Clone)]
pub struct NumericProfile {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub distinct: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CategoricalProfile {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub distinct: usize,
    /// Most frequent values with their counts, descending.
    pub top: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct DateProfile {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub enum ColumnProfile {
    Numeric(NumericProfile),
    Categorical(CategoricalProfile),
    Date(DateProfile),
}

impl ColumnProfile {
    pub fn name(&self) -> &str {
        match self {
            ColumnProfile::Numeric(p) => &p.name,
            ColumnProfile::Categorical(p) => &p.name,
            ColumnProfile::Date(p) => &p.name,
        }
    }

    pub fn missing(&self) -> usize {
        match self {
            ColumnProfile::Numeric(p) => p.missing,
            ColumnProfile::Categorical(p) => p.missing,
            ColumnProfile::Date(p) => p.missing,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Correlation {
    pub a: String,
    pub b: String,
    pub r: f64,
}

/// Descriptive-statistics report over a loaded dataset: per-column profiles,
/// dataset-level missingness, and a Pearson matrix over the numeric columns.
#[derive(Debug, Clone)]
pub struct DatasetProfile {
    pub rows: usize,
    pub missing_cells: usize,
    pub columns: Vec<ColumnProfile>,
    pub correlations: Vec<Correlation>,
}

impl DatasetProfile {
    pub fn build(listings: &[Listing]) -> Self {
        let rows = listings.len();
        let mut columns = Vec::new();

        for (name, get) in NUMERIC_COLUMNS {
            columns.push(ColumnProfile::Numeric(profile_numeric(
                name, listings, *get,
            )));
        }
        for (name, get) in CATEGORICAL_COLUMNS {
            columns.push(ColumnProfile::Categorical(profile_categorical(
                name, listings, *get,
            )));
        }
        columns.push(ColumnProfile::Date(profile_last_review(listings)));

        let missing_cells = columns.iter().map(|c| c.missing()).sum();
        let correlations = correlation_matrix(listings);

        DatasetProfile {
            rows,
            missing_cells,
            columns,
            correlations,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name() == name)
    }
}

fn profile_numeric(
    name: &str,
    listings: &[Listing],
    get: fn(&Listing) -> Option<f64>,
) -> NumericProfile {
    let mut values: Vec<f64> = listings.iter().filter_map(get).collect();
    let missing = listings.len() - values.len();

    values.sort_by(|a, b| a.total_cmp(b));
    let distinct = {
        let mut seen: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        seen.dedup();
        seen.len()
    };

    NumericProfile {
        name: name.to_string(),
        count: values.len(),
        missing,
        distinct,
        mean: mean(&values),
        std: sample_std(&values),
        min: values.first().copied(),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied(),
    }
}

fn profile_categorical(
    name: &str,
    listings: &[Listing],
    get: fn(&Listing) -> Option<String>,
) -> CategoricalProfile {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut present = 0usize;

    for listing in listings {
        if let Some(value) = get(listing) {
            present += 1;
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let distinct = counts.len();
    let mut by_count: Vec<(String, usize)> = counts.into_iter().collect();
    // Descending by count, ties broken alphabetically (the BTreeMap order).
    by_count.sort_by(|a, b| b.1.cmp(&a.1));
    by_count.truncate(TOP_VALUES);

    CategoricalProfile {
        name: name.to_string(),
        count: present,
        missing: listings.len() - present,
        distinct,
        top: by_count,
    }
}

fn profile_last_review(listings: &[Listing]) -> DateProfile {
    let dates: Vec<NaiveDate> = listings.iter().filter_map(|l| l.last_review).collect();

    DateProfile {
        name: "last_review".to_string(),
        count: dates.len(),
        missing: listings.len() - dates.len(),
        min: dates.iter().min().copied(),
        max: dates.iter().max().copied(),
    }
}

/// Pearson r for every numeric column pair, pairwise-complete observations.
/// Pairs with no defined correlation (constant columns) are skipped.
fn correlation_matrix(listings: &[Listing]) -> Vec<Correlation> {
    let mut out = Vec::new();

    for (i, (name_a, get_a)) in NUMERIC_COLUMNS.iter().enumerate() {
        for (name_b, get_b) in NUMERIC_COLUMNS.iter().skip(i + 1) {
            let pairs: Vec<(f64, f64)> = listings
                .iter()
                .filter_map(|l| match (get_a(l), get_b(l)) {
                    (Some(x), Some(y)) => Some((x, y)),
                    _ => None,
                })
                .collect();

            if let Some(r) = pearson(&pairs) {
                out.push(Correlation {
                    a: name_a.to_string(),
                    b: name_b.to_string(),
                    r,
                });
            }
        }
    }

    out
}
