use maud::{html, Markup};

use crate::profile::{CategoricalProfile, ColumnProfile, DatasetProfile, DateProfile, NumericProfile};
use crate::templates::report_layout;

/// Render the full profile report for one dataset artifact.
pub fn profile_page(profile: &DatasetProfile, source: &str) -> Markup {
    report_layout(
        &format!("Profile: {source}"),
        html! {
            (overview_card(profile, source))

            section class="card" {
                h3 { "Numeric columns" }
                (numeric_table(profile))
            }

            section class="card" {
                h3 { "Categorical columns" }
                @for col in &profile.columns {
                    @if let ColumnProfile::Categorical(p) = col {
                        (categorical_block(p))
                    }
                }
            }

            @for col in &profile.columns {
                @if let ColumnProfile::Date(p) = col {
                    (date_card(p))
                }
            }

            section class="card" {
                h3 { "Correlations (Pearson)" }
                (correlation_table(profile))
            }
        },
    )
}

fn overview_card(profile: &DatasetProfile, source: &str) -> Markup {
    html! {
        section class="card" {
            h3 { "Overview" }
            p { "Dataset: " strong { (source) } }
            table {
                tr { td { "Rows" } td class="num" { (profile.rows) } }
                tr { td { "Columns" } td class="num" { (profile.columns.len()) } }
                tr { td { "Missing cells" } td class="num" { (profile.missing_cells) } }
            }
        }
    }
}

fn numeric_table(profile: &DatasetProfile) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Column" }
                    th { "Count" } th { "Missing" } th { "Distinct" }
                    th { "Mean" } th { "Std" }
                    th { "Min" } th { "25%" } th { "Median" } th { "75%" } th { "Max" }
                }
            }
            tbody {
                @for col in &profile.columns {
                    @if let ColumnProfile::Numeric(p) = col {
                        (numeric_row(p))
                    }
                }
            }
        }
    }
}

fn numeric_row(p: &NumericProfile) -> Markup {
    html! {
        tr {
            td { (p.name) }
            td class="num" { (p.count) }
            td class="num" { (p.missing) }
            td class="num" { (p.distinct) }
            td class="num" { (fmt_opt(p.mean)) }
            td class="num" { (fmt_opt(p.std)) }
            td class="num" { (fmt_opt(p.min)) }
            td class="num" { (fmt_opt(p.q25)) }
            td class="num" { (fmt_opt(p.median)) }
            td class="num" { (fmt_opt(p.q75)) }
            td class="num" { (fmt_opt(p.max)) }
        }
    }
}

fn categorical_block(p: &CategoricalProfile) -> Markup {
    html! {
        h4 { (p.name) }
        p class="muted" {
            (p.count) " values, " (p.missing) " missing, " (p.distinct) " distinct"
        }
        table {
            thead { tr { th { "Value" } th { "Count" } } }
            tbody {
                @for (value, count) in &p.top {
                    tr { td { (value) } td class="num" { (count) } }
                }
            }
        }
    }
}

fn date_card(p: &DateProfile) -> Markup {
    html! {
        section class="card" {
            h3 { (p.name) }
            table {
                tr { td { "Present" } td class="num" { (p.count) } }
                tr { td { "Missing" } td class="num" { (p.missing) } }
                @match (p.min, p.max) {
                    (Some(min), Some(max)) => {
                        tr { td { "Earliest" } td class="num" { (min) } }
                        tr { td { "Latest" } td class="num" { (max) } }
                    }
                    _ => {
                        tr { td class="muted" colspan="2" { "No dates observed" } }
                    }
                }
            }
        }
    }
}

fn correlation_table(profile: &DatasetProfile) -> Markup {
    html! {
        @if profile.correlations.is_empty() {
            p class="muted" { "Not enough data for correlations." }
        } @else {
            table {
                thead { tr { th { "A" } th { "B" } th { "r" } } }
                tbody {
                    @for c in &profile.correlations {
                        tr {
                            td { (c.a) }
                            td { (c.b) }
                            td class="num" { (format!("{:+.3}", c.r)) }
                        }
                    }
                }
            }
        }
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}
