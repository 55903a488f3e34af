use rust_xlsxwriter::{Workbook, XlsxError};

use crate::errors::{PipelineError, PipelineResult};
use crate::profile::{ColumnProfile, DatasetProfile};

/// Export the profile as an XLSX workbook (Overview, Columns, Correlations).
/// Returns the serialized file so callers decide where it lands.
pub fn export_profile_xlsx(profile: &DatasetProfile, source: &str) -> PipelineResult<Vec<u8>> {
    build_workbook(profile, source)
        .and_then(|mut wb| wb.save_to_buffer())
        .map_err(|e| PipelineError::Xlsx(format!("Failed to build workbook: {e}")))
}

fn build_workbook(profile: &DatasetProfile, source: &str) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();

    // -- Overview sheet --
    let sheet = workbook.add_worksheet().set_name("Overview")?;
    sheet.write_string(0, 0, "Dataset")?;
    sheet.write_string(0, 1, source)?;
    sheet.write_string(1, 0, "Rows")?;
    sheet.write_number(1, 1, profile.rows as f64)?;
    sheet.write_string(2, 0, "Columns")?;
    sheet.write_number(2, 1, profile.columns.len() as f64)?;
    sheet.write_string(3, 0, "Missing cells")?;
    sheet.write_number(3, 1, profile.missing_cells as f64)?;

    // -- Columns sheet --
    let sheet = workbook.add_worksheet().set_name("Columns")?;
    let headers = [
        "Column", "Type", "Count", "Missing", "Distinct", "Mean", "Std", "Min", "25%", "Median",
        "75%", "Max", "Top values",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (i, column) in profile.columns.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, column.name())?;

        match column {
            ColumnProfile::Numeric(p) => {
                sheet.write_string(r, 1, "numeric")?;
                sheet.write_number(r, 2, p.count as f64)?;
                sheet.write_number(r, 3, p.missing as f64)?;
                sheet.write_number(r, 4, p.distinct as f64)?;
                let stats = [p.mean, p.std, p.min, p.q25, p.median, p.q75, p.max];
                for (j, stat) in stats.iter().enumerate() {
                    if let Some(v) = stat {
                        sheet.write_number(r, (5 + j) as u16, *v)?;
                    }
                }
            }
            ColumnProfile::Categorical(p) => {
                sheet.write_string(r, 1, "categorical")?;
                sheet.write_number(r, 2, p.count as f64)?;
                sheet.write_number(r, 3, p.missing as f64)?;
                sheet.write_number(r, 4, p.distinct as f64)?;
                let top = p
                    .top
                    .iter()
                    .map(|(v, n)| format!("{v} ({n})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                sheet.write_string(r, 12, top)?;
            }
            ColumnProfile::Date(p) => {
                sheet.write_string(r, 1, "date")?;
                sheet.write_number(r, 2, p.count as f64)?;
                sheet.write_number(r, 3, p.missing as f64)?;
                if let Some(min) = p.min {
                    sheet.write_string(r, 7, min.to_string())?;
                }
                if let Some(max) = p.max {
                    sheet.write_string(r, 11, max.to_string())?;
                }
            }
        }
    }

    // -- Correlations sheet --
    let sheet = workbook.add_worksheet().set_name("Correlations")?;
    sheet.write_string(0, 0, "A")?;
    sheet.write_string(0, 1, "B")?;
    sheet.write_string(0, 2, "Pearson r")?;
    for (i, c) in profile.correlations.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, c.a.as_str())?;
        sheet.write_string(r, 1, c.b.as_str())?;
        sheet.write_number(r, 2, c.r)?;
    }

    Ok(workbook)
}
