use std::path::Path;

use crate::domain::listing::Listing;
use crate::errors::{PipelineError, PipelineResult};

/// Parse a listings CSV into typed records. Row numbers in error messages
/// are 1-based data rows (the header is row 0).
pub fn load_listings(path: &Path) -> PipelineResult<Vec<Listing>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| PipelineError::Csv(format!("open {}: {e}", path.display())))?;

    let mut listings = Vec::new();
    for (row_no, result) in reader.deserialize::<Listing>().enumerate() {
        let listing =
            result.map_err(|e| PipelineError::Csv(format!("row {}: {e}", row_no + 1)))?;
        listings.push(listing);
    }

    log::info!("Loaded {} listings from {}", listings.len(), path.display());
    Ok(listings)
}

/// Write listings back out with the same 16-column header, index-free.
pub fn write_listings(path: &Path, listings: &[Listing]) -> PipelineResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PipelineError::Csv(format!("create {}: {e}", path.display())))?;

    for listing in listings {
        writer
            .serialize(listing)
            .map_err(|e| PipelineError::Csv(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::Io(e.to_string()))?;

    Ok(())
}
