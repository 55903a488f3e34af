pub mod profile_xlsx;

pub use profile_xlsx::export_profile_xlsx;
