use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::RunError;

/// Everything a run needs to know that isn't in the timesheet itself.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Settings {
    pub csv_path: PathBuf,
    pub template_file: PathBuf,
    pub output_dir: PathBuf,
    pub day_rate_per_week: Decimal,
    pub client: String,
    pub account_holder: String,
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
    pub routing_number: String,
    pub swift_bic: String,
    pub account_number: String,
    pub wise_address: String,
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, RunError> {
        let file = File::open(path).map_err(|source| RunError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
