use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Error reading configuration from {path:?}: {source}")]
    ConfigFile { path: PathBuf, source: io::Error },

    #[error("Error parsing configuration JSON: {source}")]
    Config {
        #[from]
        source: serde_json::Error,
    },

    #[error("Error loading timesheet from {path:?}: {source}")]
    Timesheet { path: PathBuf, source: csv::Error },

    #[error("Timesheet {path:?} has no rows")]
    EmptyTimesheet { path: PathBuf },

    #[error("No month name found in the timesheet")]
    MissingMonth,

    #[error("Unrecognised month: '{name}'")]
    Month { name: String },

    #[error("Year {year} is out of range")]
    Year { year: i32 },

    #[error("Error reading template archive: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },

    #[error("Template {path:?} is not valid UTF-8 text")]
    TemplateEncoding { path: PathBuf },

    #[error("Input Error: {source}")]
    Input {
        #[from]
        source: inquire::error::InquireError,
    },
}
