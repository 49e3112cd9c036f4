use chrono::NaiveDate;
use clap::{Parser, ValueHint};
use std::path::PathBuf;

/* Argument Structure
 *
 * [--config <file>] [--year <year>] [--date <date>] [-v]
 *     generate [--interactive] | weeks | tokens
 */

#[derive(Parser)]
pub struct Opts {
    /// Settings file with paths, day rate, and invoice details
    #[clap(short, long, global = true, default_value="config.json",
        value_hint=ValueHint::FilePath)]
    pub config: PathBuf,

    /// Year of the timesheet month, defaults to the current year
    #[clap(short, long, global = true)]
    pub year: Option<i32>,

    /// Issue date of the invoices (YYYY-MM-DD), defaults to today
    #[clap(short, long, global = true)]
    pub date: Option<NaiveDate>,

    /// Log debugging details
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub subcommand: Command,
}

#[derive(Parser)]
pub enum Command {
    /// Write an invoice document for every timesheet row
    Generate {
        /// Show each invoice and ask before writing it
        #[clap(short, long)]
        interactive: bool,
    },

    /// List the weeks of the timesheet month and each row's workdays
    Weeks,

    /// Print the placeholder values of every invoice without writing
    Tokens,
}
