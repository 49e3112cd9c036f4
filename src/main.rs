/*
 * Timesheet invoicing
 *
 * Reads a tab separated timesheet export and fills an invoice template for
 * every row in it:
 * - the month named in the timesheet is split into calendar weeks
 * - each week is billed for the days logged as a full 8 hours
 * - invoice details, banking details, week line items and the total due
 *   replace the {{PLACEHOLDER}} markers in the template
 * - the filled document is written to the output directory as
 *   invoice_<account holder>_<YYYYMM>.docx
 *
 * Settings come from a JSON file, config.json by default.
 */

mod billing;
mod calendar;
mod cli;
mod error;
mod input;
mod invoices;
mod logs;
mod run;
mod settings;
mod templates;
mod timesheet;
mod tokens;
mod workdays;

use clap::Parser;

use crate::cli::Opts;

fn main() {
    let opts = Opts::parse();
    logs::init(opts.verbose);

    if run::run_logged(opts).is_err() {
        std::process::exit(1);
    }
}
