use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, error, info};

use crate::calendar::{month_weeks, parse_month, WeekRange};
use crate::cli::{Command, Opts};
use crate::error::RunError;
use crate::input;
use crate::invoices::{self, invoice_row, output_path};
use crate::settings::Settings;
use crate::templates::{fill_template, Filled};
use crate::timesheet::{month_name, Rows, Timesheet};
use crate::tokens::Field;
use crate::workdays;

/// Run a command, logging the error that stopped it.
pub fn run_logged(opts: Opts) -> Result<(), RunError> {
    run_cmd(opts).inspect_err(|e| error!("{}", e))
}

pub fn run_cmd(opts: Opts) -> Result<(), RunError> {
    let settings = Settings::from_path(&opts.config)?;
    let timesheet = Timesheet::from_path(&settings.csv_path)?;

    let today = Local::now().date_naive();
    let year = opts.year.unwrap_or(today.year());
    let date = opts.date.unwrap_or(today);
    let weeks = timesheet_weeks(&timesheet, year)?;
    debug!(
        year,
        columns = timesheet.headers().len(),
        rows = timesheet.len(),
        weeks = weeks.len(),
        "Loaded timesheet"
    );

    let run = Run {
        settings: &settings,
        rows: &timesheet,
        weeks: &weeks,
        date,
    };
    match opts.subcommand {
        Command::Generate { interactive } => run.generate(interactive),
        Command::Weeks => run.list_weeks(),
        Command::Tokens => run.show_tokens(),
    }
}

/// Weeks of the month named in the timesheet.
pub fn timesheet_weeks<R: Rows + ?Sized>(
    rows: &R,
    year: i32,
) -> Result<Vec<WeekRange>, RunError> {
    let name = month_name(rows).ok_or(RunError::MissingMonth)?;
    month_weeks(year, parse_month(name)?)
}

struct Run<'a, R: Rows + ?Sized> {
    settings: &'a Settings,
    rows: &'a R,
    weeks: &'a [WeekRange],
    date: NaiveDate,
}

impl<'a, R: Rows + ?Sized> Run<'a, R> {
    fn generate(&self, interactive: bool) -> Result<(), RunError> {
        let num_rows = self.rows.len();
        for row in 0..num_rows {
            let invoice =
                invoice_row(self.settings, self.date, self.weeks, self.rows, row);
            let tokens = invoices::tokens(self.settings, &invoice);
            let output = output_path(self.settings, &invoice, row, num_rows);
            debug!(row, tokens = tokens.len(), "Assembled invoice");

            if interactive {
                println!("Writing {}:\n\n{}\n", output.display(), invoice);
                if !input::confirm()? {
                    continue;
                }
            }

            let template = &self.settings.template_file;
            if let Filled::Written(path) = fill_template(template, &output, &tokens)? {
                info!(row, total = %invoice.total(), "Wrote {}", path.display());
            }
        }
        Ok(())
    }

    fn list_weeks(&self) -> Result<(), RunError> {
        for (i, week) in self.weeks.iter().enumerate() {
            let counts: Vec<String> = (0..self.rows.len())
                .map(|row| workdays::count(self.rows, row, week).to_string())
                .collect();
            println!("{}. {} ({} days): {}", i + 1, week, week.num_days(), counts.join(" "));
        }
        Ok(())
    }

    fn show_tokens(&self) -> Result<(), RunError> {
        let num_rows = self.rows.len();
        for row in 0..num_rows {
            let invoice =
                invoice_row(self.settings, self.date, self.weeks, self.rows, row);
            let output = output_path(self.settings, &invoice, row, num_rows);
            let tokens = invoices::tokens(self.settings, &invoice);
            let total = tokens.get(Field::TotalDue).unwrap_or_default();
            println!("{} ({}):", display_name(&output), total);
            println!("{}", tokens);
        }
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
