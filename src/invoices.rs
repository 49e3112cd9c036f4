use std::path::PathBuf;

use chrono::NaiveDate;

use crate::billing::{Invoice, InvoiceItem, Money};
use crate::calendar::WeekRange;
use crate::settings::Settings;
use crate::timesheet::Rows;
use crate::tokens::{Field, Token, TokenMap, WeekField};
use crate::workdays::Workdays;

/// Bill one timesheet row: a line item per week, priced at the day rate.
pub fn invoice_row<R: Rows + ?Sized>(
    settings: &Settings,
    date: NaiveDate,
    weeks: &[WeekRange],
    rows: &R,
    row: usize,
) -> Invoice {
    let rate = Money::new(settings.day_rate_per_week);
    let mut workdays = Workdays::new(rows, row);
    let items = weeks
        .iter()
        .map(|week| InvoiceItem::new(*week, workdays.in_week(week), rate))
        .collect();
    Invoice::new(date, items)
}

/// Values for every placeholder of an invoice document.
pub fn tokens(settings: &Settings, invoice: &Invoice) -> TokenMap {
    let mut tokens = TokenMap::new();
    tokens.insert(Field::InvoiceNumber, invoice.number());
    tokens.insert(Field::Date, invoice.formatted_date());
    tokens.insert(Field::AccountHolder, &settings.account_holder);
    tokens.insert(Field::RoutingNumber, &settings.routing_number);
    tokens.insert(Field::SwiftBic, &settings.swift_bic);
    tokens.insert(Field::AccountNumber, &settings.account_number);
    tokens.insert(Field::WiseAddress, &settings.wise_address);
    tokens.insert(Field::CompanyName, &settings.company_name);
    tokens.insert(Field::CompanyAddress, &settings.company_address);
    tokens.insert(Field::CompanyEmail, &settings.company_email);

    for (i, item) in invoice.items.iter().enumerate() {
        let week = i + 1;
        tokens.insert(Token::Week(WeekField::WorkPeriod, week), item.period);
        tokens.insert(
            Token::Week(WeekField::Description, week),
            item.description(&settings.client),
        );
        tokens.insert(Token::Week(WeekField::DayRate, week), item.rate);
        tokens.insert(Token::Week(WeekField::Total, week), item.amount);
    }

    tokens.insert(Field::TotalDue, invoice.total());
    tokens
}

/// Where an invoice document is written. Multi-row timesheets get the row
/// number appended so that each row has its own file.
pub fn output_path(
    settings: &Settings,
    invoice: &Invoice,
    row: usize,
    num_rows: usize,
) -> PathBuf {
    let extension = settings
        .template_file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("docx");
    let holder = settings.account_holder.replace(['/', '\\'], "_");
    let stem = format!("invoice_{}_{}", holder, invoice.number());
    let name = if num_rows > 1 {
        format!("{}_{}.{}", stem, row + 1, extension)
    } else {
        format!("{}.{}", stem, extension)
    };
    settings.output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::tests::settings;
    use crate::timesheet::tests::timesheet;
    use crate::timesheet::Timesheet;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn week(from: u32, until: u32) -> WeekRange {
        WeekRange::new(ymd(2023, 10, from), ymd(2023, 10, until))
    }

    #[test]
    fn single_week_totals() {
        let sheet = Timesheet::from_reader(
            "1\t2\t3\t4\t5\n8\t8\t8\t8\t0\n".as_bytes(),
        )
        .unwrap();
        let settings = settings();
        let invoice =
            invoice_row(&settings, ymd(2023, 10, 5), &[week(1, 5)], &sheet, 0);
        let tokens = tokens(&settings, &invoice);

        assert_eq!(tokens.get(Token::Week(WeekField::WorkPeriod, 1)), Some("October 1 - October 5"));
        assert_eq!(tokens.get(Token::Week(WeekField::Description, 1)), Some("4 Days - Test Client"));
        assert_eq!(tokens.get(Token::Week(WeekField::DayRate, 1)), Some("$100.00"));
        assert_eq!(tokens.get(Token::Week(WeekField::Total, 1)), Some("$400.00"));
        assert_eq!(tokens.get(Field::TotalDue), Some("$400.00"));
    }

    #[test]
    fn metadata_tokens() {
        let settings = settings();
        let invoice = Invoice::new(ymd(2023, 10, 5), vec![]);
        let tokens = tokens(&settings, &invoice);

        assert_eq!(tokens.get(Field::InvoiceNumber), Some("202310"));
        assert_eq!(tokens.get(Field::Date), Some("05 Oct 2023"));
        assert_eq!(tokens.get(Field::AccountHolder), Some("Test User"));
        assert_eq!(tokens.get(Field::RoutingNumber), Some("123456789"));
        assert_eq!(tokens.get(Field::SwiftBic), Some("ABCDEF12"));
        assert_eq!(tokens.get(Field::AccountNumber), Some("987654321"));
        assert_eq!(tokens.get(Field::WiseAddress), Some("123 Wise St."));
        assert_eq!(tokens.get(Field::CompanyName), Some("Test Company"));
        assert_eq!(tokens.get(Field::CompanyAddress), Some("123 Test St."));
        assert_eq!(tokens.get(Field::CompanyEmail), Some("test@example.com"));
    }

    #[test]
    fn no_weeks_no_week_tokens() {
        let settings = settings();
        let invoice =
            invoice_row(&settings, ymd(2023, 10, 5), &[], &timesheet(), 0);
        let tokens = tokens(&settings, &invoice);

        assert_eq!(tokens.get(Field::TotalDue), Some("$0.00"));
        assert!(tokens.iter().all(|(t, _)| matches!(t, Token::Field(_))));
        assert_eq!(tokens.len(), 11);
    }

    #[test]
    fn four_tokens_per_week() {
        let settings = settings();
        let weeks = [week(1, 1), week(2, 8), week(9, 15)];
        let invoice =
            invoice_row(&settings, ymd(2023, 10, 31), &weeks, &timesheet(), 1);
        let tokens = tokens(&settings, &invoice);

        assert_eq!(tokens.len(), 11 + 4 * weeks.len());
        assert_eq!(tokens.get(Token::Week(WeekField::Description, 1)), Some("0 Days - Test Client"));
        assert_eq!(tokens.get(Token::Week(WeekField::Description, 2)), Some("3 Days - Test Client"));
        assert_eq!(tokens.get(Field::TotalDue), Some("$300.00"));
    }

    #[test]
    fn output_names() {
        let settings = settings();
        let invoice = Invoice::new(ymd(2023, 10, 5), vec![]);

        assert_eq!(
            output_path(&settings, &invoice, 0, 1),
            PathBuf::from("out/invoice_Test User_202310.docx")
        );
        assert_eq!(
            output_path(&settings, &invoice, 1, 2),
            PathBuf::from("out/invoice_Test User_202310_2.docx")
        );
    }

    #[test]
    fn output_stays_in_output_dir() {
        let mut settings = settings();
        settings.account_holder = String::from("../A/B\\C");
        let invoice = Invoice::new(ymd(2023, 10, 5), vec![]);

        let path = output_path(&settings, &invoice, 0, 1);
        assert_eq!(path, PathBuf::from("out/invoice_.._A_B_C_202310.docx"));
        assert_eq!(path.parent(), Some(settings.output_dir.as_path()));
    }
}
