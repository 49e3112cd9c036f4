use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::calendar::WeekRange;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add<Money> for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(
            (self.0 * Decimal::from(quantity)).round_dp_with_strategy(
                2,
                RoundingStrategy::MidpointNearestEven,
            ),
        )
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::default(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        write!(f, "${:.2}", rounded)
    }
}

/// One billed week of an invoice.
#[derive(Debug, PartialEq, Clone)]
pub struct InvoiceItem {
    pub period: WeekRange,
    pub workdays: u32,
    pub rate: Money,
    pub amount: Money,
}

impl InvoiceItem {
    pub fn new(period: WeekRange, workdays: u32, rate: Money) -> Self {
        Self {
            period,
            workdays,
            rate,
            amount: rate * workdays,
        }
    }

    pub fn description(&self, client: &str) -> String {
        format!("{} Days - {}", self.workdays, client)
    }
}

impl fmt::Display for InvoiceItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {} days @ {}: {}",
            self.period, self.workdays, self.rate, self.amount
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Invoice {
    pub date: NaiveDate,
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn new(date: NaiveDate, items: Vec<InvoiceItem>) -> Self {
        Self { date, items }
    }

    /// Invoices are numbered by the year and month they are issued in.
    pub fn number(&self) -> String {
        self.date.format("%Y%m").to_string()
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%d %b %Y").to_string()
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(|i| i.amount).sum()
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invoice: #{}\n\
             Date: {}\n\n",
            self.number(),
            self.formatted_date(),
        )?;

        for item in self.items.iter() {
            writeln!(f, "{}", item)?;
        }

        write!(f, "\nTotal: {}", self.total())
    }
}
