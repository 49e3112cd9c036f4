use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use strum_macros::{Display, EnumIter};

/// Placeholders that appear once per invoice.
#[derive(Display, EnumIter, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    InvoiceNumber,
    Date,
    AccountHolder,
    RoutingNumber,
    SwiftBic,
    AccountNumber,
    WiseAddress,
    CompanyName,
    CompanyAddress,
    CompanyEmail,
    TotalDue,
}

/// Placeholders repeated for every billed week, numbered from 1.
#[derive(Display, EnumIter, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekField {
    WorkPeriod,
    Description,
    DayRate,
    Total,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Token {
    Field(Field),
    Week(WeekField, usize),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Field(field) => write!(f, "{{{{{}}}}}", field),
            Token::Week(field, week) => write!(f, "{{{{{}{}}}}}", field, week),
        }
    }
}

impl From<Field> for Token {
    fn from(field: Field) -> Self {
        Token::Field(field)
    }
}

/// Token values in the order they were added.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct TokenMap {
    entries: Vec<(Token, String)>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a token's value, replacing any earlier value in place.
    pub fn insert(&mut self, token: impl Into<Token>, value: impl ToString) {
        let token = token.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    pub fn get(&self, token: impl Into<Token>) -> Option<&str> {
        let token = token.into();
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &str)> {
        self.entries.iter().map(|(t, v)| (t, v.as_str()))
    }

    pub fn substitution(&self) -> Substitution<'_> {
        Substitution::new(self)
    }
}

impl fmt::Display for TokenMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (token, value) in self.iter() {
            writeln!(f, "{} = {}", token, value)?;
        }
        Ok(())
    }
}

static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{[A-Z0-9_]+\}\}").expect("marker pattern is valid")
});

/// Replaces whole `{{NAME}}` markers with their values. Markers are matched
/// in full, so `{{TOTAL1}}` never matches the start of `{{TOTAL10}}`, and
/// unknown markers are left as they are.
pub struct Substitution<'a> {
    values: HashMap<String, &'a str>,
}

impl<'a> Substitution<'a> {
    fn new(tokens: &'a TokenMap) -> Self {
        let values = tokens
            .iter()
            .map(|(token, value)| (token.to_string(), value))
            .collect();
        Self { values }
    }

    /// Apply to a piece of text, with each value passed through `escape`
    /// before insertion. `None` when nothing was replaced.
    pub fn apply<F>(&self, text: &str, escape: F) -> Option<String>
    where
        F: Fn(&'a str) -> Cow<'a, str>,
    {
        let mut replaced = false;
        let result = MARKER.replace_all(text, |caps: &Captures| {
            let marker = &caps[0];
            match self.values.get(marker) {
                Some(&value) => {
                    replaced = true;
                    escape(value).into_owned()
                }
                None => marker.to_string(),
            }
        });
        replaced.then(|| result.into_owned())
    }

    pub fn apply_plain(&self, text: &str) -> Option<String> {
        self.apply(text, Cow::Borrowed)
    }

    /// Byte ranges of the known markers in `text`, in order, with their values.
    pub fn markers(&self, text: &str) -> Vec<(Range<usize>, &'a str)> {
        MARKER
            .find_iter(text)
            .filter_map(|m| {
                self.values
                    .get(m.as_str())
                    .map(|&value| (m.range(), value))
            })
            .collect()
    }
}
