//! # Validation Engine
//!
//! Declarative form schemas: each field carries an ordered list of rules and
//! the first failing rule supplies the field's message.
//!
//! Rules other than [`Rule::Required`] only look at non-blank values, so an
//! optional field that was left empty always passes. Every call evaluates
//! from scratch; there is no warm-up state.

use crate::primitives::{DATE_FORMAT, TIME_FORMAT};
use crate::types::{FieldErrors, FormValues};
use chrono::{Local, NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

const EMAIL_REGEX: &str = r"^[^\s@]+@[^\s@]+\.[^\s@.]+$";

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_REGEX).ok());

// =============================================================================
// RULES
// =============================================================================

/// A single check applied to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present and not blank.
    Required(&'static str),
    /// Value must look like an e-mail address.
    Email(&'static str),
    /// At least this many characters.
    MinLength(usize, &'static str),
    /// At most this many characters.
    MaxLength(usize, &'static str),
    /// Value must equal the value of another field.
    EqualsField(&'static str, &'static str),
    /// Value must be a `YYYY-MM-DD` date.
    Date(&'static str),
    /// Date must not be after today.
    NotInFuture(&'static str),
    /// Value must be a `HH:MM` time.
    Time(&'static str),
    /// Value must be one of the listed options.
    OneOf(&'static [&'static str], &'static str),
    /// Value must be an integer within the inclusive range.
    IntegerRange(i64, i64, &'static str),
}

impl Rule {
    /// Check a field. Returns the rule's message on failure.
    fn check(&self, field: &str, values: &FormValues, today: NaiveDate) -> Result<(), &'static str> {
        let value = values.trimmed(field);

        if let Self::Required(message) = self {
            return if value.is_empty() { Err(*message) } else { Ok(()) };
        }
        if value.is_empty() {
            return Ok(());
        }

        let passed = match self {
            Self::Required(_) => true,
            Self::Email(_) => EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(value)),
            Self::MinLength(min, _) => value.chars().count() >= *min,
            Self::MaxLength(max, _) => value.chars().count() <= *max,
            Self::EqualsField(other, _) => values.get(field) == values.get(other),
            Self::Date(_) => parse_date(value).is_some(),
            // Unparseable dates are reported by `Date`.
            Self::NotInFuture(_) => parse_date(value).is_none_or(|date| date <= today),
            Self::Time(_) => NaiveTime::parse_from_str(value, TIME_FORMAT).is_ok(),
            Self::OneOf(options, _) => options.contains(&value),
            Self::IntegerRange(min, max, _) => value
                .parse::<i64>()
                .is_ok_and(|n| (*min..=*max).contains(&n)),
        };

        if passed { Ok(()) } else { Err(self.message()) }
    }

    /// The message reported when this rule fails.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Required(m)
            | Self::Email(m)
            | Self::MinLength(_, m)
            | Self::MaxLength(_, m)
            | Self::EqualsField(_, m)
            | Self::Date(m)
            | Self::NotInFuture(m)
            | Self::Time(m)
            | Self::OneOf(_, m)
            | Self::IntegerRange(_, _, m) => *m,
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

// =============================================================================
// VALIDATE TRAIT
// =============================================================================

/// The validation engine seen from the wizard.
///
/// Given the names of the fields to check and the current values, report a
/// message for every failing field. Fields that pass are absent from the
/// result.
pub trait Validate {
    fn validate(&self, fields: &[&str], values: &FormValues) -> FieldErrors;
}

// =============================================================================
// SCHEMA
// =============================================================================

/// Ordered collection of field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: &'static str,
    fields: Vec<(&'static str, Vec<Rule>)>,
    today: Option<NaiveDate>,
}

impl Schema {
    /// Create an empty schema.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            today: None,
        }
    }

    /// Add a field with its rules, in evaluation order.
    #[must_use]
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name, rules.into_iter().collect()));
        self
    }

    /// Pin "today" for date rules instead of reading the local clock.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Schema name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Whether the schema declares a field.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.rules(field).is_some()
    }

    fn rules(&self, field: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rules)| rules.as_slice())
    }

    /// Validate the named fields against an explicit "today".
    ///
    /// Names the schema does not declare are ignored.
    #[must_use]
    pub fn validate_at(&self, fields: &[&str], values: &FormValues, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for &field in fields {
            let Some(rules) = self.rules(field) else {
                continue;
            };
            if let Some(message) = rules
                .iter()
                .find_map(|rule| rule.check(field, values, today).err())
            {
                errors.insert(field, message);
            }
        }
        errors
    }

    /// Validate every declared field.
    #[must_use]
    pub fn validate_all(&self, values: &FormValues) -> FieldErrors {
        let names: Vec<&str> = self.field_names().collect();
        self.validate(&names, values)
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Validate for Schema {
    fn validate(&self, fields: &[&str], values: &FormValues) -> FieldErrors {
        let errors = self.validate_at(fields, values, self.today());
        tracing::debug!(
            schema = self.name,
            checked = fields.len(),
            failed = errors.len(),
            "validation pass"
        );
        errors
    }
}

// =============================================================================
// TESTS
// =============================================================================
