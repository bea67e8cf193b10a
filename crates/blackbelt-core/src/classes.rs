//! # Class Scheduling
//!
//! A class is drafted from a date, a `HH:MM` start time, a description and a
//! set of selected students. Building the draft validates it and combines
//! date and time into a single start timestamp.

use crate::forms::class_schema;
use crate::primitives::{FIELD_CLASS_TIME, FIELD_DATE, FIELD_DESCRIPTION, TIME_FORMAT};
use crate::types::{BlackbeltError, FieldErrors, FormValues};
use crate::validation::parse_date;
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Body of `POST /classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    /// Class start.
    pub date: NaiveDateTime,
    pub master_id: u64,
    pub description: String,
    pub students_id: Vec<u64>,
}

/// A class being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDraft {
    values: FormValues,
    students: Vec<u64>,
}

impl ClassDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft dated `date` (`YYYY-MM-DD`), the form's default.
    #[must_use]
    pub fn on(date: impl Into<String>) -> Self {
        let mut draft = Self::new();
        draft.set_field(FIELD_DATE, date);
        draft
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.values.set(name, value);
    }

    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Flip a student's selection. Returns whether the student is now selected.
    pub fn toggle_student(&mut self, id: u64) -> bool {
        if let Some(pos) = self.students.iter().position(|&s| s == id) {
            self.students.remove(pos);
            false
        } else {
            self.students.push(id);
            true
        }
    }

    /// Selected students in selection order.
    #[must_use]
    pub fn students(&self) -> &[u64] {
        &self.students
    }

    /// Validate and build the request body for the given master.
    pub fn build(&self, master_id: u64) -> Result<NewClass, BlackbeltError> {
        let errors = class_schema().validate_all(&self.values);
        if !errors.is_empty() {
            return Err(BlackbeltError::InvalidForm(errors));
        }

        let date = parse_date(self.values.trimmed(FIELD_DATE));
        let time = NaiveTime::parse_from_str(self.values.trimmed(FIELD_CLASS_TIME), TIME_FORMAT).ok();
        let (Some(date), Some(time)) = (date, time) else {
            let mut errors = FieldErrors::new();
            errors.insert(FIELD_DATE, "Date is required.");
            return Err(BlackbeltError::InvalidForm(errors));
        };

        Ok(NewClass {
            date: date.and_time(time),
            master_id,
            description: self.values.trimmed(FIELD_DESCRIPTION).to_string(),
            students_id: self.students.clone(),
        })
    }
}
