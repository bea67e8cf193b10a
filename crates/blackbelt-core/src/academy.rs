//! # Academy Records
//!
//! Records returned by the academy API and the athlete edit payload.

use crate::forms::athlete_schema;
use crate::primitives::{
    FIELD_BELT, FIELD_BIRTHDATE, FIELD_CPF, FIELD_EMAIL, FIELD_FIRST_NAME, FIELD_GENDER,
    FIELD_LAST_NAME, FIELD_LEVEL, FIELD_PHONE, FIELD_TEAM, FIELD_WEIGHT,
};
use crate::types::{BlackbeltError, FormValues};
use crate::validation::{Validate, parse_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Read the date part of `YYYY-MM-DD` or a full ISO-8601 timestamp.
fn leading_date(value: &str) -> Option<NaiveDate> {
    parse_date(value.get(..10).unwrap_or(value))
}

// =============================================================================
// ATHLETE
// =============================================================================

/// An athlete as listed by `GET /athlete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthdate: String,
    #[serde(default)]
    pub belt: Option<String>,
    #[serde(default)]
    pub level: Option<u8>,
    /// Team name.
    #[serde(default, rename = "time")]
    pub team: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub weight: String,
}

impl Athlete {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Birth date, if the API sent a readable one.
    #[must_use]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        leading_date(&self.birthdate)
    }

    /// Current values as an edit form, with the birth date in `YYYY-MM-DD`.
    #[must_use]
    pub fn to_form(&self) -> FormValues {
        let mut form = FormValues::new()
            .with(FIELD_FIRST_NAME, self.first_name.as_str())
            .with(FIELD_LAST_NAME, self.last_name.as_str())
            .with(FIELD_EMAIL, self.email.as_str())
            .with(FIELD_CPF, self.cpf.as_str())
            .with(FIELD_PHONE, self.phone.as_str())
            .with(FIELD_TEAM, self.team.as_str())
            .with(FIELD_GENDER, self.gender.as_str())
            .with(FIELD_WEIGHT, self.weight.as_str());
        if let Some(date) = self.birth_date() {
            form.set(FIELD_BIRTHDATE, date.to_string());
        }
        if let Some(belt) = &self.belt {
            form.set(FIELD_BELT, belt.as_str());
        }
        if let Some(level) = self.level {
            form.set(FIELD_LEVEL, level.to_string());
        }
        form
    }
}

/// Body of `PUT /athlete/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cpf: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    pub belt: Option<String>,
    pub level: Option<u8>,
    #[serde(rename = "time")]
    pub team: String,
    pub gender: String,
    pub weight: String,
}

impl AthleteUpdate {
    /// Validate an athlete edit form and build the update body.
    pub fn from_form(values: &FormValues) -> Result<Self, BlackbeltError> {
        Self::from_form_with(values, &athlete_schema())
    }

    /// Same as [`AthleteUpdate::from_form`] with a caller-supplied validator.
    pub fn from_form_with(values: &FormValues, validator: &impl Validate) -> Result<Self, BlackbeltError> {
        let fields = [
            FIELD_FIRST_NAME,
            FIELD_LAST_NAME,
            FIELD_EMAIL,
            FIELD_CPF,
            FIELD_PHONE,
            FIELD_GENDER,
            FIELD_WEIGHT,
            FIELD_TEAM,
            FIELD_BIRTHDATE,
            FIELD_BELT,
            FIELD_LEVEL,
        ];
        let errors = validator.validate(&fields, values);
        if !errors.is_empty() {
            return Err(BlackbeltError::InvalidForm(errors));
        }

        let text = |name: &str| values.trimmed(name).to_string();
        let optional = |name: &str| Some(values.trimmed(name)).filter(|v| !v.is_empty());

        let mut invalid = crate::types::FieldErrors::new();
        let birthdate = parse_date(values.trimmed(FIELD_BIRTHDATE));
        if birthdate.is_none() {
            invalid.insert(FIELD_BIRTHDATE, "Birth date is required.");
        }
        let level = match optional(FIELD_LEVEL) {
            Some(raw) => match raw.parse::<u8>() {
                Ok(level) => Some(level),
                Err(_) => {
                    invalid.insert(FIELD_LEVEL, "Degree must be between 1 and 7.");
                    None
                }
            },
            None => None,
        };
        let Some(birthdate) = birthdate.filter(|_| invalid.is_empty()) else {
            return Err(BlackbeltError::InvalidForm(invalid));
        };

        Ok(Self {
            first_name: text(FIELD_FIRST_NAME),
            last_name: text(FIELD_LAST_NAME),
            email: text(FIELD_EMAIL),
            cpf: text(FIELD_CPF),
            phone: text(FIELD_PHONE),
            birthdate,
            belt: optional(FIELD_BELT).map(str::to_string),
            level,
            team: text(FIELD_TEAM),
            gender: text(FIELD_GENDER),
            weight: text(FIELD_WEIGHT),
        })
    }
}

// =============================================================================
// CHAMPIONSHIP
// =============================================================================

/// A championship as listed by `GET /championships`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Championship {
    pub id: u64,
    pub master_id: u64,
    pub date: String,
    #[serde(default)]
    pub athlete_id: Vec<u64>,
    #[serde(default)]
    pub description: String,
}

impl Championship {
    #[must_use]
    pub fn event_date(&self) -> Option<NaiveDate> {
        leading_date(&self.date)
    }

    /// Number of athletes entered.
    #[must_use]
    pub fn entrants(&self) -> usize {
        self.athlete_id.len()
    }
}

// =============================================================================
// STUDENT
// =============================================================================

/// A student as listed by `GET /students`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Athlete {
        Athlete {
            id: 7,
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            email: "ana@academy.com".into(),
            cpf: "123.456.789-00".into(),
            phone: "(11) 91234-5678".into(),
            birthdate: "2001-02-03T00:00:00.000Z".into(),
            belt: Some("Cinza".into()),
            level: Some(2),
            team: "Blackbelt".into(),
            gender: "Feminino".into(),
            weight: "Leve - 60kg".into(),
        }
    }

    #[test]
    fn athlete_reads_api_json() {
        let json = r#"{"id":3,"first_name":"Rui","last_name":"Lima","belt":"Verde","time":"Dojo","birthdate":"2010-09-30T00:00:00.000Z"}"#;
        let athlete: Athlete = serde_json::from_str(json).expect("deserialize");
        assert_eq!(athlete.team, "Dojo");
        assert_eq!(athlete.belt.as_deref(), Some("Verde"));
        assert_eq!(athlete.birth_date(), NaiveDate::from_ymd_opt(2010, 9, 30));
        assert_eq!(athlete.level, None);
    }

    #[test]
    fn edit_form_round_trips_into_update() {
        let form = sample().to_form();
        assert_eq!(form.get("birthdate"), Some("2001-02-03"));

        let update = AthleteUpdate::from_form(&form).expect("valid form");
        assert_eq!(update.team, "Blackbelt");
        assert_eq!(update.level, Some(2));
        assert_eq!(update.birthdate, NaiveDate::from_ymd_opt(2001, 2, 3).unwrap_or_default());

        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["time"], "Blackbelt");
        assert_eq!(json["birthdate"], "2001-02-03");
    }

    #[test]
    fn invalid_edit_form_reports_fields() {
        let mut form = sample().to_form();
        form.set("phone", "123");
        form.set("email", "");
        let err = AthleteUpdate::from_form(&form).expect_err("invalid form");
        let BlackbeltError::InvalidForm(errors) = err else {
            unreachable!("expected InvalidForm");
        };
        assert!(errors.contains("phone"));
        assert!(errors.contains("email"));
    }

    #[test]
    fn championship_entrants_and_date() {
        let json = r#"{"id":1,"master_id":2,"date":"2024-11-20T13:00:00.000Z","athlete_id":[4,5,6],"description":"Copa"}"#;
        let championship: Championship = serde_json::from_str(json).expect("deserialize");
        assert_eq!(championship.entrants(), 3);
        assert_eq!(championship.event_date(), NaiveDate::from_ymd_opt(2024, 11, 20));
    }
}
