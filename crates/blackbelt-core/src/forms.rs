//! # Form Schemas
//!
//! The three forms of the academy client: registration, athlete edit and
//! class creation.

use crate::belts::BELT_LABELS;
use crate::primitives::{
    CPF_LENGTH, FIELD_BELT, FIELD_BIRTHDATE, FIELD_CLASS_TIME, FIELD_CPF, FIELD_DATE,
    FIELD_DESCRIPTION, FIELD_EMAIL, FIELD_FIRST_NAME, FIELD_GENDER, FIELD_LAST_NAME, FIELD_LEVEL,
    FIELD_PASSWORD, FIELD_PASSWORD_CONFIRMATION, FIELD_PHONE, FIELD_ROLE, FIELD_TEAM,
    FIELD_WEIGHT, GENDERS, MAX_BELT_LEVEL, MAX_PHONE_LENGTH, MIN_BELT_LEVEL, MIN_PASSWORD_LENGTH,
    MIN_PHONE_LENGTH, WEIGHT_CATEGORIES,
};
use crate::validation::{Rule, Schema};

const INVALID_CPF: &str = "Enter a valid CPF.";
const INVALID_PHONE: &str = "Enter a valid phone number, including area code.";
const BIRTHDATE_REQUIRED: &str = "Birth date is required.";
const NO_FUTURE_DATE: &str = "A future date is not allowed.";

fn email_rules() -> [Rule; 2] {
    [
        Rule::Required("E-mail is required."),
        Rule::Email("Invalid e-mail."),
    ]
}

fn cpf_rules() -> [Rule; 3] {
    [
        Rule::Required("CPF is required."),
        Rule::MinLength(CPF_LENGTH, INVALID_CPF),
        Rule::MaxLength(CPF_LENGTH, INVALID_CPF),
    ]
}

fn birthdate_rules() -> [Rule; 3] {
    [
        Rule::Required(BIRTHDATE_REQUIRED),
        Rule::Date(BIRTHDATE_REQUIRED),
        Rule::NotInFuture(NO_FUTURE_DATE),
    ]
}

/// Account registration, covering every step of the wizard.
#[must_use]
pub fn registration_schema() -> Schema {
    Schema::new("registration")
        .field(FIELD_ROLE, [Rule::Required("Choose who you are.")])
        .field(FIELD_EMAIL, email_rules())
        .field(
            FIELD_PASSWORD,
            [
                Rule::Required("Password is required."),
                Rule::MinLength(
                    MIN_PASSWORD_LENGTH,
                    "Password must have at least 6 characters.",
                ),
            ],
        )
        .field(
            FIELD_PASSWORD_CONFIRMATION,
            [
                Rule::Required("Password confirmation is required."),
                Rule::EqualsField(FIELD_PASSWORD, "Passwords do not match."),
            ],
        )
        .field(FIELD_FIRST_NAME, [Rule::Required("First name is required.")])
        .field(FIELD_LAST_NAME, [Rule::Required("Last name is required.")])
        .field(FIELD_CPF, cpf_rules())
        .field(FIELD_BIRTHDATE, birthdate_rules())
}

/// Athlete profile edit.
#[must_use]
pub fn athlete_schema() -> Schema {
    Schema::new("athlete")
        .field(FIELD_FIRST_NAME, [Rule::Required("First name is required.")])
        .field(FIELD_LAST_NAME, [Rule::Required("Last name is required.")])
        .field(FIELD_EMAIL, email_rules())
        .field(FIELD_CPF, cpf_rules())
        .field(
            FIELD_PHONE,
            [
                Rule::Required("Phone is required."),
                Rule::MinLength(MIN_PHONE_LENGTH, INVALID_PHONE),
                Rule::MaxLength(MAX_PHONE_LENGTH, INVALID_PHONE),
            ],
        )
        .field(
            FIELD_GENDER,
            [
                Rule::Required("Gender is required."),
                Rule::OneOf(&GENDERS, "Choose a listed gender."),
            ],
        )
        .field(
            FIELD_WEIGHT,
            [
                Rule::Required("Weight category is required."),
                Rule::OneOf(&WEIGHT_CATEGORIES, "Choose a listed weight category."),
            ],
        )
        .field(FIELD_TEAM, [Rule::Required("Team is required.")])
        .field(FIELD_BIRTHDATE, birthdate_rules())
        .field(FIELD_BELT, [Rule::OneOf(&BELT_LABELS, "Choose a listed belt.")])
        .field(
            FIELD_LEVEL,
            [Rule::IntegerRange(
                MIN_BELT_LEVEL,
                MAX_BELT_LEVEL,
                "Degree must be between 1 and 7.",
            )],
        )
}

/// Class creation.
#[must_use]
pub fn class_schema() -> Schema {
    Schema::new("class")
        .field(
            FIELD_DATE,
            [
                Rule::Required("Date is required."),
                Rule::Date("Date is required."),
            ],
        )
        .field(
            FIELD_CLASS_TIME,
            [
                Rule::Required("Time is required."),
                Rule::Time("Time must use HH:MM."),
            ],
        )
        .field(FIELD_DESCRIPTION, [Rule::Required("Description is required.")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FormValues;
    use crate::validation::Validate;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
    }

    fn valid_registration() -> FormValues {
        FormValues::new()
            .with("role", "Mestre")
            .with("email", "a@b.com")
            .with("password", "123456")
            .with("password_confirmation", "123456")
            .with("first_name", "Helio")
            .with("last_name", "Gracie")
            .with("cpf", "123.456.789-00")
            .with("birthdate", "1990-05-12")
    }

    #[test]
    fn registration_accepts_complete_values() {
        let errors = registration_schema()
            .with_today(today())
            .validate_all(&valid_registration());
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn registration_rejects_short_password() {
        let values = valid_registration()
            .with("password", "123")
            .with("password_confirmation", "123");
        let errors = registration_schema().validate(&["password"], &values);
        assert_eq!(
            errors.get("password"),
            Some("Password must have at least 6 characters.")
        );
    }

    #[test]
    fn registration_rejects_unmasked_cpf() {
        let values = valid_registration().with("cpf", "12345678900");
        let errors = registration_schema().validate(&["cpf"], &values);
        assert_eq!(errors.get("cpf"), Some(INVALID_CPF));
    }

    #[test]
    fn registration_rejects_future_birthdate() {
        let values = valid_registration().with("birthdate", "2030-01-01");
        let errors = registration_schema()
            .with_today(today())
            .validate(&["birthdate"], &values);
        assert_eq!(errors.get("birthdate"), Some(NO_FUTURE_DATE));
    }

    #[test]
    fn athlete_optional_belt_and_level() {
        let values = FormValues::new()
            .with("first_name", "Ana")
            .with("last_name", "Souza")
            .with("email", "ana@academy.com")
            .with("cpf", "123.456.789-00")
            .with("phone", "(11) 91234-5678")
            .with("gender", "Feminino")
            .with("weight", "Leve - 60kg")
            .with("time", "Blackbelt")
            .with("birthdate", "2001-02-03");
        let schema = athlete_schema().with_today(today());
        assert!(schema.validate_all(&values).is_empty());

        let values = values.with("belt", "Roxa").with("level", "9");
        let errors = schema.validate_all(&values);
        assert!(errors.contains("belt"));
        assert!(errors.contains("level"));
    }

    #[test]
    fn class_requires_time_format() {
        let values = FormValues::new()
            .with("date", "2024-06-10")
            .with("time", "7pm")
            .with("description", "No-gi fundamentals");
        let errors = class_schema().validate_all(&values);
        assert_eq!(errors.get("time"), Some("Time must use HH:MM."));
    }
}
