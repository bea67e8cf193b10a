//! # Form Primitives
//!
//! Field names and fixed limits shared by the form schemas, the wizard and
//! the HTTP layer. Field names double as JSON keys in API payloads.

// =============================================================================
// FIELD NAMES
// =============================================================================

pub const FIELD_ROLE: &str = "role";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_PASSWORD_CONFIRMATION: &str = "password_confirmation";
pub const FIELD_FIRST_NAME: &str = "first_name";
pub const FIELD_LAST_NAME: &str = "last_name";
pub const FIELD_CPF: &str = "cpf";
pub const FIELD_BIRTHDATE: &str = "birthdate";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_WEIGHT: &str = "weight";
/// Team name. The academy API calls it `time`.
pub const FIELD_TEAM: &str = "time";
pub const FIELD_BELT: &str = "belt";
pub const FIELD_LEVEL: &str = "level";
pub const FIELD_DATE: &str = "date";
/// Class start time (`HH:MM`) on the class form.
pub const FIELD_CLASS_TIME: &str = "time";
pub const FIELD_DESCRIPTION: &str = "description";

// =============================================================================
// LIMITS
// =============================================================================

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Length of a masked CPF (`000.000.000-00`).
pub const CPF_LENGTH: usize = 14;

/// Shortest masked phone number (`(00) 0000-0000`).
pub const MIN_PHONE_LENGTH: usize = 14;

/// Longest masked phone number (`(00) 00000-0000`).
pub const MAX_PHONE_LENGTH: usize = 15;

/// Belt degree (grau) range.
pub const MIN_BELT_LEVEL: i64 = 1;
pub const MAX_BELT_LEVEL: i64 = 7;

/// Date format used by every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used by the class form.
pub const TIME_FORMAT: &str = "%H:%M";

/// Genders offered by the athlete form.
pub const GENDERS: [&str; 2] = ["Masculino", "Feminino"];

/// Weight categories offered by the athlete form.
pub const WEIGHT_CATEGORIES: [&str; 8] = [
    "Mosca - 51kg",
    "Galo - 54kg",
    "Pena - 57kg",
    "Leve - 60kg",
    "Meio-medio",
    "Medio",
    "Meio-pesado",
    "Pesado",
];
