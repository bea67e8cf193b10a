//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::FormKind;
use super::prompt::{Prompter, run_registration};
use crate::client::AcademyClient;
use crate::config::Config;
use crate::error::CliError;
use crate::session::SessionFile;
use blackbelt_core::primitives::{DATE_FORMAT, FIELD_CLASS_TIME, FIELD_DESCRIPTION};
use blackbelt_core::{
    AthleteUpdate, BeltTally, BlackbeltError, ClassDraft, FormValues, Schema, Wizard,
    athlete_schema, class_schema, registration_schema,
};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

/// Maximum size of a form file (1 MB).
const MAX_FORM_FILE_SIZE: u64 = 1024 * 1024;

/// Print a value as pretty JSON.
fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// FORM FILES
// =============================================================================

/// Read a JSON object of field values.
///
/// Strings are taken as typed; numbers and booleans are converted to their
/// text form; `null` leaves the field unset.
pub fn read_form(path: &Path) -> Result<FormValues, CliError> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > MAX_FORM_FILE_SIZE {
        return Err(CliError::Input(format!(
            "Form file {} exceeds {} bytes",
            path.display(),
            MAX_FORM_FILE_SIZE
        )));
    }
    let text = std::fs::read_to_string(path)?;
    parse_form(&text)
}

/// Parse the JSON text of a form file.
pub fn parse_form(text: &str) -> Result<FormValues, CliError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(map) = value else {
        return Err(CliError::Input("Form file must hold a JSON object".into()));
    };

    let mut values = FormValues::new();
    for (name, value) in map {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::String(s) => values.set(name, s),
            serde_json::Value::Number(n) => values.set(name, n.to_string()),
            serde_json::Value::Bool(b) => values.set(name, b.to_string()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(CliError::Input(format!("Field '{name}' must be a single value")));
            }
        }
    }
    Ok(values)
}

// =============================================================================
// REGISTER COMMAND
// =============================================================================

/// Walk the registration wizard on the terminal.
pub async fn cmd_register(client: &AcademyClient, config: &Config) -> Result<(), CliError> {
    let session = SessionFile::new(config.session_file.clone());
    let mut wizard = Wizard::new(session);

    println!("Blackbelt registration");
    println!("Type :back to return to the previous step, :quit to stop.");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let masked = stdin.is_terminal();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock()).with_masked_secrets(masked);
    let deadline = Duration::from_secs(config.submit_timeout_secs);

    let registered = run_registration(&mut prompter, &mut wizard, client, deadline).await?;
    tracing::info!(registered, "registration finished");
    Ok(())
}

// =============================================================================
// DASHBOARD COMMAND
// =============================================================================

/// Show athlete total and belt distribution.
pub async fn cmd_dashboard(client: &AcademyClient, json_mode: bool) -> Result<(), CliError> {
    let athletes = client.athletes().await?;
    let tally = BeltTally::from_athletes(&athletes);

    if json_mode {
        let belts: Vec<_> = tally.slices().collect();
        print_json(&serde_json::json!({
            "total_athletes": tally.total(),
            "unassigned": tally.unassigned(),
            "belts": belts,
        }));
        return Ok(());
    }

    println!("Academy Dashboard");
    println!("=================");
    println!("{} registered athletes", tally.total());
    println!();
    for slice in tally.slices() {
        let bar = "#".repeat((slice.per_thousand / 25) as usize);
        println!(
            "{:<18} {:>4} {:>4}‰ {}",
            slice.belt.label(),
            slice.count,
            slice.per_thousand,
            bar
        );
    }
    if tally.unassigned() > 0 {
        println!("{:<18} {:>4}", "(no belt)", tally.unassigned());
    }

    Ok(())
}

// =============================================================================
// ATHLETE COMMANDS
// =============================================================================

/// List athletes.
pub async fn cmd_athletes(client: &AcademyClient, json_mode: bool) -> Result<(), CliError> {
    let athletes = client.athletes().await?;

    if json_mode {
        print_json(&serde_json::to_value(&athletes)?);
        return Ok(());
    }

    if athletes.is_empty() {
        println!("No athletes registered.");
        return Ok(());
    }
    println!("{:>5}  {:<30} {:<18} {}", "ID", "Name", "Belt", "Team");
    for athlete in &athletes {
        println!(
            "{:>5}  {:<30} {:<18} {}",
            athlete.id,
            athlete.full_name(),
            athlete.belt.as_deref().unwrap_or("-"),
            athlete.team
        );
    }
    Ok(())
}

/// Show one athlete.
pub async fn cmd_athlete(client: &AcademyClient, json_mode: bool, id: u64) -> Result<(), CliError> {
    let athlete = client.athlete(id).await?;

    if json_mode {
        print_json(&serde_json::to_value(&athlete)?);
        return Ok(());
    }

    println!("{}", athlete.full_name());
    println!("{}", "=".repeat(athlete.full_name().chars().count()));
    println!("E-mail:     {}", athlete.email);
    println!("CPF:        {}", athlete.cpf);
    println!("Phone:      {}", athlete.phone);
    match athlete.birth_date() {
        Some(date) => println!("Birth date: {}", date.format("%d/%m/%Y")),
        None => println!("Birth date: -"),
    }
    println!("Gender:     {}", athlete.gender);
    println!("Weight:     {}", athlete.weight);
    println!("Team:       {}", athlete.team);
    match (&athlete.belt, athlete.level) {
        (Some(belt), Some(level)) => println!("Belt:       {belt} (degree {level})"),
        (Some(belt), None) => println!("Belt:       {belt}"),
        (None, _) => println!("Belt:       -"),
    }
    Ok(())
}

/// Update an athlete: current values overlaid with the file's values.
pub async fn cmd_athlete_update(
    client: &AcademyClient,
    json_mode: bool,
    id: u64,
    file: &Path,
) -> Result<(), CliError> {
    let changes = read_form(file)?;
    let current = client.athlete(id).await?;

    let mut form = current.to_form();
    for (name, value) in changes.iter() {
        form.set(name, value);
    }
    let update = AthleteUpdate::from_form(&form)?;
    client.update_athlete(id, &update).await?;
    tracing::info!(id, "athlete updated");

    if json_mode {
        print_json(&serde_json::json!({ "id": id, "updated": true, "athlete": update }));
    } else {
        println!("Athlete {id} updated.");
    }
    Ok(())
}

/// Remove an athlete.
pub async fn cmd_athlete_delete(client: &AcademyClient, json_mode: bool, id: u64) -> Result<(), CliError> {
    client.delete_athlete(id).await?;
    tracing::info!(id, "athlete deleted");

    if json_mode {
        print_json(&serde_json::json!({ "id": id, "deleted": true }));
    } else {
        println!("Athlete {id} removed.");
    }
    Ok(())
}

// =============================================================================
// CHAMPIONSHIPS COMMAND
// =============================================================================

/// List championships.
pub async fn cmd_championships(client: &AcademyClient, json_mode: bool) -> Result<(), CliError> {
    let championships = client.championships().await?;

    if json_mode {
        print_json(&serde_json::to_value(&championships)?);
        return Ok(());
    }

    if championships.is_empty() {
        println!("No championships scheduled.");
        return Ok(());
    }
    for championship in &championships {
        let date = championship
            .event_date()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| championship.date.clone());
        println!(
            "#{:<4} {}  {} ({} athletes)",
            championship.id,
            date,
            championship.description,
            championship.entrants()
        );
    }
    Ok(())
}

// =============================================================================
// CLASS COMMAND
// =============================================================================

/// Arguments of `class-create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRequest {
    pub date: Option<String>,
    pub time: String,
    pub description: String,
    pub students: Vec<u64>,
    pub master_id: u64,
}

/// Build a class draft from command arguments.
///
/// Students must be among `known`; repeated ids are enrolled once.
pub fn draft_class(request: &ClassRequest, known: &[u64]) -> Result<ClassDraft, CliError> {
    let date = request
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().date_naive().format(DATE_FORMAT).to_string());

    let mut draft = ClassDraft::on(date);
    draft.set_field(FIELD_CLASS_TIME, request.time.as_str());
    draft.set_field(FIELD_DESCRIPTION, request.description.as_str());

    for &id in &request.students {
        if !known.contains(&id) {
            return Err(CliError::Input(format!("Unknown student {id}")));
        }
        if !draft.students().contains(&id) {
            draft.toggle_student(id);
        }
    }
    Ok(draft)
}

/// Schedule a class.
pub async fn cmd_class_create(
    client: &AcademyClient,
    json_mode: bool,
    request: ClassRequest,
) -> Result<(), CliError> {
    let known: Vec<u64> = if request.students.is_empty() {
        Vec::new()
    } else {
        client.students().await?.iter().map(|s| s.id).collect()
    };
    let draft = draft_class(&request, &known)?;
    let class = draft.build(request.master_id)?;
    client.create_class(&class).await?;
    tracing::info!(date = %class.date, students = class.students_id.len(), "class created");

    if json_mode {
        print_json(&serde_json::to_value(&class)?);
    } else {
        println!(
            "Class created for {} with {} student(s).",
            class.date.format("%d/%m/%Y %H:%M"),
            class.students_id.len()
        );
    }
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

fn schema_for(kind: FormKind) -> Schema {
    match kind {
        FormKind::Registration => registration_schema(),
        FormKind::Athlete => athlete_schema(),
        FormKind::Class => class_schema(),
    }
}

/// Check a form file against its schema. Invalid forms exit with an error.
pub fn cmd_validate(json_mode: bool, kind: FormKind, file: &Path) -> Result<(), CliError> {
    let values = read_form(file)?;
    let errors = schema_for(kind).validate_all(&values);

    if json_mode {
        print_json(&serde_json::json!({
            "form": format!("{kind:?}").to_lowercase(),
            "valid": errors.is_empty(),
            "errors": errors,
        }));
    } else if errors.is_empty() {
        println!("Form is valid.");
    } else {
        for (field, message) in errors.iter() {
            println!("  ! {field}: {message}");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(BlackbeltError::InvalidForm(errors).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackbelt_core::primitives::FIELD_DATE;

    #[test]
    fn form_file_accepts_scalars() {
        let values =
            parse_form(r#"{"first_name":"Ana","level":3,"belt":null,"active":true}"#).expect("parse");
        assert_eq!(values.get("first_name"), Some("Ana"));
        assert_eq!(values.get("level"), Some("3"));
        assert_eq!(values.get("belt"), None);
        assert_eq!(values.get("active"), Some("true"));
    }

    #[test]
    fn form_file_rejects_nested_values() {
        let err = parse_form(r#"{"students":[1,2]}"#).expect_err("nested");
        assert!(err.to_string().contains("students"));
        assert!(parse_form("[1]").is_err());
    }

    fn request(students: Vec<u64>) -> ClassRequest {
        ClassRequest {
            date: Some("2024-06-10".into()),
            time: "07:00".into(),
            description: "Takedowns".into(),
            students,
            master_id: 2,
        }
    }

    #[test]
    fn class_draft_enrols_known_students_once() {
        let draft = draft_class(&request(vec![4, 4, 7]), &[4, 7, 9]).expect("draft");
        assert_eq!(draft.students(), &[4, 7]);
        assert_eq!(draft.values().get(FIELD_DATE), Some("2024-06-10"));
    }

    #[test]
    fn unknown_student_is_rejected() {
        let err = draft_class(&request(vec![5]), &[4]).expect_err("unknown");
        assert_eq!(err.to_string(), "Unknown student 5");
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let mut req = request(Vec::new());
        req.date = None;
        let draft = draft_class(&req, &[]).expect("draft");
        let today = chrono::Local::now().date_naive().format(DATE_FORMAT).to_string();
        assert_eq!(draft.values().get(FIELD_DATE), Some(today.as_str()));
    }
}
