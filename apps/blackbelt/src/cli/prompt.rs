//! # Interactive Registration
//!
//! Line-oriented driver for the registration wizard. Every decision is made
//! by the wizard; this module only asks for values and prints outcomes.
//!
//! While filling a step the user can type `:back` to return to the previous
//! step or `:quit` to abandon. An empty answer keeps the current value.
//!
//! Passwords are never echoed. On a terminal they are read key by key in raw
//! mode and drawn as `*`; a stored password is shown as `******`.

use crate::client::AcademyClient;
use crate::error::CliError;
use crate::flow;
use blackbelt_core::primitives::{FIELD_PASSWORD, FIELD_PASSWORD_CONFIRMATION, FIELD_ROLE};
use blackbelt_core::{FieldErrors, Role, SessionStore, Step, StepOutcome, SubmitOutcome, Validate, Wizard};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, Write};
use std::time::Duration;

const BACK: &str = ":back";
const QUIT: &str = ":quit";

/// What the caller should do after a step was filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Show the (possibly new) current step.
    Continue,
    /// The final step is filled in; submit.
    Submit,
    /// The user gave up or input ended.
    Quit,
}

/// Reads answers from `input` and writes prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    masked: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            masked: false,
        }
    }

    /// Read secret answers from the terminal without echo.
    #[must_use]
    pub fn with_masked_secrets(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask one question. `None` when input is exhausted.
    pub fn ask(&mut self, label: &str, current: Option<&str>) -> Result<Option<String>, CliError> {
        match current {
            Some(current) if !current.is_empty() => write!(self.output, "{label} [{current}]: ")?,
            _ => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask for a secret. Falls back to [`Prompter::ask`] off a terminal.
    pub fn ask_secret(&mut self, label: &str, current: Option<&str>) -> Result<Option<String>, CliError> {
        if !self.masked {
            return self.ask(label, current);
        }
        match current {
            Some(current) if !current.is_empty() => write!(self.output, "{label} [{current}]: ")?,
            _ => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        let answer = {
            let _raw = RawMode::enable()?;
            read_masked(event::read, &mut self.output)?
        };
        writeln!(self.output)?;
        Ok(answer)
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> Result<(), CliError> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    /// Print field errors, one per line.
    pub fn show_errors(&mut self, errors: &FieldErrors) -> Result<(), CliError> {
        for (field, message) in errors.iter() {
            writeln!(self.output, "  ! {field}: {message}")?;
        }
        Ok(())
    }

    /// Show the current step, collect its values and try to move on.
    pub fn run_step<S, V>(&mut self, wizard: &mut Wizard<S, V>) -> Result<PromptAction, CliError>
    where
        S: SessionStore,
        V: Validate,
    {
        let step = wizard.step();
        self.say(format!(
            "\n[{}/{}] {}",
            wizard.current_step() + 1,
            wizard.step_count(),
            step.title()
        ))?;

        if step == Step::Unavailable {
            self.say("Athlete accounts are created by the academy. Type :back to choose another role.")?;
            return match self.ask("Choice", None)?.as_deref().map(str::trim) {
                Some(BACK) => {
                    wizard.retreat()?;
                    Ok(PromptAction::Continue)
                }
                Some(QUIT) | None => Ok(PromptAction::Quit),
                Some(_) => Ok(PromptAction::Continue),
            };
        }

        for field in step.fields() {
            let label = field_label(field);
            let current = wizard.fields().get(field).map(|value| {
                if is_secret(field) { "******" } else { value }
            });
            let current = current.map(str::to_string);

            let answer = if is_secret(field) {
                self.ask_secret(&label, current.as_deref())?
            } else {
                self.ask(&label, current.as_deref())?
            };
            let Some(answer) = answer else {
                return Ok(PromptAction::Quit);
            };
            match answer.trim() {
                QUIT => return Ok(PromptAction::Quit),
                BACK => {
                    if !wizard.retreat()? {
                        self.say("Already on the first step.")?;
                    }
                    return Ok(PromptAction::Continue);
                }
                "" if current.is_some() => {}
                _ => wizard.set_field(field, answer),
            }
        }

        if wizard.is_final_step() && wizard.role().is_some() {
            return Ok(PromptAction::Submit);
        }
        if let StepOutcome::Blocked { .. } = wizard.advance()? {
            let errors = wizard.field_errors().clone();
            self.show_errors(&errors)?;
        }
        Ok(PromptAction::Continue)
    }
}

// =============================================================================
// MASKED INPUT
// =============================================================================

/// Raw mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(error = %err, "could not restore terminal mode");
        }
    }
}

/// Collect key presses until Enter, drawing `*` per character.
///
/// `None` on Ctrl-C, Ctrl-D or Esc.
fn read_masked<W: Write>(
    mut next: impl FnMut() -> io::Result<Event>,
    output: &mut W,
) -> io::Result<Option<String>> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = next()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Char(c) => {
                secret.push(c);
                write!(output, "*")?;
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(output, "\u{8} \u{8}")?;
                }
            }
            _ => continue,
        }
        output.flush()?;
    }
}

fn is_secret(field: &str) -> bool {
    field == FIELD_PASSWORD || field == FIELD_PASSWORD_CONFIRMATION
}

fn field_label(field: &str) -> String {
    if field == FIELD_ROLE {
        let choices: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        return format!("Role ({})", choices.join("/"));
    }
    let mut label = field.replace('_', " ");
    if let Some(first) = label.get(..1) {
        let upper = first.to_uppercase();
        label.replace_range(..1, &upper);
    }
    label
}

/// Run the whole registration conversation.
///
/// Returns `true` once the account exists and the session was established,
/// `false` when the user quit.
pub async fn run_registration<R, W, S>(
    prompter: &mut Prompter<R, W>,
    wizard: &mut Wizard<S>,
    client: &AcademyClient,
    deadline: Duration,
) -> Result<bool, CliError>
where
    R: BufRead,
    W: Write,
    S: SessionStore,
{
    loop {
        match prompter.run_step(wizard)? {
            PromptAction::Continue => {}
            PromptAction::Quit => {
                prompter.say("Registration abandoned.")?;
                return Ok(false);
            }
            PromptAction::Submit => {
                prompter.say("Creating account...")?;
                match flow::submit(wizard, client, deadline).await? {
                    SubmitOutcome::Registered => {
                        prompter.say("Account created. You are now signed in.")?;
                        return Ok(true);
                    }
                    SubmitOutcome::Invalid { .. } => {
                        let errors = wizard.field_errors().clone();
                        prompter.show_errors(&errors)?;
                        prompter.say("Use :back to fix fields on earlier steps.")?;
                    }
                    SubmitOutcome::Failed(error) => {
                        prompter.say(format!("Registration failed: {error}"))?;
                        if error.is_retryable() {
                            prompter.say("Press enter on each field to keep it and try again.")?;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackbelt_core::{BlackbeltError, RegistrationPayload};
    use crossterm::event::KeyEvent;
    use std::io::Cursor;

    #[derive(Debug, Default)]
    struct NoSession;

    impl SessionStore for NoSession {
        fn establish_session(&mut self, _: &RegistrationPayload) -> Result<(), BlackbeltError> {
            Ok(())
        }
    }

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn labels_are_readable() {
        assert_eq!(field_label("password_confirmation"), "Password confirmation");
        assert_eq!(field_label("role"), "Role (Mestre/Aluno/Atleta)");
    }

    #[test]
    fn role_answer_selects_and_advances() {
        let mut wizard = Wizard::new(NoSession);
        let mut p = prompter("Aluno\n");
        assert_eq!(p.run_step(&mut wizard).expect("step"), PromptAction::Continue);
        assert_eq!(wizard.role(), Some(Role::Student));
        assert_eq!(wizard.step(), Step::Credentials);
    }

    #[test]
    fn blocked_step_prints_errors() {
        let mut wizard = Wizard::new(NoSession);
        wizard.select_role(Role::Master).expect("select");
        wizard.advance().expect("advance");

        let mut p = prompter("a@b.com\n123456\n654321\n");
        assert_eq!(p.run_step(&mut wizard).expect("step"), PromptAction::Continue);
        assert_eq!(wizard.step(), Step::Credentials);

        let shown = String::from_utf8(p.into_output()).expect("utf8");
        assert!(shown.contains("password_confirmation: Passwords do not match."));
    }

    #[test]
    fn back_command_retreats() {
        let mut wizard = Wizard::new(NoSession);
        wizard.select_role(Role::Master).expect("select");
        wizard.advance().expect("advance");

        let mut p = prompter(":back\n");
        assert_eq!(p.run_step(&mut wizard).expect("step"), PromptAction::Continue);
        assert_eq!(wizard.current_step(), 0);
    }

    #[test]
    fn athlete_can_only_go_back_or_quit() {
        let mut wizard = Wizard::new(NoSession);
        wizard.select_role(Role::Athlete).expect("select");
        wizard.advance().expect("advance");

        let mut p = prompter(":quit\n");
        assert_eq!(p.run_step(&mut wizard).expect("step"), PromptAction::Quit);
    }

    #[test]
    fn end_of_input_quits() {
        let mut wizard = Wizard::new(NoSession);
        let mut p = prompter("");
        assert_eq!(p.run_step(&mut wizard).expect("step"), PromptAction::Quit);
    }

    #[test]
    fn empty_answer_keeps_current_value() {
        let mut wizard = Wizard::new(NoSession);
        wizard.select_role(Role::Student).expect("select");
        wizard.advance().expect("advance");
        wizard.set_field("email", "kept@b.com");

        let mut p = prompter("\n123456\n123456\n");
        p.run_step(&mut wizard).expect("step");
        assert_eq!(wizard.fields().get("email"), Some("kept@b.com"));
        assert_eq!(wizard.step(), Step::PersonalId);
    }

    fn keys(codes: Vec<KeyEvent>) -> impl FnMut() -> io::Result<Event> {
        let mut codes = codes.into_iter();
        move || {
            codes
                .next()
                .map(Event::Key)
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }
    }

    fn typed(text: &str) -> Vec<KeyEvent> {
        text.chars()
            .map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
            .collect()
    }

    #[test]
    fn masked_read_draws_stars_only() {
        let mut pressed = typed("s3cret!");
        pressed.push(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        pressed.push(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        let mut shown = Vec::new();
        let secret = read_masked(keys(pressed), &mut shown).expect("read");

        assert_eq!(secret.as_deref(), Some("s3cret"));
        let shown = String::from_utf8(shown).expect("utf8");
        assert!(!shown.contains("s3cret"));
        assert_eq!(shown.matches('*').count(), 7);
    }

    #[test]
    fn masked_read_stops_on_ctrl_c() {
        let mut pressed = typed("abc");
        pressed.push(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

        let mut shown = Vec::new();
        let secret = read_masked(keys(pressed), &mut shown).expect("read");
        assert_eq!(secret, None);
    }

    #[test]
    fn stored_password_is_never_printed() {
        let mut wizard = Wizard::new(NoSession);
        wizard.select_role(Role::Student).expect("select");
        wizard.advance().expect("advance");
        wizard.set_field("email", "kept@b.com");
        wizard.set_field("password", "hunter22");
        wizard.set_field("password_confirmation", "hunter22");

        let mut p = prompter("\n\n\n");
        p.run_step(&mut wizard).expect("step");
        assert_eq!(wizard.step(), Step::PersonalId);

        let shown = String::from_utf8(p.into_output()).expect("utf8");
        assert!(!shown.contains("hunter22"));
        assert!(shown.contains("Password [******]"));
    }
}
