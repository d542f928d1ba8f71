//! Prefs command implementations (saved form values).

use crate::app::Screen;
use crate::cli::PrefsCommands;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::model::PreferenceSnapshot;
use serde::Serialize;

/// Output for prefs show/set.
#[derive(Serialize)]
struct PrefsOutput {
    path: String,
    student_id: String,
    grade: String,
    placeholder: bool,
}

/// Execute prefs commands.
///
/// # Errors
///
/// Returns an error if the preference file cannot be read or written.
pub fn execute(command: &PrefsCommands, settings: &Settings, json: bool) -> Result<()> {
    let screen = Screen::new(settings.clone());
    match command {
        PrefsCommands::Show => show(&screen, json),
        PrefsCommands::Set { student_id, grade } => {
            set(&screen, student_id.as_deref(), grade.as_deref(), json)
        }
        PrefsCommands::Clear => clear(&screen, json),
    }
}

fn show(screen: &Screen, json: bool) -> Result<()> {
    // Read directly so a corrupt file is reported rather than masked.
    let snapshot = screen.preferences().load()?;
    let output = PrefsOutput {
        path: screen.preferences().path().display().to_string(),
        placeholder: snapshot.is_placeholder(),
        student_id: snapshot.student_id,
        grade: snapshot.grade,
    };
    print_prefs(&output, json)
}

fn set(screen: &Screen, student_id: Option<&str>, grade: Option<&str>, json: bool) -> Result<()> {
    if student_id.is_none() && grade.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to set: pass --student-id and/or --grade".to_string(),
        ));
    }

    let mut form = screen.on_create();
    if let Some(id) = student_id {
        form.set_student_id(id);
    }
    if let Some(grade) = grade {
        form.set_grade(grade);
    }
    screen.on_stop(&form)?;

    let output = PrefsOutput {
        path: screen.preferences().path().display().to_string(),
        placeholder: PreferenceSnapshot::from(&form).is_placeholder(),
        student_id: form.student_id().to_string(),
        grade: form.grade().to_string(),
    };
    print_prefs(&output, json)
}

fn clear(screen: &Screen, json: bool) -> Result<()> {
    screen.preferences().clear()?;

    if json {
        let output = serde_json::json!({
            "path": screen.preferences().path().display().to_string(),
            "cleared": true
        });
        println!("{output}");
    } else {
        println!("Cleared saved form values");
    }
    Ok(())
}

fn print_prefs(output: &PrefsOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(output)?);
    } else {
        println!("Student ID: {}", output.student_id);
        println!("Grade:      {}", output.grade);
        if output.placeholder {
            println!("(nothing saved yet)");
        }
    }
    Ok(())
}
