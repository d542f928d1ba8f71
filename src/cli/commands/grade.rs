//! Grade command implementations.

use crate::app::{FormState, Screen};
use crate::cli::GradeCommands;
use crate::config::Settings;
use crate::error::Result;
use crate::model::{GradeRecord, PreferenceSnapshot, RecordQuery};
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

/// Output for grade save.
#[derive(Serialize)]
struct SaveOutput<'a> {
    id: i64,
    student_id: &'a str,
    grade: &'a str,
    schema_step: &'a str,
}

/// Output for grade list.
#[derive(Serialize)]
struct ListOutput<'a> {
    records: &'a [GradeRecord],
    count: usize,
}

/// Execute grade commands.
///
/// # Errors
///
/// Returns an error if a store cannot be opened, read or written.
pub fn execute(command: &GradeCommands, settings: &Settings, json: bool) -> Result<()> {
    let screen = Screen::new(settings.clone());
    match command {
        GradeCommands::Save { student_id, grade } => {
            save(&screen, student_id.as_deref(), grade.as_deref(), json)
        }
        GradeCommands::List { student_id, desc } => {
            list(&screen, student_id.as_deref(), *desc, json)
        }
    }
}

/// Run one pass of the form screen: restore, edit, press save, tear down.
fn save(screen: &Screen, student_id: Option<&str>, grade: Option<&str>, json: bool) -> Result<()> {
    let mut form: FormState = screen.on_create();
    if let Some(id) = student_id {
        form.set_student_id(id);
    }
    if let Some(grade) = grade {
        form.set_grade(grade);
    }

    if form.student_id() == PreferenceSnapshot::STUDENT_ID_PLACEHOLDER {
        warn!("Saving placeholder text as the student ID");
    }

    // Teardown runs whether or not the save succeeded.
    let saved = screen.on_save_grade(&form);
    let stopped = screen.on_stop(&form);
    let outcome = saved?;
    stopped?;

    if json {
        let output = SaveOutput {
            id: outcome.record.id,
            student_id: &outcome.record.student_id,
            grade: &outcome.record.grade,
            schema_step: outcome.migration.as_str(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "Saved grade #{}: {} {}",
            outcome.record.id,
            outcome.record.student_id.bold(),
            outcome.record.grade
        );
    }
    Ok(())
}

fn list(screen: &Screen, student_id: Option<&str>, desc: bool, json: bool) -> Result<()> {
    let mut query = RecordQuery::all();
    if let Some(id) = student_id {
        query = query.student(id);
    }
    if desc {
        query = query.descending();
    }

    let records = screen.load_records(&query)?;

    if json {
        let output = ListOutput {
            records: &records,
            count: records.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if records.is_empty() {
        println!("No grade records found.");
    } else {
        println!("Grade records ({} found):", records.len());
        println!();
        for record in &records {
            println!(
                "  {:>5}  {:<16} {}",
                record.id.to_string().dimmed(),
                record.student_id,
                record.grade.bold()
            );
        }
    }
    Ok(())
}
