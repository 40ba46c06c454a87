//! enableWhen command-line interface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use octofhir_enablewhen::{ChangeOp, EnableWhenEngine, lint_questionnaire};
use octofhir_enablewhen_model::{Questionnaire, QuestionnaireResponse};
use std::path::PathBuf;

/// enableWhen engine command-line tool
#[derive(Parser)]
#[command(name = "enablewhen")]
#[command(author, version, about = "FHIR questionnaire enableWhen tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a committed answer change and print the change set
    Resolve {
        /// Questionnaire JSON file
        questionnaire: PathBuf,
        /// QuestionnaireResponse JSON file
        response: PathBuf,
        /// linkId of the item whose answer changed
        #[arg(short, long)]
        changed: String,
        /// Also print the resulting response as JSON
        #[arg(long)]
        emit_response: bool,
    },
    /// Check a questionnaire for enableWhen authoring problems
    Lint {
        /// Questionnaire JSON files to check
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { questionnaire, response, changed, emit_response } => {
            resolve(&questionnaire, &response, &changed, emit_response)
        }
        Commands::Lint { files } => lint(&files),
    }
}

fn resolve(
    questionnaire_file: &PathBuf,
    response_file: &PathBuf,
    changed: &str,
    emit_response: bool,
) -> Result<()> {
    let questionnaire = load_questionnaire(questionnaire_file)?;
    let response_json = std::fs::read_to_string(response_file)
        .with_context(|| format!("cannot read {}", response_file.display()))?;
    let response = QuestionnaireResponse::from_json(&response_json)
        .with_context(|| format!("cannot parse {}", response_file.display()))?;

    let engine = EnableWhenEngine::new(&questionnaire);
    let resolution = engine.resolve_link_ids(&[changed], &response);

    if resolution.changes.is_empty() {
        println!("{}", "no changes".green());
    }
    for op in &resolution.changes {
        match op {
            ChangeOp::ResetAnswer { path, .. } => {
                println!("{} {}", "reset ".yellow(), path);
            }
            ChangeOp::RemoveRepeatInstance { path, .. } => {
                println!("{} {}", "remove".red(), path);
            }
        }
    }
    if emit_response {
        println!("{}", serde_json::to_string_pretty(&resolution.response)?);
    }
    Ok(())
}

fn lint(files: &[PathBuf]) -> Result<()> {
    let mut total = 0usize;
    for file in files {
        let questionnaire = load_questionnaire(file)?;
        let warnings = lint_questionnaire(&questionnaire);
        if warnings.is_empty() {
            println!("{} {}", file.display(), "ok".green());
        } else {
            for warning in &warnings {
                println!("{} {} {warning}", file.display(), "warning:".yellow());
            }
            total += warnings.len();
        }
    }
    if total > 0 {
        anyhow::bail!("{total} warning(s)");
    }
    Ok(())
}

fn load_questionnaire(file: &PathBuf) -> Result<Questionnaire> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    Questionnaire::from_json(&json).with_context(|| format!("cannot parse {}", file.display()))
}
