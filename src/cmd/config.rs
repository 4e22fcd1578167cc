use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{AppConfig, OutputFormat, StoredConfig, config_file_path};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration and the tables it resolves to.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    println!("Configuring triage.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        &mut input,
        &mut output,
        "Templates file (JSON object of response type -> template)",
        &mut cfg.templates_path,
    )?;
    apply_prompt(
        &mut input,
        &mut output,
        "Vocabulary file (JSON keyword tables)",
        &mut cfg.vocabulary_path,
    )?;
    apply_prompt(
        &mut input,
        &mut output,
        "Actions file (JSON response type -> actions)",
        &mut cfg.actions_path,
    )?;

    let mut threshold = cfg.approval_threshold.map(|value| value.to_string());
    apply_prompt(
        &mut input,
        &mut output,
        "Approval threshold (0-1)",
        &mut threshold,
    )?;
    cfg.approval_threshold = threshold
        .map(|value| {
            value.parse::<f64>().map_err(|_| {
                AppError::Configuration(format!("'{value}' is not a valid threshold"))
            })
        })
        .transpose()?;

    apply_prompt(&mut input, &mut output, "Log level", &mut cfg.log_level)?;
    apply_prompt(
        &mut input,
        &mut output,
        "Output format (text/json)",
        &mut cfg.output_format,
    )?;

    // Surface bad paths or values now rather than on the next run.
    AppConfig::from_stored(&cfg)?;
    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;
    let resolved = AppConfig::load()?;

    println!("Configuration file: {}", path.display());
    println!("Templates file: {}", display_value(&cfg.templates_path));
    println!("Vocabulary file: {}", display_value(&cfg.vocabulary_path));
    println!("Actions file: {}", display_value(&cfg.actions_path));
    println!(
        "Approval threshold: {:.2}",
        resolved.policy.approval_threshold
    );
    println!("Log level: {}", resolved.log_level);
    println!("Output format: {}", resolved.output_format.as_str());
    println!(
        "Templates loaded ({}): {}",
        resolved.templates.len(),
        resolved.templates.keys().collect::<Vec<_>>().join(", ")
    );
    if resolved.output_format == OutputFormat::Json {
        println!(
            "Vocabulary:\n{}",
            serde_json::to_string_pretty(&resolved.vocabulary)?
        );
    }

    Ok(())
}

fn apply_prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    field: &str,
    target: &mut Option<String>,
) -> AppResult<()> {
    match prompt(input, output, field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    field: &str,
    current: Option<&str>,
) -> AppResult<PromptAction> {
    match current {
        Some(value) => write!(output, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(output, "{field} (Enter to skip): ")?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

#[derive(Debug, PartialEq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn prompt_interprets_answers() {
        let mut sink = Vec::new();

        let mut keep = Cursor::new("\n");
        assert_eq!(
            prompt(&mut keep, &mut sink, "Log level", Some("info")).unwrap(),
            PromptAction::Keep
        );

        let mut clear = Cursor::new(" - \n");
        assert_eq!(
            prompt(&mut clear, &mut sink, "Log level", Some("info")).unwrap(),
            PromptAction::Clear
        );

        let mut set = Cursor::new("debug\n");
        assert_eq!(
            prompt(&mut set, &mut sink, "Log level", None).unwrap(),
            PromptAction::Set("debug".to_string())
        );

        let shown = String::from_utf8(sink).unwrap();
        assert!(shown.contains("Log level [info] (Enter to keep, '-' to clear): "));
        assert!(shown.contains("Log level (Enter to skip): "));
    }

    #[test]
    fn apply_prompt_updates_target() {
        let mut sink = Vec::new();
        let mut target = Some("text".to_string());

        apply_prompt(&mut Cursor::new("-\n"), &mut sink, "Output", &mut target).unwrap();
        assert_eq!(target, None);

        apply_prompt(&mut Cursor::new("json\n"), &mut sink, "Output", &mut target).unwrap();
        assert_eq!(target.as_deref(), Some("json"));
    }

    #[test]
    fn displays_unset_values() {
        assert_eq!(display_value(&None), "<not set>");
        assert_eq!(display_value(&Some(String::new())), "<not set>");
        assert_eq!(display_value(&Some("a.json".to_string())), "a.json");
    }
}
