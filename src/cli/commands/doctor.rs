//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::transcription::ModelSize;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Tolk Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let ffmpeg = check_tool(
        "ffmpeg",
        "ffmpeg -version",
        "Install ffmpeg: https://ffmpeg.org/download.html",
    );
    ffmpeg.print();
    checks.push(ffmpeg);
    println!();

    println!("{}", style("Configuration").bold());
    let config = check_config();
    config.print();
    checks.push(config);
    let temp = check_dir("temp directory", &settings.temp_dir());
    temp.print();
    checks.push(temp);
    println!();

    println!("{}", style("Whisper Models").bold());
    let model_checks = check_models(settings);
    for check in &model_checks {
        check.print();
    }
    checks.extend(model_checks);
    println!();

    let errors = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Error)
        .count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        Output::error(&format!("{} check(s) failed", errors));
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s)", warnings));
    } else {
        Output::success("All checks passed");
    }

    Ok(())
}

fn check_tool(name: &str, command: &str, hint: &str) -> CheckResult {
    let parts: Vec<&str> = command.split_whitespace().collect();

    match Command::new(parts[0]).args(&parts[1..]).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("unknown version")
                .to_string();
            CheckResult::ok(name, &version)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(_) => CheckResult::error(name, "not found", hint),
    }
}

fn check_config() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "config file",
            "not found, using defaults",
            &format!("Create one at {}", path.display()),
        )
    }
}

fn check_dir(name: &str, path: &std::path::Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok(name, &path.display().to_string())
    } else {
        CheckResult::warning(
            name,
            &format!("{} (will be created on first run)", path.display()),
            "No action needed",
        )
    }
}

fn check_models(settings: &Settings) -> Vec<CheckResult> {
    let model_dir = settings.model_dir();
    let mut results = Vec::new();

    let mut found = 0;
    for size in ModelSize::ALL {
        if model_dir.join(size.filename()).exists() {
            results.push(CheckResult::ok(
                &size.to_string(),
                size.filename(),
            ));
            found += 1;
        }
    }

    if found == 0 {
        results.push(CheckResult::warning(
            "models",
            &format!("no model files in {}", model_dir.display()),
            "Download one with: tolk fetch-model base",
        ));
    }

    results
}
