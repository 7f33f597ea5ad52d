use crate::error::AnalysisError;
use crate::food::agent::{MealRequest, NutritionAgent};
use crate::food::profile::UserProfile;
use crate::food::prompt::AnalysisMode;
use crate::food::render::render_report;
use crate::food::session::SessionLog;
use crate::providers::utils::load_image;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A meal command split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMealCommand {
    pub mode: AnalysisMode,
    pub notes: Option<String>,
    pub image_path: Option<String>,
}

pub fn is_meal_command(input: &str) -> bool {
    matches!(
        input.split_whitespace().next(),
        Some("track" | "photo" | "menu" | "menu-photo")
    )
}

pub fn parse_meal_command(input: &str) -> Result<ParsedMealCommand, String> {
    let input = input.trim();
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    let (mode, with_image) = match command {
        "track" => (AnalysisMode::MealTracking, false),
        "photo" => (AnalysisMode::MealTracking, true),
        "menu" => (AnalysisMode::MessMenu, false),
        "menu-photo" => (AnalysisMode::MessMenu, true),
        other => return Err(format!("Unknown meal command: {}", other)),
    };

    if !with_image {
        return Ok(ParsedMealCommand {
            mode,
            notes: non_empty(rest),
            image_path: None,
        });
    }

    let (path, notes) = match rest.split_once(char::is_whitespace) {
        Some((path, notes)) => (path, notes.trim()),
        None => (rest, ""),
    };
    if path.is_empty() {
        return Err(format!("Usage: {} <image.jpg|png> [notes]", command));
    }

    Ok(ParsedMealCommand {
        mode,
        notes: non_empty(notes),
        image_path: Some(path.to_string()),
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

pub async fn handle_command(
    input: &str,
    agent: &NutritionAgent,
    profile: &UserProfile,
    session: &mut SessionLog,
    protein_threshold_g: f64,
) -> Result<(), String> {
    let parsed = parse_meal_command(input)?;
    run_analysis(&parsed, agent, profile, session, protein_threshold_g).await
}

/// Runs one analysis, prints the report and logs the meal into the session.
pub async fn run_analysis(
    parsed: &ParsedMealCommand,
    agent: &NutritionAgent,
    profile: &UserProfile,
    session: &mut SessionLog,
    protein_threshold_g: f64,
) -> Result<(), String> {
    let image = match &parsed.image_path {
        Some(path) => Some(load_image(path).map_err(|e| AnalysisError::Image(e).to_string())?),
        None => None,
    };

    let request = MealRequest {
        mode: parsed.mode,
        notes: parsed.notes.as_deref(),
        image: image.as_ref(),
    };

    let spinner = spinner("🤖 Analyzing food data...");
    let result = agent.analyze(profile, request).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            println!("\n{}", render_report(&report.analysis, profile.goal, protein_threshold_g));
            session.append(parsed.mode, report.analysis);
            let remaining = session.remaining(&profile.targets());
            println!(
                "📈 Logged. {}g protein and {} kcal left for today.\n",
                remaining.protein_g.round(),
                remaining.calories.round()
            );
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, mode = %parsed.mode, "Meal analysis failed");
            if let Some(raw) = e.raw_output() {
                println!("{}", format!("Debug: {}", raw).dimmed());
            }
            Err(e.to_string())
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
