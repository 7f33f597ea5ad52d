use crate::food::profile::{GoalPhase, UserProfile};
use crate::food::render::render_targets;
use colored::Colorize;

pub fn handle_command(input: &str, current_profile: &mut UserProfile) -> Result<(), String> {
    if input.eq_ignore_ascii_case("profile") {
        println!("\n{}", render_targets(current_profile));
        return Ok(());
    }

    let args = input
        .get("profile".len()..)
        .unwrap_or("")
        .trim();
    let profile = parse_profile(args)?;

    println!(
        "\n🔄 Profile updated: {} kg, {}",
        profile.weight_kg,
        profile.goal.label().bright_yellow()
    );
    println!("{}", render_targets(&profile));
    *current_profile = profile;
    Ok(())
}

/// Parses `<weight> <goal words...>`.
pub fn parse_profile(args: &str) -> Result<UserProfile, String> {
    let mut parts = args.splitn(2, char::is_whitespace);
    let weight_str = parts.next().filter(|s| !s.is_empty()).ok_or_else(usage)?;
    let goal_str = parts.next().map(str::trim).filter(|s| !s.is_empty()).ok_or_else(usage)?;

    let weight: f64 = weight_str
        .trim_end_matches("kg")
        .parse()
        .map_err(|_| format!("Invalid weight '{}'. {}", weight_str, usage()))?;
    let goal: GoalPhase = goal_str.parse()?;

    UserProfile::try_new(weight, goal)
}

fn usage() -> String {
    "Usage: profile <kg> <goal>  (e.g. profile 70 lean-bulk)".to_string()
}
