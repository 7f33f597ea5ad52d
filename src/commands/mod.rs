use crate::food::agent::NutritionAgent;
use crate::food::profile::UserProfile;
use crate::food::render::{render_history, render_stats};
use crate::food::session::SessionLog;
use colored::Colorize;

pub mod food_cmd;
mod profile_cmd;
mod system;

pub use food_cmd::{parse_meal_command, run_analysis, ParsedMealCommand};
pub use system::help_text;

/// Owns the per-session application state: the agent, the athlete profile,
/// and the running meal log.
pub struct CommandHandler {
    agent: NutritionAgent,
    profile: UserProfile,
    session: SessionLog,
    protein_threshold_g: f64,
}

impl CommandHandler {
    pub fn new(agent: NutritionAgent, profile: UserProfile, protein_threshold_g: f64) -> Self {
        Self {
            agent,
            profile,
            session: SessionLog::new(),
            protein_threshold_g,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<(), String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        // Command words are case-insensitive; arguments keep their case
        let command = normalize_command_word(input);

        // Handle single-word commands first
        match command.as_str() {
            "help" | "exit" | "quit" => return system::handle_command(&command),
            "stats" => {
                println!("\n{}\n", render_stats(&self.session, &self.profile));
                return Ok(());
            }
            "history" => {
                println!("\n{}\n", render_history(&self.session));
                return Ok(());
            }
            "reset" => {
                self.session.reset();
                tracing::info!("Session stats reset");
                println!("🧹 {}", "Daily stats cleared.".green());
                return Ok(());
            }
            _ => {}
        }

        if command == "profile" || command.starts_with("profile ") {
            return profile_cmd::handle_command(&command, &mut self.profile);
        }

        if food_cmd::is_meal_command(&command) {
            return self.handle_meal(&command).await;
        }

        // Anything else is a meal description
        self.handle_meal(&format!("track {}", input)).await
    }

    async fn handle_meal(&mut self, input: &str) -> Result<(), String> {
        food_cmd::handle_command(
            input,
            &self.agent,
            &self.profile,
            &mut self.session,
            self.protein_threshold_g,
        )
        .await
    }
}

fn normalize_command_word(input: &str) -> String {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => format!("{} {}", word.to_lowercase(), rest.trim_start()),
        None => input.to_lowercase(),
    }
}
