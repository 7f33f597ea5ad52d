use crate::food::profile::UserProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is showing us: a plate they ate, or the mess menu they are
/// about to pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMode {
    MealTracking,
    MessMenu,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::MealTracking => "MEAL_TRACKING",
            AnalysisMode::MessMenu => "MESS_MENU",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const OUTPUT_SCHEMA: &str = r#"OUTPUT FORMAT (Strict JSON):
    {
        "foods": [
            {"name": "Item Name", "qty": "estimated portion", "cals": 0, "prot": 0, "carbs": 0, "fats": 0}
        ],
        "total_cals": 0,
        "total_prot": 0,
        "total_carbs": 0,
        "total_fats": 0,
        "advice": "Specific advice based on the goal..."
    }"#;

fn goal_steps(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::MealTracking => {
            "1. Analyze the input (Image AND/OR Text).\n    \
             2. Calculate macros (Protein, Carbs, Fats, Calories).\n    \
             3. Give advice based on the specific goal (e.g., if 'Dirty Bulk', suggest high calorie foods)."
        }
        AnalysisMode::MessMenu => {
            "1. Read the mess menu (Image AND/OR Text).\n    \
             2. Pick the items and portions that best fit the goal; list only those in \"foods\".\n    \
             3. Calculate macros (Protein, Carbs, Fats, Calories) of the recommended plate.\n    \
             4. Explain in \"advice\" what to skip and what to add from outside the mess."
        }
    }
}

/// Builds the analyst prompt. `notes` and `reference` are appended as their
/// own sections when present.
pub fn compose_analyst_prompt(
    mode: AnalysisMode,
    profile: &UserProfile,
    notes: Option<&str>,
    reference: Option<&str>,
) -> String {
    let mut prompt = format!(
        "ACT AS: Elite Sports Nutritionist.\n    \
         USER PROFILE: {}\n    \
         MODE: {}\n\n    \
         YOUR GOAL:\n    {}\n\n    \
         {}\n    \
         Respond with the JSON object only.",
        profile.describe(),
        mode,
        goal_steps(mode),
        OUTPUT_SCHEMA
    );

    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        prompt.push_str(&format!("\n\nUSER NOTES: {}", notes));
    }

    if let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) {
        prompt.push_str(&format!(
            "\n\nREFERENCE DATA (web search, may be approximate): {}",
            reference
        ));
    }

    prompt
}

/// Builds the second-stage coach prompt from the analyst's structured output.
pub fn compose_coach_prompt(mode: AnalysisMode, profile: &UserProfile, analysis_json: &str) -> String {
    let targets = profile.targets();
    format!(
        "ACT AS: Strength Coach.\n\
         USER PROFILE: {}\n\
         DAILY TARGETS: {}g protein, {} kcal\n\
         MODE: {}\n\n\
         A nutrition analyst produced this breakdown:\n{}\n\n\
         Write 3-5 short, direct sentences of coaching for the goal '{}'. \
         Mention whether this meal moves the user towards the protein target and one concrete swap or addition. \
         Reply in plain text, no JSON, no markdown headings.",
        profile.describe(),
        targets.protein_g,
        targets.calories,
        mode,
        analysis_json,
        profile.goal.short_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::profile::GoalPhase;

    #[test]
    fn test_analyst_prompt_embeds_profile_and_schema() {
        let profile = UserProfile::new(70.0, GoalPhase::DirtyBulk);
        let prompt = compose_analyst_prompt(AnalysisMode::MealTracking, &profile, None, None);

        assert!(prompt.contains("USER PROFILE: 70kg, Goal: Dirty Bulk (Max Size/Strength)"));
        assert!(prompt.contains("MODE: MEAL_TRACKING"));
        assert!(prompt.contains("\"total_prot\": 0"));
        assert!(!prompt.contains("USER NOTES"));
        assert!(!prompt.contains("REFERENCE DATA"));
    }

    #[test]
    fn test_analyst_prompt_appends_notes_and_reference() {
        let profile = UserProfile::default();
        let prompt = compose_analyst_prompt(
            AnalysisMode::MealTracking,
            &profile,
            Some("  6 egg whites and oats "),
            Some("Egg white: 11g protein per 100g"),
        );

        assert!(prompt.contains("USER NOTES: 6 egg whites and oats"));
        assert!(prompt.ends_with("REFERENCE DATA (web search, may be approximate): Egg white: 11g protein per 100g"));
    }

    #[test]
    fn test_blank_notes_are_skipped() {
        let prompt = compose_analyst_prompt(AnalysisMode::MessMenu, &UserProfile::default(), Some("   "), None);
        assert!(!prompt.contains("USER NOTES"));
        assert!(prompt.contains("MODE: MESS_MENU"));
        assert!(prompt.contains("Read the mess menu"));
    }

    #[test]
    fn test_coach_prompt_carries_targets() {
        let profile = UserProfile::new(80.0, GoalPhase::SlowCut);
        let prompt = compose_coach_prompt(AnalysisMode::MealTracking, &profile, "{\"total_prot\": 20}");
        assert!(prompt.contains("DAILY TARGETS: 200g protein, 2240 kcal"));
        assert!(prompt.contains("{\"total_prot\": 20}"));
        assert!(prompt.contains("for the goal 'Slow Cut'"));
    }
}
