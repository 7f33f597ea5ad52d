use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_WEIGHT_KG: f64 = 40.0;
pub const MAX_WEIGHT_KG: f64 = 120.0;
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalPhase {
    LeanBulk,
    DirtyBulk,
    Maintenance,
    AggressiveCut,
    SlowCut,
}

/// How hard the protein target pushes relative to maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProteinEmphasis {
    Standard,
    High,
    VeryHigh,
}

impl GoalPhase {
    pub const ALL: [GoalPhase; 5] = [
        GoalPhase::LeanBulk,
        GoalPhase::DirtyBulk,
        GoalPhase::Maintenance,
        GoalPhase::AggressiveCut,
        GoalPhase::SlowCut,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GoalPhase::LeanBulk => "Lean Bulk (Minimizing Fat)",
            GoalPhase::DirtyBulk => "Dirty Bulk (Max Size/Strength)",
            GoalPhase::Maintenance => "Maintenance (Recomp)",
            GoalPhase::AggressiveCut => "Aggressive Cut (Fast Fat Loss)",
            GoalPhase::SlowCut => "Slow Cut (Muscle Preservation)",
        }
    }

    /// Label without the parenthesised note, e.g. "Lean Bulk".
    pub fn short_label(&self) -> &'static str {
        let label = self.label();
        label.split('(').next().unwrap_or(label).trim_end()
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, GoalPhase::LeanBulk | GoalPhase::DirtyBulk)
    }

    pub fn is_cut(&self) -> bool {
        matches!(self, GoalPhase::AggressiveCut | GoalPhase::SlowCut)
    }

    /// Grams of protein per kilogram of body weight.
    pub fn protein_multiplier(&self) -> f64 {
        if self.is_bulk() {
            2.2
        } else if self.is_cut() {
            2.5
        } else {
            1.8
        }
    }

    /// Kilocalories per kilogram of body weight.
    pub fn calorie_multiplier(&self) -> f64 {
        match self {
            GoalPhase::LeanBulk => 35.0,
            GoalPhase::DirtyBulk => 40.0,
            GoalPhase::Maintenance => 32.0,
            GoalPhase::AggressiveCut => 24.0,
            GoalPhase::SlowCut => 28.0,
        }
    }

    pub fn protein_emphasis(&self) -> ProteinEmphasis {
        if self.is_bulk() {
            ProteinEmphasis::High
        } else if self.is_cut() {
            ProteinEmphasis::VeryHigh
        } else {
            ProteinEmphasis::Standard
        }
    }
}

impl Default for GoalPhase {
    fn default() -> Self {
        GoalPhase::LeanBulk
    }
}

impl fmt::Display for GoalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for GoalPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "lean bulk" | "lean" | "bulk" => Ok(GoalPhase::LeanBulk),
            "dirty bulk" | "dirty" => Ok(GoalPhase::DirtyBulk),
            "maintenance" | "maintain" | "recomp" => Ok(GoalPhase::Maintenance),
            "aggressive cut" | "aggressive" => Ok(GoalPhase::AggressiveCut),
            "slow cut" | "slow" | "cut" => Ok(GoalPhase::SlowCut),
            _ => GoalPhase::ALL
                .iter()
                .find(|phase| phase.label().eq_ignore_ascii_case(s.trim()))
                .copied()
                .ok_or_else(|| {
                    format!(
                        "Unknown goal '{}'. Choose one of: lean-bulk, dirty-bulk, maintenance, aggressive-cut, slow-cut",
                        s.trim()
                    )
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTargets {
    pub protein_g: u32,
    pub calories: u32,
    pub emphasis: ProteinEmphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub goal: GoalPhase,
}

impl UserProfile {
    pub fn new(weight_kg: f64, goal: GoalPhase) -> Self {
        Self { weight_kg, goal }
    }

    /// Validated constructor for user-entered weights.
    pub fn try_new(weight_kg: f64, goal: GoalPhase) -> Result<Self, String> {
        if !weight_kg.is_finite() || !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
            return Err(format!(
                "Weight must be between {} and {} kg",
                MIN_WEIGHT_KG, MAX_WEIGHT_KG
            ));
        }
        Ok(Self::new(weight_kg, goal))
    }

    pub fn targets(&self) -> DailyTargets {
        DailyTargets {
            protein_g: (self.weight_kg * self.goal.protein_multiplier()).round() as u32,
            calories: (self.weight_kg * self.goal.calorie_multiplier()).round() as u32,
            emphasis: self.goal.protein_emphasis(),
        }
    }

    /// Profile line embedded into prompts.
    pub fn describe(&self) -> String {
        format!("{}kg, Goal: {}", self.weight_kg, self.goal.label())
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT_KG, GoalPhase::default())
    }
}
