use crate::food::analysis::nutrition::MealAnalysis;
use crate::food::profile::DailyTargets;
use crate::food::prompt::AnalysisMode;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub cals: f64,
    pub prot: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl DailyStats {
    pub fn is_zero(&self) -> bool {
        *self == DailyStats::default()
    }
}

impl From<&MealAnalysis> for DailyStats {
    fn from(meal: &MealAnalysis) -> Self {
        Self {
            cals: meal.total_cals,
            prot: meal.total_prot,
            carbs: meal.total_carbs,
            fats: meal.total_fats,
        }
    }
}

impl Add for DailyStats {
    type Output = DailyStats;

    fn add(self, rhs: DailyStats) -> DailyStats {
        DailyStats {
            cals: self.cals + rhs.cals,
            prot: self.prot + rhs.prot,
            carbs: self.carbs + rhs.carbs,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for DailyStats {
    fn add_assign(&mut self, rhs: DailyStats) {
        *self = *self + rhs;
    }
}

impl Sum for DailyStats {
    fn sum<I: Iterator<Item = DailyStats>>(iter: I) -> Self {
        iter.fold(DailyStats::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMeal {
    pub logged_at: DateTime<Local>,
    pub mode: AnalysisMode,
    pub analysis: MealAnalysis,
}

/// What is still left to eat today, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remaining {
    pub protein_g: f64,
    pub calories: f64,
}

/// Running totals and meal history for one interactive session.
///
/// Created empty when the session starts and cleared only by [`SessionLog::reset`].
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    stats: DailyStats,
    history: Vec<LoggedMeal>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, mode: AnalysisMode, meal: MealAnalysis) {
        self.stats += DailyStats::from(&meal);
        self.history.push(LoggedMeal {
            logged_at: Local::now(),
            mode,
            analysis: meal,
        });
        tracing::debug!(meals = self.history.len(), cals = self.stats.cals, "Meal logged");
    }

    pub fn reset(&mut self) {
        self.stats = DailyStats::default();
        self.history.clear();
    }

    pub fn stats(&self) -> DailyStats {
        self.stats
    }

    pub fn history(&self) -> &[LoggedMeal] {
        &self.history
    }

    pub fn remaining(&self, targets: &DailyTargets) -> Remaining {
        Remaining {
            protein_g: (targets.protein_g as f64 - self.stats.prot).max(0.0),
            calories: (targets.calories as f64 - self.stats.cals).max(0.0),
        }
    }
}
