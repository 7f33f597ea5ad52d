pub mod agent;
pub mod analysis;
pub mod profile;
pub mod prompt;
pub mod render;
pub mod session;

pub use agent::{MealReport, MealRequest, NutritionAgent, RetryPolicy};
pub use analysis::nutrition::{FoodItem, MealAnalysis, ProteinStatus};
pub use profile::{GoalPhase, UserProfile};
pub use prompt::AnalysisMode;
pub use session::{DailyStats, SessionLog};
