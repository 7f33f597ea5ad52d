pub mod commands;
pub mod config;
pub mod error;
pub mod food;
pub mod providers;

// Re-export commonly used items
pub use config::AppConfig;
pub use error::{AnalysisError, AppError};
pub use food::{MealAnalysis, NutritionAgent, SessionLog, UserProfile};
