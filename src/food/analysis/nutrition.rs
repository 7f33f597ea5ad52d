use crate::error::AnalysisError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(default, deserialize_with = "loose_string")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub qty: String,
    #[serde(default, deserialize_with = "loose_number")]
    pub cals: f64,
    #[serde(default, deserialize_with = "loose_number")]
    pub prot: f64,
    #[serde(default, deserialize_with = "loose_number")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "loose_number")]
    pub fats: f64,
}

/// A parsed model reply. Canonical keys are `total_*`; the `meal_total_*`
/// spelling and the `feedback`/`reasoning` advice keys are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMealAnalysis")]
pub struct MealAnalysis {
    pub foods: Vec<FoodItem>,
    pub total_cals: f64,
    pub total_prot: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
    pub advice: String,
}

/// Wire shape as the model writes it. Aliased keys are separate fields so a
/// reply carrying both spellings still parses.
#[derive(Deserialize)]
struct RawMealAnalysis {
    #[serde(default)]
    foods: Option<Vec<FoodItem>>,
    #[serde(default, deserialize_with = "present")]
    total_cals: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    meal_total_cals: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    total_prot: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    meal_total_prot: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    total_carbs: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    meal_total_carbs: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    total_fats: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    meal_total_fats: Option<Value>,
    #[serde(default, deserialize_with = "loose_string")]
    advice: String,
    #[serde(default, deserialize_with = "loose_string")]
    feedback: String,
    #[serde(default, deserialize_with = "loose_string")]
    reasoning: String,
}

impl TryFrom<RawMealAnalysis> for MealAnalysis {
    type Error = String;

    fn try_from(raw: RawMealAnalysis) -> Result<Self, String> {
        let required = |key: &str, value: Option<Value>| match value {
            Some(v) => number_from_value(&v),
            None => Err(format!("missing field `{}`", key)),
        };
        let optional = |value: Option<Value>| value.map_or(Ok(0.0), |v| number_from_value(&v));

        let advice = [raw.advice, raw.feedback, raw.reasoning]
            .into_iter()
            .find(|a| !a.trim().is_empty())
            .unwrap_or_default();

        Ok(Self {
            foods: raw.foods.unwrap_or_default(),
            total_cals: required("total_cals", either(raw.total_cals, raw.meal_total_cals))?,
            total_prot: required("total_prot", either(raw.total_prot, raw.meal_total_prot))?,
            total_carbs: optional(either(raw.total_carbs, raw.meal_total_carbs))?,
            total_fats: optional(either(raw.total_fats, raw.meal_total_fats))?,
            advice,
        })
    }
}

/// Canonical key first; a null canonical value gives way to a non-null alias.
fn either(canonical: Option<Value>, alias: Option<Value>) -> Option<Value> {
    match (canonical, alias) {
        (Some(c), _) if !c.is_null() => Some(c),
        (_, Some(a)) if !a.is_null() => Some(a),
        (c, a) => c.or(a),
    }
}

/// Null counts as zero and numeric strings are read as numbers.
fn number_from_value(value: &Value) -> Result<f64, String> {
    match value {
        Value::Null => Ok(0.0),
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("number out of range: {}", n)),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("expected a number, got \"{}\"", s)),
        other => Err(format!("expected a number, got {}", other)),
    }
}

/// Keeps an explicit `null` distinct from a missing key.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

fn loose_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    number_from_value(&value).map_err(de::Error::custom)
}

fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProteinStatus {
    High,
    Low,
}

impl MealAnalysis {
    pub fn protein_status(&self, threshold_g: f64) -> ProteinStatus {
        if self.total_prot >= threshold_g {
            ProteinStatus::High
        } else {
            ProteinStatus::Low
        }
    }
}

/// Removes markdown code-fence markers and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse_meal_analysis(raw: &str) -> Result<MealAnalysis, AnalysisError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::warn!(
            error = %e,
            response_preview = %raw.chars().take(100).collect::<String>(),
            "Failed to parse model response"
        );
        AnalysisError::Unparseable { raw: raw.to_string() }
    })
}
