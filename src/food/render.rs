use crate::food::analysis::nutrition::{FoodItem, MealAnalysis, ProteinStatus};
use crate::food::profile::{GoalPhase, ProteinEmphasis, UserProfile};
use crate::food::session::SessionLog;
use colored::Colorize;

const BAR_WIDTH: usize = 30;

/// Each item's share of the summed item calories, in percent.
pub fn calorie_shares(foods: &[FoodItem]) -> Vec<(String, f64)> {
    let total: f64 = foods.iter().map(|f| f.cals.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    foods
        .iter()
        .map(|f| (f.name.clone(), f.cals.max(0.0) / total * 100.0))
        .collect()
}

pub fn render_targets(profile: &UserProfile) -> String {
    let targets = profile.targets();
    let line = match targets.emphasis {
        ProteinEmphasis::High => format!("🔥 Target: {}g Protein (High)", targets.protein_g).green(),
        ProteinEmphasis::VeryHigh => {
            format!("✂️ Target: {}g Protein (Very High)", targets.protein_g).yellow()
        }
        ProteinEmphasis::Standard => format!("⚖️ Target: {}g Protein", targets.protein_g).cyan(),
    };

    format!(
        "👤 Athlete Profile: {} kg, {}\n{}\n🍚 Calorie budget: {} kcal",
        profile.weight_kg,
        profile.goal.label().bright_yellow(),
        line,
        targets.calories
    )
}

pub fn render_report(analysis: &MealAnalysis, goal: GoalPhase, threshold_g: f64) -> String {
    let mut out = String::new();

    let status = match analysis.protein_status(threshold_g) {
        ProteinStatus::High => "✅ High Protein".green(),
        ProteinStatus::Low => "⚠️ Low Protein".red(),
    };
    out.push_str(&format!(
        "Calories: {}   Protein: {}   {}\n",
        format_number(analysis.total_cals).cyan(),
        format!("{}g", format_number(analysis.total_prot)).cyan(),
        status
    ));
    if analysis.total_carbs > 0.0 || analysis.total_fats > 0.0 {
        out.push_str(&format!(
            "Carbs: {}g   Fats: {}g\n",
            format_number(analysis.total_carbs),
            format_number(analysis.total_fats)
        ));
    }

    if analysis.total_cals > 0.0 {
        let shares = calorie_shares(&analysis.foods);
        if !shares.is_empty() {
            out.push_str("\n🥧 Calorie split\n");
            for (name, pct) in shares {
                let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
                out.push_str(&format!(
                    "  {:<20} {} {:.1}%\n",
                    truncate(&name, 20),
                    "█".repeat(filled.min(BAR_WIDTH)).bright_red(),
                    pct
                ));
            }
        }
    }

    out.push_str("\n📝 Breakdown\n");
    out.push_str(&render_table(&analysis.foods));

    out.push_str(&format!(
        "\n👨‍⚕️ {}\n{}\n",
        format!("Coach's Advice for {}:", goal.short_label()).bold(),
        analysis.advice.truecolor(255, 236, 179)
    ));

    out
}

fn render_table(foods: &[FoodItem]) -> String {
    if foods.is_empty() {
        return "  (no items)\n".to_string();
    }

    let mut out = format!(
        "  {:<20} {:<16} {:>7} {:>7} {:>7} {:>7}\n",
        "Item", "Qty", "kcal", "Prot", "Carbs", "Fats"
    );
    for food in foods {
        out.push_str(&format!(
            "  {:<20} {:<16} {:>7} {:>7} {:>7} {:>7}\n",
            truncate(&food.name, 20),
            truncate(&food.qty, 16),
            format_number(food.cals),
            format_number(food.prot),
            format_number(food.carbs),
            format_number(food.fats)
        ));
    }
    out
}

pub fn render_stats(session: &SessionLog, profile: &UserProfile) -> String {
    let stats = session.stats();
    let targets = profile.targets();
    let remaining = session.remaining(&targets);

    format!(
        "📊 Today ({} meals)\n  Calories: {} / {} kcal ({} left)\n  Protein:  {}g / {}g ({}g left)\n  Carbs:    {}g\n  Fats:     {}g",
        session.history().len(),
        format_number(stats.cals).cyan(),
        targets.calories,
        format_number(remaining.calories),
        format_number(stats.prot).cyan(),
        targets.protein_g,
        format_number(remaining.protein_g),
        format_number(stats.carbs),
        format_number(stats.fats)
    )
}

pub fn render_history(session: &SessionLog) -> String {
    if session.history().is_empty() {
        return "No meals logged this session.".to_string();
    }

    session
        .history()
        .iter()
        .enumerate()
        .map(|(i, meal)| {
            let names: Vec<&str> = meal.analysis.foods.iter().map(|f| f.name.as_str()).collect();
            format!(
                "{}. [{}] {} | {} kcal, {}g protein: {}",
                i + 1,
                meal.logged_at.format("%H:%M"),
                meal.mode,
                format_number(meal.analysis.total_cals),
                format_number(meal.analysis.total_prot),
                if names.is_empty() { "-".to_string() } else { names.join(", ") }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::analysis::nutrition::parse_meal_analysis;
    use crate::food::prompt::AnalysisMode;

    fn item(name: &str, cals: f64) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            qty: "1".to_string(),
            cals,
            prot: 0.0,
            carbs: 0.0,
            fats: 0.0,
        }
    }

    #[test]
    fn test_calorie_shares_sum_to_100() {
        let shares = calorie_shares(&[item("Rice", 300.0), item("Dal", 100.0)]);
        assert_eq!(shares, vec![("Rice".to_string(), 75.0), ("Dal".to_string(), 25.0)]);
    }

    #[test]
    fn test_calorie_shares_empty_for_zero_total() {
        assert!(calorie_shares(&[item("Water", 0.0)]).is_empty());
        assert!(calorie_shares(&[]).is_empty());
    }

    #[test]
    fn test_low_protein_report() {
        let analysis = parse_meal_analysis(
            r#"{"foods": [{"name": "Poha", "qty": "1 plate", "cals": 500, "prot": 13}],
                "total_cals": 500, "total_prot": 13, "advice": "Add eggs."}"#,
        )
        .unwrap();

        let report = render_report(&analysis, GoalPhase::LeanBulk, 30.0);
        assert!(report.contains("Low Protein"));
        assert!(!report.contains("High Protein"));
        assert!(report.contains("Coach's Advice for Lean Bulk:"));
        assert!(report.contains("Add eggs."));
        assert!(report.contains("100.0%"));
    }

    #[test]
    fn test_high_protein_report() {
        let analysis =
            parse_meal_analysis(r#"{"foods": [], "total_cals": 0, "total_prot": 35}"#).unwrap();
        let report = render_report(&analysis, GoalPhase::Maintenance, 30.0);
        assert!(report.contains("High Protein"));
        assert!(report.contains("(no items)"));
        assert!(!report.contains("Calorie split"));
    }

    #[test]
    fn test_targets_banner() {
        let banner = render_targets(&UserProfile::new(70.0, GoalPhase::AggressiveCut));
        assert!(banner.contains("Target: 175g Protein (Very High)"));
        assert!(banner.contains("1680 kcal"));
    }

    #[test]
    fn test_history_and_stats() {
        let mut session = SessionLog::new();
        assert_eq!(render_history(&session), "No meals logged this session.");

        let analysis = parse_meal_analysis(
            r#"{"foods": [{"name": "Paneer", "cals": 265, "prot": 18}], "total_cals": 265, "total_prot": 18}"#,
        )
        .unwrap();
        session.append(AnalysisMode::MealTracking, analysis);

        assert!(render_history(&session).contains("MEAL_TRACKING"));
        assert!(render_history(&session).contains("Paneer"));
        let stats = render_stats(&session, &UserProfile::default());
        assert!(stats.contains("(1 meals)"));
        assert!(stats.contains("/ 154g (136g left)"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(500.0), "500");
        assert_eq!(format_number(31.64), "31.6");
    }
}
