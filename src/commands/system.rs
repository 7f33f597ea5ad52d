use colored::Colorize;

pub fn handle_command(input: &str) -> Result<(), String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("{}", help_text());
            Ok(())
        },
        "exit" | "quit" => {
            println!("👋 Goodbye! Session stats were not saved.");
            std::process::exit(0);
        },
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string())
    }
}

pub fn help_text() -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "💪 HostelFit Commands:".bold()));
    out.push_str("  Just describe what you ate to track it.\n");
    out.push_str("  Example: I ate 6 egg whites and a bowl of oats\n\n");

    out.push_str("🍽️ Meal Commands:\n");
    out.push_str("  track <meal>               - Calculate macros from a description\n");
    out.push_str("  photo <image> [notes]      - Calculate macros from a plate photo\n");
    out.push_str("  menu <menu text>           - Pick the best items from the mess menu\n");
    out.push_str("  menu-photo <image> [notes] - Same, from a photo of the menu board\n\n");

    out.push_str("👤 Profile Commands:\n");
    out.push_str("  profile                    - Show weight, goal and daily targets\n");
    out.push_str("  profile <kg> <goal>        - Update profile\n");
    out.push_str("  goals: lean-bulk, dirty-bulk, maintenance, aggressive-cut, slow-cut\n\n");

    out.push_str("📊 Session Commands:\n");
    out.push_str("  stats                      - Today's totals against your targets\n");
    out.push_str("  history                    - Meals logged this session\n");
    out.push_str("  reset                      - Clear today's totals and history\n\n");

    out.push_str("⚙️ System Commands:\n");
    out.push_str("  help                       - Show this help menu\n");
    out.push_str("  exit                       - Exit the program\n");
    out
}
