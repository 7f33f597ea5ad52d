use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use hostelfit::commands::{help_text, run_analysis, CommandHandler, ParsedMealCommand};
use hostelfit::config::AppConfig;
use hostelfit::error::AppError;
use hostelfit::food::agent::NutritionAgent;
use hostelfit::food::profile::{GoalPhase, UserProfile};
use hostelfit::food::prompt::AnalysisMode;
use hostelfit::food::render::render_targets;
use hostelfit::food::session::SessionLog;
use hostelfit::providers::duckduckgo::duckduckgo::DuckDuckGoLookup;
use hostelfit::providers::gemini::gemini::GeminiProvider;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "AI nutritionist for hostel food: text, photo, or both", long_about = None)]
struct Args {
    #[arg(short, long)]
    api_key: Option<String>,

    /// Body weight in kg
    #[arg(long, default_value_t = 70.0)]
    weight: f64,

    /// lean-bulk, dirty-bulk, maintenance, aggressive-cut or slow-cut
    #[arg(long, default_value = "lean-bulk")]
    goal: String,

    /// Run a second coaching call after the analysis
    #[arg(long)]
    coach: bool,

    /// Skip the web search used to ground estimates
    #[arg(long)]
    no_lookup: bool,

    /// Analyze one meal description and exit
    #[arg(long)]
    track: Option<String>,

    /// Plate or menu photo for one-shot mode
    #[arg(long)]
    image: Option<String>,

    /// Treat the one-shot input as a mess menu
    #[arg(long)]
    menu: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hostelfit=info"));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    colored::control::set_override(true);
    dotenv().ok();
    init_tracing();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config = AppConfig::from_env(args.api_key.clone())?;

    let goal: GoalPhase = args.goal.parse().map_err(AppError::Config)?;
    let profile = UserProfile::try_new(args.weight, goal).map_err(AppError::Config)?;

    let provider = GeminiProvider::connect(config.api_key.clone(), &config.gemini)
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    let mut agent = NutritionAgent::new(Box::new(provider)).with_coach(args.coach);
    if config.lookup_enabled && !args.no_lookup {
        agent = agent.with_lookup(Box::new(DuckDuckGoLookup::new(&config.lookup_url)));
    }
    let model = agent.model_name().await;
    tracing::info!(
        model = %model,
        lookup = agent.lookup_enabled(),
        coach = agent.coach_enabled(),
        "Nutrition agent ready"
    );

    if args.track.is_some() || args.image.is_some() {
        return run_once(&args, &agent, &profile, config.protein_threshold_g).await;
    }

    run_cli_mode(CommandHandler::new(agent, profile, config.protein_threshold_g)).await
}

async fn run_once(
    args: &Args,
    agent: &NutritionAgent,
    profile: &UserProfile,
    protein_threshold_g: f64,
) -> Result<(), AppError> {
    let parsed = ParsedMealCommand {
        mode: if args.menu { AnalysisMode::MessMenu } else { AnalysisMode::MealTracking },
        notes: args.track.clone().filter(|t| !t.trim().is_empty()),
        image_path: args.image.clone(),
    };

    println!("{}\n", render_targets(profile));
    let mut session = SessionLog::new();
    if let Err(e) = run_analysis(&parsed, agent, profile, &mut session, protein_threshold_g).await {
        println!("{}", e.red());
        std::process::exit(2);
    }
    Ok(())
}

async fn run_cli_mode(mut command_handler: CommandHandler) -> Result<(), AppError> {
    println!("{}", "💪 HostelFit Pro".bold());
    println!("AI Nutritionist: Text-Only, Vision, or Both.\n");
    println!("{}", render_targets(command_handler.profile()));
    println!("{}", help_text());

    let mut rl = Editor::<(), DefaultHistory>::new()
        .map_err(|e| AppError::Config(format!("Failed to start line editor: {}", e)))?;

    loop {
        match rl.readline("🍽️  ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                if let Err(e) = command_handler.handle_command(input).await {
                    println!("{}", e.red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!(error = %err, "Readline failed");
                break;
            }
        }
    }
    Ok(())
}
