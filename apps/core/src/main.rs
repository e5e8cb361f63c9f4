use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kindwords_core::analysis::{Goal, SentenceAnalyzer};
use kindwords_core::coach::{OfflineGenerator, OpenAiClient, ResponseEvaluator, Scenario, TextGenerator};
use kindwords_core::config::CoachConfig;

#[derive(Parser)]
#[command(
    name = "kindwords",
    about = "Score a child's sentence for politeness and empathy",
    version
)]
struct Cli {
    /// Scenario goal (giving_feedback, polite_refusal, apologizing,
    /// asking_for_help, expressing_disagreement). Inferred when omitted.
    #[arg(long)]
    goal: Option<String>,

    /// Scenario title, used by the coach prompts
    #[arg(long, default_value = "Practice")]
    title: String,

    #[arg(long, default_value = "")]
    story: String,

    #[arg(long, default_value = "")]
    question: String,

    /// Run the full coach evaluation (feedback, model sentence, lesson, hint)
    #[arg(long)]
    coach: bool,

    /// Sentence to analyze (reads stdin if none provided)
    text: Vec<String>,
}

fn read_text(cli: &Cli) -> anyhow::Result<String> {
    if !cli.text.is_empty() {
        return Ok(cli.text.join(" "));
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input.trim_end_matches(['\n', '\r']).to_string())
}

fn build_generator(config: &CoachConfig) -> Arc<dyn TextGenerator> {
    match OpenAiClient::from_config(config) {
        Some(client) => {
            info!("Using text generation model {} at {}", config.model, config.base_url);
            Arc::new(client)
        }
        None => {
            warn!("OPENAI_API_KEY is not set, coach text uses built-in fallbacks");
            Arc::new(OfflineGenerator)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let text = read_text(&cli)?;
    let goal = cli.goal.as_deref().map(Goal::parse_lenient);

    if !cli.coach {
        let result = SentenceAnalyzer::new().analyze(&text, goal);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let config = CoachConfig::from_env().context("Invalid coach configuration")?;
    let evaluator = ResponseEvaluator::new(build_generator(&config), &config);

    // Without a scenario goal, coach against the goal the sentence suggests
    let goal = goal.unwrap_or_else(|| SentenceAnalyzer::new().analyze(&text, None).goal);
    let scenario = Scenario::new(cli.title, goal)
        .with_story(cli.story)
        .with_question(cli.question);

    let evaluation = evaluator.evaluate(&text, &scenario).await?;
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}
