use ai_sentinel::analysis::ScenarioAnalysis;
use ai_sentinel::config::{create_default_config, load_config, save_config};
use ai_sentinel::server::{self, ViewRegistry};
use ai_sentinel::{
    AnalyzerError, AssessmentService, GeminiService, ScenarioAnalyzer, SkipReason, SubmitOutcome,
};
use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ai_sentinel")]
#[command(about = "Serve the AI Sentinel page and analyze AI usage scenarios for security risk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration file
    Init {
        /// Path to save the config file
        #[arg(short, long, default_value = "ai_sentinel.toml")]
        config: PathBuf,
    },
    /// Run the page server
    Serve {
        /// Path to the config file
        #[arg(short, long, default_value = "ai_sentinel.toml")]
        config: PathBuf,
        /// Address to listen on, overriding the config file
        #[arg(short, long)]
        listen: Option<String>,
    },
    /// Analyze a single usage scenario and print the result
    Analyze {
        /// Path to the config file
        #[arg(short, long, default_value = "ai_sentinel.toml")]
        config: PathBuf,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
        /// Scenario description
        text: String,
    },
}

/// Ask for the API key, leaving it unset when the answer is blank.
fn prompt_api_key() -> Result<Option<String>> {
    print!("Store an API key in the config file? [y/N]: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(None);
    }

    let key = rpassword::prompt_password("Enter API key: ")?;
    let key = key.trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}

fn print_analysis(analysis: &ScenarioAnalysis) {
    println!("風險等級: {}", analysis.risk_level);
    println!("{}", analysis.summary);
    println!();
    println!("潛在威脅:");
    for threat in &analysis.threats {
        println!("  - {}: {}", threat.title, threat.description);
    }
    println!("建議措施:");
    for recommendation in &analysis.recommendations {
        println!("  - {}: {}", recommendation.title, recommendation.action);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    ai_sentinel::logging::init_logging("info")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { config } => {
            let mut default_config = create_default_config();
            default_config.assessment.api_key = prompt_api_key()?;
            save_config(&default_config, &config)?;
            println!("Configuration file created at: {}", config.display());
            if default_config.assessment.api_key.is_none() {
                println!("Set API_KEY in the environment before running an analysis.");
            }
        }

        Commands::Serve { config, listen } => {
            let config = load_config(&config)?;

            let service: Option<Arc<dyn AssessmentService>> =
                match GeminiService::from_config(&config.assessment) {
                    Ok(service) => Some(Arc::new(service)),
                    Err(AnalyzerError::ConfigurationMissing) => {
                        ai_sentinel::log_warn!(
                            "No API key configured; scenario analysis will report a configuration error"
                        );
                        None
                    }
                    Err(err) => return Err(err.into()),
                };

            let registry = Arc::new(ViewRegistry::new(service, &config.server));
            let listen_addr = listen.unwrap_or_else(|| config.server.listen_addr.clone());
            server::serve(&listen_addr, registry).await?;
        }

        Commands::Analyze { config, json, text } => {
            let config = load_config(&config)?;
            let analyzer = ScenarioAnalyzer::from_config(&config.assessment)?;

            match analyzer.submit(&text).await {
                SubmitOutcome::Analyzed(analysis) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&analysis)?);
                    } else {
                        print_analysis(&analysis);
                    }
                }
                SubmitOutcome::Failed(err) => {
                    ai_sentinel::log_error!("Analysis failed: {:?}", err);
                    eprintln!("{}", err.user_message());
                    std::process::exit(1);
                }
                SubmitOutcome::Skipped(SkipReason::EmptyInput) => {
                    eprintln!("Nothing to analyze: the scenario text is empty");
                    std::process::exit(2);
                }
                other => return Err(anyhow!("Unexpected analysis outcome: {other:?}")),
            }
        }
    }

    Ok(())
}
