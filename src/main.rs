use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tps_scoring::clarify::{
    ClarificationFlow, ClarificationSubject, IntegralCuspSubject, TraitCuspSubject,
};
use tps_scoring::config::{AppConfig, ScoringConfig, load_scoring_config};
use tps_scoring::llm::create_llm_provider;
use tps_scoring::mapping::DetailedMappings;
use tps_scoring::mapping::integral::preliminary_distribution;
use tps_scoring::oracle::{ClarificationOracle, LlmClarificationOracle};
use tps_scoring::profile::{PersonalityProfile, ProfileAssembler};
use tps_scoring::scoring::{ResponseVector, calculate_trait_scores, dominant_traits};

#[derive(Parser)]
#[command(name = "tps", about = "Score personality questionnaires and map them onto frameworks")]
struct Cli {
    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a profile from a JSON array of 108 responses.
    Score {
        /// Path to the responses JSON.
        #[arg(long)]
        responses: PathBuf,

        /// Override file (TOML or JSON). Defaults to TPS_SCORING_OVERRIDES.
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Leave out the enhanced mapping detail.
        #[arg(long)]
        basic: bool,
    },

    /// Re-run the framework mappers over a stored profile.
    Recalculate {
        /// Path to the profile JSON.
        #[arg(long)]
        profile: PathBuf,

        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Interactively resolve cusps, then print the result.
    Clarify {
        #[arg(long)]
        responses: PathBuf,

        /// Clarify the leading Integral level instead of trait cusps.
        #[arg(long)]
        integral: bool,

        #[arg(long)]
        overrides: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tps_scoring=info,tps=info")),
        )
        .with(
            cli.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with((!cli.json_logs).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
        }))
        .init();

    let app = AppConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Score {
            responses,
            overrides,
            basic,
        } => {
            let config = scoring_config(&app, overrides)?;
            let mut assembler = ProfileAssembler::new(Arc::new(config));
            if !basic {
                assembler = assembler.with_enhanced(Arc::new(DetailedMappings));
            }
            let values = read_responses(&responses)?;
            let profile = assembler.generate_full_profile(&values)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Commands::Recalculate { profile, overrides } => {
            let config = scoring_config(&app, overrides)?;
            let assembler =
                ProfileAssembler::new(Arc::new(config)).with_enhanced(Arc::new(DetailedMappings));
            let text = std::fs::read_to_string(&profile)
                .with_context(|| format!("Failed to read {}", profile.display()))?;
            let stored: PersonalityProfile =
                serde_json::from_str(&text).context("Profile JSON is malformed")?;
            let recalculated = assembler.recalculate_profile(&stored);
            println!("{}", serde_json::to_string_pretty(&recalculated)?);
        }
        Commands::Clarify {
            responses,
            integral,
            overrides,
        } => {
            let config = scoring_config(&app, overrides)?;
            let values = read_responses(&responses)?;
            let responses = ResponseVector::new(&values)?;
            let scores = calculate_trait_scores(&responses, &config);

            let oracle: Option<Arc<dyn ClarificationOracle>> = match &app.llm {
                Some(llm) => {
                    let provider = create_llm_provider(llm)?;
                    let oracle: Arc<dyn ClarificationOracle> =
                        Arc::new(LlmClarificationOracle::new(provider));
                    Some(oracle)
                }
                None => {
                    tracing::info!("TPS_LLM_BASE_URL not set, using static questions");
                    None
                }
            };

            if integral {
                let preliminary = preliminary_distribution(&scores, &config.integral).value;
                let subject = IntegralCuspSubject::new(
                    app.clarification.clone(),
                    dominant_traits(&scores),
                    config.integral.clone(),
                );
                let outcome = converse(with_oracle(subject, oracle), preliminary).await?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                let subject = TraitCuspSubject::new(app.clarification.clone());
                let outcome = converse(with_oracle(subject, oracle), scores).await?;
                let assembler = ProfileAssembler::new(Arc::new(config))
                    .with_enhanced(Arc::new(DetailedMappings));
                let profile = assembler.profile_from_scores(outcome.scores.clone());
                let report = serde_json::json!({
                    "clarification": outcome,
                    "profile": profile,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    Ok(())
}

fn scoring_config(app: &AppConfig, overrides: Option<PathBuf>) -> anyhow::Result<ScoringConfig> {
    let path = overrides.or_else(|| app.overrides_path.clone());
    load_scoring_config(path.as_deref()).context("Failed to load scoring overrides")
}

fn read_responses(path: &Path) -> anyhow::Result<Vec<i64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).context("Responses must be a JSON array of integers")
}

fn with_oracle<S: ClarificationSubject>(
    subject: S,
    oracle: Option<Arc<dyn ClarificationOracle>>,
) -> ClarificationFlow<S> {
    let flow = ClarificationFlow::new(subject);
    match oracle {
        Some(oracle) => flow.with_oracle(oracle),
        None => flow,
    }
}

/// Ask every question on stderr and read answers from stdin. `skip` or
/// end of input finishes early.
async fn converse<S: ClarificationSubject>(
    mut flow: ClarificationFlow<S>,
    input: S::Input,
) -> anyhow::Result<S::Outcome> {
    flow.begin(input).await?;
    if flow.analysis().is_empty() {
        eprintln!("Nothing to clarify.");
    } else {
        eprintln!("Type \"skip\" at any time to finish early.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(question) = flow.current_question() {
        eprintln!("\n[{}/{}] {}", question.index + 1, question.total, question.text);
        eprint!("> ");

        let Some(line) = lines.next_line().await? else {
            flow.skip()?;
            break;
        };
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("skip") {
            flow.skip()?;
            break;
        }
        if answer.is_empty() {
            continue;
        }

        let turn = flow.submit_answer(answer).await?;
        if let Some(chosen) = &turn.chosen {
            eprintln!("  noted: {} ({:.0}%)", chosen, turn.confidence * 100.0);
        }
    }

    Ok(flow.into_outcome()?)
}
