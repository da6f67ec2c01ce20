//! ClaimNet CLI: run the fraud network analysis from the command line
//!
//! Runs the pipeline in-process against the configured dataset and prints
//! the ranked entity table, community statistics or one entity's details.

use clap::{Parser, Subcommand};
use claimnet::config::DatasetKind;
use claimnet::{AnalysisPipeline, AnalysisResults, ClaimNetConfig, EntityId, Preset, SyntheticGenerator};
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "claimnet", version, about = "ClaimNet fraud network analysis CLI")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "CLAIMNET_CONFIG")]
    config: Option<PathBuf>,

    /// Use a synthetic network of this size (demo, client_presentation, production, stress_test)
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Seed for synthetic data and simulated signals
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Minimum clique size for community detection
    #[arg(long, global = true)]
    k: Option<usize>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ranked entity table
    Rank {
        /// Number of rows to show
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Only this entity type (e.g. "Doctor", "Regular Person")
        #[arg(long)]
        entity_type: Option<String>,

        /// Minimum ensemble score
        #[arg(long)]
        min_score: Option<f64>,
    },
    /// Show community statistics
    Communities,
    /// Show one entity's communities, connections, claims and rules
    Entity {
        /// Entity name as it appears in the catalog
        name: String,
    },
    /// Write a synthetic dataset as JSON
    Generate {
        /// Output file
        #[arg(long, short)]
        output: PathBuf,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("claimnet=warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match &cli.command {
        Commands::Rank {
            top,
            entity_type,
            min_score,
        } => run_rank(&config, *top, entity_type.as_deref(), *min_score, &cli.format),
        Commands::Communities => run_communities(&config, &cli.format),
        Commands::Entity { name } => run_entity(&config, name, &cli.format),
        Commands::Generate { output } => run_generate(&config, output),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> CliResult<ClaimNetConfig> {
    let mut config = ClaimNetConfig::load(cli.config.as_deref())?;
    if let Some(preset) = &cli.preset {
        config.dataset.source = DatasetKind::Synthetic;
        config.dataset.preset = preset.parse::<Preset>()?;
    }
    if let Some(seed) = cli.seed {
        config.dataset.seed = seed;
    }
    if let Some(k) = cli.k {
        config.analysis.k_clique = k;
    }
    config.validate()?;
    Ok(config)
}

fn analyze(config: &ClaimNetConfig) -> CliResult<AnalysisResults> {
    let pipeline = AnalysisPipeline::new(config.analysis.clone())?;
    let signals = config.signal_source();
    Ok(pipeline.run_source(&config.dataset_source()?, signals.as_ref())?)
}

fn run_rank(
    config: &ClaimNetConfig,
    top: usize,
    entity_type: Option<&str>,
    min_score: Option<f64>,
    format: &OutputFormat,
) -> CliResult<()> {
    let results = analyze(config)?;
    let rows: Vec<_> = results
        .entities
        .iter()
        .filter(|r| entity_type.map_or(true, |t| r.category.as_str() == t))
        .filter(|r| min_score.map_or(true, |m| r.ensemble_score >= m))
        .take(top)
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            println!("priority_rank,entity_name,entity_type,ensemble_score,social_network_score,composite_external_score,connected_claims_count,total_exposure,is_fraud");
            for r in &rows {
                println!(
                    "{},{},{},{:.4},{:.4},{:.4},{},{:.2},{}",
                    r.priority_rank,
                    csv_field(r.entity.as_str()),
                    csv_field(r.category.as_str()),
                    r.ensemble_score,
                    r.social_network_score,
                    r.composite_external_score,
                    r.connected_claims_count,
                    r.total_exposure,
                    r.is_fraud
                );
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&["Rank", "Entity", "Type", "Ensemble", "Social", "External", "Claims", "Exposure", "Fraud"]);
            for r in &rows {
                table.add_row(vec![
                    r.priority_rank.to_string(),
                    r.entity.to_string(),
                    r.category.to_string(),
                    format!("{:.2}", r.ensemble_score),
                    format!("{:.2}", r.social_network_score),
                    format!("{:.3}", r.composite_external_score),
                    r.connected_claims_count.to_string(),
                    format!("{:.0}", r.total_exposure),
                    r.is_fraud.to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} of {} entities", rows.len(), results.entities.len());
        }
    }

    Ok(())
}

fn run_communities(config: &ClaimNetConfig, format: &OutputFormat) -> CliResult<()> {
    let results = analyze(config)?;
    let summaries = results.community_summaries();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Csv => {
            println!("community_id,total_members,fraud_count,fraud_ratio,risk_level");
            for s in &summaries {
                println!(
                    "{},{},{},{:.4},{}",
                    s.community_id, s.total_members, s.fraud_count, s.fraud_ratio, format!("{:?}", s.risk_level).to_uppercase()
                );
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&["Community", "Members", "Fraud", "Ratio", "Risk", "Entities"]);
            for s in &summaries {
                let members: Vec<String> = results
                    .community_members(&[s.community_id])
                    .iter()
                    .map(|m| m.entity.to_string())
                    .collect();
                table.add_row(vec![
                    s.community_id.to_string(),
                    s.total_members.to_string(),
                    s.fraud_count.to_string(),
                    format!("{:.0}%", s.fraud_ratio * 100.0),
                    format!("{:?}", s.risk_level).to_uppercase(),
                    members.join(", "),
                ]);
            }
            println!("{}", table);
            println!("{} communities (k = {})", summaries.len(), results.communities.k);
        }
    }

    Ok(())
}

fn run_entity(config: &ClaimNetConfig, name: &str, format: &OutputFormat) -> CliResult<()> {
    let results = analyze(config)?;
    let detail = results
        .entity_detail(&EntityId::from(name))
        .ok_or_else(|| format!("entity not found: {}", name))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&detail)?),
        OutputFormat::Csv => {
            println!("source_entity,target_entity,connection_strength,max_shared_claim_fraud_score");
            for c in &detail.connections {
                println!(
                    "{},{},{},{:.4}",
                    csv_field(c.source.as_str()),
                    csv_field(c.target.as_str()),
                    c.connection_strength,
                    c.max_shared_claim_score
                );
            }
        }
        OutputFormat::Table => {
            let e = &detail.entity;
            println!("{} ({})", e.entity, e.category);
            println!("  Rank:      {}", e.priority_rank);
            println!("  Ensemble:  {:.2}", e.ensemble_score);
            println!("  Social:    {:.2}", e.social_network_score);
            println!("  External:  {:.3} (max {:.2})", e.composite_external_score, e.max_external_fraud_score);
            println!("  Exposure:  {:.0}", e.total_exposure);
            let ids: Vec<String> = detail.communities.iter().map(|c| c.community_id.to_string()).collect();
            println!("  Communities: {}", if ids.is_empty() { "-".to_string() } else { ids.join(", ") });

            let mut connections = new_table(&["Connected To", "Strength", "Shared Claims", "Max Score"]);
            for c in &detail.connections {
                let other = if c.source == e.entity { &c.target } else { &c.source };
                let claims: Vec<&str> = c.shared_claims.iter().map(|c| c.as_str()).collect();
                connections.add_row(vec![
                    other.to_string(),
                    c.connection_strength.to_string(),
                    claims.join(" "),
                    format!("{:.2}", c.max_shared_claim_score),
                ]);
            }
            println!("{}", connections);

            let mut rules = new_table(&["Rule", "Description", "Priority", "Claims"]);
            for r in &detail.fraud_rules {
                rules.add_row(vec![
                    r.rule_no.to_string(),
                    r.description.clone(),
                    r.priority.to_string(),
                    r.claims.len().to_string(),
                ]);
            }
            println!("{}", rules);
        }
    }

    Ok(())
}

fn run_generate(config: &ClaimNetConfig, output: &Path) -> CliResult<()> {
    let dataset = SyntheticGenerator::new(config.dataset.preset, config.dataset.seed).generate()?;
    std::fs::write(output, serde_json::to_string_pretty(&dataset)?)?;
    println!(
        "Wrote {} entities and {} notes to {}",
        dataset.entities.len(),
        dataset.documents.len(),
        output.display()
    );
    Ok(())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
