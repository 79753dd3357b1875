//! Command line entry point.
//!
//! ```sh
//! soli-graph start
//! soli-graph taxonomy area_of_law --max-depth 2
//! soli-graph search label "contract law"
//! soli-graph --environment production info
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;

use crate::{
    app::{self, AppContext},
    config::Config,
    environment::{resolve_from_env, Environment},
    logger,
    ontology::traversal::Category,
    Result,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Specify the environment [default: `SOLI_ENV`, then `development`]
    #[arg(short, long, global = true)]
    environment: Option<String>,
    /// Read configuration from this file instead of `config/{environment}.yaml`
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Start,
    /// List a category and its descendants
    Taxonomy {
        /// Category slug, e.g. `area_of_law`
        category: Category,
        /// Levels of descendants to include
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Run a lexical search over every class
    Search {
        #[arg(value_enum)]
        mode: SearchMode,
        query: String,
    },
    /// Rank a category's classes with the configured semantic scorer
    Semantic {
        category: Category,
        query: String,
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Print the neighbor graph of a class
    Neighbors {
        /// Local identifier or absolute IRI
        iri: String,
    },
    /// Describe the loaded ontology
    Info,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SearchMode {
    Prefix,
    Label,
    Definition,
}

/// Parses the command line and runs the selected command.
///
/// # Errors
/// Returns any error raised while loading configuration, booting the
/// ontology or running the command.
pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    let environment: Environment = cli.environment.unwrap_or_else(resolve_from_env).into();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => environment.load()?,
    };
    logger::init(&config.logger);

    let ctx = AppContext::boot(environment, config).await?;
    run(&ctx, cli.command).await
}

async fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Start => app::serve(ctx.clone()).await,
        Commands::Taxonomy {
            category,
            max_depth,
        } => {
            let depth = max_depth.unwrap_or(ctx.config.search.taxonomy_default_depth);
            print_json(&ctx.ontology.categorize(category, depth)?)
        }
        Commands::Search { mode, query } => {
            let index = ctx.ontology.search();
            match mode {
                SearchMode::Prefix => print_json(&index.by_prefix(&query)?),
                SearchMode::Label => print_json(&index.by_label(&query)?),
                SearchMode::Definition => print_json(&index.by_definition(&query)?),
            }
        }
        Commands::Semantic {
            category,
            query,
            max_depth,
        } => {
            let depth = max_depth.unwrap_or(ctx.config.search.semantic_default_depth);
            let results = ctx.semantic_search()?.search(category, &query, depth).await?;
            print_json(&results)
        }
        Commands::Neighbors { iri } => {
            print_json(&ctx.ontology.neighbors(&iri)?)
        }
        Commands::Info => {
            let metadata = ctx.ontology.metadata();
            print_json(&json!({
                "environment": ctx.environment.to_string(),
                "num_classes": ctx.ontology.class_count()?,
                "title": metadata.title,
                "description": metadata.description,
                "source_type": metadata.source_type,
                "location": metadata.location,
                "semantic_search": ctx.scorer.is_some(),
                "categories": Category::ALL.iter().map(|c| c.slug()).collect::<Vec<_>>(),
            }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
