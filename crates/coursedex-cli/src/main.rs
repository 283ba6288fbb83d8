//! coursedex-cli: Command-line interface for coursedex.

mod bench;
mod output;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use coursedex_core::api::StatusResponse;
use coursedex_core::build_info::BUILD_INFO;
use coursedex_core::Config;
use coursedex_index::{serializers, ContentType, Expr, Ordering, SearchRequest, Synonyms};
use coursedex_loader::{IndexSnapshot, Loader};
use output::{print_box_bottom, print_box_top, print_kv_line, ValueStyle};
use serde_json::{Map, Value};
use tracing::info;

#[derive(Parser)]
#[command(name = "coursedex")]
#[command(about = "Catalog search over course runs, courses, and programs", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level for coursedex crates (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Query, e.g. `title:python AND org:MITx`
        query: String,

        /// Content types to return (courserun, program, course)
        #[arg(short = 't', long, value_delimiter = ',', default_value = "courserun,program")]
        content_type: Vec<String>,

        /// Partner short code (defaults to server.default_partner)
        #[arg(short, long)]
        partner: Option<String>,

        /// Result ordering (start, -start)
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        ordering: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output format (table, json, plain)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Suggest course runs and programs for partial input
    Typeahead {
        /// Partial input
        q: String,

        /// Partner short code (defaults to server.default_partner)
        #[arg(short, long)]
        partner: Option<String>,

        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },

    /// Check which identifiers a catalog query matches
    Contains {
        /// Catalog query
        query: String,

        /// Course run keys
        #[arg(long, value_delimiter = ',')]
        course_run_ids: Vec<String>,

        /// Course uuids
        #[arg(long, value_delimiter = ',')]
        course_uuids: Vec<String>,

        /// Partner short code (defaults to server.default_partner)
        #[arg(short, long)]
        partner: Option<String>,
    },

    /// Rebuild the index from the catalog directory
    Rebuild {
        /// Dry run (don't actually write)
        #[arg(long)]
        dry_run: bool,
    },

    /// Show index status
    Status {
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },

    /// Measure search latency over a file of queries
    Bench(bench::BenchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.log_level {
        Some(level) => coursedex_core::logging::init_with_level(level),
        None => coursedex_core::logging::init(),
    }

    let Some(command) = cli.command else {
        println!("{}", BUILD_INFO.version_line("coursedex"));
        println!("Use --help for usage information");
        return Ok(());
    };

    let config = load_config()?;
    match command {
        Commands::Search {
            query,
            content_type,
            partner,
            ordering,
            limit,
            format,
        } => search(&config, &query, &content_type, partner, &ordering, limit, &format),
        Commands::Typeahead { q, partner, format } => typeahead(&config, &q, partner, &format),
        Commands::Contains {
            query,
            course_run_ids,
            course_uuids,
            partner,
        } => contains(&config, &query, &course_run_ids, &course_uuids, partner),
        Commands::Rebuild { dry_run } => rebuild(&config, dry_run),
        Commands::Status { format } => status(&config, &format),
        Commands::Bench(args) => bench::run(&config, args),
    }
}

fn search(
    config: &Config,
    query: &str,
    content_types: &[String],
    partner: Option<String>,
    ordering: &str,
    limit: usize,
    format: &str,
) -> anyhow::Result<()> {
    let expr = Expr::parse(query).context("invalid query")?;
    let content_types = content_types
        .iter()
        .map(|name| {
            ContentType::parse(name)
                .with_context(|| format!("The content type [{name}] is not valid."))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let Some(ordering) = Ordering::parse(ordering) else {
        bail!("The ordering [{ordering}] is not valid.");
    };

    let snapshot = load_snapshot(config)?;
    let synonyms = Synonyms::new(&config.search.synonyms);
    let engine = snapshot.engine(&synonyms);

    let mut request = SearchRequest::new(expr)
        .with_partner(partner.unwrap_or_else(|| config.server.default_partner.clone()));
    request.content_types = content_types;
    request.ordering = ordering;

    let now = chrono::Utc::now();
    let results: Vec<(f32, _)> = engine
        .search(&request, now)
        .into_iter()
        .take(limit)
        .map(|hit| (hit.score, serializers::aggregate(hit.doc, now)))
        .collect();

    match format {
        "json" => {
            let objects: Vec<_> = results.into_iter().map(|(_, result)| result).collect();
            println!("{}", serde_json::to_string_pretty(&objects)?);
        }
        "plain" => {
            for (_, result) in &results {
                let (_, id, _) = output::describe(result);
                println!("{id}");
            }
        }
        _ => output::print_results_table(&results),
    }

    Ok(())
}

fn typeahead(
    config: &Config,
    q: &str,
    partner: Option<String>,
    format: &str,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(config)?;
    let synonyms = Synonyms::new(&config.search.synonyms);
    let engine = snapshot.engine(&synonyms);

    let partner = partner.unwrap_or_else(|| config.server.default_partner.clone());
    let hits = engine.typeahead(
        q,
        &partner,
        config.search.typeahead_result_count,
        config.search.typeahead_org_boost,
    );
    let response = serializers::typeahead(&hits);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        output::print_typeahead(&response);
    }
    Ok(())
}

fn contains(
    config: &Config,
    query: &str,
    course_run_ids: &[String],
    course_uuids: &[String],
    partner: Option<String>,
) -> anyhow::Result<()> {
    let course_run_ids = non_empty(course_run_ids);
    let course_uuids = non_empty(course_uuids);
    if query.trim().is_empty() || (course_run_ids.is_empty() && course_uuids.is_empty()) {
        bail!("CatalogQueryContains endpoint requires query and identifiers list(s)");
    }
    let expr = Expr::parse(query).context("invalid query")?;

    let snapshot = load_snapshot(config)?;
    let synonyms = Synonyms::new(&config.search.synonyms);
    let engine = snapshot.engine(&synonyms);

    let partner = partner.unwrap_or_else(|| config.server.default_partner.clone());
    let answers = engine.contains(
        &expr,
        &partner,
        &course_run_ids,
        &course_uuids,
        chrono::Utc::now(),
    );

    let body: Map<String, Value> = answers
        .into_iter()
        .map(|(id, found)| (id, Value::Bool(found)))
        .collect();
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn non_empty(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn rebuild(config: &Config, dry_run: bool) -> anyhow::Result<()> {
    info!("Starting index rebuild...");

    let loader = Loader::new(config.clone());
    if dry_run {
        let snapshot = loader.load()?;
        println!("Dry run: would index {} documents", snapshot.docs.len());
    } else {
        let snapshot = loader.rebuild()?;
        println!("Index rebuilt: {} documents", snapshot.docs.len());
    }

    Ok(())
}

fn status(config: &Config, format: &str) -> anyhow::Result<()> {
    let index_file = config.snapshot_file();
    if !index_file.exists() {
        println!("Status: No index found");
        println!("Run 'coursedex rebuild' to create an index");
        return Ok(());
    }

    let snapshot = IndexSnapshot::load(&index_file)?;
    let docs = &snapshot.docs;
    let status = StatusResponse {
        documents: docs.len(),
        course_runs: docs.count_of(ContentType::CourseRun),
        courses: docs.count_of(ContentType::Course),
        programs: docs.count_of(ContentType::Program),
        trigram_count: snapshot.trigram_index.trigram_count(),
        last_updated: snapshot.built_at,
        reindexing: false,
        version: BUILD_INFO.version.to_string(),
        git_sha: BUILD_INFO.git_sha.to_string(),
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let built = chrono::DateTime::from_timestamp(status.last_updated, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    print_box_top("coursedex · Index Status");
    print_kv_line("  Documents:", &status.documents.to_string(), ValueStyle::Good);
    print_kv_line("  Course runs:", &status.course_runs.to_string(), ValueStyle::Neutral);
    print_kv_line("  Courses:", &status.courses.to_string(), ValueStyle::Neutral);
    print_kv_line("  Programs:", &status.programs.to_string(), ValueStyle::Neutral);
    print_kv_line("  Trigrams:", &status.trigram_count.to_string(), ValueStyle::Neutral);
    print_kv_line("  Built:", &built, ValueStyle::Neutral);
    print_kv_line(
        "  Catalog:",
        &config.catalog_path.display().to_string(),
        ValueStyle::Neutral,
    );
    print_box_bottom();
    Ok(())
}

/// Load the persisted index, failing with a hint when none exists.
pub(crate) fn load_snapshot(config: &Config) -> anyhow::Result<IndexSnapshot> {
    let index_file = config.snapshot_file();
    if !index_file.exists() {
        bail!("Index not found. Run 'coursedex rebuild' first.");
    }
    IndexSnapshot::load(&index_file)
        .with_context(|| format!("failed to load {}", index_file.display()))
}

fn load_config() -> anyhow::Result<Config> {
    let config_path = coursedex_core::paths::config_path();

    if config_path.exists() {
        Config::load(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))
    } else {
        Ok(Config::default())
    }
}
