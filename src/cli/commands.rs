//! CLI command implementations
//!
//! Commands are glue: load config, resolve, estimate, print. The estimator
//! is only called once resolution has fully succeeded.

use std::path::Path;

use serde_json::Value;

use crate::catalog::{
    CatalogLoader, MetadataResolver, ResolveRequest, SnapshotResolver, TableLayoutFacts,
};
use crate::estimator::{self, EstimationInput, SizeEstimate};
use crate::observability::{log_event_with_fields, Event, Logger};

use super::args::{Command, TargetArgs};
use super::config::{Config, OutputFormat};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Estimate {
            config,
            target,
            row_count,
            fill_factor,
            output,
        } => estimate(&config, &target, row_count, fill_factor, output),
        Command::Facts { config, target } => facts(&config, &target),
        Command::Compute { output } => compute(output),
    }
}

/// Resolve a table from the catalog snapshot and print its estimate
///
/// Flags override the config file's fill factor and output format.
pub fn estimate(
    config_path: &Path,
    target: &TargetArgs,
    row_count: Option<u64>,
    fill_factor: Option<u32>,
    output: Option<OutputFormat>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let format = output.unwrap_or(config.output);
    let fill_factor = fill_factor.or(config.fill_factor);

    let result = resolve_target(&config, target)
        .and_then(|facts| run_estimate(&facts.into_input(row_count, fill_factor)));

    report(result, format)
}

/// Resolve a table from the catalog snapshot and print its layout facts
pub fn facts(config_path: &Path, target: &TargetArgs) -> CliResult<()> {
    let config = load_config(config_path)?;
    let facts = resolve_target(&config, target)?;
    write_response(serde_json::to_value(&facts)?)
}

/// Estimate from an `EstimationInput` read on stdin
pub fn compute(output: OutputFormat) -> CliResult<()> {
    let result = read_request().and_then(compute_from_value);
    report(result, output)
}

/// Estimate from an already parsed `EstimationInput` JSON value
pub fn compute_from_value(value: Value) -> CliResult<SizeEstimate> {
    let input: EstimationInput = serde_json::from_value(value)
        .map_err(|e| CliError::invalid_input(format!("Invalid estimation input: {}", e)))?;
    run_estimate(&input)
}

/// Loads config and applies its log level
pub fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);

    let path = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);

    Ok(config)
}

/// Builds a resolver over the configured catalog snapshot
pub fn snapshot_resolver(config: &Config) -> CliResult<SnapshotResolver> {
    let catalog_file = config.catalog_file();
    let snapshot = CatalogLoader::new(&catalog_file).load()?;

    let path = catalog_file.display().to_string();
    let databases = snapshot.databases.len().to_string();
    log_event_with_fields(
        Event::CatalogLoaded,
        &[
            ("path", path.as_str()),
            ("instance", snapshot.instance.as_str()),
            ("databases", databases.as_str()),
        ],
    );

    Ok(SnapshotResolver::new(snapshot))
}

/// Resolves the command-line target against the configured catalog
pub fn resolve_target(config: &Config, target: &TargetArgs) -> CliResult<TableLayoutFacts> {
    let resolver = snapshot_resolver(config)?;
    resolve_with(&resolver, &request_for(target))
}

/// Resolves one request, logging the outcome
pub fn resolve_with<R: MetadataResolver>(
    resolver: &R,
    request: &ResolveRequest,
) -> CliResult<TableLayoutFacts> {
    let table = format!("{}.{}.{}", request.database, request.schema, request.table);
    let columns = request.columns.join(",");
    log_event_with_fields(
        Event::ResolveBegin,
        &[("table", table.as_str()), ("columns", columns.as_str())],
    );

    match resolver.resolve(request) {
        Ok(facts) => {
            let rows = facts.row_count.to_string();
            log_event_with_fields(
                Event::ResolveComplete,
                &[
                    ("table", table.as_str()),
                    ("rows", rows.as_str()),
                    ("engine_tier", facts.engine_tier.as_str()),
                    ("heap", if facts.clustering_key.is_none() { "true" } else { "false" }),
                ],
            );
            Ok(facts)
        }
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(
                Event::ResolveFailed,
                &[("table", table.as_str()), ("code", e.code()), ("reason", reason.as_str())],
            );
            Err(e.into())
        }
    }
}

/// Runs the estimator, logging the outcome
pub fn run_estimate(input: &EstimationInput) -> CliResult<SizeEstimate> {
    let rows = input.row_count.to_string();
    let columns = input.columns.len().to_string();
    log_event_with_fields(
        Event::EstimateBegin,
        &[("rows", rows.as_str()), ("columns", columns.as_str())],
    );

    match estimator::estimate(input) {
        Ok(estimate) => {
            let row_size = estimate.index_row_size_bytes.to_string();
            let pages = estimate.leaf_pages_required.to_string();
            let size_mb = estimate.estimated_size_mb.to_string();
            log_event_with_fields(
                Event::EstimateComplete,
                &[
                    ("index_row_size", row_size.as_str()),
                    ("leaf_pages", pages.as_str()),
                    ("size_mb", size_mb.as_str()),
                ],
            );
            Ok(estimate)
        }
        Err(e) => {
            log_event_with_fields(
                Event::EstimateRejected,
                &[
                    ("code", e.code().code()),
                    ("quantity", e.quantity()),
                    ("value", e.value()),
                ],
            );
            Err(e.into())
        }
    }
}

/// Renders an estimate in the requested format
pub fn render_estimate(estimate: &SizeEstimate, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(estimate.to_string()),
        OutputFormat::Json => {
            let envelope = super::io::ok_envelope(serde_json::to_value(estimate)?);
            Ok(format!("{}\n", envelope))
        }
    }
}

fn report(result: CliResult<SizeEstimate>, format: OutputFormat) -> CliResult<()> {
    match result {
        Ok(estimate) => write_text(&render_estimate(&estimate, format)?),
        Err(e) => {
            if format == OutputFormat::Json {
                write_error(e.code_str(), e.message())?;
            }
            Err(e)
        }
    }
}

fn request_for(target: &TargetArgs) -> ResolveRequest {
    let mut request = ResolveRequest::new(&target.database, &target.table, &target.columns)
        .with_schema(&target.schema);
    if let Some(instance) = &target.instance {
        request = request.with_instance(instance);
    }
    request
}
