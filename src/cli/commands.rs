use crate::binder::bind;
use crate::convert::DefaultConverters;
use crate::manifest::{load_manifest, load_route_table};
use crate::runtime_config::RuntimeConfig;
use crate::router::RouteTable;
use crate::validator::{self, has_errors, write_diagnostics, ReachabilityPolicy, Severity};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line interface for argvrouter
///
/// Lints, inspects and exercises route manifests without writing a program
/// around them.
#[derive(Parser)]
#[command(name = "argvrouter")]
#[command(about = "argvrouter CLI", long_about = None, version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Lint a route manifest
    ///
    /// Reports patterns that fail to compile, duplicate patterns, overlapping
    /// type constraints and unreachable routes.
    Lint {
        /// Path to the route manifest (YAML, JSON or TOML)
        #[arg(short, long)]
        routes: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,

        /// Reachability policy: specificity-order or exact-first
        /// (default: ARGVR_REACHABILITY, then specificity-order)
        #[arg(long)]
        policy: Option<ReachabilityPolicy>,
    },
    /// Resolve an argument vector and print the match as JSON
    ///
    /// Exits with code 1 when no route matches.
    Resolve {
        /// Path to the route manifest (YAML, JSON or TOML)
        #[arg(short, long)]
        routes: PathBuf,

        /// Also convert values with the default type converters
        #[arg(long, default_value_t = false)]
        bind: bool,

        /// The argument vector to resolve (place after `--`)
        #[arg(last = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List the compiled routes of a manifest
    Inspect {
        /// Path to the route manifest (YAML, JSON or TOML)
        #[arg(short, long)]
        routes: PathBuf,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Execute the CLI command provided by the user and return the exit code.
///
/// # Errors
///
/// Returns an error if:
/// - The manifest cannot be read or parsed
/// - A pattern fails to compile (`resolve` and `inspect`)
/// - `lint --fail-on-error` finds errors
/// - Value conversion fails under `resolve --bind`
pub fn run_cli(cli: Cli) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &RuntimeConfig::from_env(), &mut out)
}

pub(crate) fn execute(
    command: &Commands,
    config: &RuntimeConfig,
    out: &mut dyn Write,
) -> anyhow::Result<i32> {
    match command {
        Commands::Lint {
            routes,
            fail_on_error,
            errors_only,
            policy,
        } => {
            let report = load_manifest(routes)?.compile();
            let policy = policy.unwrap_or(config.reachability);

            for failure in &report.failures {
                writeln!(out, "❌ {failure}")?;
            }

            let mut diagnostics = report.table.validate(policy);
            if *errors_only {
                diagnostics.retain(|d| d.severity == Severity::Error);
            }
            write_diagnostics(out, &diagnostics)?;

            let error_count = report.failures.len()
                + diagnostics
                    .iter()
                    .filter(|d| d.severity == Severity::Error)
                    .count();
            if *fail_on_error && (!report.is_clean() || has_errors(&diagnostics)) {
                anyhow::bail!("route validation failed with {error_count} error(s)");
            }
            Ok(0)
        }
        Commands::Resolve { routes, bind: do_bind, args } => {
            let table = load_route_table(routes)?
                .with_slow_match_threshold(config.slow_match_threshold);

            match table.resolve(&args[..]) {
                Ok(matched) => {
                    let mut body = json!({
                        "matched": true,
                        "handler": matched.handler_name(),
                        "pattern": matched.route.display_pattern(),
                        "index": matched.index,
                        "specificity": matched.route.specificity,
                        "defaults_used": matched.defaults_used,
                        "values": matched.values,
                    });
                    if *do_bind {
                        let arguments = bind(&matched, &DefaultConverters::new())?;
                        body["arguments"] = serde_json::to_value(&arguments)?;
                    }
                    writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
                    Ok(0)
                }
                Err(no_match) => {
                    let body = json!({
                        "matched": false,
                        "message": no_match.message(),
                        "suggestions": no_match.suggestions,
                    });
                    writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
                    Ok(1)
                }
            }
        }
        Commands::Inspect { routes, json } => {
            let table = load_route_table(routes)?;
            if *json {
                write_routes_json(&table, out)?;
            } else {
                write_routes_table(&table, out)?;
            }
            Ok(0)
        }
    }
}

fn write_routes_json(table: &RouteTable, out: &mut dyn Write) -> anyhow::Result<()> {
    let routes: Vec<_> = table
        .routes()
        .iter()
        .enumerate()
        .map(|(index, route)| {
            json!({
                "index": index,
                "pattern": route.display_pattern(),
                "handler": &*route.handler_name,
                "specificity": route.specificity,
                "structure": validator::structure_signature(route).shape,
                "description": route.description,
            })
        })
        .collect();
    let rendered = serde_json::to_string_pretty(&routes).context("Failed to render routes")?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

fn write_routes_table(table: &RouteTable, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{:>4}  {:>11}  {:<24}  PATTERN", "#", "SPECIFICITY", "HANDLER")?;
    for (index, route) in table.routes().iter().enumerate() {
        writeln!(
            out,
            "{index:>4}  {:>11}  {:<24}  {}",
            route.specificity,
            route.handler_name,
            route.display_pattern()
        )?;
        if let Some(description) = &route.description {
            writeln!(out, "{:>45}{description}", "")?;
        }
    }
    writeln!(out, "\n{} route(s)", table.len())?;
    Ok(())
}
