//! # CLI Module
//!
//! Command-line access to route manifests.
//!
//! ## Commands
//!
//! ### `lint`
//!
//! Compile a manifest and run the route-set validator:
//!
//! ```bash
//! argvrouter lint --routes routes.yaml --fail-on-error
//! ```
//!
//! Options:
//! - `--routes <FILE>` - Route manifest, `.yaml`/`.yml`/`.json`/`.toml` (required)
//! - `--fail-on-error` - Exit non-zero when any error is found
//! - `--errors-only` - Hide warnings and info
//! - `--policy <POLICY>` - `specificity-order` (default) or `exact-first`
//!
//! ### `resolve`
//!
//! Resolve an argument vector and print the winning route as JSON:
//!
//! ```bash
//! argvrouter resolve --routes routes.yaml --bind -- deploy prod --force
//! ```
//!
//! Exits with code 1 and prints suggestions when nothing matches.
//!
//! ### `inspect`
//!
//! List compiled routes with their specificity:
//!
//! ```bash
//! argvrouter inspect --routes routes.yaml --json
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use argvrouter::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! std::process::exit(run_cli(cli)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
