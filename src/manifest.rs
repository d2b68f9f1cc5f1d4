//! # Route Manifests
//!
//! Loads route definitions from a YAML, JSON or TOML file, chosen by file
//! extension (`.yaml`/`.yml`, `.json`, `.toml`).
//!
//! ```yaml
//! routes:
//!   - pattern: "deploy {env} --force"
//!     handler: deploy
//!     description: Deploy to an environment
//! groups:
//!   - prefix: "docker compose"
//!     routes:
//!       - pattern: "up {service?}"
//!         handler: compose_up
//! ```
//!
//! Top-level routes come first, then each group's routes in file order. That
//! order is the registration order the resolver uses to break ties.

use crate::pattern::RouteDefinition;
use crate::router::{CompileReport, RouteTable};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A set of routes sharing a literal prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGroup {
    pub prefix: String,
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// Parsed manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteManifest {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
    #[serde(default)]
    pub groups: Vec<RouteGroup>,
}

/// Manifest file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
    Toml,
}

impl ManifestFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(ManifestFormat::Yaml),
            Some("json") => Ok(ManifestFormat::Json),
            Some("toml") => Ok(ManifestFormat::Toml),
            _ => bail!(
                "unsupported manifest extension for {} (expected .yaml, .yml, .json or .toml)",
                path.display()
            ),
        }
    }
}

impl RouteManifest {
    pub fn from_str_as(content: &str, format: ManifestFormat) -> anyhow::Result<Self> {
        let manifest: RouteManifest = match format {
            ManifestFormat::Yaml => serde_yaml::from_str(content)?,
            ManifestFormat::Json => serde_json::from_str(content)?,
            ManifestFormat::Toml => toml::from_str(content)?,
        };
        Ok(manifest)
    }

    /// Flatten into definitions in registration order, applying group prefixes.
    #[must_use]
    pub fn definitions(&self) -> Vec<RouteDefinition> {
        let grouped = self.groups.iter().flat_map(|group| {
            group.routes.iter().map(move |route| {
                let mut route = route.clone();
                route.group_prefix = Some(group.prefix.clone());
                route
            })
        });
        self.routes.iter().cloned().chain(grouped).collect()
    }

    /// Compile every definition, collecting failures.
    #[must_use]
    pub fn compile(&self) -> CompileReport {
        RouteTable::compile(&self.definitions())
    }
}

/// Load a manifest from disk.
pub fn load_manifest(path: impl AsRef<Path>) -> anyhow::Result<RouteManifest> {
    let path = path.as_ref();
    let format = ManifestFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route manifest: {}", path.display()))?;

    let manifest = RouteManifest::from_str_as(&content, format)
        .with_context(|| format!("Failed to parse route manifest: {}", path.display()))?;

    info!(
        path = %path.display(),
        format = ?format,
        routes = manifest.routes.len(),
        groups = manifest.groups.len(),
        "Route manifest loaded"
    );
    Ok(manifest)
}

/// Load and compile a manifest. Every compile failure is logged; the error
/// names the first one.
pub fn load_route_table(path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = path.as_ref();
    let report = load_manifest(path)?.compile();
    match report.failures.len() {
        0 => Ok(report.table),
        count => {
            let first = report.failures.first().map(ToString::to_string).unwrap_or_default();
            bail!(
                "{count} route(s) in {} failed to compile; first: {first}",
                path.display()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ManifestFormat::from_path(Path::new("r.YML")).unwrap(), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Path::new("r.json")).unwrap(), ManifestFormat::Json);
        assert_eq!(ManifestFormat::from_path(Path::new("r.toml")).unwrap(), ManifestFormat::Toml);
        assert!(ManifestFormat::from_path(Path::new("routes")).is_err());
    }

    #[test]
    fn test_group_prefix_applied_after_top_level() {
        let manifest = RouteManifest::from_str_as(
            r#"
groups:
  - prefix: "remote"
    routes:
      - pattern: "add {name}"
        handler: remote_add
routes:
  - pattern: "status"
    handler_name: status
"#,
            ManifestFormat::Yaml,
        )
        .unwrap();

        let definitions = manifest.definitions();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].handler_name, "status");
        assert_eq!(definitions[1].group_prefix.as_deref(), Some("remote"));
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let err = RouteManifest::from_str_as(r#"{"paths": []}"#, ManifestFormat::Json);
        assert!(err.is_err());
    }
}
