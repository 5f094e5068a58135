//! Source definitions: how to discover artifacts for one distribution.
//!
//! The JSON document is read once at startup. Each element of `sources` is
//! deserialized and validated on its own so a mistake is reported with its
//! index and distribution name, and nothing touches the network until every
//! source is known to be well-formed.

use crate::error::ConfigError;
use crate::extract::Limit;
use crate::template::{placeholders, Context};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Mirror layout a source is crawled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Listing page links one directory per version.
    DatedDirectory,
    /// Listing page links the artifacts themselves.
    FlatListing,
    /// Fixed version list, no listing page.
    Static,
    /// Version directories, each with its own artifact listing.
    VersionedFlatListing,
}

/// A version-guarded substitution of templates and extra context.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub pattern: Regex,
    pub download_template: Option<String>,
    pub checksum_template: Option<String>,
    pub extra_context: Context,
}

#[derive(Debug, Deserialize)]
struct RawOverride {
    pattern: Option<String>,
    download_template: Option<String>,
    checksum_template: Option<String>,
    #[serde(default)]
    extra_context: Context,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    distribution: String,
    #[serde(rename = "type")]
    kind: String,
    strategy: Strategy,
    listing_url: Option<String>,
    version_regex: Option<String>,
    artifact_regex: Option<String>,
    sub_listing_template: Option<String>,
    download_template: Option<String>,
    checksum_template: Option<String>,
    checksum: Option<String>,
    #[serde(default)]
    overrides: Vec<RawOverride>,
    #[serde(default)]
    versions: Vec<String>,
    max_entries: Option<i64>,
    max_artifacts: Option<i64>,
}

/// Blank strings count as absent for required fields.
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// A validated source definition. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SourceDefinition {
    pub distribution: String,
    pub kind: String,
    pub strategy: Strategy,
    /// Empty only for `static` sources that do not set it.
    pub listing_url: String,
    pub version_regex: Option<Regex>,
    pub artifact_regex: Option<Regex>,
    pub sub_listing_template: Option<String>,
    pub download_template: Option<String>,
    pub checksum_template: Option<String>,
    /// Static checksum copied into every entry ("" when unknown).
    pub checksum: String,
    pub overrides: Vec<OverrideRule>,
    pub versions: Vec<String>,
    pub max_entries: Limit,
    pub max_artifacts: Limit,
}

impl SourceDefinition {
    /// First override (in declared order) whose pattern is found in `version`.
    pub fn override_for(&self, version: &str) -> Option<&OverrideRule> {
        self.overrides.iter().find(|rule| rule.pattern.is_match(version))
    }

    /// Parses one element of the `sources` array.
    pub fn from_value(index: usize, value: serde_json::Value) -> Result<Self, ConfigError> {
        let distribution = value
            .get("distribution")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown")
            .to_string();
        let raw: RawSource =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidSource {
                index,
                distribution: distribution.clone(),
                reason: e.to_string(),
            })?;
        Self::from_raw(index, raw)
    }

    fn from_raw(index: usize, raw: RawSource) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidSource {
            index,
            distribution: raw.distribution.clone(),
            reason,
        };

        let required: Vec<(&str, bool)> = match raw.strategy {
            Strategy::DatedDirectory => vec![
                ("listing_url", present(&raw.listing_url)),
                ("version_regex", present(&raw.version_regex)),
                ("download_template", present(&raw.download_template)),
            ],
            Strategy::FlatListing => vec![
                ("listing_url", present(&raw.listing_url)),
                ("artifact_regex", present(&raw.artifact_regex)),
            ],
            Strategy::Static => vec![("download_template", present(&raw.download_template))],
            Strategy::VersionedFlatListing => vec![
                ("listing_url", present(&raw.listing_url)),
                ("version_regex", present(&raw.version_regex)),
                ("sub_listing_template", present(&raw.sub_listing_template)),
                ("artifact_regex", present(&raw.artifact_regex)),
            ],
        };
        if let Some((field, _)) = required.iter().find(|(_, present)| !present) {
            return Err(invalid(format!(
                "strategy {:?} requires '{}'",
                raw.strategy, field
            )));
        }

        let templates = [
            ("sub_listing_template", raw.sub_listing_template.as_deref()),
            ("download_template", raw.download_template.as_deref()),
            ("checksum_template", raw.checksum_template.as_deref()),
        ]
        .into_iter()
        .chain(raw.overrides.iter().flat_map(|rule| {
            [
                ("overrides.download_template", rule.download_template.as_deref()),
                ("overrides.checksum_template", rule.checksum_template.as_deref()),
            ]
        }));
        for (field, template) in templates {
            if let Some(t) = template {
                placeholders(t).map_err(|e| invalid(format!("{field}: {e}")))?;
            }
        }

        let compile = |field: &str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ConfigError::Regex {
                distribution: raw.distribution.clone(),
                field: field.to_string(),
                source,
            })
        };

        let version_regex = raw
            .version_regex
            .as_deref()
            .map(|p| compile("version_regex", p))
            .transpose()?;
        let artifact_regex = raw
            .artifact_regex
            .as_deref()
            .map(|p| compile("artifact_regex", p))
            .transpose()?;

        let mut overrides = Vec::with_capacity(raw.overrides.len());
        for (i, rule) in raw.overrides.iter().enumerate() {
            // Rules without a pattern can never match.
            let Some(pattern) = rule.pattern.as_deref() else {
                tracing::debug!(
                    distribution = %raw.distribution,
                    "override #{} has no pattern, ignoring",
                    i
                );
                continue;
            };
            overrides.push(OverrideRule {
                pattern: compile(&format!("overrides[{i}].pattern"), pattern)?,
                download_template: rule.download_template.clone(),
                checksum_template: rule.checksum_template.clone(),
                extra_context: rule.extra_context.clone(),
            });
        }

        let max_artifacts = match raw.max_artifacts {
            None => Limit::from_config(Some(1)),
            some => Limit::from_config(some),
        };

        Ok(Self {
            listing_url: raw.listing_url.clone().unwrap_or_default(),
            version_regex,
            artifact_regex,
            overrides,
            max_entries: Limit::from_config(raw.max_entries),
            max_artifacts,
            distribution: raw.distribution,
            kind: raw.kind,
            strategy: raw.strategy,
            sub_listing_template: raw.sub_listing_template,
            download_template: raw.download_template,
            checksum_template: raw.checksum_template,
            checksum: raw.checksum.unwrap_or_default(),
            versions: raw.versions,
        })
    }
}

/// Parses a whole source configuration document.
pub fn parse_sources(text: &str, path: &Path) -> Result<Vec<SourceDefinition>, ConfigError> {
    let doc: serde_json::Value = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let sources = match doc {
        serde_json::Value::Object(mut map) => match map.remove("sources") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err(ConfigError::MissingSources),
        },
        _ => return Err(ConfigError::MissingSources),
    };
    sources
        .into_iter()
        .enumerate()
        .map(|(i, v)| SourceDefinition::from_value(i, v))
        .collect()
}

/// Loads and validates the source configuration at `path`.
pub fn load_sources(path: &Path) -> Result<Vec<SourceDefinition>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let sources = parse_sources(&text, path)?;
    tracing::debug!("loaded {} source(s) from {}", sources.len(), path.display());
    Ok(sources)
}
