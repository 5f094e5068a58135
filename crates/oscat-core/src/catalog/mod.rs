//! The catalog document: `{"distributions": [CatalogEntry, ...]}`.

mod assemble;

pub use assemble::{assemble, AssembleOptions, CatalogReport, SourceWarning};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One resolved artifact. Empty `checksum_url` / `checksum` mean "unavailable".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub distribution: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: String,
    #[serde(default)]
    pub checksum_url: String,
    #[serde(default)]
    pub checksum: String,
}

impl CatalogEntry {
    pub fn checksum_url(&self) -> Option<&str> {
        Some(self.checksum_url.as_str()).filter(|s| !s.is_empty())
    }

    pub fn checksum(&self) -> Option<&str> {
        Some(self.checksum.as_str()).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub distributions: Vec<CatalogEntry>,
}

impl Catalog {
    /// Sorts by `(lowercased distribution, download_url)` for stable output.
    pub fn sort(&mut self) {
        self.distributions.sort_by(|a, b| {
            a.distribution
                .to_lowercase()
                .cmp(&b.distribution.to_lowercase())
                .then_with(|| a.download_url.cmp(&b.download_url))
        });
    }

    /// Serializes the catalog; the pretty form is indented and ends with a newline.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        if pretty {
            let mut out = serde_json::to_string_pretty(self)?;
            out.push('\n');
            Ok(out)
        } else {
            Ok(serde_json::to_string(self)?)
        }
    }

    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        let data = self.to_json(pretty)?;
        fs::write(path, data).with_context(|| format!("write {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("read catalog {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse catalog JSON: {}", path.display()))
    }

    /// Entries whose distribution equals `name`, ignoring case.
    pub fn entries_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.distributions
            .iter()
            .filter(move |e| e.distribution.eq_ignore_ascii_case(name))
    }

    /// Distinct distribution names in catalog order.
    pub fn distribution_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.distributions {
            if !names.contains(&entry.distribution.as_str()) {
                names.push(&entry.distribution);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(distribution: &str, url: &str) -> CatalogEntry {
        CatalogEntry {
            distribution: distribution.into(),
            kind: "linux".into(),
            download_url: url.into(),
            checksum_url: String::new(),
            checksum: String::new(),
        }
    }

    #[test]
    fn sort_is_case_insensitive_then_url() {
        let mut catalog = Catalog {
            distributions: vec![
                entry("ubuntu", "https://b/2.iso"),
                entry("Arch", "https://a/1.iso"),
                entry("Ubuntu", "https://b/1.iso"),
            ],
        };
        catalog.sort();
        let urls: Vec<_> = catalog
            .distributions
            .iter()
            .map(|e| e.download_url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://a/1.iso", "https://b/1.iso", "https://b/2.iso"]);
    }

    #[test]
    fn json_uses_type_key_and_pretty_newline() {
        let catalog = Catalog {
            distributions: vec![entry("Debian", "https://d/x.iso")],
        };
        let compact = catalog.to_json(false).unwrap();
        assert!(compact.starts_with(r#"{"distributions":[{"distribution":"Debian","type":"linux""#));
        assert!(!compact.ends_with('\n'));
        let pretty = catalog.to_json(true).unwrap();
        assert!(pretty.contains("\n  \"distributions\""));
        assert!(pretty.ends_with("}\n"));
    }

    #[test]
    fn load_tolerates_missing_checksum_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distributions.json");
        fs::write(
            &path,
            r#"{"distributions":[{"distribution":"Arch","type":"linux","download_url":"https://a/1.iso"}]}"#,
        )
        .unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.distributions[0].checksum_url(), None);
        assert_eq!(catalog.distributions[0].checksum(), None);
    }

    #[test]
    fn lookup_by_name_and_distinct_names() {
        let catalog = Catalog {
            distributions: vec![
                entry("Arch", "https://a/1.iso"),
                entry("Debian", "https://d/1.iso"),
                entry("Arch", "https://a/2.iso"),
            ],
        };
        assert_eq!(catalog.entries_for("arch").count(), 2);
        assert_eq!(catalog.distribution_names(), vec!["Arch", "Debian"]);
    }
}
