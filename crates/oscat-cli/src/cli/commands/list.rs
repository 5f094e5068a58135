//! `oscat list` – show catalog entries grouped by distribution.

use anyhow::Result;
use oscat_core::catalog::{Catalog, CatalogEntry};
use oscat_core::url_model::local_filename;
use std::path::Path;

/// Distributions that pass both filters, each with its entries, in catalog order.
pub(crate) fn grouped<'a>(
    catalog: &'a Catalog,
    filter_name: Option<&str>,
    filter_type: Option<&str>,
) -> Vec<(&'a str, Vec<&'a CatalogEntry>)> {
    let name_needle = filter_name.map(str::to_lowercase);
    catalog
        .distribution_names()
        .into_iter()
        .filter(|name| {
            name_needle
                .as_deref()
                .map_or(true, |n| name.to_lowercase().contains(n))
        })
        .filter_map(|name| {
            let entries: Vec<&CatalogEntry> = catalog.entries_for(name).collect();
            let kind = entries.first()?.kind.as_str();
            if filter_type.is_some_and(|t| !t.eq_ignore_ascii_case(kind)) {
                return None;
            }
            Some((name, entries))
        })
        .collect()
}

pub fn run_list(
    catalog_path: &Path,
    filter_name: Option<&str>,
    filter_type: Option<&str>,
) -> Result<()> {
    let catalog = Catalog::load(catalog_path)?;
    let groups = grouped(&catalog, filter_name, filter_type);
    if groups.is_empty() {
        println!("No matching distributions.");
        return Ok(());
    }
    println!("{:<20} {:<10} {}", "DISTRIBUTION", "TYPE", "FILE");
    for (name, entries) in groups {
        for e in entries {
            let file = local_filename(&e.download_url).unwrap_or_else(|| e.download_url.clone());
            println!("{:<20} {:<10} {}", name, e.kind, file);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(distribution: &str, kind: &str) -> CatalogEntry {
        CatalogEntry {
            distribution: distribution.into(),
            kind: kind.into(),
            download_url: format!("https://m/{distribution}.iso"),
            checksum_url: String::new(),
            checksum: String::new(),
        }
    }

    #[test]
    fn filters_by_name_substring_and_exact_type() {
        let catalog = Catalog {
            distributions: vec![
                entry("Ubuntu", "linux"),
                entry("Kubuntu", "linux"),
                entry("Windows", "windows"),
            ],
        };
        let names = |g: Vec<(&str, Vec<&CatalogEntry>)>| {
            g.into_iter().map(|(n, _)| n.to_string()).collect::<Vec<_>>()
        };
        assert_eq!(
            names(grouped(&catalog, Some("UBUNTU"), None)),
            vec!["Ubuntu", "Kubuntu"]
        );
        assert_eq!(names(grouped(&catalog, None, Some("Windows"))), vec!["Windows"]);
        assert!(grouped(&catalog, Some("ubuntu"), Some("windows")).is_empty());
        assert_eq!(grouped(&catalog, None, None).len(), 3);
    }
}
