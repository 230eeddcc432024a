// Slug directory: keeps the global list of subject slugs. The list is
// fetched from the catalog endpoint, merged from its three slug sources,
// and persisted to a flat file (one slug per line) so later runs can read
// it back without hitting the network.

use crate::api::{ApiClient, CatalogResponse};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Slug directory backed by a plain-text cache file in the user's home
/// directory.
pub struct SlugDirectory {
    cache_path: PathBuf,
}

impl SlugDirectory {
    pub fn new() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        SlugDirectory {
            cache_path: dir.join(".fiveable_slugs"),
        }
    }

    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        SlugDirectory { cache_path }
    }

    /// Refetch the catalog, rewrite the cache file, and return the freshly
    /// computed slug list. The returned list is what was just written, so
    /// callers on the cold path never need a second read.
    pub fn refresh(&self, api: &ApiClient) -> Result<Vec<String>> {
        let catalog = api.fetch_catalog()?;
        let slugs = collect_slugs(&catalog);
        self.write_cache(&slugs)?;
        Ok(slugs)
    }

    /// Return the cached slug list, line order preserved. Falls through to
    /// `refresh` when no cache file exists yet.
    pub fn load(&self, api: &ApiClient) -> Result<Vec<String>> {
        if !self.cache_path.exists() {
            println!("'{}' not found. Running initial fetch...", self.cache_path.display());
            return self.refresh(api);
        }
        let data = std::fs::read_to_string(&self.cache_path)
            .with_context(|| format!("Reading slug cache '{}'", self.cache_path.display()))?;
        Ok(data.lines().filter(|l| !l.is_empty()).map(str::to_string).collect())
    }

    fn write_cache(&self, slugs: &[String]) -> Result<()> {
        let mut body = String::new();
        for slug in slugs {
            body.push_str(slug);
            body.push('\n');
        }
        std::fs::write(&self.cache_path, body)
            .with_context(|| format!("Writing slug cache '{}'", self.cache_path.display()))?;
        Ok(())
    }
}

impl Default for SlugDirectory {
    fn default() -> Self {
        SlugDirectory::new()
    }
}

/// Merge the catalog's three slug sources into one deduplicated,
/// lexicographically sorted list. Entries without a slug are skipped.
fn collect_slugs(catalog: &CatalogResponse) -> Vec<String> {
    let mut all = BTreeSet::new();
    let props = &catalog.page_props;

    for branch in &props.subjects_by_category_branch {
        for subject in &branch.subjects {
            if let Some(slug) = &subject.slug {
                if !slug.is_empty() {
                    all.insert(slug.clone());
                }
            }
        }
    }
    for entry in props.stats.by_branch.iter().chain(&props.stats.by_sub_branch) {
        if let Some(slug) = &entry.slug {
            if !slug.is_empty() {
                all.insert(slug.clone());
            }
        }
    }

    all.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog_fixture() -> CatalogResponse {
        serde_json::from_value(json!({
            "pageProps": {
                "subjectsByCategoryBranch": [
                    {"subjects": [{"slug": "ap-calc"}, {"slug": "ap-bio"}]},
                    {"subjects": [{"slug": "ap-calc"}, {"name": "no slug here"}]},
                    {}
                ],
                "stats": {
                    "countSubjectsByCategoryBranch": [{"slug": "ap-chem"}, {"slug": ""}],
                    "countSubjectsByCategorySubBranch": [{"slug": "ap-bio"}, {}]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn merges_dedupes_and_sorts_all_three_sources() {
        let slugs = collect_slugs(&catalog_fixture());
        assert_eq!(slugs, vec!["ap-bio", "ap-calc", "ap-chem"]);
    }

    #[test]
    fn catalog_missing_container_keys_is_a_parse_error() {
        let result: Result<CatalogResponse, _> =
            serde_json::from_value(json!({"pageProps": {"stats": {}}}));
        assert!(result.is_err());
    }

    #[test]
    fn cache_file_is_one_slug_per_line_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let directory = SlugDirectory::with_cache_path(dir.path().join("slugs.txt"));
        let slugs = collect_slugs(&catalog_fixture());

        directory.write_cache(&slugs).unwrap();
        let first = std::fs::read(dir.path().join("slugs.txt")).unwrap();
        assert_eq!(first, b"ap-bio\nap-calc\nap-chem\n");

        // Same input, byte-identical output.
        directory.write_cache(&slugs).unwrap();
        let second = std::fs::read(dir.path().join("slugs.txt")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn load_reads_existing_cache_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slugs.txt");
        std::fs::write(&path, "ap-calc\nap-bio\n").unwrap();

        let directory = SlugDirectory::with_cache_path(path);
        let api = ApiClient::from_env().unwrap();
        // Order preserved as stored, no re-sorting on read.
        assert_eq!(directory.load(&api).unwrap(), vec!["ap-calc", "ap-bio"]);
    }
}
