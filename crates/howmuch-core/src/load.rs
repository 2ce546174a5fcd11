//! Table loading (requires "fetch" feature)
//!
//! The units and comparisons tables are read concurrently, each from a
//! local file or an http(s) URL. The catalog is built only once both reads
//! have completed. This module is kept out of WASM builds.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// Where a table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Path(PathBuf),
    Url(String),
}

/// Failure to load the catalog
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not load {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl FromStr for TableSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(TableSource::Url(s.to_string()))
        } else {
            Ok(TableSource::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Path(path) => write!(f, "{}", path.display()),
            TableSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Read the raw text of one table
pub async fn read_table(source: &TableSource) -> Result<String, LoadError> {
    match source {
        TableSource::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                })
        }
        TableSource::Url(url) => {
            let fetch_error = |source| LoadError::Fetch {
                url: url.clone(),
                source,
            };
            let response = reqwest::get(url).await.map_err(fetch_error)?;
            if !response.status().is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status: response.status().as_u16(),
                });
            }
            response.text().await.map_err(fetch_error)
        }
    }
}

/// Read both tables concurrently, then build the catalog
pub async fn load_catalog(
    units: &TableSource,
    comparisons: &TableSource,
) -> Result<Catalog, LoadError> {
    let (units, comparisons) = tokio::try_join!(read_table(units), read_table(comparisons))?;
    log::debug!(
        "loaded tables: {} bytes of units, {} bytes of comparisons",
        units.len(),
        comparisons.len()
    );
    Ok(Catalog::from_tsv(&units, &comparisons)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_table(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("howmuch-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!(
            "https://example.com/units.tsv".parse::<TableSource>().unwrap(),
            TableSource::Url("https://example.com/units.tsv".into())
        );
        assert_eq!(
            "data/units.tsv".parse::<TableSource>().unwrap(),
            TableSource::Path("data/units.tsv".into())
        );
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let units = temp_table(
            "units.tsv",
            "name\tsymbol\taliases\tequivalent_to\n\
             metre\tm\tmeter\t1 m\n\
             kilometre\tkm\t\t1000 m\n",
        );
        let comparisons = temp_table(
            "comparisons.tsv",
            "name\tequivalent_to\tdescription\n\
             a marathon\t42.195 km\tA long run\n",
        );

        let catalog = load_catalog(
            &TableSource::Path(units.clone()),
            &TableSource::Path(comparisons.clone()),
        )
        .await
        .unwrap();
        assert_eq!(catalog.units().len(), 2);
        assert_eq!(catalog.comparisons()[0].fundamental_unit, "m");

        let _ = std::fs::remove_file(units);
        let _ = std::fs::remove_file(comparisons);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let missing = TableSource::Path(std::env::temp_dir().join("howmuch-no-such-table.tsv"));
        let result = load_catalog(&missing, &missing).await;
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[tokio::test]
    async fn test_bad_table() {
        let units = temp_table("bad-units.tsv", "name\tequivalent_to\nleague\tthree miles\n");
        let comparisons = temp_table("bad-comparisons.tsv", "name\tequivalent_to\n");
        let result = load_catalog(&TableSource::Path(units.clone()), &TableSource::Path(comparisons.clone())).await;
        assert!(matches!(
            result,
            Err(LoadError::Catalog(CatalogError::MalformedEquivalent { .. }))
        ));
        let _ = std::fs::remove_file(units);
        let _ = std::fs::remove_file(comparisons);
    }
}
