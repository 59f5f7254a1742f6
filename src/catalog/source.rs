use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::catalog::{Catalog, Recipe};

/// Errors from loading a catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(
        "unsupported catalog format for {} (expected .json, .yaml or .yml)",
        .path.display()
    )]
    UnsupportedFormat { path: PathBuf },
}

/// Anything that can produce a catalog at startup.
pub trait CatalogSource {
    /// Short description used in log lines (e.g. a file path).
    fn describe(&self) -> String;

    /// Load and validate the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the source is missing or malformed.
    fn load(&self) -> Result<Catalog, CatalogError>;
}

/// On-disk shape of one recipe: `{ "ingredients": [...], "instructions": "..." }`.
#[derive(Debug, Deserialize)]
struct RecipeRecord {
    ingredients: Vec<String>,
    #[serde(default)]
    instructions: String,
}

type CatalogDocument = BTreeMap<String, RecipeRecord>;

/// Supported file encodings, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// `.json` is JSON, `.yaml` / `.yml` are YAML, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedFormat`] for any other extension,
    /// or none.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            _ => Err(CatalogError::UnsupportedFormat {
                path: path.to_owned(),
            }),
        }
    }
}

/// A catalog stored in a JSON or YAML file keyed by recipe name.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalog {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Catalog, CatalogError> {
        let format = CatalogFormat::from_path(&self.path)?;
        let text = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;

        match format {
            CatalogFormat::Json => parse_json(&text),
            CatalogFormat::Yaml => parse_yaml(&text),
        }
    }
}

/// Parse a JSON catalog document.
///
/// # Errors
///
/// Returns [`CatalogError::Json`] if the text is not a valid catalog object.
pub fn parse_json(text: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_str(text)?;
    Ok(build(document))
}

/// Parse a YAML catalog document.
///
/// # Errors
///
/// Returns [`CatalogError::Yaml`] if the text is not a valid catalog mapping.
pub fn parse_yaml(text: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_yaml::from_str(text)?;
    Ok(build(document))
}

fn build(document: CatalogDocument) -> Catalog {
    Catalog::from_recipes(
        document
            .into_iter()
            .map(|(name, record)| Recipe::new(name, record.ingredients, record.instructions)),
    )
}

/// Load a catalog, falling back to an empty one if the source fails.
///
/// The failure is logged; the caller keeps running in degraded mode.
pub fn load_or_empty(source: &dyn CatalogSource) -> Catalog {
    match source.load() {
        Ok(catalog) => {
            info!(
                source = %source.describe(),
                recipes = catalog.len(),
                "catalog loaded"
            );
            catalog
        }
        Err(e) => {
            error!(
                source = %source.describe(),
                error = %e,
                "catalog unavailable, continuing with an empty catalog"
            );
            Catalog::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON: &str = r#"{
        "Omelette": { "ingredients": ["Egg", "Salt"], "instructions": "Whisk and fry." },
        "Salad": { "ingredients": ["tomato", "salt"], "instructions": "Chop and toss." }
    }"#;

    const YAML: &str = "\
Omelette:
  ingredients: [Egg, Salt]
  instructions: Whisk and fry.
Salad:
  ingredients:
    - tomato
    - salt
";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn parse_json_builds_catalog() {
        let catalog = parse_json(JSON).unwrap();
        assert_eq!(catalog.len(), 2);
        let omelette = catalog.get("Omelette").unwrap();
        assert_eq!(omelette.ingredients(), &["Egg", "Salt"]);
        assert_eq!(omelette.instructions(), "Whisk and fry.");
        assert!(omelette.tokens().contains("egg"));
    }

    #[test]
    fn parse_yaml_defaults_missing_instructions() {
        let catalog = parse_yaml(YAML).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Salad").unwrap().instructions(), "");
    }

    #[test]
    fn parse_json_rejects_malformed_input() {
        let err = parse_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn parse_json_rejects_wrong_shape() {
        let err = parse_json(r#"{"Omelette": {"instructions": "no ingredients"}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn format_is_picked_by_extension() {
        let format = |p: &str| CatalogFormat::from_path(Path::new(p)).unwrap();
        assert_eq!(format("r.json"), CatalogFormat::Json);
        assert_eq!(format("r.JSON"), CatalogFormat::Json);
        assert_eq!(format("r.YAML"), CatalogFormat::Yaml);
        assert_eq!(format("r.yml"), CatalogFormat::Yaml);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        for path in ["recipes", "recipes.txt", "recipes.toml"] {
            let err = CatalogFormat::from_path(Path::new(path)).unwrap_err();
            assert!(matches!(err, CatalogError::UnsupportedFormat { .. }));
            assert!(err.to_string().contains(path));
        }
    }

    #[test]
    fn file_catalog_rejects_unsupported_format() {
        let file = write_temp(".txt", JSON);
        let err = FileCatalog::new(file.path()).load().unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat { .. }));
        assert!(load_or_empty(&FileCatalog::new(file.path())).is_empty());
    }

    #[test]
    fn file_catalog_loads_json_and_yaml() {
        let json = write_temp(".json", JSON);
        let yaml = write_temp(".yaml", YAML);
        assert_eq!(FileCatalog::new(json.path()).load().unwrap().len(), 2);
        assert_eq!(FileCatalog::new(yaml.path()).load().unwrap().len(), 2);
    }

    #[test]
    fn file_catalog_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileCatalog::new(dir.path().join("recipes.json"));
        let err = source.load().unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("recipes.json"));
    }

    #[test]
    fn load_or_empty_degrades_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileCatalog::new(dir.path().join("missing.json"));
        assert!(load_or_empty(&source).is_empty());
    }

    #[test]
    fn load_or_empty_degrades_on_malformed_file() {
        let file = write_temp(".json", "[1, 2, 3]");
        assert!(load_or_empty(&FileCatalog::new(file.path())).is_empty());
    }

    #[test]
    fn load_or_empty_returns_loaded_catalog() {
        let file = write_temp(".json", JSON);
        assert_eq!(load_or_empty(&FileCatalog::new(file.path())).len(), 2);
    }
}
