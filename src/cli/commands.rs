use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::bot::Bot;
use crate::catalog::{Catalog, CatalogSource, FileCatalog, load_or_empty};
use crate::config::BotConfig;
use crate::emit::SuggestionReport;
use crate::emit::structured::{emit_json, emit_yaml};
use crate::emit::text::emit_text;
use crate::matcher::{normalize, rank};
use crate::session::{Engine, SessionStore};
use crate::transport::console::run_console;
use crate::transport::telegram::{ClientConfig, PollOptions, TelegramBot, TelegramClient};

/// Options for the `suggest` command.
pub struct SuggestOptions {
    pub catalog: PathBuf,
    pub format: String,
    pub limit: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("recipes.json"),
            format: "text".to_owned(),
            limit: None,
            seed: None,
        }
    }
}

impl SuggestOptions {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Load a catalog, failing on any read or parse error.
fn load_strict(path: &Path) -> Result<Catalog, String> {
    FileCatalog::new(path)
        .load()
        .map_err(|e| e.to_string())
}

/// Run the `suggest` command: rank the catalog against one ingredient list.
///
/// # Errors
///
/// Returns an error string if the catalog cannot be loaded, the format is
/// unknown, or emitting fails.
pub fn run_suggest(ingredients: &str, options: &SuggestOptions) -> Result<String, String> {
    if options.limit == Some(0) {
        return Err("--limit must be at least 1".to_owned());
    }
    let catalog = load_strict(&options.catalog)?;
    let set = normalize(ingredients);
    if set.is_empty() {
        return Err("no ingredients given".to_owned());
    }

    let matches = rank(&set, &catalog, &mut options.rng());
    let report = SuggestionReport::new(&set, &matches, options.limit);

    match options.format.as_str() {
        "text" => Ok(emit_text(&report)),
        "json" => emit_json(&report),
        "yaml" => emit_yaml(&report),
        other => Err(format!(
            "unknown format '{other}' (expected: text, json, yaml)"
        )),
    }
}

/// Run the `validate` command: load a catalog strictly and report its size.
///
/// # Errors
///
/// Returns an error string if the catalog cannot be read or parsed.
pub fn run_validate(catalog: &Path) -> Result<String, String> {
    let loaded = load_strict(catalog)?;
    Ok(format!(
        "{}: catalog is valid ({} recipes, {} distinct ingredients)",
        catalog.display(),
        loaded.len(),
        loaded.distinct_ingredients(),
    ))
}

/// Build the effective config from an optional file plus command-line overrides.
///
/// # Errors
///
/// Returns an error string if the config file cannot be loaded.
pub fn resolve_config(
    config: Option<&Path>,
    catalog: Option<PathBuf>,
    channel: Option<String>,
) -> Result<BotConfig, String> {
    let mut resolved = match config {
        Some(path) => BotConfig::load(path).map_err(|e| e.to_string())?,
        None => BotConfig::default(),
    };
    if let Some(catalog) = catalog {
        resolved.catalog = catalog;
    }
    if channel.is_some() {
        resolved.channel = channel;
    }
    Ok(resolved)
}

fn load_bot_catalog(config: &BotConfig) -> Arc<Catalog> {
    Arc::new(load_or_empty(&FileCatalog::new(&config.catalog)))
}

/// Run the `chat` command: an interactive console conversation.
///
/// # Errors
///
/// Returns an error string if reading input or writing output fails.
pub fn run_chat<I: BufRead, W: Write>(
    config: &BotConfig,
    seed: Option<u64>,
    input: I,
    output: &mut W,
) -> Result<String, String> {
    let catalog = load_bot_catalog(config);
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut bot = Bot::with_engine(
        Engine::with_rng(catalog, rng),
        SessionStore::new(config.store_limits()),
    );

    let handled = run_console(&mut bot, &config.render_options(), input, output)
        .map_err(|e| format!("console I/O failed: {e}"))?;
    Ok(format!("chat ended after {handled} messages"))
}

/// Run the `telegram` command: long-poll the Bot API until killed.
///
/// # Errors
///
/// Returns an error string if the token is empty.
pub fn run_telegram(config: &BotConfig, token: &str) -> Result<String, String> {
    if token.trim().is_empty() {
        return Err("telegram token is empty".to_owned());
    }

    let catalog = load_bot_catalog(config);
    let poll = PollOptions {
        poll_timeout: Duration::from_secs(config.telegram.poll_timeout_secs),
        retry_delay: Duration::from_secs(config.telegram.retry_delay_secs),
    };
    let client = TelegramClient::new(
        token,
        &ClientConfig {
            api_base: config.telegram.api_base.clone(),
            ..ClientConfig::default()
        },
        poll.poll_timeout,
    );

    info!(catalog = %config.catalog.display(), "starting telegram transport");
    let mut telegram = TelegramBot::new(
        client,
        Bot::new(catalog, config.store_limits()),
        config.render_options(),
        poll,
    );
    telegram.run();
    Ok("telegram transport stopped".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"{
        "Omelette": { "ingredients": ["egg", "salt"], "instructions": "Whisk and fry." },
        "Salad": { "ingredients": ["tomato", "salt"], "instructions": "Chop and toss." }
    }"#;

    fn catalog_file() -> NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("create temp catalog");
        std::fs::write(file.path(), CATALOG).expect("write temp catalog");
        file
    }

    fn options(file: &NamedTempFile, format: &str) -> SuggestOptions {
        SuggestOptions {
            catalog: file.path().to_owned(),
            format: format.to_owned(),
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn suggest_ranks_text() {
        let file = catalog_file();
        let out = run_suggest("egg, salt", &options(&file, "text")).unwrap();
        let omelette = out.find("1. Omelette").expect("omelette first");
        let salad = out.find("2. Salad").expect("salad second");
        assert!(omelette < salad);
    }

    #[test]
    fn suggest_rejects_unknown_format() {
        let file = catalog_file();
        let err = run_suggest("egg", &options(&file, "xml")).unwrap_err();
        assert!(err.contains("unknown format 'xml'"));
    }

    #[test]
    fn suggest_rejects_empty_ingredients() {
        let file = catalog_file();
        let err = run_suggest(" , and ", &options(&file, "text")).unwrap_err();
        assert_eq!(err, "no ingredients given");
    }

    #[test]
    fn suggest_rejects_zero_limit() {
        let file = catalog_file();
        let mut opts = options(&file, "text");
        opts.limit = Some(0);
        assert!(run_suggest("egg", &opts).is_err());
    }

    #[test]
    fn resolve_config_applies_overrides() {
        let config = resolve_config(None, Some("other.yaml".into()), Some("@cooks".into())).unwrap();
        assert_eq!(config.catalog, PathBuf::from("other.yaml"));
        assert_eq!(config.channel.as_deref(), Some("@cooks"));
        assert_eq!(config.suggestion_window, 3);
    }

    #[test]
    fn resolve_config_reports_missing_file() {
        let err = resolve_config(Some(Path::new("/nonexistent/pantry.yaml")), None, None)
            .unwrap_err();
        assert!(err.contains("/nonexistent/pantry.yaml"));
    }

    #[test]
    fn chat_runs_console_session() {
        let file = catalog_file();
        let config = resolve_config(None, Some(file.path().to_owned()), None).unwrap();
        let mut out = Vec::new();
        let summary = run_chat(&config, Some(1), Cursor::new("egg\n1\n"), &mut out).unwrap();
        assert_eq!(summary, "chat ended after 2 messages");
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("🍴 Omelette"));
    }

    #[test]
    fn chat_with_missing_catalog_still_runs() {
        let config = resolve_config(None, Some("/nonexistent/recipes.json".into()), None).unwrap();
        let mut out = Vec::new();
        run_chat(&config, None, Cursor::new("egg\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("nothing to suggest"));
    }

    #[test]
    fn telegram_requires_token() {
        let err = run_telegram(&BotConfig::default(), "  ").unwrap_err();
        assert_eq!(err, "telegram token is empty");
    }
}
