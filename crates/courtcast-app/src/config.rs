// Configuration loading and parsing (league.toml, strategy.toml).

use courtcast_core::league::{BlendTier, BlendTiers, CategoryWeights, LeagueConfig, ValuationTuning};
use courtcast_core::{Category, StatBasis, ValuationError};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to write default config {path}: {source}")]
    DefaultsWriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueSettings,
    pub strategy: StrategyConfig,
    pub data_paths: DataPaths,
    pub export: ExportConfig,
}

impl Config {
    /// The settings one valuation run needs, in the core's terms.
    pub fn valuation_config(&self) -> LeagueConfig {
        LeagueConfig {
            season: self.league.season.clone(),
            min_games: self.league.min_games,
            category_weights: self.strategy.weights,
            inflation_rate: self.strategy.inflation_rate,
            league_teams: self.league.num_teams,
            roster_size: self.league.roster_size,
            budget: self.league.budget,
            tuning: self.strategy.tuning.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueSettings {
    pub name: String,
    pub season: String,
    pub num_teams: usize,
    pub roster_size: usize,
    /// Auction budget per team.
    pub budget: u32,
    pub min_games: u32,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    #[serde(default)]
    category_weights: CategoryWeights,
    #[serde(default)]
    punt: PuntSection,
    #[serde(default)]
    inflation: InflationSection,
    #[serde(default)]
    blend: BlendSection,
    #[serde(default)]
    scoring: ScoringSection,
    data_paths: DataPaths,
    #[serde(default)]
    export: ExportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PuntSection {
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct InflationSection {
    #[serde(default)]
    rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct BlendSection {
    tiers: Vec<BlendTier>,
    fallback_weight: f64,
    rank_adp_weight: f64,
    adp_curve_exponent: f64,
    conserve_budget: bool,
}

impl Default for BlendSection {
    fn default() -> Self {
        let tuning = ValuationTuning::default();
        BlendSection {
            tiers: tuning.blend_tiers.tiers,
            fallback_weight: tuning.blend_tiers.fallback_weight,
            rank_adp_weight: tuning.rank_adp_weight,
            adp_curve_exponent: tuning.adp_curve_exponent,
            conserve_budget: tuning.conserve_blended_budget,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringSection {
    #[serde(default)]
    basis: StatBasis,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Category weights with punted categories already forced to 0.
    pub weights: CategoryWeights,
    pub punted: Vec<Category>,
    /// Percentage applied after blending (`15.0` = +15%).
    pub inflation_rate: f64,
    pub tuning: ValuationTuning,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
    /// Optional; without it every player keeps their statistical value.
    #[serde(default)]
    pub adp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: String,
    pub csv: bool,
    pub json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            dir: "exports".into(),
            csv: true,
            json: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, both relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: league_file.league,
        strategy: assemble_strategy(&strategy_file)?,
        data_paths: strategy_file.data_paths,
        export: strategy_file.export,
    };

    validate(&config)?;

    Ok(config)
}

/// Built-in defaults, written to `config/` when a file is missing.
const DEFAULT_FILES: [(&str, &str); 2] = [
    ("league.toml", include_str!("../defaults/league.toml")),
    ("strategy.toml", include_str!("../defaults/strategy.toml")),
];

/// Write any missing `config/league.toml` or `config/strategy.toml` from the
/// built-in defaults. Existing files are left untouched. Returns the paths
/// written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsWriteError {
        path: config_dir.clone(),
        source: e,
    })?;

    let mut written = Vec::new();
    for (file_name, contents) in DEFAULT_FILES {
        let target = config_dir.join(file_name);
        match write_new(&target, contents) {
            Ok(()) => {
                info!("wrote default {}", target.display());
                written.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsWriteError {
                    path: target,
                    source: e,
                })
            }
        }
    }
    Ok(written)
}

fn write_new(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(contents.as_bytes())
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Resolve the punt list and fold the strategy sections into core types.
fn assemble_strategy(file: &StrategyFile) -> Result<StrategyConfig, ConfigError> {
    let mut punted = Vec::with_capacity(file.punt.categories.len());
    for (i, key) in file.punt.categories.iter().enumerate() {
        let category = Category::from_key(key).ok_or_else(|| ConfigError::ValidationError {
            field: format!("punt.categories[{i}]"),
            message: format!("unknown category `{key}`"),
        })?;
        if !punted.contains(&category) {
            punted.push(category);
        }
    }

    let mut weights = file.category_weights;
    weights.punt(&punted);

    let tuning = ValuationTuning {
        blend_tiers: BlendTiers {
            tiers: file.blend.tiers.clone(),
            fallback_weight: file.blend.fallback_weight,
        },
        rank_adp_weight: file.blend.rank_adp_weight,
        adp_curve_exponent: file.blend.adp_curve_exponent,
        stat_basis: file.scoring.basis,
        conserve_blended_budget: file.blend.conserve_budget,
    };

    Ok(StrategyConfig {
        weights,
        punted,
        inflation_rate: file.inflation.rate,
        tuning,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    // League validations
    let league_fields: &[(&str, u64)] = &[
        ("league.num_teams", config.league.num_teams as u64),
        ("league.roster_size", config.league.roster_size as u64),
        ("league.budget", config.league.budget as u64),
    ];
    for (name, val) in league_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }

    if config.data_paths.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.players".into(),
            message: "must not be empty".into(),
        });
    }

    // Everything else is range-checked by the core, named by strategy.toml key.
    config
        .valuation_config()
        .validate()
        .map_err(|e| match e {
            ValuationError::InvalidConfig { field, message } => ConfigError::ValidationError {
                field: strategy_field(&field),
                message,
            },
            other => ConfigError::ValidationError {
                field: "strategy".into(),
                message: other.to_string(),
            },
        })
}

/// Map a core field path onto the strategy.toml key that sets it.
fn strategy_field(core_field: &str) -> String {
    if core_field == "inflation_rate" {
        return "inflation.rate".into();
    }
    if let Some(rest) = core_field.strip_prefix("tuning.blend_tiers.") {
        return format!("blend.{rest}");
    }
    if let Some(rest) = core_field.strip_prefix("tuning.") {
        return format!("blend.{rest}");
    }
    core_field.to_string()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
