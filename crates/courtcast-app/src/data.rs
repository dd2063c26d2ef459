// Player stat and ADP data loading.
//
// Reads a per-game player CSV (one row per player, nine category columns plus
// optional shooting totals) and an ADP CSV, then re-keys ADP names onto the
// player table so the valuation engine can match them exactly.

use crate::config::{Config, DataPaths};
use courtcast_core::{AdpRecord, RawPlayerRecord, ShootingTotals, StatLine};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Everything the valuation engine reads, loaded and ready.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub players: Vec<RawPlayerRecord>,
    /// Names already re-keyed to the matching player's spelling.
    pub adp: Vec<AdpRecord>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Player CSV row. Games are f64 because some exports write `64.0`. Extra
/// columns are silently ignored via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawPlayerRow {
    #[serde(alias = "Player", alias = "PLAYER")]
    Name: String,
    #[serde(default, alias = "Tm", alias = "TEAM")]
    Team: String,
    #[serde(default, alias = "POS", alias = "Position")]
    Pos: String,
    #[serde(alias = "GP")]
    G: f64,
    PTS: f64,
    #[serde(alias = "TRB")]
    REB: f64,
    AST: f64,
    STL: f64,
    BLK: f64,
    #[serde(rename = "3PM", alias = "3P", alias = "FG3M")]
    ThreePM: f64,
    #[serde(rename = "FG%", alias = "FG_PCT")]
    FgPct: f64,
    #[serde(rename = "FT%", alias = "FT_PCT")]
    FtPct: f64,
    #[serde(alias = "TO")]
    TOV: f64,
    #[serde(default)]
    FGM: f64,
    #[serde(default)]
    FGA: f64,
    #[serde(default)]
    FTM: f64,
    #[serde(default)]
    FTA: f64,
    /// Absorb any extra columns the source includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawAdpRow {
    #[serde(alias = "Player", alias = "PLAYER")]
    Name: String,
    #[serde(alias = "AVG", alias = "Avg")]
    ADP: f64,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Accept both `0.475` and `47.5` spellings of a percentage.
fn as_fraction(pct: f64) -> f64 {
    if pct > 1.0 {
        pct / 100.0
    } else {
        pct
    }
}

/// Fold a player name to the key used for ADP matching: canonically
/// decomposed (NFD) with combining marks dropped, lowercase, `.` and `'`
/// removed, whitespace collapsed.
///
/// `"Nikola Jokić"`, `"nikola jokic"` and `" Nikola  Jokic "` share a key.
pub fn normalize_name(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        if matches!(c, '.' | '\'' | '\u{2019}') {
            continue;
        }
        match fold_base_letter(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.extend(c.to_lowercase()),
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Letters with no canonical decomposition that still read as a Latin base.
fn fold_base_letter(c: char) -> Option<&'static str> {
    match c {
        'Ł' | 'ł' => Some("l"),
        'Đ' | 'đ' => Some("d"),
        'Ø' | 'ø' => Some("o"),
        'ß' | 'ẞ' => Some("ss"),
        'ı' => Some("i"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

pub fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<RawPlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => {
                let name = raw.Name.trim().to_string();
                let values = [
                    raw.G, raw.PTS, raw.REB, raw.AST, raw.STL, raw.BLK, raw.ThreePM, raw.FgPct,
                    raw.FtPct, raw.TOV, raw.FGM, raw.FGA, raw.FTM, raw.FTA,
                ];
                if !all_finite(&values) {
                    warn!("skipping player '{}': non-finite stat value", name);
                    continue;
                }
                if raw.G < 0.0 {
                    warn!("skipping player '{}': negative games played", name);
                    continue;
                }
                players.push(RawPlayerRecord {
                    name,
                    team: raw.Team.trim().to_string(),
                    position: raw.Pos.trim().to_string(),
                    games: raw.G.round() as u32,
                    stats: StatLine {
                        points: raw.PTS,
                        rebounds: raw.REB,
                        assists: raw.AST,
                        steals: raw.STL,
                        blocks: raw.BLK,
                        threes: raw.ThreePM,
                        fg_pct: as_fraction(raw.FgPct),
                        ft_pct: as_fraction(raw.FtPct),
                        turnovers: raw.TOV,
                    },
                    shooting: ShootingTotals {
                        fgm: raw.FGM,
                        fga: raw.FGA,
                        ftm: raw.FTM,
                        fta: raw.FTA,
                    },
                });
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Rows come back in file order. Duplicates are kept; the valuation engine
/// decides which one wins.
pub fn load_adp_from_reader<R: Read>(rdr: R) -> Result<Vec<AdpRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawAdpRow>() {
        match result {
            Ok(raw) => {
                if !raw.ADP.is_finite() {
                    warn!("skipping ADP entry for '{}': non-finite value", raw.Name.trim());
                    continue;
                }
                records.push(AdpRecord {
                    name: raw.Name.trim().to_string(),
                    adp: raw.ADP,
                });
            }
            Err(e) => {
                warn!("skipping malformed ADP row: {}", e);
            }
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Name matching
// ---------------------------------------------------------------------------

/// Rewrite each ADP record's name to the spelling used in `players` when the
/// two normalize to the same key. Records with no match are left as-is.
pub fn match_adp_names(players: &[RawPlayerRecord], adp: Vec<AdpRecord>) -> Vec<AdpRecord> {
    let mut by_key: HashMap<String, &str> = HashMap::with_capacity(players.len());
    for player in players {
        let key = normalize_name(&player.name);
        if let Some(existing) = by_key.get(&key) {
            if *existing != player.name {
                warn!(
                    "players '{}' and '{}' share a name key; ADP matches the first",
                    existing, player.name
                );
            }
            continue;
        }
        by_key.insert(key, player.name.as_str());
    }

    let mut rekeyed = 0usize;
    let records: Vec<AdpRecord> = adp
        .into_iter()
        .map(|record| match by_key.get(&normalize_name(&record.name)) {
            Some(&player_name) if player_name != record.name => {
                debug!("ADP name '{}' matched to '{}'", record.name, player_name);
                rekeyed += 1;
                AdpRecord {
                    name: player_name.to_string(),
                    adp: record.adp,
                }
            }
            _ => record,
        })
        .collect();

    if rekeyed > 0 {
        info!("matched {} ADP names after normalization", rekeyed);
    }
    records
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load the player stat table from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<RawPlayerRecord>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load ADP records from a CSV file.
pub fn load_adp(path: &Path) -> Result<Vec<AdpRecord>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_adp_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load all input data using paths from the config.
pub fn load_all(config: &Config) -> Result<LoadedData, DataError> {
    load_all_from_paths(&config.data_paths)
}

/// Load all input data from explicit paths. Exposed for testing and flexibility.
pub fn load_all_from_paths(paths: &DataPaths) -> Result<LoadedData, DataError> {
    let players = load_players(Path::new(&paths.players))?;
    if players.is_empty() {
        return Err(DataError::Validation(
            "player CSV produced zero valid rows".into(),
        ));
    }

    let adp = match &paths.adp {
        Some(adp_path) => load_adp(Path::new(adp_path))?,
        None => {
            info!("no ADP file configured; valuations will be purely statistical");
            Vec::new()
        }
    };

    Ok(LoadedData {
        adp: match_adp_names(&players, adp),
        players,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
