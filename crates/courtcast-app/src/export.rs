// Writing the valuation board to CSV and JSON.

use crate::config::ExportConfig;
use chrono::NaiveDate;
use courtcast_core::{Category, PlayerValuation};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Flat CSV row
// ---------------------------------------------------------------------------

/// One CSV line per player. Missing ADP data is written as an empty cell.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    value_rank: u32,
    blend_rank: u32,
    adp_rank: Option<u32>,
    name: &'a str,
    team: &'a str,
    position: &'a str,
    position_group: &'static str,
    games: u32,
    pts: f64,
    reb: f64,
    ast: f64,
    stl: f64,
    blk: f64,
    #[serde(rename = "3pm")]
    threes: f64,
    fg_pct: f64,
    ft_pct: f64,
    tov: f64,
    z_points: f64,
    z_rebounds: f64,
    z_assists: f64,
    z_steals: f64,
    z_blocks: f64,
    z_threes: f64,
    z_fg_pct: f64,
    z_ft_pct: f64,
    z_turnovers: f64,
    total_score: f64,
    var: f64,
    stat_value: u32,
    adp: Option<f64>,
    adp_value: Option<u32>,
    blend_weight: f64,
    final_value: u32,
}

impl<'a> From<&'a PlayerValuation> for ExportRow<'a> {
    fn from(p: &'a PlayerValuation) -> Self {
        let z = |category: Category| p.category_scores.get(category).standardized;
        ExportRow {
            value_rank: p.value_rank,
            blend_rank: p.blend_rank,
            adp_rank: p.adp_rank,
            name: &p.name,
            team: &p.team,
            position: &p.position,
            position_group: p.position_group.label(),
            games: p.games,
            pts: p.stats.points,
            reb: p.stats.rebounds,
            ast: p.stats.assists,
            stl: p.stats.steals,
            blk: p.stats.blocks,
            threes: p.stats.threes,
            fg_pct: p.stats.fg_pct,
            ft_pct: p.stats.ft_pct,
            tov: p.stats.turnovers,
            z_points: z(Category::Points),
            z_rebounds: z(Category::Rebounds),
            z_assists: z(Category::Assists),
            z_steals: z(Category::Steals),
            z_blocks: z(Category::Blocks),
            z_threes: z(Category::Threes),
            z_fg_pct: z(Category::FieldGoalPct),
            z_ft_pct: z(Category::FreeThrowPct),
            z_turnovers: z(Category::Turnovers),
            total_score: p.total_score,
            var: p.var,
            stat_value: p.stat_value,
            adp: p.adp,
            adp_value: p.adp_value,
            blend_weight: p.blend_weight,
            final_value: p.final_value,
        }
    }
}

// ---------------------------------------------------------------------------
// Writer-based exporters (enable testing without temp files)
// ---------------------------------------------------------------------------

pub fn write_csv_to<W: Write>(players: &[PlayerValuation], wtr: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    for player in players {
        writer.serialize(ExportRow::from(player))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json_to<W: Write>(
    players: &[PlayerValuation],
    wtr: W,
) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(wtr, players)
}

// ---------------------------------------------------------------------------
// Path-based export
// ---------------------------------------------------------------------------

/// `courtcast_values_YYYYMMDD`, without extension.
pub fn file_stem(date: NaiveDate) -> String {
    format!("courtcast_values_{}", date.format("%Y%m%d"))
}

/// Write the enabled export formats into `config.dir`, creating it if needed.
/// Returns the paths written, CSV first.
pub fn export_board(
    players: &[PlayerValuation],
    config: &ExportConfig,
    date: NaiveDate,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = Path::new(&config.dir);
    if config.csv || config.json {
        std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    let stem = file_stem(date);
    let mut written = Vec::new();

    if config.csv {
        let path = dir.join(format!("{stem}.csv"));
        let file = create_file(&path)?;
        write_csv_to(players, file).map_err(|e| ExportError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        info!("wrote {} rows to {}", players.len(), path.display());
        written.push(path);
    }

    if config.json {
        let path = dir.join(format!("{stem}.json"));
        let mut out = std::io::BufWriter::new(create_file(&path)?);
        write_json_to(players, &mut out).map_err(|e| ExportError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        out.flush().map_err(|e| ExportError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        info!("wrote {} players to {}", players.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

fn create_file(path: &Path) -> Result<std::fs::File, ExportError> {
    std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
