// Courtcast entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config (copying defaults on first run)
// 3. Load player stats and ADP
// 4. Compute valuations
// 5. Log warnings and the top of the board
// 6. Export CSV / JSON

use courtcast_app::config;
use courtcast_app::data;
use courtcast_app::export;
use courtcast_core::{compute_valuations, ValuationReport, ValuationWarning};

use anyhow::Context;
use tracing::{info, warn};

/// Players listed in the startup log.
const BOARD_PREVIEW: usize = 15;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Courtcast starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, season {}, {} teams x {} roster spots, ${} budget",
        config.league.name,
        config.league.season,
        config.league.num_teams,
        config.league.roster_size,
        config.league.budget
    );
    if !config.strategy.punted.is_empty() {
        let punted: Vec<&str> = config.strategy.punted.iter().map(|c| c.label()).collect();
        info!("Punting: {}", punted.join(", "));
    }

    // 3. Load data
    let loaded = data::load_all(&config).context("failed to load player data")?;
    info!(
        "Loaded {} players, {} ADP records",
        loaded.players.len(),
        loaded.adp.len()
    );

    // 4. Compute valuations
    let league = config.valuation_config();
    let report = compute_valuations(&loaded.players, &loaded.adp, &league)
        .context("failed to compute valuations")?;

    // 5. Report
    log_warnings(&report);
    log_board(&report);

    // 6. Export
    let today = chrono::Local::now().date_naive();
    let written = export::export_board(&report.players, &config.export, today)
        .context("failed to export valuations")?;
    if written.is_empty() {
        info!("Export disabled; nothing written");
    }

    info!("Courtcast finished");
    Ok(())
}

/// Summarize non-fatal warnings. Each one was already logged where it arose;
/// this gives the totals in one place.
fn log_warnings(report: &ValuationReport) {
    let unmatched = report
        .warnings
        .iter()
        .filter(|w| matches!(w, ValuationWarning::UnmatchedAdp { .. }))
        .count();
    let other: Vec<&ValuationWarning> = report
        .warnings
        .iter()
        .filter(|w| !matches!(w, ValuationWarning::UnmatchedAdp { .. }))
        .collect();

    if unmatched > 0 {
        warn!("{} eligible players had no ADP match", unmatched);
    }
    for w in other {
        warn!("{}", w);
    }
}

fn log_board(report: &ValuationReport) {
    let s = &report.summary;
    info!(
        "Pool: {} eligible, {} draftable, replacement {:.3}, ${:.4}/VAR, ${} of ${} assigned",
        s.eligible_count,
        s.draftable_count,
        s.replacement_level,
        s.dollars_per_var,
        s.stat_dollars_spent,
        s.total_budget
    );
    info!(
        "Final values: ${} across the top {} (blend scale {:.3})",
        s.final_dollars_spent, s.draftable_count, s.blend_scale
    );
    for p in report.players.iter().take(BOARD_PREVIEW) {
        let adp = p
            .adp_rank
            .map(|r| format!("ADP #{r}"))
            .unwrap_or_else(|| "no ADP".into());
        info!(
            "{:>3}. {:<28} {:<4} {:<4} ${:>3} (stat ${}, {}, blend #{})",
            p.value_rank, p.name, p.team, p.position_group, p.final_value, p.stat_value, adp, p.blend_rank
        );
    }
}

/// Initialize tracing to stderr so exported files and stdout stay clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("courtcast=info,courtcast_app=info,courtcast_core=info,warn")
        }))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
