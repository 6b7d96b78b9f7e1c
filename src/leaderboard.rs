//! Ranking of saved runs across players.
//!
//! Runs live in `<root>/<player>/…/<run>.json`. They are grouped by the
//! route they were timed against and ordered by total time. Runs with a
//! missing segment time are listed after the ranked ones.

use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};
use crate::run::{json_files, RunFile, PB_FILE};
use crate::util::format_opt;

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub rank: Option<usize>,
    pub player: String,
    pub name: String,
    pub total: Option<Duration>,
    pub updated: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub route: PathBuf,
    pub title: String,
    pub entries: Vec<Entry>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    route: &'a str,
    rank: Option<usize>,
    player: &'a str,
    run: &'a str,
    total_ms: Option<u64>,
    updated: String,
}

/// First directory below `root`, or `-` for runs saved directly in it.
fn player_of(root: &Path, path: &Path) -> String {
    let Ok(rel) = path.strip_prefix(root) else {
        return "-".to_string();
    };
    let mut parts = rel.components();
    match (parts.next(), parts.next()) {
        (Some(first), Some(_)) => first.as_os_str().to_string_lossy().into_owned(),
        _ => "-".to_string(),
    }
}

pub fn collect<P: AsRef<Path>>(root: P) -> Vec<Board> {
    let root = root.as_ref();
    let runs = json_files(root)
        .into_iter()
        .filter(|path| path.file_name().is_some_and(|name| name != PB_FILE))
        .filter_map(|path| match RunFile::load(&path) {
            Ok(run) => Some((player_of(root, &path), run)),
            Err(e) => {
                log::warn!("skipping run: {e}");
                None
            }
        });

    runs.into_group_map_by(|(_, run)| run.route_path())
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(route, runs)| {
            let title = runs
                .first()
                .and_then(|(_, run)| run.load_route().ok())
                .map(|r| r.title())
                .unwrap_or_else(|| route.display().to_string());
            Board {
                route,
                title,
                entries: rank(runs),
            }
        })
        .collect()
}

fn rank(runs: Vec<(String, RunFile)>) -> Vec<Entry> {
    runs.into_iter()
        .map(|(player, run)| Entry {
            rank: None,
            player,
            name: run.name(),
            total: run.total(),
            updated: run.updated.or(run.created),
        })
        .sorted_by(|a, b| match (a.total, b.total) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        })
        .enumerate()
        .map(|(idx, mut entry)| {
            if entry.total.is_some() {
                entry.rank = Some(idx + 1);
            }
            entry
        })
        .collect()
}

fn date(entry: &Entry) -> String {
    entry
        .updated
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

pub fn write_text<W: Write>(boards: &[Board], mut out: W) -> std::io::Result<()> {
    for board in boards {
        writeln!(out, "{}", board.title)?;
        let name_width = board
            .entries
            .iter()
            .map(|e| e.name.width())
            .max()
            .unwrap_or(0)
            .max(8);
        let player_width = board
            .entries
            .iter()
            .map(|e| e.player.width())
            .max()
            .unwrap_or(0)
            .max(6);

        writeln!(
            out,
            "  #  {}  {}  {:>10}  Date",
            pad("Run name", name_width),
            pad("Player", player_width),
            "Time"
        )?;
        for entry in &board.entries {
            let rank = entry.rank.map(|r| r.to_string()).unwrap_or_default();
            writeln!(
                out,
                "{rank:>3}  {}  {}  {:>10}  {}",
                pad(&entry.name, name_width),
                pad(&entry.player, player_width),
                format_opt(entry.total),
                date(entry)
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_csv<W: Write>(boards: &[Board], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for board in boards {
        for entry in &board.entries {
            wtr.serialize(CsvRow {
                route: &board.title,
                rank: entry.rank,
                player: &entry.player,
                run: &entry.name,
                total_ms: entry.total.map(|t| t.as_millis() as u64),
                updated: entry.updated.map(|d| d.to_rfc3339()).unwrap_or_default(),
            })?;
        }
    }
    wtr.flush().map_err(|e| Error::Csv(e.into()))
}
