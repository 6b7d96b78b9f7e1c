use chrono::TimeDelta;
use std::time::Duration;

/// Signed difference `a - b`, at millisecond resolution.
pub fn delta(a: Duration, b: Duration) -> TimeDelta {
    TimeDelta::milliseconds(a.as_millis() as i64 - b.as_millis() as i64)
}

/// `01:02:03` above an hour, `02:03` above a minute, `5.3` below.
pub fn format_time(d: Duration) -> String {
    let ms = d.as_millis();
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else if minutes > 0 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        format!("{}.{}", seconds, (ms % 1_000) / 100)
    }
}

pub fn format_opt(d: Option<Duration>) -> String {
    d.map(format_time).unwrap_or_else(|| "-".to_string())
}

/// Like [`format_time`] but always prefixed with its sign.
pub fn format_delta(d: TimeDelta) -> String {
    let sign = if d < TimeDelta::zero() { '-' } else { '+' };
    let magnitude = d.abs().to_std().unwrap_or_default();
    format!("{sign}{}", format_time(magnitude))
}

const GLYPH_ROWS: usize = 4;

fn glyph(c: char) -> [&'static str; GLYPH_ROWS] {
    match c {
        '0' => ["▄▀▀▄ ", "█  █ ", "█  █ ", " ▀▀  "],
        '1' => [" ▄█  ", "  █  ", "  █  ", " ▀▀▀ "],
        '2' => ["▄▀▀▄ ", "  ▄▀ ", "▄▀   ", "▀▀▀▀ "],
        '3' => ["▄▀▀▄ ", "  ▄▀ ", "▄  █ ", " ▀▀  "],
        '4' => ["▄  █ ", "█▄▄█ ", "   █ ", "   ▀ "],
        '5' => ["█▀▀▀ ", "█▄▄  ", "   █ ", "▀▀▀  "],
        '6' => ["▄▀▀  ", "█▄▄  ", "█  █ ", " ▀▀  "],
        '7' => ["▀▀▀█ ", "  ▐▌ ", "  █  ", "  ▀  "],
        '8' => ["▄▀▀▄ ", "▀▄▄▀ ", "█  █ ", " ▀▀  "],
        '9' => ["▄▀▀▄ ", "▀▄▄█ ", "   █ ", " ▀▀  "],
        ':' => ["  ", "▀ ", "▀ ", "  "],
        '.' => ["  ", "  ", "  ", "▀ "],
        _ => ["  ", "  ", "  ", "  "],
    }
}

/// Render `d` with a four-row block font.
pub fn big_timer(d: Duration) -> Vec<String> {
    let text = format_time(d);
    (0..GLYPH_ROWS)
        .map(|row| text.chars().map(|c| glyph(c)[row]).collect())
        .collect()
}
