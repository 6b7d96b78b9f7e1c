use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    command::Command,
    engine::Standing,
    segment::{SegmentDef, Status},
    snapshot::{SegmentView, Snapshot},
    util::{big_timer, format_delta, format_opt, format_time},
};

const HORIZONTAL_MARGIN: u16 = 1;
const HEADER_HEIGHT: u16 = 6;
const FOOTER_HEIGHT: u16 = 4;
const TOTALS_WIDTH: u16 = 24;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.snapshot();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        render_header(self, &snap, chunks[0], buf);
        render_segments(self, &snap, chunks[1], buf);
        render_footer(self, chunks[2], buf);
    }
}

fn standing_style(standing: Standing) -> Style {
    let color = match standing {
        Standing::Idle => Color::White,
        Standing::Paused => Color::Blue,
        Standing::Ahead => Color::Green,
        Standing::Behind => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Normal => Style::default(),
        Status::Gold => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Status::AheadGain => Style::default().fg(Color::Green),
        Status::AheadLoss => Style::default().fg(Color::LightGreen),
        Status::BehindGain => Style::default().fg(Color::LightRed),
        Status::BehindLoss => Style::default().fg(Color::Red),
    }
}

fn render_header(app: &App, snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", app.route.title()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    let timer = big_timer(snap.elapsed);
    let timer_width = timer.iter().map(|row| row.width()).max().unwrap_or(0) as u16;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(TOTALS_WIDTH),
            Constraint::Min(1),
            Constraint::Length(timer_width),
        ])
        .split(inner);

    let dim = Style::default().add_modifier(Modifier::DIM);
    let totals = vec![
        Line::from(vec![
            Span::styled("Sum of Best    ", dim),
            Span::raw(format_time(snap.totals.sum_of_best)),
        ]),
        Line::from(vec![
            Span::styled("Best Possible  ", dim),
            Span::raw(format_time(snap.totals.best_possible)),
        ]),
    ];
    Paragraph::new(totals).render(columns[0], buf);

    let pb_date = app
        .pb
        .created
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string());
    let reference = vec![
        Line::from(vec![
            Span::styled("PB ", dim),
            Span::raw(format_time(snap.totals.pb_total)),
            Span::styled(format!("  set {pb_date}"), dim),
        ]),
        Line::from(Span::styled(
            snap.state.to_string(),
            standing_style(snap.standing),
        )),
    ];
    Paragraph::new(reference)
        .alignment(Alignment::Center)
        .render(columns[1], buf);

    let style = standing_style(snap.standing);
    let rows: Vec<Line> = timer
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect();
    Paragraph::new(rows)
        .alignment(Alignment::Right)
        .render(columns[2], buf);
}

/// Alternate plain and highlighted text at every `|`.
fn description_line(text: &str) -> Line<'static> {
    let highlight = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    Line::from(
        text.split('|')
            .enumerate()
            .filter(|(_, part)| !part.is_empty())
            .map(|(idx, part)| {
                if idx % 2 == 1 {
                    Span::styled(part.to_string(), highlight)
                } else {
                    Span::raw(part.to_string())
                }
            })
            .collect::<Vec<_>>(),
    )
}

fn segment_row(def: &SegmentDef, view: &SegmentView, show_ids: bool) -> Row<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut name_style = Style::default();
    if let Some(color) = def.color.as_deref().and_then(|c| c.parse::<Color>().ok()) {
        name_style = name_style.fg(color);
    }
    if view.active {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }
    let mut name = vec![Line::from(Span::styled(def.name.clone(), name_style))];
    if show_ids {
        name.push(Line::from(Span::styled(def.id.clone(), dim)));
    }
    if !def.description.is_empty() {
        name.push(description_line(&def.description));
    }

    let mut stats = Vec::new();
    let stat_lines = def.stat_lines();
    if !stat_lines.is_empty() {
        stats.push(Line::raw(stat_lines.join("  ")));
    }
    for note in &def.build {
        stats.push(Line::from(Span::styled(
            note.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    let time = match view.progress {
        Some(progress) => Span::raw(format_time(progress)),
        None => Span::styled(format_opt(view.checkpoint), dim),
    };
    let sgmt = match view.duration {
        Some(duration) => Span::raw(format_time(duration)),
        None => Span::styled(format_opt(view.pb), dim),
    };
    let mut gold = vec![Line::from(if view.is_new_gold() {
        Span::styled(format_opt(view.gold), status_style(Status::Gold))
    } else {
        Span::raw(format_opt(view.gold))
    })];
    // time lost to gold once run, possible time save before
    let gold_delta = match view.duration {
        Some(_) => view.gold_delta.filter(|_| !view.active),
        None => view.pb_gold_delta,
    };
    if let Some(d) = gold_delta.filter(|d| !d.is_zero()) {
        gold.push(Line::from(Span::styled(format_delta(d), dim)));
    }
    let diff = view
        .delta
        .map(|d| Span::styled(format_delta(d), status_style(view.status)))
        .unwrap_or_default();

    let height = name.len().max(stats.len()).max(gold.len()).max(1) as u16;
    let row = Row::new(vec![
        Cell::from(Text::from(name)),
        Cell::from(Text::from(stats)),
        Cell::from(time),
        Cell::from(sgmt),
        Cell::from(Text::from(gold)),
        Cell::from(diff),
    ])
    .height(height);

    if view.active {
        row.style(Style::default().bg(Color::DarkGray))
    } else {
        row
    }
}

fn render_segments(app: &App, snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let header = Row::new(vec!["Segment", "Stats", "Time", "Sgmt", "Gold", "Diff"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .route
        .segments
        .iter()
        .zip(&snap.segments)
        .map(|(def, view)| segment_row(def, view, app.show_ids))
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::LEFT | Borders::RIGHT));

    Widget::render(table, area, buf);
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer) {
    let key_style = Style::default().add_modifier(Modifier::BOLD);
    let legend: Vec<Span> = Command::LEGEND
        .iter()
        .flat_map(|cmd| {
            let style = if app.last_command == Some(*cmd) {
                key_style.add_modifier(Modifier::REVERSED)
            } else {
                key_style
            };
            [
                Span::styled(format!("({})", cmd.key()), style),
                Span::raw(format!("{cmd} ")),
            ]
        })
        .collect();

    let status = match app.message() {
        Some(msg) if msg.is_error => Line::from(Span::styled(
            msg.text.clone(),
            Style::default().fg(Color::Red),
        )),
        Some(msg) => Line::from(Span::styled(
            msg.text.clone(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(
            app.run.path.display().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    };

    Paragraph::new(vec![Line::from(legend), status])
        .block(Block::default().borders(Borders::ALL))
        .render(area, buf);
}
