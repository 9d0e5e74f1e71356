//! Staff and keyboard rendering for the session view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chipstaff::keymap::{CHANNEL1_KEYS, CHANNEL2_KEYS};
use chipstaff::sequencing::staff::STAFF_WIDTH;
use chipstaff::SAMPLE_RATE;

use crate::app::App;

/// Horizontal staff units covered by one terminal cell.
pub const UNITS_PER_CELL: i32 = 10;
/// Staff row index of the middle line.
pub const CENTER_ROW: i32 = 10;
/// Rows needed for the full pitch range (C4 at the top, B5 at the bottom).
pub const STAFF_ROWS: i32 = 14;

const CHANNEL_COLORS: [Color; 3] = [Color::Blue, Color::Red, Color::Green];

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),                   // Key rows
            Constraint::Length(STAFF_ROWS as u16 + 2), // Staff
            Constraint::Length(3),                   // Status
            Constraint::Length(1),                   // Help bar
        ])
        .split(frame.area());

    render_keys(frame, chunks[0], app);
    render_staff(frame, chunks[1], app);
    render_status(frame, chunks[2], app);

    let help = Paragraph::new(
        " [A-J/Z-M] Play  [Click] Place  [RClick] Remove  [Space] Playback  \
         [Tab] Channel  [.] Length  [<-/->] Scroll  [Del] Clear  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

/// The two live key rows, with sounding keys highlighted.
fn render_keys(frame: &mut Frame, area: Rect, app: &App) {
    let snapshots = app.engine.snapshot();
    let key_line = |keys: &[(char, f32)], channel: usize| -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" ch{} ", channel + 1),
            Style::default().fg(CHANNEL_COLORS[channel % CHANNEL_COLORS.len()]),
        )];
        for &(key, frequency) in keys {
            let sounding = snapshots
                .get(channel)
                .is_some_and(|s| s.active && s.frequency == frequency);
            let style = if sounding {
                Style::default()
                    .fg(Color::Black)
                    .bg(CHANNEL_COLORS[channel % CHANNEL_COLORS.len()])
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {key} "), style));
        }
        Line::from(spans)
    };

    let block = Block::default().title(" Keys ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(vec![
            key_line(&CHANNEL1_KEYS, 0),
            key_line(&CHANNEL2_KEYS, 1),
        ]),
        inner,
    );
}

/// The staff: placed notes, staff lines, and the playback cursor.
fn render_staff(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default().title(" Staff ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.staff_area = inner;

    let scroll = app.sequencer.scroll_offset();
    let visible_cells =
        (inner.width as i32).min((STAFF_WIDTH - scroll) / UNITS_PER_CELL + 1).max(0);
    let cursor_cell = if app.sequencer.is_playing() {
        Some((app.sequencer.cursor() - scroll) / UNITS_PER_CELL)
    } else {
        None
    };

    let mut lines = Vec::with_capacity(STAFF_ROWS as usize);
    for row in 0..STAFF_ROWS {
        let mut spans = Vec::with_capacity(visible_cells as usize);
        // Ledger rows are the five even positions around the middle line.
        let is_line_row = (row - CENTER_ROW) % 2 == 0 && (CENTER_ROW - 8..=CENTER_ROW).contains(&row);
        for cell in 0..visible_cells {
            let note = app.sequencer.notes().iter().find(|note| {
                CENTER_ROW - note.position == row && (note.x - scroll) / UNITS_PER_CELL == cell
            });
            let span = if let Some(note) = note {
                let color = CHANNEL_COLORS[note.channel % CHANNEL_COLORS.len()];
                let style = if note.playing {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };
                Span::styled("o", style)
            } else if cursor_cell == Some(cell) {
                Span::styled("|", Style::default().fg(Color::Yellow))
            } else if is_line_row {
                Span::styled("-", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(" ")
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Selection and capture status.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let armed = match app.selected_frequency {
        Some(frequency) => format!("{frequency:.2} Hz"),
        None => "none (press a key)".to_string(),
    };
    let captured = app.engine.capture_len() as f32 / SAMPLE_RATE as f32;
    let status = format!(
        " place on ch{} | note: {} | length: {} | scroll: {} | captured: {:.1}s{}",
        app.selected_channel + 1,
        armed,
        app.selected_length.label(),
        app.sequencer.scroll_offset(),
        captured,
        if app.sequencer.is_playing() { " | PLAYING" } else { "" },
    );
    let block = Block::default().title(" Session ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(status), inner);
}
