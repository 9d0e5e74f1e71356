//! Interactive session state: routes terminal input to the engine and the
//! staff sequencer, and ticks playback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;

use chipstaff::engine::{ChannelControl, ChipEngine};
use chipstaff::keymap::key_binding;
use chipstaff::sequencing::staff::{LINE_SPACING, SCROLL_STEP};
use chipstaff::sequencing::{NoteLength, Sequencer};

use crate::ui;

/// Sequencer tick cadence: 20 updates per second.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Without key release events, a live note is held as long as terminal
/// auto-repeat keeps refreshing it.
const KEY_HOLD_TIMEOUT: Duration = Duration::from_millis(200);

pub struct App {
    pub engine: Arc<ChipEngine>,
    pub sequencer: Sequencer,
    /// Channel targeted by the next staff placement.
    pub selected_channel: usize,
    /// Frequency armed for placement by the last note key press.
    pub selected_frequency: Option<f32>,
    pub selected_length: NoteLength,
    /// Staff widget area from the last draw, for mouse hit testing.
    pub staff_area: Rect,
    /// Whether the terminal reports key release events.
    key_releases: bool,
    /// Last press or repeat per channel, for the release fallback.
    held: Vec<Option<Instant>>,
    should_quit: bool,
}

impl App {
    pub fn new(engine: Arc<ChipEngine>, key_releases: bool) -> Self {
        let channel_count = engine.channel_count();
        Self {
            engine,
            sequencer: Sequencer::new(),
            selected_channel: 0,
            selected_frequency: None,
            selected_length: NoteLength::Eighth,
            staff_area: Rect::default(),
            key_releases,
            held: vec![None; channel_count],
            should_quit: false,
        }
    }

    /// Run the session loop until quit.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last_tick = Instant::now();
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &mut self))?;

            // Non-blocking input, ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= TICK_INTERVAL {
                self.sequencer.tick(self.engine.as_ref());
                self.release_stale_notes();
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.key_pressed(key.code),
            KeyEventKind::Release => self.key_released(key.code),
        }
    }

    fn key_pressed(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') => self.sequencer.start_playback(),
            KeyCode::Delete | KeyCode::Backspace => {
                self.sequencer.clear();
                self.engine.all_notes_off();
            }
            KeyCode::Tab => {
                self.selected_channel = (self.selected_channel + 1) % self.engine.channel_count();
            }
            KeyCode::Char('.') => self.selected_length = self.selected_length.toggled(),
            KeyCode::Left => self.sequencer.scroll_by(-SCROLL_STEP),
            KeyCode::Right => self.sequencer.scroll_by(SCROLL_STEP),
            KeyCode::Char(c) => {
                if let Some((channel, frequency)) = key_binding(c) {
                    self.engine.note_on(channel, frequency);
                    self.held[channel] = Some(Instant::now());
                    // A played note also arms staff placement.
                    self.selected_channel = channel;
                    self.selected_frequency = Some(frequency);
                }
            }
            _ => {}
        }
    }

    fn key_released(&mut self, code: KeyCode) {
        if let KeyCode::Char(c) = code {
            if let Some((channel, _)) = key_binding(c) {
                self.engine.note_off(channel);
                self.held[channel] = None;
            }
        }
    }

    /// Fallback release for terminals without the enhancement protocol.
    fn release_stale_notes(&mut self) {
        if self.key_releases {
            return;
        }
        for (channel, held) in self.held.iter_mut().enumerate() {
            if held.is_some_and(|since| since.elapsed() > KEY_HOLD_TIMEOUT) {
                self.engine.note_off(channel);
                *held = None;
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let MouseEventKind::Down(button) = mouse.kind else {
            return;
        };
        let area = self.staff_area;
        if !area.contains(ratatui::layout::Position::new(mouse.column, mouse.row)) {
            return;
        }
        let x = i32::from(mouse.column - area.x) * ui::UNITS_PER_CELL;
        let row = i32::from(mouse.row - area.y);

        match button {
            MouseButton::Left => {
                if let Some(frequency) = self.selected_frequency {
                    self.sequencer.place_note(
                        x,
                        frequency,
                        self.selected_channel,
                        self.selected_length,
                    );
                }
            }
            MouseButton::Right => {
                // Click row -> vertical offset from the middle staff line.
                let y = (row - ui::CENTER_ROW) * (LINE_SPACING / 2);
                self.sequencer.remove_note(x, y);
            }
            _ => {}
        }
    }
}
