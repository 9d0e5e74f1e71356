//! Staff playback: a cursor sweeps the placed notes and drives the
//! channels through [`ChannelControl`].

use std::collections::VecDeque;

use crate::engine::ChannelControl;

use super::staff::{staff_position, NoteLength, StaffNote, LINE_SPACING, NOTE_RADIUS, STAFF_WIDTH};

/// Cursor distance within which a note is picked up.
const ONSET_WINDOW: i32 = 5;
/// Cursor advance per tick.
const CURSOR_STEP: i32 = 2;
/// A quarter note is rotated back into the queue this many times, so it is
/// re-struck on several consecutive ticks instead of once.
const QUARTER_HOLD_TICKS: u8 = 3;
/// Queue length past which the front entry is dropped regardless of length,
/// so a dense chord cannot rotate forever.
const QUEUE_LIMIT: usize = 8;

/// A note copied into the sounding queue. Entries are values, not indices
/// into the staff, so edits during playback cannot invalidate them.
#[derive(Debug, Clone)]
struct QueuedNote {
    channel: usize,
    frequency: f32,
    length: NoteLength,
    recycles: u8,
}

/// Note placement plus the playback state machine (idle or playing).
///
/// The sequencer holds no timing of its own; the caller ticks it at a fixed
/// cadence (the session loop uses 50 ms) and supplies the channel sink.
#[derive(Debug, Default)]
pub struct Sequencer {
    notes: Vec<StaffNote>,
    queue: VecDeque<QueuedNote>,
    cursor: i32,
    scroll_offset: i32,
    playing: bool,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a note at horizontal position `x` (in view coordinates; the
    /// current scroll offset is added). Returns false without storing
    /// anything when `frequency` has no staff row.
    pub fn place_note(&mut self, x: i32, frequency: f32, channel: usize, length: NoteLength) -> bool {
        let Some(position) = staff_position(frequency) else {
            log::debug!("rejecting placement of unmapped frequency {frequency}");
            return false;
        };
        self.notes.push(StaffNote {
            frequency,
            position,
            x: x + self.scroll_offset,
            channel,
            length,
            playing: false,
        });
        true
    }

    /// Remove the first stored note within the click tolerance of `(x, y)`.
    /// `x` is in view coordinates; `y` is measured from the middle staff
    /// line, positive downward. Returns whether a note was removed.
    pub fn remove_note(&mut self, x: i32, y: i32) -> bool {
        let click_x = x + self.scroll_offset;
        let hit = self.notes.iter().position(|note| {
            let note_y = -note.position * LINE_SPACING / 2;
            (note.x - click_x).abs() < NOTE_RADIUS * 2 && (y - note_y).abs() < NOTE_RADIUS * 2
        });
        match hit {
            Some(index) => {
                self.notes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every note and stop playback. Channels already sounding are
    /// the caller's business (the session loop silences them).
    pub fn clear(&mut self) {
        self.notes.clear();
        self.queue.clear();
        self.playing = false;
    }

    /// Begin playback from the left edge of the current view. Does nothing
    /// when the staff is empty.
    pub fn start_playback(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        self.cursor = self.scroll_offset;
        self.notes.sort_by_key(|note| note.x);
        for note in &mut self.notes {
            note.playing = false;
        }
        self.queue.clear();
        self.playing = true;
        log::debug!("playback started, {} notes", self.notes.len());
    }

    /// Advance playback by one tick, driving `sink`. No-op while idle.
    pub fn tick(&mut self, sink: &impl ChannelControl) {
        if !self.playing {
            return;
        }
        if self.cursor > STAFF_WIDTH + self.scroll_offset {
            self.playing = false;
            self.queue.clear();
            sink.all_notes_off();
            log::debug!("playback finished");
            return;
        }

        for note in &mut self.notes {
            if !note.playing && (note.x - self.cursor).abs() < ONSET_WINDOW {
                note.playing = true;
                self.queue.push_back(QueuedNote {
                    channel: note.channel,
                    frequency: note.frequency,
                    length: note.length,
                    recycles: 0,
                });
            }
        }

        if let Some(mut front) = self.queue.pop_front() {
            sink.note_on(front.channel, front.frequency);
            let keep = front.length == NoteLength::Quarter
                && front.recycles < QUARTER_HOLD_TICKS
                && self.queue.len() < QUEUE_LIMIT;
            if keep {
                front.recycles += 1;
                self.queue.push_back(front);
            }
        }

        self.cursor += CURSOR_STEP;
    }

    /// Shift the view horizontally, clamped so it never scrolls left of the
    /// staff origin.
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_offset = (self.scroll_offset + delta).max(0);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    pub fn notes(&self) -> &[StaffNote] {
        &self.notes
    }
}
