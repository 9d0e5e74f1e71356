//! The staff model: placed notes and the fixed pitch-to-row table.

/// Horizontal span of the staff, in placement units.
pub const STAFF_WIDTH: i32 = 900;
/// Vertical distance between adjacent staff lines.
pub const LINE_SPACING: i32 = 20;
/// Radius of a drawn note head; removal tolerance is twice this on each axis.
pub const NOTE_RADIUS: i32 = 10;
/// Horizontal scroll step.
pub const SCROLL_STEP: i32 = 50;

/// How long a placed note holds during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteLength {
    #[default]
    Eighth,
    Quarter,
}

impl NoteLength {
    pub fn toggled(self) -> Self {
        match self {
            Self::Eighth => Self::Quarter,
            Self::Quarter => Self::Eighth,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Eighth => "eighth",
            Self::Quarter => "quarter",
        }
    }
}

/// Frequencies the staff can hold, paired with their row relative to the
/// middle line. Rows are in half-line-spacing steps; a note's vertical
/// offset from the middle line is `-row * LINE_SPACING / 2`.
const STAFF_POSITIONS: [(f32, i32); 14] = [
    (261.63, 10), // C4
    (293.66, 9),  // D4
    (329.63, 8),  // E4
    (349.23, 7),  // F4
    (392.00, 6),  // G4
    (440.00, 5),  // A4
    (493.88, 4),  // B4
    (523.25, 3),  // C5
    (587.33, 2),  // D5
    (659.26, 1),  // E5
    (698.46, 0),  // F5
    (783.99, -1), // G5
    (880.00, -2), // A5
    (987.77, -3), // B5
];

/// Staff row for `frequency`, or `None` when the pitch is not on the staff.
/// Lookup is by exact value; frequencies come from the same tables that
/// feed the keymap, so no tolerance is needed.
pub fn staff_position(frequency: f32) -> Option<i32> {
    STAFF_POSITIONS
        .iter()
        .find(|&&(f, _)| f == frequency)
        .map(|&(_, row)| row)
}

/// A placed, time-positioned pitch event awaiting playback.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffNote {
    pub frequency: f32,
    /// Staff row from [`staff_position`].
    pub position: i32,
    /// Horizontal position in staff units, scroll offset already applied.
    pub x: i32,
    pub channel: usize,
    pub length: NoteLength,
    /// Transient playback marker, owned by the sequencer.
    pub playing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_two_octaves() {
        assert_eq!(staff_position(261.63), Some(10));
        assert_eq!(staff_position(440.00), Some(5));
        assert_eq!(staff_position(698.46), Some(0));
        assert_eq!(staff_position(987.77), Some(-3));
    }

    #[test]
    fn unmapped_frequencies_have_no_row() {
        assert_eq!(staff_position(1000.0), None);
        assert_eq!(staff_position(0.0), None);
        // Close is not equal.
        assert_eq!(staff_position(440.01), None);
    }

    #[test]
    fn rows_descend_with_rising_pitch() {
        let rows: Vec<i32> = STAFF_POSITIONS.iter().map(|&(_, row)| row).collect();
        assert!(rows.windows(2).all(|w| w[1] == w[0] - 1));
    }
}
