//! Staff model and playback sequencing.

pub mod sequencer;
pub mod staff;

pub use sequencer::Sequencer;
pub use staff::{staff_position, NoteLength, StaffNote};
