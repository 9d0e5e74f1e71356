//! External formats: the session capture encoder.

pub mod wav;
