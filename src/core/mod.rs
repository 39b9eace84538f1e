pub mod snap;
pub mod tempo;

/// Signed sample count from session start.
pub type Position = i64;
