pub mod generate_notes;

pub use generate_notes::*;
