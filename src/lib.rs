pub mod analytics;
pub mod error;
pub mod model;
pub mod parser;
pub mod settings;
pub mod timestamps;

pub use error::{Error, Result};
pub use model::{BeatdownRecord, ParsedBeatdown, SourceBeatdown, WorkoutType};
pub use parser::parse_backblast;
