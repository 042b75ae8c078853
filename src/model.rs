mod ids;
mod pattern;

pub use self::ids::PatternId;
pub use self::pattern::{PatternRecord, PatternUpdate, default_patterns};
