pub mod misc;
pub mod stats;

pub use misc::*;
pub use stats::*;
