//! Level construction - play-space bounds and terrain placement.

mod level;

pub use level::*;
