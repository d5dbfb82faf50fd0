//! Small rendering helpers shared by screens.

pub mod node_grid;
pub mod rate_fmt;
