#![forbid(unsafe_code)]

//! Domain model for the eduplay client: quiz definitions, score
//! presentation, and the browse/projects entities. No I/O lives here.

pub mod model;
pub mod time;

pub use time::Clock;
