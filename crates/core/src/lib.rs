#![forbid(unsafe_code)]

pub mod model;
pub mod navigation;
pub mod time;

pub use time::Clock;
