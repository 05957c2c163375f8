//! delve demo — a hand-drawn level rendered once to the terminal.

pub mod level;

pub use level::{DemoConfig, Level};
