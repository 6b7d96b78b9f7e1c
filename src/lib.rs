// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
mod millis;
pub mod route;
pub mod run;
pub mod runtime;
pub mod segment;
pub mod snapshot;
pub mod totals;
pub mod ui;
pub mod util;

pub use app::App;
pub use engine::Engine;
pub use error::{Error, Result};
