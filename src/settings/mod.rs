//! Settings are read from a TOML file over built-in defaults.
//! The file path can be overridden with `--settings`.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
