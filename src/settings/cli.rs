use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "passport", about = "Session-token authentication service")]
pub struct Cli {
    /// Path of the TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
