use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Scene description to load on startup
    #[arg(default_value = "assets/scenes/default.json5")]
    pub scene: PathBuf,
    /// Window width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,
    /// Window height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}
