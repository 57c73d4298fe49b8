// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "rotating-cube")]
#[command(about = "Rotating cube viewer with orbit controls", long_about = None)]
pub struct Cli {
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = "Rotating Cube")]
    pub title: String,

    /// JSON file overriding scene and camera settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Present frames without waiting for vertical blank
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,
}
