use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (TOML); missing file means defaults
    #[arg(short, long, default_value = "leap_zoompan.toml")]
    pub config: PathBuf,

    /// Ignore the config file and start with defaults
    #[arg(long, default_value_t = false)]
    pub quick: bool,

    /// Frame spacing of the simulated hand, in milliseconds
    #[arg(long, value_name = "MS")]
    pub frame_ms: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,
}
