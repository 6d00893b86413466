use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use keymux::core::config;
use keymux::tui;

#[derive(Parser)]
#[command(name = "keymux", about = "Input-multiplexing terminal shell")]
struct Args {
    /// Path to an alternate config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in grid-browse mode
    #[arg(short, long)]
    grid: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to keymux.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("keymux.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match config::load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("keymux: {e}");
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    let resolved = match config::resolve(loaded, args.grid) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("keymux: {e}");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    log::info!("keymux starting (grid={})", resolved.start_in_grid);
    tui::run(resolved)
}
