//! Read a track from stdin (or a file) and print its heatmap.
//!
//! ```text
//! track-heatmap 0.01 0.01 " .:*#" 5 < ride.txt
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use track_heatmap::{read_track, render_to_string, try_build_heatmap, HeatmapConfig, RenderConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Density heatmap of a GPS track", long_about = None)]
struct Cli {
    /// Degrees of longitude per column, in (0, 360]
    #[arg(allow_negative_numbers = true)]
    cell_width: f64,

    /// Degrees of latitude per row, in (0, 180]
    #[arg(allow_negative_numbers = true)]
    cell_height: f64,

    /// Glyphs from coldest to hottest
    glyphs: String,

    /// Trackpoints per glyph step
    bucket_width: u32,

    /// Read the track from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the grid as JSON instead of glyphs
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> track_heatmap::Result<()> {
    let render_config = RenderConfig::new(cli.glyphs, cli.bucket_width);
    render_config.validate()?;
    let heatmap_config = HeatmapConfig::new(cli.cell_width, cli.cell_height);
    heatmap_config.validate()?;

    let summary = match &cli.input {
        Some(path) => read_track(BufReader::new(File::open(path)?))?,
        None => read_track(io::stdin().lock())?,
    };
    if summary.rejected > 0 {
        info!(
            "Skipped {} of {} trackpoints",
            summary.rejected, summary.points_read
        );
    }

    let grid = try_build_heatmap(&summary.track, &heatmap_config)?;

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &grid).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        out.write_all(render_to_string(&grid, &render_config)?.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
