mod data;
mod error;
mod graph;
mod mapping;
mod plot;
mod style;
mod ticks;
mod validate;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};

use crate::data::Dataset;
use crate::mapping::TickPolicy;
use crate::plot::PlotOptions;

#[derive(Parser, Debug)]
#[command(name = "parcoord")]
#[command(about = "Render parallel coordinate plots from CSV or JSON data", long_about = None)]
struct Args {
    /// Read JSON ({"headers": [...], "content": {...}}) instead of CSV
    #[arg(long)]
    json: bool,

    /// Attach a legend listing the plotted entities
    #[arg(long)]
    legend: bool,

    /// Figure title
    #[arg(long)]
    title: Option<String>,

    /// Label on the leftmost axis
    #[arg(long)]
    ylabel: Option<String>,

    /// Output width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Marker size in pixels
    #[arg(long, default_value_t = 15)]
    markersize: u32,

    /// Tick count for float axes: 'auto' or a number
    #[arg(long, default_value = "auto")]
    ticks: String,

    /// Write the PNG here instead of stdout
    #[arg(long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read input from stdin")?;

    let dataset = if args.json {
        let value = serde_json::from_str(&input).context("Failed to parse JSON input")?;
        Dataset::from_json(&value).context("Failed to build dataset from JSON")?
    } else {
        Dataset::from_csv(input.as_bytes()).context("Failed to build dataset from CSV")?
    };

    let options = PlotOptions {
        legend: args.legend,
        title: args.title,
        ylabel: args.ylabel,
        width: args.width,
        height: args.height,
        markersize: args.markersize,
        tick_policy: parse_tick_policy(&args.ticks)?,
    };

    let handle = plot::plot(&dataset, &options).context("Failed to render plot")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &handle.png)
                .with_context(|| format!("Failed to write PNG to '{}'", path))?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            out.write_all(&handle.png)
                .context("Failed to write PNG to stdout")?;
            out.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}

fn parse_tick_policy(raw: &str) -> Result<TickPolicy> {
    if raw.eq_ignore_ascii_case("auto") {
        return Ok(TickPolicy::Auto);
    }
    raw.parse::<usize>()
        .map(TickPolicy::Fixed)
        .map_err(|_| anyhow!("--ticks must be 'auto' or a number, got '{}'", raw))
}
