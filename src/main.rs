//! `pcb-magazine`: build a frame, a bone or the whole magazine and export it.

use anyhow::{Context, Result};
use clap::Parser;
use pcb_magazine::io::{ExportFormat, export_to_path};
use pcb_magazine::{Component, MagazineConfig, MagazineParams, build};
use std::path::PathBuf;

/// PCB Magazine Generator
#[derive(Parser, Debug)]
#[command(name = "pcb-magazine")]
#[command(about = "Parametric 3D-printable PCB magazine", long_about = None)]
#[command(version)]
struct Cli {
    /// Component to build: frame, bone or assembly
    #[arg(long, default_value = "assembly")]
    component: Component,

    /// PCB width [a] (inner X dimension, mm)
    #[arg(short = 'a', default_value_t = 90.0)]
    a: f64,

    /// PCB height [b] (bone tip-to-tip length and assembly span, mm)
    #[arg(short = 'b', default_value_t = 120.0)]
    b: f64,

    /// PCB thickness [c] (slot width, mm)
    #[arg(short = 'c', default_value_t = 1.6)]
    c: f64,

    /// PCB-to-PCB distance [d] (material between slots, mm)
    #[arg(short = 'd', default_value_t = 10.0)]
    d: f64,

    /// PCB count [n] (number of slots)
    #[arg(short = 'n', default_value_t = 10)]
    n: usize,

    /// Output format: stl, stl-ascii, step (or stp)
    #[arg(long, default_value = "stl")]
    fmt: ExportFormat,

    /// Output file path
    #[arg(long, default_value = "model.stl")]
    out: PathBuf,

    /// JSON file overriding the construction constants
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pcb_magazine=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MagazineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MagazineConfig::default(),
    };
    let params = MagazineParams {
        a: cli.a,
        b: cli.b,
        c: cli.c,
        d: cli.d,
        n: cli.n,
    };

    let model = build(cli.component, &params, &config)
        .with_context(|| format!("failed to build {}", cli.component))?;
    let path = export_to_path(&model, &cli.out, cli.fmt)
        .with_context(|| format!("failed to export {}", cli.out.display()))?;

    println!("Exported to: {}", path.display());
    Ok(())
}
