#![deny(unsafe_code)]
//! Headless host for the motif gallery.
//!
//! Subcommands:
//! - `render <visual>`: mount a visual, run N frames, write a PNG
//! - `list`: print available visuals and palettes
//!
//! Logs go to stderr through `tracing-subscriber`; set `RUST_LOG` (e.g.
//! `RUST_LOG=motif_core=debug`) to see lifecycle events.

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use motif_core::{Palette, Seed};
use motif_engines::VisualKind;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "motif", about = "Headless renderer for generative visuals")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a visual for N frames and write a PNG snapshot.
    Render {
        /// Visual name (e.g. "henon"). Ignored when --from is given.
        #[arg(required_unless_present = "from")]
        visual: Option<String>,

        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: usize,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 512)]
        height: usize,

        /// Number of frames to step and paint.
        #[arg(short, long, default_value_t = 300)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Read visual, size, seed and frames from a JSON seed file instead.
        #[arg(long, conflicts_with = "visual")]
        from: Option<PathBuf>,

        /// Output file path.
        #[arg(short, long, default_value = "motif.png")]
        output: PathBuf,
    },
    /// List available visuals and palettes.
    List,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads a [`Seed`] from a JSON file.
fn load_seed(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let visuals = VisualKind::list_visuals();
            let palettes = Palette::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "visuals": visuals,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Visuals:");
                for name in visuals {
                    println!("  {name}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Render {
            visual,
            width,
            height,
            frames,
            seed,
            from,
            output,
        } => {
            let seed = match from {
                Some(path) => load_seed(&path)?,
                None => Seed {
                    frames,
                    ..Seed::new(visual.as_deref().unwrap_or_default(), width, height, seed)
                },
            };

            let rendered = motif_engines::render(&seed)?;
            motif_engines::snapshot::write_png(&rendered.surface, &output)?;
            info!(visual = %seed.visual, frames = rendered.frames, output = %output.display(), "snapshot written");

            if cli.json {
                let info = serde_json::json!({
                    "seed": seed,
                    "frames_rendered": rendered.frames,
                    "elements": rendered.elements,
                    "params": rendered.params,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}) -> {}",
                    seed.visual,
                    seed.width,
                    seed.height,
                    rendered.frames,
                    seed.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
