//! Command-line front end for rendering, sampling and comparing views.
//!
//! ```text
//! orgflow-render render <view> [--intensity N] [--config FILE] -o <out.bmp|raw>
//! orgflow-render samples <structure> [--intensity N] [--format table|json]
//! orgflow-render compare <file_a> <file_b> [-d <diff.bmp>] [-s <sidebyside.bmp>]
//! orgflow-render list
//! ```

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use orgflow::{generate_samples, Intensity, PageConfig, Structure, Transform, ViewTab};
use orgflow_render::{
    compare_buffers, generate_diff_image, generate_sidebyside, load_image, save_image, PixelBuffer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orgflow-render", version, about = "Render and compare organizational flow views")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one view of the page to an image file.
    Render {
        /// comparative, structureA or structureB
        view: ViewTab,
        /// Slider position, 0..=100.
        #[arg(long, default_value_t = 0)]
        intensity: u32,
        /// JSON page configuration.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the 41 sample points of a structure.
    Samples {
        /// a / high-constraint, or b / adaptive
        structure: Structure,
        #[arg(long, default_value_t = 0)]
        intensity: u32,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Compare two images pixel by pixel; exits with 1 when they differ.
    Compare {
        file_a: PathBuf,
        file_b: PathBuf,
        #[arg(short, long)]
        diff: Option<PathBuf>,
        #[arg(short, long)]
        side_by_side: Option<PathBuf>,
    },
    /// List views and structures.
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match cli.command {
        Command::Render {
            view,
            intensity,
            config,
            output,
        } => cmd_render(view, intensity, config.as_deref(), output),
        Command::Samples {
            structure,
            intensity,
            format,
        } => cmd_samples(structure, intensity, format),
        Command::Compare {
            file_a,
            file_b,
            diff,
            side_by_side,
        } => {
            if !cmd_compare(&file_a, &file_b, diff.as_deref(), side_by_side.as_deref())? {
                process::exit(1);
            }
            Ok(())
        }
        Command::List => {
            cmd_list();
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    let Some(path) = path else {
        return Ok(PageConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    PageConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
}

fn cmd_render(view: ViewTab, intensity: u32, config: Option<&Path>, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let intensity = Intensity::from_percent(intensity);
    let output = output.unwrap_or_else(|| {
        PathBuf::from(format!("{}_{}_{}x{}.bmp", view, intensity.percent(), config.width, config.height))
    });

    tracing::info!(%view, %intensity, width = config.width, height = config.height, "rendering");
    let buf: PixelBuffer = orgflow::render_view(view, intensity, &config)
        .with_context(|| format!("rendering {}", view))?
        .into();

    save_image(&output, &buf).with_context(|| format!("saving {}", output.display()))?;
    println!("Saved: {}", output.display());
    Ok(())
}

fn cmd_samples(structure: Structure, intensity: u32, format: Format) -> Result<()> {
    let intensity = Intensity::from_percent(intensity);
    let samples = generate_samples(structure.functions(), intensity);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&samples)?),
        Format::Table => {
            println!("{} @ {}", structure, intensity);
            print!("{:>7}", "input");
            for t in Transform::ALL {
                print!("  {:>14}", t.label());
            }
            println!();
            for p in &samples {
                print!("{:>7.2}", p.input);
                for t in Transform::ALL {
                    print!("  {:>14.6}", p.value(t));
                }
                println!();
            }
        }
    }
    Ok(())
}

/// Returns whether the two images are identical.
fn cmd_compare(a_path: &Path, b_path: &Path, diff: Option<&Path>, sbs: Option<&Path>) -> Result<bool> {
    let a = load_image(a_path).with_context(|| format!("loading {}", a_path.display()))?;
    let b = load_image(b_path).with_context(|| format!("loading {}", b_path.display()))?;

    let result = compare_buffers(&a, &b)?;
    println!("{}", result);

    if let Some(path) = diff {
        save_image(path, &generate_diff_image(&a, &b)?)
            .with_context(|| format!("saving {}", path.display()))?;
        println!("Diff saved: {}", path.display());
    }
    if let Some(path) = sbs {
        save_image(path, &generate_sidebyside(&a, &b)?)
            .with_context(|| format!("saving {}", path.display()))?;
        println!("Side-by-side saved: {}", path.display());
    }

    if !result.identical() {
        println!("\nDifference histogram:");
        for (value, &count) in result.diff_histogram.iter().enumerate().filter(|(_, c)| **c > 0) {
            println!("  diff={}: {} channels", value, count);
        }
    }
    Ok(result.identical())
}

fn cmd_list() {
    println!("Views:");
    for v in ViewTab::ALL {
        println!("  {:<12} {}", v.key(), v.label());
    }
    println!("Structures:");
    for s in Structure::ALL {
        println!("  {}", s);
    }
}
