mod renderer;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use barflow_core::svg::render_svg;
use barflow_core::{AnimationCycle, ChartConfig, CycleDriver, load_dataset};
use barflow_protocol::Theme;
use clap::{Parser, Subcommand, ValueHint};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated keyed bar charts", long_about = None)]
struct Cli {
    /// JSON chart configuration; every field is optional
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs here instead of stderr (play mode discards them otherwise)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the static chart as SVG
    Render {
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        #[arg(long)]
        dark: bool,
    },
    /// Run the animation on a simulated clock and write one SVG per frame
    Frames {
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,
        #[arg(long, value_hint = ValueHint::DirPath)]
        out_dir: PathBuf,
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 3)]
        ticks: u32,
        #[arg(long, default_value_t = 10.0)]
        fps: f64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        dark: bool,
    },
    /// Play the animation live in the terminal
    Play {
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Command::Play { .. });
    init_logging(&cli.log_level, cli.log_file.as_deref(), interactive)?;

    let config = match &cli.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChartConfig::default(),
    };

    match cli.command {
        Command::Render { csv, out, dark } => handle_render(&csv, out.as_deref(), dark, config),
        Command::Frames {
            csv,
            out_dir,
            ticks,
            fps,
            seed,
            dark,
        } => handle_frames(&csv, &out_dir, ticks, fps, seed, dark, config),
        Command::Play { csv, seed } => handle_play(&csv, seed, config),
    }
}

fn init_logging(level: &str, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        // Anything on stderr would tear the terminal UI.
        None if interactive => (BoxMakeWriter::new(io::sink), false),
        None => (BoxMakeWriter::new(io::stderr), true),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init();
    Ok(())
}

fn load_chart(csv: &Path, config: ChartConfig) -> Result<AnimationCycle> {
    let dataset =
        load_dataset(csv).with_context(|| format!("loading dataset {}", csv.display()))?;
    Ok(AnimationCycle::new(dataset, config))
}

fn theme_for(config: &ChartConfig, dark: bool) -> Theme {
    if dark { Theme::Dark } else { config.theme }
}

fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    })
}

fn chart_svg(chart: &AnimationCycle, theme: Theme) -> String {
    let canvas = chart.layout().canvas();
    render_svg(&chart.render(), canvas.width, canvas.height, theme)
}

fn handle_render(csv: &Path, out: Option<&Path>, dark: bool, config: ChartConfig) -> Result<()> {
    let theme = theme_for(&config, dark);
    let chart = load_chart(csv, config)?;
    let svg = chart_svg(&chart, theme);
    match out {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "static chart written");
        }
        None => io::stdout()
            .write_all(svg.as_bytes())
            .context("writing SVG to stdout")?,
    }
    Ok(())
}

fn handle_frames(
    csv: &Path,
    out_dir: &Path,
    ticks: u32,
    fps: f64,
    seed: Option<u64>,
    dark: bool,
    config: ChartConfig,
) -> Result<()> {
    if !(fps.is_finite() && fps > 0.0) {
        bail!("--fps must be a positive number, got {fps}");
    }
    let theme = theme_for(&config, dark);
    let period = config.cycle.period_ms as f64;
    let duration = config.cycle.duration_ms as f64;
    let chart = load_chart(csv, config)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let seed = seed_or_clock(seed);
    info!(seed, ticks, fps, "simulating frames");
    let mut driver = CycleDriver::new(chart, SmallRng::seed_from_u64(seed), 0.0);

    // Run until the last tick's transitions have settled.
    let end_ms = period * f64::from(ticks) + duration;
    let step_ms = 1000.0 / fps;
    let mut frame = 0u32;
    loop {
        let now = f64::from(frame) * step_ms;
        if now > end_ms {
            break;
        }
        driver.frame(now);
        let path = out_dir.join(format!("frame_{frame:05}.svg"));
        std::fs::write(&path, chart_svg(driver.cycle(), theme))
            .with_context(|| format!("writing {}", path.display()))?;
        frame += 1;
    }
    driver.stop();
    info!(frames = frame, dir = %out_dir.display(), "frames written");
    Ok(())
}

fn handle_play(csv: &Path, seed: Option<u64>, config: ChartConfig) -> Result<()> {
    let chart = load_chart(csv, config)?;
    let seed = seed_or_clock(seed);
    info!(seed, "starting live player");
    let driver = CycleDriver::new(chart, SmallRng::seed_from_u64(seed), 0.0);
    renderer::play(driver)
}
