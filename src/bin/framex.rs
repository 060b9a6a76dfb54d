use std::{fs, path::Path, path::PathBuf, str::FromStr, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framex::{
    ARCHIVE_FILE_NAME, ExtractOptions, FfmpegDecoder, FrameDecoder, FrameExtractor, FramexError,
    OperationType, ProgressCallback, ProgressInfo, SampleRequest, VideoInput,
    config::{DEFAULT_FORMAT, DEFAULT_INTERVAL_SECONDS, DEFAULT_MAX_FRAMES},
    parameters::sanitize_format,
    sampler::effective_frame_rate,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framex extract input.mp4 --interval 5 --max-frames 100 --out frames.zip\n  framex extract https://example.com/clip.mp4 --format jpg --progress\n  framex probe input.mp4 --interval 2 --json\n  framex completions zsh > _framex";

/// Exit status for failures caused by the request or its input.
const EXIT_CLIENT_ERROR: i32 = 2;
/// Exit status for internal faults.
const EXIT_SERVER_ERROR: i32 = 1;

#[derive(Debug, Parser)]
#[command(
    name = "framex",
    version,
    about = "Sample frames from a video at a fixed interval into a ZIP archive",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while sampling.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting an existing output file.
    #[arg(long, global = true)]
    overwrite: bool,

    /// FFmpeg console log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract frames into a ZIP archive.
    #[command(
        about = "Extract frames into a ZIP archive",
        after_help = "Examples:\n  framex extract input.mp4\n  framex extract input.mp4 --interval 1 --max-frames 10 --format jpg --out stills.zip"
    )]
    Extract {
        /// Input video path or http(s) URL.
        input: String,
        /// Maximum number of frames to keep.
        #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
        max_frames: u32,
        /// Seconds between kept frames.
        #[arg(long, default_value_t = DEFAULT_INTERVAL_SECONDS, value_parser = clap::value_parser!(u32).range(1..))]
        interval: u32,
        /// Image format for each frame (png, jpg, bmp, webp, tiff, ...).
        #[arg(long, default_value = DEFAULT_FORMAT)]
        format: String,
        /// Output archive path.
        #[arg(long, default_value = ARCHIVE_FILE_NAME)]
        out: PathBuf,
    },

    /// Print the frame rate and resulting stride for a video.
    #[command(
        about = "Show frame rate and sampling stride",
        visible_alias = "info",
        after_help = "Examples:\n  framex probe input.mp4\n  framex probe input.mp4 --interval 2 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,
        /// Seconds between kept frames.
        #[arg(long, default_value_t = DEFAULT_INTERVAL_SECONDS, value_parser = clap::value_parser!(u32).range(1..))]
        interval: u32,
        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_log_level(value: &str) -> Option<log::LevelFilter> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" | "none" => Some(log::LevelFilter::Off),
        "warning" => Some(log::LevelFilter::Warn),
        other => log::LevelFilter::from_str(other).ok(),
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if !overwrite {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("overwriting {}", path.display()).yellow()
        );
    }
    Ok(())
}

fn init_logging(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        framex::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

/// Drives an indicatif bar from sampling progress.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(max_frames: u32) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(u64::from(max_frames));
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        match info.operation {
            OperationType::Acquisition => self.bar.set_message("input staged"),
            OperationType::FrameSampling => {
                self.bar.set_position(info.current);
                if let Some(frame) = info.current_frame {
                    self.bar.set_message(format!("frame {frame}"));
                }
            }
            OperationType::Archiving => self.bar.finish_with_message("archived"),
            _ => {}
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global)?;

    match cli.command {
        Commands::Extract {
            input,
            max_frames,
            interval,
            format,
            out,
        } => {
            ensure_writable_path(&out, cli.global.overwrite)?;

            let request = SampleRequest::new()
                .with_max_frames(max_frames)
                .with_interval_seconds(interval)
                .with_format(sanitize_format(&format));

            let mut options = ExtractOptions::new();
            if cli.global.progress {
                options = options.with_progress(Arc::new(TerminalProgress::new(max_frames)?));
            }

            let archive =
                FrameExtractor::new(options).extract(VideoInput::from_arg(&input), &request)?;

            if cli.global.verbose {
                archive.for_each(|name, bytes| eprintln!("{name}: {} bytes", bytes.len()));
            }

            fs::write(&out, archive.to_zip()?)?;
            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Archived {} frame(s) to {}", archive.len(), out.display()).green()
            );
        }
        Commands::Probe {
            input,
            interval,
            json,
        } => {
            let decoder = FfmpegDecoder::open(&input)?;
            let reported = decoder.frame_rate();
            let effective = effective_frame_rate(reported);
            let stride = SampleRequest::new()
                .with_interval_seconds(interval)
                .stride(reported);
            let (width, height) = decoder.dimensions();

            if json {
                let payload = json!({
                    "path": input.display().to_string(),
                    "width": width,
                    "height": height,
                    "reported_fps": reported,
                    "effective_fps": effective,
                    "interval_seconds": interval,
                    "stride": stride,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Video: {width}x{height}");
                match reported {
                    Some(fps) => println!("Frame rate: {fps:.3} fps"),
                    None => println!("Frame rate: unknown (assuming {effective} fps)"),
                }
                println!("Stride: every {stride} frame(s) for a {interval}s interval");
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framex", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn exit_code(error: &(dyn std::error::Error + 'static)) -> i32 {
    match error.downcast_ref::<FramexError>() {
        Some(framex_error) if framex_error.is_client_error() => EXIT_CLIENT_ERROR,
        Some(_) => EXIT_SERVER_ERROR,
        // CLI-level validation failures.
        None => EXIT_CLIENT_ERROR,
    }
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(exit_code(error.as_ref()));
    }
}
