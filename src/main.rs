use clap::{Parser, Subcommand};
use pagefit::imaging::{
    ImageBackend, RustBackend, jpeg_encoder_available, normalize_file, read_density_from_file,
};
use pagefit::{config, output, process};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Flags that override values from `pagefit.toml`.
#[derive(clap::Args, Clone)]
struct OverrideArgs {
    /// Output width in pixels
    #[arg(long, global = true)]
    width: Option<u32>,
    /// Output height in pixels
    #[arg(long, global = true)]
    height: Option<u32>,
    /// JFIF density in pixels per inch (0 = leave unset)
    #[arg(long, global = true)]
    dpi: Option<u32>,
    /// Compression factor in (0, 1] (0 = encoder default)
    #[arg(long, global = true)]
    quality: Option<f32>,
}

impl From<&OverrideArgs> for config::Overrides {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            dpi: args.dpi,
            quality: args.quality,
        }
    }
}

#[derive(Parser)]
#[command(name = "pagefit")]
#[command(version, about = "Normalize images into fixed-size, print-ready JPEGs")]
#[command(long_about = "\
Normalize images into fixed-size, print-ready JPEGs

Every image is resized to the target width (Lanczos3, aspect ratio kept),
then cropped or padded with white to the target height, both centred.
The result is written as JPEG with the configured quality and a JFIF
density tag in pixels per inch.

Settings come from pagefit.toml in the current directory (or --config),
overridden by --width/--height/--dpi/--quality.

Run 'pagefit gen-config' to print a documented pagefit.toml.")]
struct Cli {
    /// Config file (defaults to ./pagefit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize every image in a directory
    Run {
        /// Directory of source images
        input: PathBuf,
        /// Directory for the JPEG outputs (created if missing)
        output: PathBuf,
        /// Directory of reference exports to compare output sizes against
        #[arg(long)]
        reference: Option<PathBuf>,
        /// Write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Normalize a single image
    File {
        /// Source image
        input: PathBuf,
        /// Destination JPEG (replaced if it exists)
        output: PathBuf,
    },
    /// Print dimensions and JFIF density of a JPEG
    Inspect {
        /// JPEG file to inspect
        path: PathBuf,
    },
    /// Print a stock pagefit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagefit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let overrides = config::Overrides::from(&cli.overrides);

    match cli.command {
        Command::Run {
            input,
            output: output_dir,
            reference,
            report,
        } => {
            let settings = load_settings(cli.config.as_deref(), &overrides)?;
            let paths = process::BatchPaths {
                input_dir: input,
                output_dir,
                reference_dir: reference,
            };
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_lines(&output::format_process_event(&event));
                }
            });
            let result = process::process(&paths, &settings.normalize_config(), Some(tx));
            printer.join().ok();
            let result = result?;
            output::print_lines(&output::format_summary(&result));
            if let Some(report_path) = report {
                process::write_report(&result, &report_path)?;
                println!("Report: {}", report_path.display());
            }
        }
        Command::File { input, output } => {
            let settings = load_settings(cli.config.as_deref(), &overrides)?;
            let dims = normalize_file(
                &RustBackend::new(),
                &input,
                &output,
                &settings.normalize_config(),
            )?;
            println!(
                "{} → {} ({}x{})",
                input.display(),
                output.display(),
                dims.width,
                dims.height
            );
        }
        Command::Inspect { path } => {
            let dims = RustBackend::new().identify(&path).ok();
            let density = read_density_from_file(&path);
            output::print_lines(&output::format_inspect(&path, dims, density));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve settings and make sure a JPEG encoder exists before touching files.
fn load_settings(
    file: Option<&std::path::Path>,
    overrides: &config::Overrides,
) -> Result<config::Config, Box<dyn std::error::Error>> {
    if !jpeg_encoder_available() {
        return Err(pagefit::imaging::ImagingError::MissingEncoder.into());
    }
    let cwd = std::env::current_dir()?;
    let settings = config::load_layered(&cwd, file, overrides)?;
    tracing::debug!(?settings, "Resolved settings");
    Ok(settings)
}
