use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thumbnailer::config::{self, GeneratorConfig, TargetConfig};
use thumbnailer::imaging::{OutputFormat, Quality};
use thumbnailer::output::{self, SourceReport};
use thumbnailer::{DimensionSpec, Generator, persist, scan};

/// Sizing flags shared by commands that resize.
#[derive(clap::Args, Clone)]
struct SizeArgs {
    /// Output width in pixels (height follows the aspect ratio unless given)
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (width follows the aspect ratio unless given)
    #[arg(long)]
    height: Option<u32>,

    /// Scale factor, 0.4 = 40%. Without a value the configured default is used.
    /// Takes precedence over --width and --height.
    #[arg(long, num_args = 0..=1, value_name = "P")]
    percentage: Option<Option<f64>>,
}

impl SizeArgs {
    /// The dimension spec these flags describe, if any were given.
    fn to_spec(&self, target: &TargetConfig) -> Option<DimensionSpec> {
        match self.percentage {
            Some(Some(p)) => return Some(DimensionSpec::percentage(p)),
            Some(None) => return Some(DimensionSpec::percentage(target.percentage)),
            None => {}
        }
        if self.width.is_none() && self.height.is_none() {
            return None;
        }
        Some(DimensionSpec {
            width: self.width,
            height: self.height,
            ..DimensionSpec::default()
        })
    }
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Source images or directories to search for images
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Image used when a source cannot be opened
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Prefix prepended to every output filename
    #[arg(long)]
    prefix: Option<String>,

    /// Output filename used instead of the source's name
    #[arg(long)]
    name: Option<String>,

    /// Output encoding (jpeg, png, tiff, bmp, webp)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u32>,

    #[command(flatten)]
    size: SizeArgs,

    /// Write a JSON report of every result to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "thumbnailer")]
#[command(about = "Generate resized copies of images at configured dimensions")]
#[command(long_about = "\
Generate resized copies of images at configured dimensions

Every source image is resized once per configured dimension and written to
the destination directory as <prefix><filename>. Images found by walking a
directory keep their subdirectory below the destination:

  thumbnailer.toml
  ├── destination = \"thumbnails\"
  ├── [[dimensions]] width = 640, prefix = \"md-\"   → thumbnails/md-cat.jpg
  └── [[dimensions]] percentage = 0.1, prefix = \"sm-\" → thumbnails/sm-cat.jpg

Sizing precedence per dimension (first match wins):
  percentage → width+height (exact) → width → height

Dimensions are produced in order; by default each one is resized from the
previous result, so list them from largest to smallest.

Run 'thumbnailer gen-config' to generate a documented thumbnailer.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./thumbnailer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Produce every configured dimension for each source
    Generate(GenerateArgs),
    /// Resize a single image to an explicit output path
    Resize {
        source: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
        /// Output encoding (default: inferred from the output extension)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// Validate the config and list dimensions that cannot be resolved
    Check,
    /// Print a stock thumbnailer.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            let mut config = apply_overrides(load_config(cli.config.as_deref())?, &args)?;
            if let Some(spec) = args.size.to_spec(&config.target) {
                config.dimensions.push(spec);
            }
            init_thread_pool(&config.processing);

            let sources = scan::collect_sources(&args.sources, Some(config.destination.as_path()));
            let (sources, collisions) = scan::split_collisions(sources, config.name.as_deref());
            let generator = Generator::new(config);

            let mut reports: Vec<SourceReport> = sources
                .into_par_iter()
                .map(|source| {
                    let generator = generator.in_subdirectory(&source.subdir);
                    generate_source(&generator, source.path, args.fallback.as_deref())
                })
                .collect();
            reports.extend(collisions.into_iter().map(|(source, first)| {
                SourceReport::aborted(
                    source.path,
                    format!("output would overwrite that of {}", first.display()),
                )
            }));

            output::print_generate_output(&reports, &generator.config().dimensions);
            if let Some(report_path) = &args.report {
                std::fs::write(report_path, serde_json::to_string_pretty(&reports)?)?;
            }

            let failed = reports.iter().filter(|r| r.has_failures()).count();
            if failed > 0 {
                return Err(format!("{failed} of {} sources had failures", reports.len()).into());
            }
        }
        Command::Resize {
            source,
            output,
            size,
            format,
        } => {
            let generator = Generator::new(load_config(cli.config.as_deref())?);
            let spec = size
                .to_spec(&generator.config().target)
                .unwrap_or_else(|| generator.default_dimension());
            let format = format
                .or_else(|| OutputFormat::from_path(&output))
                .unwrap_or(generator.config().encoding.format);

            let image = generator.open(&source)?;
            let pixels = generator.processed_image(&image, &spec)?;
            let result = persist::save_raw(
                generator.backend(),
                Some(&pixels),
                &output,
                format,
                generator.config().encoding.quality,
            )?;
            output::print_resize_output(&spec.label(), &result);
        }
        Command::Check => {
            let config = load_config(cli.config.as_deref())?;
            output::print_check_output(&config);
            let invalid = config.unresolvable_dimensions();
            if !invalid.is_empty() {
                return Err(format!("{} invalid dimension entries", invalid.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config named on the command line, or `./thumbnailer.toml` when
/// present, or the stock defaults.
fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Layer `generate` flags over the loaded config and re-validate.
fn apply_overrides(
    mut config: GeneratorConfig,
    args: &GenerateArgs,
) -> Result<GeneratorConfig, config::ConfigError> {
    if let Some(destination) = &args.destination {
        config.destination = destination.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(name) = &args.name {
        config.name = Some(name.clone());
    }
    if let Some(format) = args.format {
        config.encoding.format = format;
    }
    if let Some(quality) = args.quality {
        config.encoding.quality = Quality(quality);
    }
    config.validate()?;
    Ok(config)
}

/// Open one source and produce all of its dimensions.
fn generate_source(generator: &Generator, source: PathBuf, fallback: Option<&Path>) -> SourceReport {
    let mut image = match generator.open_with_fallback(&source, fallback) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("cannot open {}: {}", source.display(), e);
            return SourceReport::aborted(source, e);
        }
    };
    match generator.generate(&mut image) {
        Ok(results) => SourceReport::completed(source, results),
        Err(e) => SourceReport::aborted(source, e),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
