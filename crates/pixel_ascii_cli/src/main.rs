mod settings;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pixel_ascii::{AsciiRenderer, RampPreset, RenderOptions, TextGrid};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use walkdir::WalkDir;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert images to monospace ASCII art")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render ASCII art to stdout for a quick preview
    Preview(PreviewArgs),
    /// Convert an image to ASCII and save it as a text file
    Convert(ConvertArgs),
    /// Convert every image under a directory to text files
    Batch(BatchArgs),
    /// Print the effective configuration as TOML
    ShowConfig(RenderArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input image path
    input: PathBuf,
    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input image path
    input: PathBuf,
    /// Output file path (defaults to the input path with a .txt extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory searched recursively for images
    input: PathBuf,
    /// Output directory for text files
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    render: RenderArgs,
}

/// Flags that override the configuration file.
#[derive(Args, Debug, Clone, Default)]
struct RenderArgs {
    /// Target width in characters
    #[arg(long)]
    width: Option<u32>,
    /// Character cell aspect ratio (width / height)
    #[arg(long)]
    aspect: Option<f64>,
    /// Invert luminance before picking glyphs
    #[arg(long)]
    invert: bool,
    /// Glyph ramp preset
    #[arg(long, value_enum)]
    ramp: Option<RampChoice>,
    /// Custom glyph ramp, lightest first (overrides --ramp)
    #[arg(long)]
    glyphs: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RampChoice {
    Punctuation,
    Alphanumeric,
    Blocks,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Preview(args) => preview(args, settings),
        Commands::Convert(args) => convert(args, settings),
        Commands::Batch(args) => batch(args, settings),
        Commands::ShowConfig(args) => show_config(args, settings),
    }
}

fn preview(args: PreviewArgs, settings: Settings) -> Result<()> {
    let options = args.render.resolve(settings)?;
    let grid = render_file(&args.input, &options)?;
    grid.write_to(io::stdout().lock()).context("failed to write preview")
}

fn convert(args: ConvertArgs, settings: Settings) -> Result<()> {
    let options = args.render.resolve(settings)?;
    let output = args.output.unwrap_or_else(|| args.input.with_extension("txt"));

    let grid = render_file(&args.input, &options)?;
    write_grid(&grid, &output)?;
    info!(output = %output.display(), rows = grid.height(), columns = grid.columns(), "wrote ASCII art");
    Ok(())
}

fn batch(args: BatchArgs, settings: Settings) -> Result<()> {
    let options = args.render.resolve(settings)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let inputs = find_images(&args.input)?;
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images {msg}",
        )?
        .progress_chars("=> "),
    );

    let outputs = batch_output_paths(&args.input, &args.out_dir, &inputs);
    let renderer = AsciiRenderer;
    let mut written = 0usize;
    for (input, output) in inputs.iter().zip(outputs) {
        let Some(output) = output else {
            warn!(input = %input.display(), "output name already taken, skipping image");
            progress.inc(1);
            continue;
        };
        match renderer.render_path(input, &options) {
            Ok(grid) => {
                if let Some(parent) = output.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {:?}", parent))?;
                }
                write_grid(&grid, &output)?;
                written += 1;
            },
            Err(err) => warn!(input = %input.display(), error = %err, "skipping image"),
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!("{} of {} images written", written, inputs.len()));
    info!(written, total = inputs.len(), out_dir = %args.out_dir.display(), "batch finished");
    Ok(())
}

fn show_config(args: RenderArgs, settings: Settings) -> Result<()> {
    let settings = args.apply(settings);
    settings.validate()?;
    print!("{}", toml::to_string_pretty(&settings).context("failed to serialize configuration")?);
    Ok(())
}

fn render_file(input: &Path, options: &RenderOptions) -> Result<TextGrid> {
    AsciiRenderer
        .render_path(input, options)
        .with_context(|| format!("failed to render {:?}", input))
}

fn write_grid(grid: &TextGrid, output: &Path) -> Result<()> {
    let file = File::create(output).with_context(|| format!("failed to create {:?}", output))?;
    grid.write_to(BufWriter::new(file))
        .with_context(|| format!("failed to write {:?}", output))
}

fn find_images(root: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| image::ImageFormat::from_path(path).is_ok())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", root);
    }
    debug!(count = entries.len(), root = %root.display(), "found images");
    Ok(entries)
}

/// Mirrors the input's position below `root` inside `out_dir`.
fn batch_target(root: &Path, out_dir: &Path, input: &Path) -> PathBuf {
    let relative = input.strip_prefix(root).unwrap_or(input);
    let relative = match relative.file_name() {
        Some(_) => relative.to_path_buf(),
        None => PathBuf::from(input.file_name().unwrap_or_default()),
    };
    out_dir.join(relative)
}

/// One `.txt` path per input. Inputs sharing a stem (`a.png`, `a.bmp`) keep their
/// source extension (`a.png.txt`); any name still taken after that maps to `None`.
fn batch_output_paths(root: &Path, out_dir: &Path, inputs: &[PathBuf]) -> Vec<Option<PathBuf>> {
    let targets: Vec<PathBuf> =
        inputs.iter().map(|input| batch_target(root, out_dir, input)).collect();

    let mut stems: HashMap<PathBuf, usize> = HashMap::new();
    for target in &targets {
        *stems.entry(target.with_extension("txt")).or_default() += 1;
    }

    let mut taken = HashSet::new();
    targets
        .into_iter()
        .map(|target| {
            let plain = target.with_extension("txt");
            let output = if stems[&plain] > 1 {
                let mut name = target.into_os_string();
                name.push(".txt");
                PathBuf::from(name)
            } else {
                plain
            };
            taken.insert(output.clone()).then_some(output)
        })
        .collect()
}

impl RenderArgs {
    fn apply(self, mut settings: Settings) -> Settings {
        let render = &mut settings.render;
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(aspect) = self.aspect {
            render.aspect = aspect;
        }
        if self.invert {
            render.invert = true;
        }
        if let Some(ramp) = self.ramp {
            render.ramp = ramp.to_preset();
            render.glyphs = None;
        }
        if let Some(glyphs) = self.glyphs {
            render.glyphs = Some(glyphs);
        }
        settings
    }

    fn resolve(self, settings: Settings) -> Result<RenderOptions> {
        let settings = self.apply(settings);
        settings.validate()?;
        settings.render_options()
    }
}

impl RampChoice {
    fn to_preset(self) -> RampPreset {
        match self {
            RampChoice::Punctuation => RampPreset::Punctuation,
            RampChoice::Alphanumeric => RampPreset::Alphanumeric,
            RampChoice::Blocks => RampPreset::Blocks,
        }
    }
}
