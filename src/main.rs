use clap::{Parser, Subcommand};
use polagrid::compose::{self, CaptionPlacement, Rgb};
use polagrid::config::CollageConfig;
use polagrid::font::FontCache;
use polagrid::{config, encode};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "polagrid")]
#[command(about = "Polaroid-style photo collage composer")]
#[command(long_about = "\
Polaroid-style photo collage composer

Each photo is center-cropped to a square, sized from the print DPI, wrapped
in a white instant-film frame, and tiled into a near-square grid. An optional
caption is drawn in a reserved band — repeated under every photo, or once
below the whole grid.

  polagrid compose a.jpg b.jpg c.jpg d.jpg -o collage.jpg
  polagrid compose *.jpg --caption \"Summer '25\" --font \"Permanent Marker\"
  polagrid compose *.png --border-px 30 --dpi 600 -o print.png

Defaults come from an optional config.toml (see 'polagrid gen-config');
command-line flags override it. Fonts resolve by display name inside the
fonts directory, by .ttf/.otf path, or by http(s) URL (fetched once).")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Flag overrides for the composition config. Every flag is optional; unset
/// flags keep the config/default value.
#[derive(clap::Args)]
struct ComposeArgs {
    /// Input images (JPEG/PNG), one tile each, in grid order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Config file with defaults for the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame thickness around each photo (px)
    #[arg(long)]
    border_px: Option<u32>,

    /// Print resolution; scales tile size and is embedded as metadata
    #[arg(long)]
    dpi: Option<u32>,

    /// Caption text (empty = no caption)
    #[arg(long)]
    caption: Option<String>,

    /// Caption font size (px)
    #[arg(long)]
    caption_size: Option<u32>,

    /// Caption color as #rrggbb
    #[arg(long, value_parser = Rgb::from_hex)]
    caption_color: Option<Rgb>,

    /// Caption placement: per-tile or shared
    #[arg(long, value_enum)]
    placement: Option<PlacementArg>,

    /// Caption font: display name, .ttf/.otf path, or http(s) URL
    #[arg(long)]
    font: Option<String>,

    /// Directory searched for named fonts
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Output file (.jpg/.jpeg or .png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum PlacementArg {
    PerTile,
    Shared,
}

impl From<PlacementArg> for CaptionPlacement {
    fn from(arg: PlacementArg) -> Self {
        match arg {
            PlacementArg::PerTile => CaptionPlacement::PerTile,
            PlacementArg::Shared => CaptionPlacement::Shared,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compose a collage from the given images
    Compose(ComposeArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compose(args) => run_compose(args),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    }
}

/// Merge flag overrides into the loaded config.
fn apply_overrides(config: &mut CollageConfig, args: &ComposeArgs) {
    if let Some(border_px) = args.border_px {
        config.layout.border_px = border_px;
    }
    if let Some(dpi) = args.dpi {
        config.layout.dpi = dpi;
    }
    if let Some(text) = &args.caption {
        config.caption.text = text.clone();
    }
    if let Some(size) = args.caption_size {
        config.caption.font_size = size;
    }
    if let Some(color) = args.caption_color {
        config.caption.color = format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
    }
    if let Some(placement) = args.placement {
        config.caption.placement = placement.into();
    }
    if let Some(font) = &args.font {
        config.font.family = font.clone();
    }
    if let Some(dir) = &args.fonts_dir {
        config.font.dir = dir.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(quality) = args.quality {
        config.output.quality = quality;
    }
}

fn run_compose(args: ComposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => CollageConfig::load(path)?,
        None => CollageConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    let params = config.params()?;

    // Resolve the font before any pixel work: a bad font reference should
    // fail fast, not after decoding a hundred photos.
    let font = if params.caption.is_some() {
        let mut cache = FontCache::new();
        Some(cache.load(&config.font_source())?)
    } else {
        None
    };

    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let image = image::open(path)
            .map_err(|e| format!("failed to decode {}: {e}", path.display()))?;
        images.push(image);
    }

    let (columns, rows) = compose::grid_dimensions(images.len());
    println!(
        "==> Composing {} photo{} into a {columns}x{rows} grid",
        images.len(),
        if images.len() == 1 { "" } else { "s" },
    );

    let canvas = compose::compose(&images, &params, font.as_ref())?;

    let quality = compose::JpegQuality::new(config.output.quality);
    let bytes = encode::write_collage(&canvas, &config.output.path, quality, params.dpi)?;
    println!(
        "==> Wrote {}x{} collage ({} KiB, {} dpi) to {}",
        canvas.width(),
        canvas.height(),
        bytes.len() / 1024,
        params.dpi,
        config.output.path.display(),
    );

    Ok(())
}
