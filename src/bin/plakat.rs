use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "plakat", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single poster as a PNG.
    Poster(PosterArgs),
    /// Render a board of seeded variants into a directory.
    Board(BoardArgs),
}

#[derive(Parser, Debug)]
struct PosterArgs {
    /// Brand visual configuration JSON.
    #[arg(long)]
    brand: PathBuf,

    /// Headline text.
    #[arg(long)]
    headline: String,

    /// Accent line above the headline.
    #[arg(long)]
    eyebrow: Option<String>,

    /// Smaller line below the headline.
    #[arg(long)]
    caption: Option<String>,

    /// Content image to composite.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Canvas preset.
    #[arg(long, value_enum, default_value_t = RatioChoice::Square)]
    ratio: RatioChoice,

    /// Logo override, used when the brand declares none.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Suppress the logo layer.
    #[arg(long)]
    no_logo: bool,

    /// Topic string feeding the deterministic style roll.
    #[arg(long)]
    topic: Option<String>,

    /// Explicit seed; takes precedence over the topic.
    #[arg(long)]
    seed: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BoardArgs {
    /// Brand visual configuration JSON.
    #[arg(long)]
    brand: PathBuf,

    /// Headline text.
    #[arg(long)]
    headline: String,

    /// Content image to composite.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Canvas preset.
    #[arg(long, value_enum, default_value_t = RatioChoice::Square)]
    ratio: RatioChoice,

    /// Topic string feeding the deterministic style roll.
    #[arg(long)]
    topic: Option<String>,

    /// Number of seeded variants to render.
    #[arg(long, default_value_t = 9)]
    count: u32,

    /// Output directory for the variant PNGs.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RatioChoice {
    Square,
    Portrait,
    Story,
    Landscape,
    Wide,
}

impl From<RatioChoice> for plakat::AspectRatio {
    fn from(choice: RatioChoice) -> Self {
        match choice {
            RatioChoice::Square => plakat::AspectRatio::Square,
            RatioChoice::Portrait => plakat::AspectRatio::Portrait,
            RatioChoice::Story => plakat::AspectRatio::Story,
            RatioChoice::Landscape => plakat::AspectRatio::Landscape,
            RatioChoice::Wide => plakat::AspectRatio::Wide,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Poster(args) => cmd_poster(args),
        Command::Board(args) => cmd_board(args),
    }
}

fn read_brand_json(path: &Path) -> anyhow::Result<plakat::BrandVisual> {
    let f = File::open(path).with_context(|| format!("open brand config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let visual: plakat::BrandVisual =
        serde_json::from_reader(r).with_context(|| "parse brand config JSON")?;
    Ok(visual)
}

fn brand_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "brand".to_string())
}

fn read_image_bytes(path: Option<&Path>) -> anyhow::Result<Option<Arc<Vec<u8>>>> {
    match path {
        Some(p) => {
            let bytes = std::fs::read(p)
                .with_context(|| format!("read content image '{}'", p.display()))?;
            Ok(Some(Arc::new(bytes)))
        }
        None => Ok(None),
    }
}

fn cmd_poster(args: PosterArgs) -> anyhow::Result<()> {
    let visual = read_brand_json(&args.brand)?;

    let request = plakat::RenderRequest {
        brand_id: brand_id_for(&args.brand),
        headline: args.headline,
        eyebrow: args.eyebrow,
        caption: args.caption,
        content_image: read_image_bytes(args.image.as_deref())?,
        ratio: args.ratio.into(),
        logo_path: args.logo,
        no_logo: args.no_logo,
        topic: args.topic,
        seed: args.seed,
    };

    let png = plakat::render_poster(&visual, &request)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_board(args: BoardArgs) -> anyhow::Result<()> {
    let visual = read_brand_json(&args.brand)?;

    let request = plakat::RenderRequest {
        brand_id: brand_id_for(&args.brand),
        headline: args.headline,
        eyebrow: None,
        caption: None,
        content_image: read_image_bytes(args.image.as_deref())?,
        ratio: args.ratio.into(),
        logo_path: None,
        no_logo: false,
        topic: args.topic.clone(),
        seed: None,
    };

    let base = args.topic.as_deref().unwrap_or("board");
    let seeds: Vec<String> = (0..args.count).map(|i| format!("{base}-{i}")).collect();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let variants = plakat::render_variants(&visual, &request, &seeds);
    let mut written = 0usize;
    for (i, variant) in variants.iter().enumerate() {
        let Some(png) = variant else {
            continue;
        };
        let out = args.out_dir.join(format!("variant-{i:02}.png"));
        std::fs::write(&out, png).with_context(|| format!("write png '{}'", out.display()))?;
        written += 1;
    }

    eprintln!(
        "wrote {written}/{} variants to {}",
        variants.len(),
        args.out_dir.display()
    );
    Ok(())
}
