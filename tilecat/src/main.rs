use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use log::info;
use rawtile::{DecodeOptions, OutputTile, Remap, TileDecoder, TileRequest};
use std::io::{self, BufWriter, Write};

/// A raw elevation tile multitool.
#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: SubCmd,
}

#[derive(Clone, Debug, Subcommand)]
enum SubCmd {
    /// Decode a tile and print its values.
    Decode(DecodeArgs),
    /// Render a tile as an image.
    Render(RenderArgs),
}

#[derive(Args, Clone, Debug)]
struct TileArgs {
    /// Source raw sample file.
    src: Utf8PathBuf,

    /// Tile width.
    #[arg(long)]
    dx: usize,

    /// Tile height.
    #[arg(long)]
    dy: usize,

    /// Padding columns read in addition to `dx`.
    #[arg(long, default_value_t = 0)]
    x_offset: usize,

    /// Padding rows read in addition to `dy`.
    #[arg(long, default_value_t = 0)]
    y_offset: usize,

    /// Bytes per stored sample (1, 2, or 4).
    #[arg(long, default_value_t = 2)]
    word_size: usize,

    /// Walk the whole padded extent instead of cropping to `dx × dy`.
    #[arg(long)]
    padded: bool,

    /// Zero fill instead of failing when the file is too short.
    #[arg(long)]
    allow_short_read: bool,
}

#[derive(Args, Clone, Debug)]
struct DecodeArgs {
    #[command(flatten)]
    tile: TileArgs,

    /// Print JSON instead of whitespace separated rows.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone, Debug)]
struct RenderArgs {
    #[command(flatten)]
    tile: TileArgs,

    /// Optional output file name.
    ///
    /// Image format will be based on `dest`'s extension.
    ///
    /// If not specified, a png will be written with the source's
    /// basename in the source's dir.
    dest: Option<Utf8PathBuf>,
}

impl TileArgs {
    fn load(&self) -> Result<OutputTile> {
        let remap = if self.padded {
            Remap::Padded
        } else {
            Remap::Cropped
        };
        let req = TileRequest::new(&self.src, (self.dx, self.dy))
            .with_offset((self.x_offset, self.y_offset))
            .with_word_size(self.word_size);
        let options = DecodeOptions::default()
            .remap(remap)
            .allow_short_read(self.allow_short_read);
        let mut tile = OutputTile::for_request(&req, remap)?;
        TileDecoder::new()
            .with_options(options)
            .decode_tile(&req, &mut tile)
            .with_context(|| format!("decoding {}", self.src))?;
        Ok(tile)
    }
}

fn decode(DecodeArgs { tile, json }: DecodeArgs) -> Result<()> {
    let tile = tile.load()?;
    let mut out = BufWriter::new(io::stdout().lock());
    if json {
        serde_json::to_writer(&mut out, &tile)?;
        writeln!(out)?;
    } else {
        for row in tile.rows() {
            let mut values = row.iter();
            if let Some(first) = values.next() {
                write!(out, "{first}")?;
            }
            for v in values {
                write!(out, " {v}")?;
            }
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn render(RenderArgs { tile: args, dest }: RenderArgs) -> Result<()> {
    let tile = args.load()?;
    let src = &args.src;
    let out = match dest {
        None => {
            let mut out = src.clone();
            out.set_extension("png");
            out
        }
        Some(mut out) => {
            if out.is_dir() {
                let name = src.file_name().context("source has no file name")?;
                out.push(name);
                out.set_extension("png");
            }
            out
        }
    };

    info!("writing to {out}");
    if let Some("png" | "tif" | "tiff") = out.extension() {
        tile.to_image::<u16>().save(&out)?;
    } else {
        tile.to_image::<u8>().save(&out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        SubCmd::Decode(args) => decode(args),
        SubCmd::Render(args) => render(args),
    }
}
