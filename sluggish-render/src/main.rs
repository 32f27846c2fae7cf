// sluggish-render: renders code points from a .sluggish font file into
// grayscale .tga images.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use sluggish_font::{Rasterizer, SluggishFont};

#[derive(Parser)]
#[command(
    name = "sluggish-render",
    about = "Render code points from a .sluggish font into .tga images"
)]
struct Cli {
    /// Input .sluggish font file
    input: PathBuf,

    /// Inclusive range of Unicode code points to render, e.g. "33,126"
    #[arg(long, default_value = "65,65", value_parser = parse_range)]
    range: (u32, u32),

    /// Output image resolution as "WIDTH,HEIGHT"
    #[arg(long, default_value = "1024,1024", value_parser = parse_resolution)]
    res: (u32, u32),

    /// Use all the available space instead of preserving the aspect ratio
    #[arg(long)]
    stretch: bool,
}

fn parse_range(s: &str) -> Result<(u32, u32), String> {
    let (start, end) = s
        .split_once(',')
        .ok_or_else(|| format!("expected START,END, got '{s}'"))?;
    let start: u32 = start.trim().parse().map_err(|e| format!("bad start: {e}"))?;
    let end: u32 = end.trim().parse().map_err(|e| format!("bad end: {e}"))?;
    if end < start {
        return Err(format!("end {end} is below start {start}"));
    }
    Ok((start, end))
}

fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(',')
        .ok_or_else(|| format!("expected WIDTH,HEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w <= 16 || h <= 16 {
        return Err("resolution must be larger than 16x16".into());
    }
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let file = File::open(&cli.input)
        .with_context(|| format!("failed to open font file: {}", cli.input.display()))?;
    let font = SluggishFont::read_from(&mut BufReader::new(file))
        .with_context(|| format!("failed to load font file: {}", cli.input.display()))?;

    let (start, end) = cli.range;
    let (width, height) = cli.res;
    info!("range: U+{start:04X} -> U+{end:04X}");
    info!("resolution: {width}x{height}");

    let base = cli.input.with_extension("");
    let suffix = if cli.stretch { "_stretched" } else { "" };
    let rasterizer = Rasterizer::new(&font);
    let mut failures = 0u32;

    for code_point in start..=end {
        let output = format!(
            "{}_U+{code_point:04X}_{width}x{height}{suffix}.tga",
            base.display()
        );

        let started = Instant::now();
        let img = match rasterizer.render(code_point, width, height, !cli.stretch) {
            Ok(img) => img,
            Err(e) => {
                error!("{e}, skipping '{output}'");
                failures += 1;
                continue;
            }
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        image::save_buffer_with_format(
            &output,
            &img.data,
            img.width,
            img.height,
            image::ExtendedColorType::L8,
            image::ImageFormat::Tga,
        )
        .with_context(|| format!("failed to write output image file '{output}'"))?;

        let pixels = (width as u64) * (height as u64);
        info!("'{output}' done in {elapsed_ms:.0} ms");
        info!("speed: {:.1} ms per megapixel", elapsed_ms * 1e6 / pixels as f64);
    }

    if failures > 0 {
        info!("code points skipped: {failures}");
    }
    Ok(())
}
