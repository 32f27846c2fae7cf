// sluggish-gen: reads a TrueType font file and writes a .sluggish font file
// next to it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::Parser;
use log::info;
use sluggish_font::{Encoder, Font, EXTENSION, MAX_BAND_COUNT};

#[derive(Parser)]
#[command(name = "sluggish-gen", about = "Encode a TrueType font into a .sluggish font")]
struct Cli {
    /// Input TrueType font file
    input: PathBuf,

    /// Maximum number of horizontal and vertical bands per glyph
    #[arg(long, default_value_t = 16)]
    bands: u32,

    /// Inclusive range of Unicode code points to encode, e.g. "33,126"
    #[arg(long, default_value = "33,126", value_parser = parse_range)]
    range: (u32, u32),
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

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    ensure!(
        (1..=MAX_BAND_COUNT).contains(&cli.bands),
        "band count must be in [1, {MAX_BAND_COUNT}]"
    );

    let data = fs::read(&cli.input)
        .with_context(|| format!("failed to load file into memory: {}", cli.input.display()))?;
    let font = Font::from_bytes(&data)
        .with_context(|| format!("failed to parse font file: {}", cli.input.display()))?;

    let mut encoder = Encoder::new(cli.bands);
    let (start, end) = cli.range;
    for code_point in start..=end {
        encoder.encode_code_point(&font, code_point)?;
    }

    let ignored = encoder.ignored();
    let encoded = encoder
        .finish()
        .with_context(|| format!("failed to encode: {}", cli.input.display()))?;

    let output = cli.input.with_extension(EXTENSION);
    let file = File::create(&output)
        .with_context(|| format!("failed to open output file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    encoded
        .write_to(&mut writer)
        .with_context(|| format!("failed to write: {}", output.display()))?;
    writer.flush()?;

    info!("'{}' -> '{}' done", cli.input.display(), output.display());
    info!("code points ignored: {ignored}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_range;

    #[test]
    fn range_parsing() {
        assert_eq!(parse_range("33,126").unwrap(), (33, 126));
        assert_eq!(parse_range(" 65 , 90 ").unwrap(), (65, 90));
        assert!(parse_range("90,65").is_err());
        assert!(parse_range("65").is_err());
    }
}
