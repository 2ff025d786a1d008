use clap::Parser;

use crate::image::DEFAULT_IMAGE_SIZE;

fn parse_size_with_hex(input: &str) -> Result<usize, String> {
    let s = input.trim();
    let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).map_err(|e| format!("invalid hex value '{input}': {e}"))?
    } else {
        s.parse::<usize>()
            .map_err(|e| format!("invalid decimal value '{input}': {e}"))?
    };
    if value == 0 {
        return Err("image size must be greater than zero".to_string());
    }
    Ok(value)
}

/// Generates Z80 test ROM images.
#[derive(Debug, Parser)]
#[command(name = "romgen", version)]
pub struct Args {
    #[arg(short = 'o', long = "out-dir", default_value = "test_roms")]
    pub out_dir: String,

    #[arg(short = 's', long = "image-size", value_parser = parse_size_with_hex, default_value_t = DEFAULT_IMAGE_SIZE)]
    pub image_size: usize,

    /// Generate only the named case (repeatable).
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Print the catalog and exit.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}
