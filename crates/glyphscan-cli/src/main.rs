//! glyphscan CLI — command-line tools for glyph code decoding.

use clap::{Args, Parser, Subcommand};
use glyphscan::{CellLabel, CodeLayout, DecodeResult, ImageFrame, Prediction, Scanner, N_BORDER};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "glyphscan")]
#[command(about = "Segment 3x3 glyph codes and assemble their hex seed from symbol labels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the border and quadrant rects for a frame size (JSON).
    Layout {
        /// Frame side in pixels.
        #[arg(long)]
        size: u32,
    },

    /// Crop every cell of a code image for an external classifier.
    Extract(CliExtractArgs),

    /// Assemble a seed from class-name labels.
    Assemble(CliAssembleArgs),

    /// Assemble a seed from ranked classifier predictions.
    ScanLabels(CliAssembleArgs),
}

#[derive(Debug, Clone, Args)]
struct CliExtractArgs {
    /// Path to the code image (square).
    #[arg(long)]
    image: PathBuf,

    /// Directory for `{block}-{quadrant}.png` and `b-{i}.png` crops.
    #[arg(long)]
    out_dir: PathBuf,

    /// Scan configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliAssembleArgs {
    /// Labels file: 9 blocks x 4 quadrants.
    #[arg(long)]
    labels: PathBuf,

    /// Code image used to sample the border ring.
    #[arg(long, conflicts_with = "border")]
    image: Option<PathBuf>,

    /// Border marks as 8 characters of 0/1, e.g. 11110000.
    #[arg(long)]
    border: Option<String>,

    /// Scan configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write a JSON report.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// JSON report of one assembled seed.
#[derive(Debug, serde::Serialize)]
struct SeedReport {
    seed: String,
    rotation_bits: String,
    border_bits: String,
    blocks: Vec<BlockReport>,
}

#[derive(Debug, serde::Serialize)]
struct BlockReport {
    labels: Vec<String>,
    rotated: bool,
    hex: String,
}

impl SeedReport {
    fn new(result: &DecodeResult, labels: &[[CellLabel; 4]]) -> Self {
        Self {
            seed: result.prefixed(),
            rotation_bits: result.rotation_bitstring(),
            border_bits: result.border_bitstring(),
            blocks: result
                .blocks
                .iter()
                .zip(labels)
                .map(|(block, labels)| BlockReport {
                    labels: labels.iter().map(ToString::to_string).collect(),
                    rotated: block.rotated,
                    hex: block.hex(),
                })
                .collect(),
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Layout { size } => run_layout(size),
        Commands::Extract(args) => run_extract(&args),
        Commands::Assemble(args) => run_assemble(&args, LabelFormat::ClassNames),
        Commands::ScanLabels(args) => run_assemble(&args, LabelFormat::Predictions),
    }
}

fn load_scanner(config: Option<&Path>) -> CliResult<Scanner> {
    match config {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            Scanner::from_config_json_file(path)
        }
        None => Ok(Scanner::default()),
    }
}

fn load_frame(path: &Path) -> CliResult<ImageFrame> {
    tracing::info!("Loading image: {}", path.display());
    let frame = ImageFrame::open(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })?;
    tracing::info!("Frame size: {}px", frame.size());
    Ok(frame)
}

// ── layout ─────────────────────────────────────────────────────────────

fn run_layout(size: u32) -> CliResult<()> {
    let layout = CodeLayout::new(size)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

// ── extract ────────────────────────────────────────────────────────────

fn run_extract(args: &CliExtractArgs) -> CliResult<()> {
    let scanner = load_scanner(args.config.as_deref())?;
    let frame = load_frame(&args.image)?;
    let cells = scanner.extract(&frame)?;

    std::fs::create_dir_all(&args.out_dir)?;
    for (block, crops) in cells.quadrants.iter().enumerate() {
        for (quadrant, crop) in crops.iter().enumerate() {
            crop.save(args.out_dir.join(format!("{}-{}.png", block, quadrant)))?;
        }
    }
    for (i, crop) in cells.border.iter().enumerate() {
        crop.save(args.out_dir.join(format!("b-{}.png", i)))?;
    }
    tracing::info!(
        "Wrote {} quadrant and {} border crops to {}",
        cells.quadrants.len() * 4,
        cells.border.len(),
        args.out_dir.display()
    );

    let marks = cells.border_marks();
    if !marks.is_empty() {
        println!("Border: {}", bits_to_string(&marks));
    }
    Ok(())
}

// ── assemble / scan-labels ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum LabelFormat {
    /// `[["a0", "a1", "a0", "a0"], ...]`
    ClassNames,
    /// `[[[{"class_name": "a0", "probability": 0.9}, ...], ...], ...]`
    Predictions,
}

fn run_assemble(args: &CliAssembleArgs, format: LabelFormat) -> CliResult<()> {
    let scanner = load_scanner(args.config.as_deref())?;
    let labels = load_labels(&args.labels, format)?;

    let marks = match (&args.border, &args.image) {
        (Some(bits), _) => parse_bits(bits)?,
        (None, Some(image)) => scanner.border_marks(&load_frame(image)?)?,
        (None, None) if scanner.config().version.has_border_ring() => {
            return Err("border marks required: pass --border or --image".into());
        }
        (None, None) => Vec::new(),
    };

    let result = scanner.assemble(&labels, &marks)?;
    tracing::info!(
        "rotation={} border={}",
        result.rotation_bitstring(),
        result.border_bitstring()
    );
    println!("{}", result.prefixed());

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&SeedReport::new(&result, &labels))?;
        std::fs::write(out, &json)?;
        tracing::info!("Report written to {}", out.display());
    }
    Ok(())
}

fn load_labels(path: &Path, format: LabelFormat) -> CliResult<Vec<[CellLabel; 4]>> {
    let data = std::fs::read_to_string(path)?;
    match format {
        LabelFormat::ClassNames => {
            let names: Vec<[String; 4]> = serde_json::from_str(&data)?;
            names
                .iter()
                .map(|block| -> CliResult<[CellLabel; 4]> {
                    let mut out = [CellLabel::new('a', 0); 4];
                    for (slot, name) in out.iter_mut().zip(block) {
                        *slot = CellLabel::parse(name)?;
                    }
                    Ok(out)
                })
                .collect()
        }
        LabelFormat::Predictions => {
            let ranked: Vec<[Vec<Prediction>; 4]> = serde_json::from_str(&data)?;
            ranked
                .iter()
                .enumerate()
                .map(|(block, cells)| -> CliResult<[CellLabel; 4]> {
                    let mut out = [CellLabel::new('a', 0); 4];
                    for (quadrant, (slot, preds)) in out.iter_mut().zip(cells).enumerate() {
                        *slot = CellLabel::from_predictions(preds).ok_or_else(|| -> CliError {
                            format!("block {} quadrant {} has no predictions", block, quadrant)
                                .into()
                        })??;
                    }
                    Ok(out)
                })
                .collect()
        }
    }
}

fn parse_bits(bits: &str) -> CliResult<Vec<bool>> {
    let bits = bits.trim();
    if bits.len() != N_BORDER {
        return Err(format!("expected {} border bits, got '{}'", N_BORDER, bits).into());
    }
    bits.chars()
        .map(|c| -> CliResult<bool> {
            match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(format!("invalid border bit '{}'", other).into()),
            }
        })
        .collect()
}

fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_border_bits() {
        let bits = parse_bits("11110000").expect("valid bits");
        assert_eq!(bits_to_string(&bits), "11110000");
        assert!(parse_bits("1111000").is_err());
        assert!(parse_bits("1111000x").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "glyphscan",
            "assemble",
            "--labels",
            "labels.json",
            "--border",
            "00000001",
        ])
        .expect("valid args");
        match cli.command {
            Commands::Assemble(args) => {
                assert_eq!(args.border.as_deref(), Some("00000001"));
                assert!(args.image.is_none());
            }
            _ => panic!("expected assemble"),
        }
        assert!(Cli::try_parse_from([
            "glyphscan",
            "assemble",
            "--labels",
            "l.json",
            "--border",
            "00000000",
            "--image",
            "code.png",
        ])
        .is_err());
    }

    #[test]
    fn loads_both_label_formats() {
        let dir = std::env::temp_dir();
        let names_path = dir.join(format!("glyphscan-names-{}.json", std::process::id()));
        let names = vec![["a0", "a1", "a0", "a0"]; 9];
        std::fs::write(&names_path, serde_json::to_string(&names).unwrap()).unwrap();
        let labels = load_labels(&names_path, LabelFormat::ClassNames).expect("loads");
        assert_eq!(labels.len(), 9);
        assert_eq!(labels[3][1], CellLabel::new('a', 1));

        let preds_path = dir.join(format!("glyphscan-preds-{}.json", std::process::id()));
        let cell = vec![Prediction::new("b2", 0.3), Prediction::new("a5", 0.6)];
        let ranked = vec![[cell.clone(), cell.clone(), cell.clone(), cell]; 9];
        std::fs::write(&preds_path, serde_json::to_string(&ranked).unwrap()).unwrap();
        let labels = load_labels(&preds_path, LabelFormat::Predictions).expect("loads");
        assert_eq!(labels[8][3], CellLabel::new('a', 5));

        std::fs::remove_file(names_path).ok();
        std::fs::remove_file(preds_path).ok();
    }
}
