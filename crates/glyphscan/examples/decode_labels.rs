use glyphscan::{CellLabel, ImageFrame, Scanner};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <labels.json> <code.png> [config.json]", args[0]);
        std::process::exit(2);
    }

    // 9 blocks x 4 quadrant class names, e.g. [["a0","a1","a0","a0"], ...].
    let names: Vec<[String; 4]> = serde_json::from_str(&std::fs::read_to_string(&args[1])?)?;
    let labels = names
        .iter()
        .map(|block| -> Result<[CellLabel; 4], Box<dyn Error>> {
            Ok([
                CellLabel::parse(&block[0])?,
                CellLabel::parse(&block[1])?,
                CellLabel::parse(&block[2])?,
                CellLabel::parse(&block[3])?,
            ])
        })
        .collect::<Result<Vec<_>, _>>()?;

    let scanner = match args.get(3) {
        Some(path) => Scanner::from_config_json_file(Path::new(path))?,
        None => Scanner::default(),
    };
    let frame = ImageFrame::open(Path::new(&args[2]))?;
    let marks = scanner.border_marks(&frame)?;
    let result = scanner.assemble(&labels, &marks)?;

    println!("Border: {}", result.border_bitstring());
    println!("Seed:   {}", result.prefixed());
    Ok(())
}
