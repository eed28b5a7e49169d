use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glyphscan::{
    assemble, AssembleOptions, CellLabel, ClassifierError, ImageFrame, Prediction, Scanner,
};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_frame_fixture(size: u32, seed: u64) -> ImageFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let img = RgbImage::from_fn(size, size, |_, _| {
        let v = rng.gen_range(0u8..=255);
        Rgb([v, v, v])
    });
    ImageFrame::new(img).expect("square fixture")
}

fn make_label_fixture(seed: u64) -> (Vec<[CellLabel; 4]>, Vec<bool>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let blocks = (0..9)
        .map(|_| {
            // Low values never overflow a nibble regardless of carries.
            let prefix = if rng.gen_bool(0.5) { 'a' } else { 'b' };
            [
                CellLabel::new(prefix, rng.gen_range(0..8)),
                CellLabel::new('a', rng.gen_range(0..8)),
                CellLabel::new('a', rng.gen_range(0..8)),
                CellLabel::new('a', rng.gen_range(0..8)),
            ]
        })
        .collect();
    let marks = (0..8).map(|_| rng.gen_bool(0.5)).collect();
    (blocks, marks)
}

fn bench_assemble(c: &mut Criterion) {
    let (blocks, marks) = make_label_fixture(17);
    let opts = AssembleOptions::default();
    c.bench_function("assemble_seed", |b| {
        b.iter(|| {
            let result = assemble(black_box(&blocks), black_box(&marks), &opts)
                .expect("fixture labels are valid");
            black_box(result.seed())
        })
    });
}

fn bench_extract(c: &mut Criterion) {
    let scanner = Scanner::default();
    let frame_340 = make_frame_fixture(340, 3);
    let frame_1020 = make_frame_fixture(1020, 5);

    c.bench_function("extract_cells_340", |b| {
        b.iter(|| {
            let cells = scanner.extract(black_box(&frame_340)).expect("valid frame");
            black_box(cells.quadrants.len())
        })
    });

    c.bench_function("extract_cells_1020", |b| {
        b.iter(|| {
            let cells = scanner.extract(black_box(&frame_1020)).expect("valid frame");
            black_box(cells.border_marks())
        })
    });
}

fn bench_scan(c: &mut Criterion) {
    let scanner = Scanner::default();
    let frame = make_frame_fixture(680, 11);
    let classifier = |_: &RgbImage| -> Result<Vec<Prediction>, ClassifierError> {
        Ok(vec![Prediction::new("a1", 0.4), Prediction::new("a3", 0.6)])
    };
    c.bench_function("scan_680_stub_classifier", |b| {
        b.iter(|| {
            let result = scanner
                .scan(black_box(&frame), &classifier)
                .expect("stub labels are valid");
            black_box(result.seed())
        })
    });
}

criterion_group!(hotpaths, bench_assemble, bench_extract, bench_scan);
criterion_main!(hotpaths);
