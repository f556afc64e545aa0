use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ph_core::frame::Plane;
use ph_core::palette::PaletteTable;
use ph_dither::Ditherer;
use ph_dither::ToneCurve;

fn bench_render(c: &mut Criterion) {
    let table = PaletteTable::builtin();
    let ditherer = Ditherer::new(8, ToneCurve::default()).unwrap_or_else(|e| panic!("{e}"));
    let gray = Plane::from_fn(640, 480, |x, y| ((x + y) % 256) as f32 / 255.0);

    for name in ["VT320", "dmg"] {
        let palette = table.get(name).unwrap_or_else(|e| panic!("{e}"));
        c.bench_function(&format!("render_640x480_{name}"), |b| {
            b.iter(|| ditherer.render(black_box(&gray), palette));
        });
    }
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
