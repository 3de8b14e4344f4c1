use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use tablecloth_input::{
    desktop::{ClientId, LayerMap, LayerSurface, LayerSurfaceId, OutputId, SurfaceId},
    shell::wlr_layer::{Anchor, Layer, LayerSurfaceCachedState, Margins},
};

const LAYERS: [Layer; 4] = [Layer::Background, Layer::Bottom, Layer::Top, Layer::Overlay];
const ANCHORS: [Anchor; 6] = [
    Anchor::TOP.union(Anchor::LEFT).union(Anchor::RIGHT),
    Anchor::BOTTOM.union(Anchor::LEFT).union(Anchor::RIGHT),
    Anchor::LEFT.union(Anchor::TOP).union(Anchor::BOTTOM),
    Anchor::TOP,
    Anchor::BOTTOM.union(Anchor::RIGHT),
    Anchor::empty(),
];

fn populated_map(surfaces: u64) -> LayerMap {
    let mut rand = rand::thread_rng();
    let mut map = LayerMap::new(OutputId(1), (3840, 2160).into());

    for id in 0..surfaces {
        let state = LayerSurfaceCachedState {
            size: (rand.gen_range(0..400), rand.gen_range(0..60)).into(),
            anchor: ANCHORS[rand.gen_range(0..ANCHORS.len())],
            exclusive_zone: rand.gen_range(-1..40).into(),
            margin: Margins {
                top: rand.gen_range(0..8),
                bottom: rand.gen_range(0..8),
                left: rand.gen_range(0..8),
                right: rand.gen_range(0..8),
            },
            layer: LAYERS[rand.gen_range(0..LAYERS.len())],
            ..Default::default()
        };
        let surface = LayerSurface::new(LayerSurfaceId(id), SurfaceId(id), ClientId(id % 4), "bench", state);
        map.map_layer(surface).expect("ids are unique");
    }

    map
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut small = populated_map(8);
    c.bench_function("arrange_8_layers", |b| {
        b.iter(|| small.arrange());
    });

    let mut large = populated_map(128);
    c.bench_function("arrange_128_layers", |b| {
        b.iter(|| large.arrange());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
