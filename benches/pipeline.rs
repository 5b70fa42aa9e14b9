//! Benchmarks for the polished pipeline.

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polished::tileset::lz;
use polished::{Map, Metatileset, Options, PaletteSource, RenderOptions};

/// 2bpp sheet with a different pattern in every tile.
fn sheet(tiles: usize) -> Vec<u8> {
    (0..tiles * 16).map(|i| (i * 37 % 251) as u8).collect()
}

/// Blockset whose tile ids cycle through the sheet.
fn blockset(blocks: usize, tiles: usize) -> Vec<u8> {
    (0..blocks * 16).map(|i| (i % tiles) as u8).collect()
}

fn metatileset(blocks: usize) -> Metatileset {
    let mut mts = Metatileset::new(Options::default());
    mts.tileset_mut().load_2bpp(&sheet(128)).unwrap();
    mts.read_metatiles_from(&mut Cursor::new(blockset(blocks, 128)))
        .unwrap();
    mts
}

fn map(width: usize, height: usize) -> Map {
    let blocks = (0..width * height).map(|i| (i % 97) as u8).collect();
    Map::from_blocks(width, height, blocks).unwrap()
}

// -- Codec benchmarks --

fn bench_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("codecs");

    let blocks = blockset(256, 128);
    group.bench_function("read_metatiles_256", |b| {
        b.iter(|| {
            let mut mts = Metatileset::new(Options::default());
            mts.tileset_mut().load_2bpp(&sheet(128)).unwrap();
            mts.read_metatiles_from(&mut Cursor::new(black_box(&blocks)))
                .unwrap();
            mts
        })
    });

    // Alternating literal and repeat runs, as real tilesets compress
    let mut stream = Vec::new();
    for i in 0..64u8 {
        stream.extend_from_slice(&[0x0F]);
        stream.extend((0..16).map(|j| i.wrapping_mul(7).wrapping_add(j)));
        stream.extend_from_slice(&[0x8F, 0x8F]);
    }
    stream.push(0xFF);
    group.bench_function("lz_decompress", |b| {
        b.iter(|| lz::decompress(black_box(&stream)).unwrap())
    });

    group.finish();
}

// -- Rendering benchmarks --

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    let mts = metatileset(97);
    let small = map(10, 9);
    let large = map(40, 40);

    group.bench_function("render_map_10x9", |b| {
        b.iter(|| mts.render_map(black_box(&small)))
    });

    group.bench_function("render_map_40x40", |b| {
        b.iter(|| mts.render_map(black_box(&large)))
    });

    let options = RenderOptions::with_palette(PaletteSource::Attributes);
    group.bench_function("render_map_40x40_attributes", |b| {
        b.iter(|| mts.render_map_with(black_box(&large), options))
    });

    group.finish();
}

criterion_group!(benches, bench_codecs, bench_rendering);
criterion_main!(benches);
