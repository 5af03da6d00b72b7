use criterion::{Criterion, criterion_group, criterion_main};
use ntclean::walk::{retention, scan_dir};
use ntclean::{CleanEngine, Logger, Platform, format_size};
use std::fs;
use std::hint::black_box;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const UIN: &str = "123456789";

/// Twelve months of pictures and videos, 40 small files per month.
fn populate() -> TempDir {
    let base = tempfile::tempdir().expect("tempdir");
    let root = base.path().join(UIN).join("nt_qq/nt_data");
    for month in 1..=12 {
        for category in ["Pic", "Video"] {
            let dir = root.join(format!("{category}/2025-{month:02}/Ori"));
            fs::create_dir_all(&dir).expect("mkdir");
            for i in 0..40 {
                fs::write(dir.join(format!("{i}.bin")), [0_u8; 64]).expect("write");
            }
        }
    }
    base
}

fn bench_scan_dir(c: &mut Criterion) {
    let base = populate();
    let logger = Logger::silent();
    let root = base.path().join(UIN).join("nt_qq/nt_data");

    let mut group = c.benchmark_group("scan_dir");
    group.bench_function("inventory", |b| {
        b.iter(|| scan_dir(black_box(&root), retention(0), &logger));
    });
    group.bench_function("retain_7_days", |b| {
        b.iter(|| scan_dir(black_box(&root), retention(7), &logger));
    });
    group.finish();
}

fn bench_scan_cache(c: &mut Criterion) {
    let base = populate();
    let engine = CleanEngine::new(Platform::Windows, Arc::new(Logger::silent()));
    let path: &Path = base.path();

    c.bench_function("CleanEngine::scan_cache", |b| {
        b.iter(|| engine.scan_cache(black_box(path), UIN, 0));
    });
}

fn bench_format_size(c: &mut Criterion) {
    c.bench_function("format_size", |b| {
        b.iter(|| format_size(black_box(1_610_612_736)));
    });
}

criterion_group!(benches, bench_scan_dir, bench_scan_cache, bench_format_size);
criterion_main!(benches);
