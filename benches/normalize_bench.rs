//! Benchmarks for per-stream work on the request path.
//!
//! Measures filename parsing, full stream normalization and proxy rule
//! evaluation, which run once per stream or request.
//!
//! Run with: `cargo bench --bench normalize_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use addon_wrapper::proxy::{parse_rules, ProxyRouter};
use addon_wrapper::{AddonInfo, FilenameParser, NameParser, StreamNormalizer};

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

const FILENAMES: &[&str] = &[
    "The.Matrix.1999.2160p.UHD.BluRay.REMUX.HDR10.TrueHD.Atmos.7.1.HEVC-GROUP.mkv",
    "Show_Name_S02E05_1080p_WEB-DL_DDP5.1_H.264-NTb.mkv",
    "Film.2023.2160p.WEB-DL.DV.HDR10+.DDP5.1.Atmos.H.265-FLUX",
    "Some Home Video",
];

const HOSTS: &[&str] = &[
    "torrentio.strem.fun",
    "x.cdn.example.com",
    "cdn.example.com",
    "addon.example.org",
];

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_filename_parse(c: &mut Criterion) {
    let parser = FilenameParser::new();
    c.bench_function("filename_parse", |b| {
        b.iter(|| {
            for name in FILENAMES {
                black_box(parser.parse(black_box(name)));
            }
        });
    });
}

fn bench_normalize(c: &mut Criterion) {
    let addon = AddonInfo::new("Torrentio", "torrentio");
    let normalizer = StreamNormalizer::default();
    let stream = serde_json::json!({
        "name": "[RD+] Torrentio\n4k DV",
        "title": "Movie.2021.2160p.WEB-DL.DV.x265-GRP\n👤 42 💾 14.5 GB ⚙️ ThePirateBay",
        "url": "https://torrentio.example/resolve/realdebrid/KEY/0123456789abcdef0123456789abcdef01234567/null/0/Movie.mkv",
        "behaviorHints": { "filename": "Movie.2021.2160p.WEB-DL.DV.x265-GRP.mkv" }
    });

    c.bench_function("normalize_stream", |b| {
        b.iter(|| black_box(normalizer.normalize_value(&addon, black_box(stream.clone()))));
    });
}

fn bench_proxy_rules(c: &mut Criterion) {
    let router = ProxyRouter::new(
        true,
        parse_rules("*:true,*.cdn.example.com:false,cdn.example.com:true,*.example.org:false"),
    );
    c.bench_function("proxy_route", |b| {
        b.iter(|| {
            for host in HOSTS {
                black_box(router.should_proxy_host(black_box(host)));
            }
        });
    });
}

criterion_group!(benches, bench_filename_parse, bench_normalize, bench_proxy_rules);
criterion_main!(benches);
