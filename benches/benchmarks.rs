use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use ts_starter::config::{Features, Identity};
use ts_starter::pipeline::{Manifest, ManifestEdit, Pipeline};
use ts_starter::resolve::{resolve, ArgOptions, Environment, UserInput};
use ts_starter::template::TemplateSource;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn copy_tree(from: &Path, to: &Path) {
    for entry in WalkDir::new(from) {
        let entry = entry.unwrap();
        let target = to.join(entry.path().strip_prefix(from).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = Pipeline::canonical();

    c.bench_function("canonical_pipeline", |b| {
        b.iter_batched(
            || {
                let tmp = tempfile::tempdir().unwrap();
                let config = resolve(
                    UserInput::Args(ArgOptions::new("bench-project")),
                    Environment {
                        identity: Identity::placeholder(),
                        template: TemplateSource::default(),
                        license_year: 2024,
                        working_directory: tmp.path().to_path_buf(),
                    },
                )
                .unwrap();
                copy_tree(&fixture_path("template"), &config.project_dir());
                (tmp, config)
            },
            |(tmp, config)| {
                let report = pipeline.run(&config, &config.project_dir()).unwrap();
                black_box(report);
                drop(tmp);
            },
            BatchSize::PerIteration,
        );
    });
}

fn bench_manifest_edits(c: &mut Criterion) {
    let content = std::fs::read_to_string(fixture_path("template/package.json")).unwrap();
    let edits = vec![
        ManifestEdit::remove("bin"),
        ManifestEdit::set("name", "bench-project"),
        ManifestEdit::set("version", "1.0.0"),
        ManifestEdit::retain_entries("dependencies", &[]),
        ManifestEdit::retain_entries("devDependencies", &["typescript", "ava", "eslint"]),
    ];

    c.bench_function("manifest_edit", |b| {
        b.iter(|| {
            let mut manifest = Manifest::parse(black_box(&content)).unwrap();
            for edit in &edits {
                manifest.apply(edit);
            }
            black_box(manifest.to_canonical_string())
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_args", |b| {
        let tmp = tempfile::tempdir().unwrap();
        b.iter(|| {
            let config = resolve(
                UserInput::Args(ArgOptions {
                    features: Features {
                        node: true,
                        ..Features::default()
                    },
                    ..ArgOptions::new(black_box("bench-project"))
                }),
                Environment {
                    identity: Identity::placeholder(),
                    template: TemplateSource::default(),
                    license_year: 2024,
                    working_directory: tmp.path().to_path_buf(),
                },
            )
            .unwrap();
            black_box(config)
        });
    });
}

criterion_group!(
    benches,
    bench_pipeline,
    bench_manifest_edits,
    bench_resolve
);
criterion_main!(benches);
