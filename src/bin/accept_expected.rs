//! Binary to generate/update .expected.kt files for the fixture manifests
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- screen  # Update only fixtures matching "screen"

use autowire_codegen::discover::Manifest;
use autowire_codegen::{GeneratedFile, Pipeline};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");

    let mut updated = 0;
    let mut skipped = 0;

    let mut paths: Vec<_> = WalkDir::new(&fixture_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|s| s == "json").unwrap_or(false))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();

    for path in paths {
        let path_str = path.to_string_lossy();

        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(&path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

/// Every generated file of a fixture, each headed by its relative path.
fn render_expected(files: &[GeneratedFile]) -> String {
    files
        .iter()
        .map(|file| {
            format!(
                "// file: {}\n{}",
                file.relative_path().to_string_lossy().replace('\\', "/"),
                file.code
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn process_file(path: &Path) {
    let result = Manifest::load(path).and_then(|manifest| {
        let pipeline = Pipeline::standard();
        let properties = autowire_codegen::PropertySource::discover(
            &manifest,
            &pipeline.config().runtime.autowired_annotation,
        )?;
        pipeline.compile(properties)
    });

    match result {
        Ok(files) => {
            let expected = path.with_extension("expected.kt");
            if let Err(e) = fs::write(&expected, render_expected(&files)) {
                eprintln!("Failed to write {:?}: {}", expected, e);
            } else {
                println!("  wrote {}", expected.display());
            }

            let expected_err = path.with_extension("expected.err");
            if expected_err.exists() {
                let _ = fs::remove_file(&expected_err);
            }
        }
        Err(e) => {
            let expected_err = path.with_extension("expected.err");
            if let Err(err) = fs::write(&expected_err, e.render(false)) {
                eprintln!("Failed to write {:?}: {}", expected_err, err);
            } else {
                println!("  wrote {}", expected_err.display());
            }
        }
    }
}
