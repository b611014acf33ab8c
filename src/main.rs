use autowire_codegen::discover::{Manifest, ManifestSet};
use autowire_codegen::{Config, FileSink, GenerateError, MemorySink, Pipeline};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "autowire")]
#[command(about = "Autowire - generate Kotlin injectors for @Autowired fields")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate injectors from symbol manifests
    Generate {
        /// Path to a .json manifest or a directory of manifests
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Read a single manifest from stdin and print the generated code
        #[arg(long)]
        stdin: bool,

        /// Print generated files as JSON with field mappings
        #[arg(long)]
        json: bool,

        /// Output directory for generated sources
        #[arg(long, default_value = "build/generated/autowire")]
        out: PathBuf,

        /// Configuration file (defaults to ./autowire.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            file,
            stdin,
            json,
            out,
            config,
            verbose,
        } => {
            init_tracing(verbose);
            let result = Config::load(config.as_deref()).and_then(|config| {
                let pipeline = Pipeline::new(config);
                if stdin {
                    generate_stdin(&pipeline, json)
                } else if let Some(path) = file {
                    generate_path(&pipeline, &path, &out)
                } else {
                    eprintln!("Error: provide a manifest/directory or use --stdin");
                    std::process::exit(1);
                }
            });
            if let Err(err) = result {
                eprint!("{}", err.render(io::stderr().is_terminal()));
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("autowire_codegen=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autowire_codegen=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn generate_stdin(pipeline: &Pipeline, json_output: bool) -> Result<(), GenerateError> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .map_err(|err| GenerateError::Io {
            path: PathBuf::from("<stdin>"),
            source: err,
        })?;

    let manifest = Manifest::parse(&source, "<stdin>")?;
    let sink = MemorySink::new();
    pipeline.run(&manifest, &sink)?;
    let files = sink.into_files();

    if json_output {
        println!("{}", serde_json::to_string(&files)?);
    } else {
        for file in &files {
            print!("{}", file.code);
        }
    }
    Ok(())
}

fn generate_path(pipeline: &Pipeline, path: &Path, out: &Path) -> Result<(), GenerateError> {
    let start = Instant::now();

    let manifests = if path.is_file() {
        if path.extension().is_none_or(|ext| ext != "json") {
            eprintln!("Error: {} is not a .json manifest", path.display());
            std::process::exit(1);
        }
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        let manifests = collect_manifests(path);
        if manifests.is_empty() {
            eprintln!("No .json manifests found in {}", path.display());
            std::process::exit(1);
        }
        manifests
    } else {
        eprintln!("Error: {} does not exist", path.display());
        std::process::exit(1);
    };

    let source = ManifestSet::load_all(&manifests)?;
    let sink = FileSink::new(out);
    let summary = pipeline.run(&source, &sink)?;
    sink.write_provenance()?;

    for written in &summary.written {
        print_generated(&out.join(written).display().to_string());
    }
    print_summary(summary.written.len(), summary.unchanged.len(), start.elapsed());
    Ok(())
}

/// Manifests under `dir`, sorted so discovery order is stable across runs.
fn collect_manifests(dir: &Path) -> Vec<PathBuf> {
    let mut manifests: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .filter(|e| e.file_name() != autowire_codegen::emit::PROVENANCE_FILE)
        .map(|e| e.path().to_path_buf())
        .collect();
    manifests.sort();
    manifests
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(written: usize, unchanged: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if written == 1 { "injector" } else { "injectors" };
    let unchanged_str = if unchanged > 0 {
        format!(" ({} unchanged)", unchanged)
    } else {
        String::new()
    };

    if is_tty {
        eprintln!(
            "\n\x1b[1m✨ Generated {} {}{} in {}\x1b[0m",
            written, files_word, unchanged_str, time_str
        );
    } else {
        eprintln!("\n✨ Generated {} {}{} in {}", written, files_word, unchanged_str, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
