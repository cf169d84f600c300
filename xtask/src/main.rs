use anyhow::{Result, bail};
use chamber_assets::{TEXTURE_FILES, decode_texture};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the chamber viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in sequence
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the instance table micro-benchmark
    Bench,
    /// Decode every scene texture in DIR and report its size
    Textures {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt", &["fmt", "--all", "--", "--check"])?;
            cargo("clippy", &CLIPPY)?;
            cargo("test", &["test", "--workspace"])?;
            cargo("doc", &["doc", "--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => cargo("clippy", &CLIPPY)?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Bench => cargo(
            "bench",
            &["bench", "-p", "chamber-scene", "--bench", "bench_instance_table"],
        )?,
        Commands::Textures { dir } => check_textures(&dir)?,
    }

    Ok(())
}

const CLIPPY: [&str; 6] = [
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("cargo {step} failed");
    }
    Ok(())
}

fn check_textures(dir: &Path) -> Result<()> {
    println!("==> Checking scene textures in {}", dir.display());
    let mut missing = 0;
    for (slot, file) in TEXTURE_FILES.iter().enumerate() {
        match decode_texture(dir.join(file)) {
            Ok(image) => println!(
                "  [{slot}] {file}: {}x{} ({} channels)",
                image.width, image.height, image.source_channels
            ),
            Err(e) => {
                println!("  [{slot}] {file}: {e}");
                missing += 1;
            }
        }
    }
    if missing > 0 {
        bail!("{missing} of {} textures failed to load", TEXTURE_FILES.len());
    }
    Ok(())
}
