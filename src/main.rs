//! bland2spritetool - converts Bland engine sprite files to XML and back.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

/// Dump a sprite file to XML, or build one from XML
#[derive(Parser, Debug)]
#[command(name = "bland2spritetool")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["dump", "build"])))]
struct Cli {
    /// Dump the input sprite file into an XML file
    #[arg(short = 'd')]
    dump: bool,

    /// Build a sprite file from the input XML file
    #[arg(short = 'b')]
    build: bool,

    /// Input file
    input: PathBuf,

    /// Output file (derived from the input name if omitted)
    output: Option<PathBuf>,
}

impl Cli {
    /// Output path, replacing the input's extension when none was given.
    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None if self.dump => self.input.with_extension("xml"),
            None => self.input.with_extension("spr"),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_exit_status(&e));
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Usage errors exit 1 rather than clap's 2; `--help` and `--version` exit 0.
fn usage_exit_status(error: &clap::Error) -> u8 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

fn run(cli: &Cli) -> Result<()> {
    let output = cli.output_path();
    tracing::debug!(?cli, output = %output.display(), "parsed arguments");

    if cli.dump {
        cmd_dump(&cli.input, &output)
    } else {
        cmd_build(&cli.input, &output)
    }
}

fn cmd_dump(input: &Path, output: &Path) -> Result<()> {
    println!("Dumping: {} -> {}", input.display(), output.display());

    let data = fs::read(input).with_context(|| format!("Failed to open {} for reading", input.display()))?;
    let (sprites, xml) = bland_spr::dump(&data).context("Failed to dump sprite file")?;
    fs::write(output, xml).with_context(|| format!("Failed to open {} for writing", output.display()))?;

    println!(
        "Dumped {} sprites ({} images) and {} animations ({} frames)",
        sprites.sprites.len(),
        sprites.image_count(),
        sprites.animations.len(),
        sprites.frame_count()
    );

    Ok(())
}

fn cmd_build(input: &Path, output: &Path) -> Result<()> {
    println!("Building: {} -> {}", input.display(), output.display());

    let xml = fs::read(input).with_context(|| format!("Failed to open {} for reading", input.display()))?;
    let xml = std::str::from_utf8(&xml).with_context(|| format!("{} is not valid UTF-8", input.display()))?;
    let (sprites, bytes) = bland_spr::build(xml).context("Failed to build sprite file")?;
    fs::write(output, bytes).with_context(|| format!("Failed to open {} for writing", output.display()))?;

    println!(
        "Built {} sprites ({} images) and {} animations ({} frames)",
        sprites.sprites.len(),
        sprites.image_count(),
        sprites.animations.len(),
        sprites.frame_count()
    );

    Ok(())
}
