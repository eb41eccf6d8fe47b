//! protoc-gen-protots - Generate TypeScript declarations from Protocol Buffer schemas
//!
//! Invoked by protoc as a plugin, this binary reads a serialized
//! `CodeGeneratorRequest` from stdin and writes a serialized
//! `CodeGeneratorResponse` to stdout. With `--descriptor-set` it instead runs
//! standalone over a serialized `FileDescriptorSet` and writes the generated
//! `.ts` files to disk.

use anyhow::{bail, Context, Result};
use clap::Parser;
use prost::Message;
use prost_types::FileDescriptorSet;
use protots_core::{plugin, render, Generator, Options};
use std::fs;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Generate TypeScript declarations from Protocol Buffer schemas
#[derive(Parser, Debug)]
#[command(name = "protoc-gen-protots")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a serialized FileDescriptorSet to compile standalone,
    /// instead of acting as a protoc plugin on stdin/stdout
    #[arg(long)]
    descriptor_set: Option<PathBuf>,

    /// Output directory for generated .ts files (standalone mode)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Module specifier for the RPC runtime import (standalone mode;
    /// plugin mode takes it from the request parameter)
    #[arg(long)]
    grpc_package: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry run - don't write files, just show what would be generated
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing files without prompting
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing. Diagnostics go to stderr: stdout carries the
    // serialized response in plugin mode.
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.descriptor_set {
        Some(path) => run_standalone(&cli, path),
        None => run_plugin(),
    }
}

/// Act as a protoc plugin: one request on stdin, one response on stdout
fn run_plugin() -> Result<()> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read code generator request from stdin")?;

    debug!("read {} request bytes", input.len());

    let output = plugin::run(input.as_slice())
        .context("Failed to process code generator request")?;

    std::io::stdout()
        .write_all(&output)
        .context("Failed to write code generator response to stdout")?;

    Ok(())
}

/// Compile a serialized FileDescriptorSet and write the results to disk
fn run_standalone(cli: &Cli, path: &Path) -> Result<()> {
    let data = fs::read(path)
        .with_context(|| format!("Failed to read descriptor set: {}", path.display()))?;
    let set = FileDescriptorSet::decode(data.as_slice())
        .with_context(|| format!("Failed to decode descriptor set: {}", path.display()))?;

    info!("loaded {} files from {}", set.file.len(), path.display());

    let mut options = Options::default();
    if let Some(grpc_package) = &cli.grpc_package {
        options.grpc_package = grpc_package.clone();
    }

    let generator = Generator::new(&set.file, options, None)?;
    let units = generator.generate()?;

    for unit in &units {
        let output_path = resolve_output_path(&cli.output, &unit.name)?;

        if cli.dry_run {
            println!("Would write: {}", output_path.display());
            continue;
        }

        let content = render::render_unit(unit);
        write_output_file(&output_path, &content, cli.force)?;
        println!("Wrote {}", output_path.display());
    }

    info!("generated {} files", units.len());
    Ok(())
}

/// Join an output name onto the output directory, rejecting traversal
fn resolve_output_path(output_dir: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
    {
        bail!(
            "path traversal detected: '{}' would escape output directory",
            name
        );
    }
    Ok(output_dir.join(relative))
}

/// Write a generated file to disk
fn write_output_file(output_path: &Path, content: &str, force: bool) -> Result<()> {
    // Create parent directories
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Check if file exists
    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    // Write the file
    let mut file = fs::File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", output_path.display()))?;

    Ok(())
}
