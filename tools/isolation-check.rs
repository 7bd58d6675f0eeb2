//! Inspect artifact isolation decisions from the command line
//!
//! Loads artifact descriptors and prints, for each queried name, whether
//! the module exports it and where its loader resolves it.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use artifact_isolation::module::registry::ArtifactDiscovery;
use artifact_isolation::module::validation::{DescriptorValidator, ValidationResult};
use artifact_isolation::utils::init_logging_from_config;
use artifact_isolation::{
    ArtifactDescriptor, ArtifactIsolation, IsolationConfig, ResolutionDecision,
};

#[derive(Parser, Debug)]
#[command(name = "isolation-check", version, about = "Query artifact isolation decisions")]
struct Args {
    /// Isolation config file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print decisions as JSON lines
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify fully-qualified class names
    Class {
        /// Artifact descriptor (artifact.toml or artifact.properties)
        #[arg(short, long)]
        descriptor: PathBuf,
        /// Class names to classify
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Classify resource names
    Resource {
        /// Artifact descriptor (artifact.toml or artifact.properties)
        #[arg(short, long)]
        descriptor: PathBuf,
        /// Resource names to classify
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Validate descriptors; exits non-zero if any is invalid
    Validate {
        #[arg(required = true)]
        descriptors: Vec<PathBuf>,
    },
    /// List artifacts discovered under a directory
    Discover {
        /// Defaults to the configured descriptors directory
        dir: Option<PathBuf>,
    },
}

fn load_descriptor(path: &Path) -> anyhow::Result<ArtifactDescriptor> {
    let is_properties = path.extension().and_then(|ext| ext.to_str()) == Some("properties");
    let descriptor = if is_properties {
        let name = path
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str())
            .or_else(|| path.file_stem().and_then(|stem| stem.to_str()))
            .context("cannot derive module name from descriptor path")?;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        ArtifactDescriptor::from_properties(name, &text)?
    } else {
        ArtifactDescriptor::from_file(path)?
    };
    debug!("Loaded descriptor {} from {}", descriptor.name, path.display());
    Ok(descriptor)
}

fn print_decision(decision: &ResolutionDecision, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(decision)?);
    } else {
        println!(
            "{}\t{}\t{}\t{}",
            decision.name,
            if decision.exported { "exported" } else { "not-exported" },
            decision.strategy,
            decision.module
        );
    }
    Ok(())
}

fn run(args: Args) -> anyhow::Result<bool> {
    let config = match &args.config {
        Some(path) => IsolationConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => IsolationConfig::default(),
    }
    .apply_env_overrides()?;

    init_logging_from_config(config.logging.as_ref());

    match args.command {
        Command::Class { descriptor, names } => {
            let isolation = ArtifactIsolation::from_descriptor(&load_descriptor(&descriptor)?, &config)?;
            for name in &names {
                print_decision(&isolation.class_decision(name), args.json)?;
            }
            Ok(true)
        }
        Command::Resource { descriptor, names } => {
            let isolation = ArtifactIsolation::from_descriptor(&load_descriptor(&descriptor)?, &config)?;
            for name in &names {
                print_decision(&isolation.resource_decision(name), args.json)?;
            }
            Ok(true)
        }
        Command::Validate { descriptors } => {
            let validator = DescriptorValidator::new();
            let mut all_valid = true;
            for path in &descriptors {
                let result = load_descriptor(path).map(|descriptor| validator.validate(&descriptor));
                match result {
                    Ok(ValidationResult::Valid) => println!("{}: ok", path.display()),
                    Ok(ValidationResult::Invalid(errors)) => {
                        all_valid = false;
                        for error in errors {
                            println!("{}: {}", path.display(), error);
                        }
                    }
                    Err(e) => {
                        all_valid = false;
                        println!("{}: {:#}", path.display(), e);
                    }
                }
            }
            Ok(all_valid)
        }
        Command::Discover { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.descriptors_dir));
            let mut discovery = ArtifactDiscovery::new(&dir);
            if !config.strict_validation {
                discovery = discovery.lenient();
            }
            let artifacts = discovery.discover()?;
            info!("Found {} artifacts in {}", artifacts.len(), dir.display());
            for artifact in &artifacts {
                let descriptor = &artifact.descriptor;
                if args.json {
                    println!("{}", serde_json::to_string(descriptor)?);
                } else {
                    println!(
                        "{}\t{} class packages\t{} resource folders\t{} overrides",
                        descriptor.name,
                        descriptor.exported_class_packages().len(),
                        descriptor.exported_resource_packages().len(),
                        descriptor.lookup.overrides.len()
                    );
                }
            }
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
