use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use xboxpart::{resolve, Disk, Identity, Layout, Options, Outcome, Partition, ReadTable};

/// List the partitions on an original Xbox hard drive or image of one.
#[derive(Debug, Parser)]
struct Args {
    /// Drive image or device node
    image: PathBuf,

    /// Only require the config area signature, not the FATX volumes
    #[arg(long)]
    config_only: bool,

    /// Ignore any partition table and report the fixed layout
    #[arg(long)]
    static_only: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let file = File::open(&args.image)
        .with_context(|| format!("opening {}", args.image.display()))?;
    let disk = Disk::open(file).with_context(|| format!("sizing {}", args.image.display()))?;

    let options = Options {
        identity: if args.config_only {
            Identity::ConfigOnly
        } else {
            Identity::Strict
        },
        table: if args.static_only {
            ReadTable::Never
        } else {
            ReadTable::OnDisk
        },
    };

    let mut partitions: Vec<Partition> = Vec::new();
    match resolve(&disk, &options, &mut partitions) {
        Outcome::NotThisFormat => {
            eprintln!("{}: not an Xbox drive", args.image.display());
            Ok(ExitCode::FAILURE)
        }
        Outcome::Resolved { layout, .. } => {
            println!(
                "{}: {} partitions from the {}",
                args.image.display(),
                partitions.len(),
                match layout {
                    Layout::Table => "partition table",
                    Layout::Static => "fixed layout",
                }
            );
            println!(
                "{:>4} {:>12} {:>12} {:>16} {:>16}",
                "slot", "start", "sectors", "offset", "bytes"
            );
            for part in &partitions {
                println!(
                    "{:>4} {:>12} {:>12} {:>16} {:>16}",
                    part.slot,
                    part.first_sector,
                    part.sector_count,
                    part.first_byte(),
                    part.len()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
