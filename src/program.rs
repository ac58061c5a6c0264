use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, Context};
use indicatif::ProgressBar;
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use crate::cli::{Cli, CollectArgs, Command};
use crate::collect::{sort_assets, AssetDetails, AssetInfo, Collector};
use crate::manifest::Manifest;
use crate::progress_bar::create_collect_bar;
use crate::registry::AssetKey;
use crate::report::{default_report_path, export_report, ReportError};
use crate::size_string::make_best_size_string;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    ThreadPoolBuilder::new()
        .num_threads(cli.threads.map(|t| t.get()).unwrap_or_else(num_cpus::get))
        .build_global()
        .context("failed to configure the thread pool")?;

    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Collect(args) => collect(&args, &mut stdout),
        Command::Show { manifest, asset } => show(&manifest, &asset, &mut stdout),
    }
}

fn load_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let manifest = Manifest::load(path)?;

    debug!(path = %path.display(), assets = manifest.len(), "loaded manifest");

    if manifest.is_empty() {
        warn!(path = %path.display(), "manifest contains no assets");
    }

    Ok(manifest)
}

fn collect(args: &CollectArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let manifest = load_manifest(&args.manifest)?;

    let progress_bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        create_collect_bar(0)?
    };

    let mut assets = Collector::new(&manifest, &manifest, &manifest)
        .visit_mode(args.visit_mode())
        .progress(progress_bar)
        .collect(&args.filter());

    sort_assets(&mut assets, args.sort);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &assets)?;
        writeln!(out)?;
    } else {
        write_list(&assets, out)?;
    }

    if let Some(export) = &args.export {
        let path = match export {
            Some(path) => path.clone(),
            None => default_report_path(project_dir(&args.manifest)),
        };

        match export_report(&assets, &path) {
            Ok(()) => {}
            Err(ReportError::EmptyList) => warn!("{}", ReportError::EmptyList),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn show(manifest_path: &Path, asset: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let key = AssetKey::new(asset);

    let details = Collector::new(&manifest, &manifest, &manifest)
        .details(&key)
        .ok_or_else(|| anyhow!("asset {} not found in {}", key, manifest_path.display()))?;

    write_details(&details, out)?;

    Ok(())
}

/// The manifest's directory, standing in for the project directory.
fn project_dir(manifest: &Path) -> &Path {
    match manifest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn write_list(assets: &[AssetInfo], out: &mut impl Write) -> io::Result<()> {
    for asset in assets {
        writeln!(
            out,
            "{}, {}",
            asset.path,
            make_best_size_string(asset.size.memory, true)
        )?;
    }

    Ok(())
}

fn write_details(details: &AssetDetails, out: &mut impl Write) -> io::Result<()> {
    let info = &details.info;

    writeln!(out, "{} ({})", info.path, info.class)?;
    writeln!(out, "DiskSize {}", make_best_size_string(info.size.disk, true))?;
    writeln!(out, "MemorySize {}", make_best_size_string(info.size.memory, true))?;
    writeln!(out, "Dependencies counted {}", info.dependency_count)?;

    for (title, references) in [
        ("Hard References", &details.hard_references),
        ("Soft References", &details.soft_references),
    ] {
        writeln!(out, "{} ({})", title, references.len())?;
        for reference in references {
            writeln!(out, "  {}", reference)?;
        }
    }

    Ok(())
}
