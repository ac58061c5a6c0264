use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::collect::{SortKey, VisitMode};
use crate::registry::AssetFilter;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(version, about = "Inspect the transitive memory and disk footprint of project assets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Limit the number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<NonZeroUsize>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Size every matching asset and list them
    Collect(CollectArgs),

    /// Show sizes and direct references of one asset
    Show {
        /// The asset manifest to read
        manifest: PathBuf,

        /// Path of the asset, e.g. /Game/Characters/Hero
        asset: String,
    },
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct CollectArgs {
    /// The asset manifest to read
    pub manifest: PathBuf,

    /// Only use assets of this class as roots
    #[arg(long = "class", value_name = "CLASS", default_value = "Blueprint", conflicts_with = "any_class")]
    pub classes: Vec<String>,

    /// Accept roots of every class
    #[arg(long, default_value = "false")]
    pub any_class: bool,

    /// Only use assets under this package path as roots
    #[arg(long = "path", value_name = "PATH", default_value = "/Game")]
    pub package_paths: Vec<String>,

    /// Only accept assets directly inside the given package paths
    #[arg(long, default_value = "false")]
    pub no_recursive: bool,

    /// Order of the listed assets
    #[arg(long, value_enum, default_value_t = SortKey::Memory)]
    pub sort: SortKey,

    /// Share one visited set across all roots, so a dependency is only
    /// counted for the first root that reaches it
    #[arg(long, default_value = "false")]
    pub shared_visited: bool,

    /// Export the list to a text file, by default AssetInvestigatorReport.txt
    /// next to the manifest
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    /// Print the list as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Hide the progress bar
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl CollectArgs {
    pub fn filter(&self) -> AssetFilter {
        AssetFilter {
            classes: if self.any_class { Vec::new() } else { self.classes.clone() },
            package_paths: self.package_paths.clone(),
            recursive: !self.no_recursive,
        }
    }

    pub fn visit_mode(&self) -> VisitMode {
        if self.shared_visited {
            VisitMode::Shared
        } else {
            VisitMode::PerRoot
        }
    }
}
