//! CLI argument definitions for `webjars-extract`.
//!
//! Kept apart from the entrypoint so parsing can be tested without running
//! an extraction.

use std::ffi::OsString;

use camino::Utf8PathBuf;
use clap::{ArgGroup, Args, Parser, Subcommand};
use log::LevelFilter;

/// Extract WebJar resources onto the filesystem.
#[derive(Parser, Debug)]
#[command(name = "webjars-extract")]
#[command(version, about)]
#[command(long_about = concat!(
    "Extract WebJar resources onto the filesystem.\n\n",
    "WebJars are jar or zip archives carrying front-end libraries under ",
    "META-INF/resources/webjars/<package>/. This tool copies those files to ",
    "<dest>/<package>/ and, given a cache file, skips files that have not ",
    "changed since the previous run.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Extract jQuery from a jar:\n",
    "    $ webjars-extract extract --classpath lib/jquery-3.7.1.jar -p jquery -d web\n\n",
    "  Extract every package found in lib/, remembering what was written:\n",
    "    $ webjars-extract extract --lib-dir lib --all -d web --cache target/webjars.json\n\n",
    "  List the packages on a search path:\n",
    "    $ webjars-extract list --lib-dir lib",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log output (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Log level implied by `-v`/`-q`; `RUST_LOG` may still override it.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy resources to a destination directory.
    Extract(ExtractArgs),

    /// Print the package names found on the search path.
    List(ListArgs),
}

/// Where to look for archives and settings.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Archive, directory or platform path list to search (can be repeated).
    #[arg(long, value_name = "PATH")]
    pub classpath: Vec<OsString>,

    /// Directory whose jar and zip files are searched (can be repeated).
    #[arg(short = 'L', long = "lib-dir", value_name = "DIR")]
    pub lib_dirs: Vec<Utf8PathBuf>,

    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,
}

/// Arguments for the extract command.
#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("scope")
        .required(true)
        .multiple(true)
        .args(["packages", "all", "node_modules"])
))]
pub struct ExtractArgs {
    /// Destination root; each package lands in its own subdirectory.
    #[arg(short, long, value_name = "DIR")]
    pub dest: Utf8PathBuf,

    /// Extract a single package by name (can be repeated).
    #[arg(short, long = "package", value_name = "NAME")]
    pub packages: Vec<String>,

    /// Extract every WebJar package.
    #[arg(short, long, conflicts_with = "packages")]
    pub all: bool,

    /// Extract every node module.
    #[arg(long)]
    pub node_modules: bool,

    /// Only extract files below this package-relative sub-path.
    #[arg(long, value_name = "SUBPATH")]
    pub filter: Option<String>,

    /// JSON cache file; overrides `cache_file` from the configuration.
    #[arg(long, value_name = "FILE")]
    pub cache: Option<Utf8PathBuf>,

    /// Search path settings.
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Search path settings.
    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
