use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use linkorder::NameStyle;

mod commands;

/// Link-order and dependency-graph CLI for native libraries.
///
/// This CLI is a thin wrapper around `linkorder-core` (exposed in code as
/// `linkorder_core`). All substantive logic lives in the library so it can
/// be tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "linkorder",
    version,
    about = "Computes link order and dependency graphs for native libraries",
    long_about = None
)]
struct Cli {
    /// Path to the scan cache file.
    #[arg(long, global = true, default_value = ".linkcache.json")]
    cache: PathBuf,

    /// Enable debug logging.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan library files (or directories of libraries) and update the cache.
    ///
    /// Directories are searched recursively for `*.a` and `*.so` files.
    /// Files whose cached content hash still matches are skipped unless
    /// `--force` is given. Per-file parse failures are reported and
    /// skipped; use `--fail-fast` to abort on the first one instead.
    Analyze {
        /// Library files or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Re-analyze even when the cached entry is still fresh.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Mark the scanned libraries as system libraries.
        #[arg(long, default_value_t = false)]
        system: bool,

        /// Abort on the first per-file failure instead of skipping it.
        #[arg(long, default_value_t = false)]
        fail_fast: bool,
    },

    /// Print a link-safe ordering of the cached (or named) libraries.
    ///
    /// The canonical order places definers before their dependents; pass
    /// `--reverse` for linkers that expect dependents first. A dependency
    /// cycle fails the command and prints every cycle with the symbols
    /// that caused it.
    Sort {
        /// Libraries to order (short or full names). Defaults to all
        /// cached libraries.
        libs: Vec<String>,

        /// Emit dependents before definers instead.
        #[arg(long, default_value_t = false)]
        reverse: bool,

        /// Separator between library names.
        #[arg(long, default_value = ", ")]
        sep: String,

        /// Name rendering style.
        #[arg(long, value_enum, default_value = "short")]
        names: NameStyle,

        /// Wrap each name in this string (e.g. `"` for quoting).
        #[arg(long, default_value = "")]
        quote: String,
    },

    /// Find which cached libraries define a symbol.
    Find {
        /// Symbol name to look up.
        symbol: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Name rendering style.
        #[arg(long, value_enum, default_value = "short")]
        names: NameStyle,
    },

    /// List the dependencies of one or more libraries.
    Deps {
        /// Libraries to inspect (short or full names).
        #[arg(required = true)]
        libs: Vec<String>,

        /// Follow dependencies transitively.
        #[arg(long, default_value_t = false)]
        transitive: bool,

        /// Drop libraries already covered as dependencies of other
        /// listed libraries.
        #[arg(long, default_value_t = false)]
        minimize: bool,

        /// Sort each dependency list lexicographically.
        #[arg(long, default_value_t = false)]
        sort: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Name rendering style.
        #[arg(long, value_enum, default_value = "short")]
        names: NameStyle,
    },

    /// Dump the dependency graph: edges with witness symbols, unresolved
    /// externals, and ambiguous definitions.
    Graph {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Emit a components/dependencies descriptor (library -> direct deps)
    /// for package-manager integration.
    Descriptor {
        /// Include libraries marked as system libraries.
        #[arg(long, default_value_t = false)]
        include_system: bool,

        /// Emit JSON instead of YAML.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    env_logger::Builder::new().filter_level(level).format_timestamp(None).init();

    match cli.command {
        Command::Analyze { paths, force, system, fail_fast } => {
            commands::analyze::run(&cli.cache, &paths, force, system, fail_fast)
        }
        Command::Sort { libs, reverse, sep, names, quote } => {
            commands::sort::run(&cli.cache, &libs, reverse, &sep, names, &quote)
        }
        Command::Find { symbol, json, names } => {
            commands::find::run(&cli.cache, &symbol, json, names)
        }
        Command::Deps { libs, transitive, minimize, sort, json, names } => {
            commands::deps::run(&cli.cache, &libs, transitive, minimize, sort, json, names)
        }
        Command::Graph { json } => commands::graph::run(&cli.cache, json),
        Command::Descriptor { include_system, json } => {
            commands::descriptor::run(&cli.cache, include_system, json)
        }
    }
}
