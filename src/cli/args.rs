//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Class-map generator and symbol resolver
#[derive(Parser, Debug)]
#[command(
    name = "classmap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate class maps and resolve symbols to files",
    long_about = "Scan source trees for class, interface, trait and enum declarations, \
                  persist the symbol map and resolve names through it or through \
                  namespace directories.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .classmap directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .classmap/settings.toml")]
    Config,

    /// Scan roots and write the class map
    #[command(
        about = "Scan source roots and dump the class map",
        after_help = "Examples:\n  classmap regenerate\n  classmap regenerate src lib --output build/classmap.php\n  classmap regenerate --blacklist '/vendor/' --namespace 'App\\'"
    )]
    Regenerate {
        /// Files or directories to scan (defaults to [scan].roots)
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Cache file to write (defaults to [scan].cache_file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Regex of file paths to skip
        #[arg(long)]
        blacklist: Option<String>,

        /// Keep only symbols with this prefix
        #[arg(long)]
        namespace: Option<String>,

        /// Scan files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Resolve a symbol to its file
    #[command(about = "Resolve a symbol through the class map and namespace directories")]
    Resolve {
        /// Fully qualified symbol name
        name: String,

        /// Also register PSR-4 prefixes from this composer.json
        #[arg(long, value_name = "FILE")]
        composer: Option<PathBuf>,

        /// Also register prefixes from a JSON array of {namespace, path}
        #[arg(long, value_name = "FILE")]
        namespaces: Option<PathBuf>,

        /// Print the answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered namespace prefixes
    #[command(about = "List namespace prefixes and their directories")]
    Namespaces {
        /// Also register PSR-4 prefixes from this composer.json
        #[arg(long, value_name = "FILE")]
        composer: Option<PathBuf>,
    },
}
