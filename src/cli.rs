//! Command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::Config;

/// shopseed - populate the demo shop database
#[derive(Parser)]
#[command(name = "shopseed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed every family into the configured database
    Seed {
        /// Directory of fixture JSON files, overriding the embedded set
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Drop all existing data first; without it a populated database is refused
        #[arg(long)]
        fresh: bool,
    },

    /// Print row counts of the seeded tables
    Summary,

    /// Create default config file
    #[command(alias = "init")]
    InitConfig,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_path(path),
            None => Config::load(),
        }
    }
}
