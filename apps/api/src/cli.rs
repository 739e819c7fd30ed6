use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cvmatch")]
#[command(about = "Weighted CV/JD matching service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Score every CV in a directory against every JD in another
    Batch {
        /// Directory of PDF résumés
        #[arg(long, default_value = "data/input/CV")]
        cv_dir: PathBuf,

        /// Directory of plain-text job descriptions
        #[arg(long, default_value = "data/input/JD")]
        jd_dir: PathBuf,

        /// Output root for extracted profiles and results
        #[arg(long, default_value = "data/output")]
        out_dir: PathBuf,
    },
}

impl Cli {
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
