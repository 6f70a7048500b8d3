use clap::{Parser, Subcommand};

/// Poncho - package a conda environment and its data into one archive
#[derive(Parser, Debug)]
#[command(name = "poncho")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter, e.g. "poncho=debug" (default: from PONCHO_LOG_LEVEL)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Only print warnings and errors
    #[arg(long, short, global = true, default_value = "false")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the environment described by a spec file and pack it into an archive
    Create {
        /// Path to the poncho JSON spec
        #[arg(value_name = "SPEC")]
        spec: String,

        /// Archive to write (overwritten if present)
        #[arg(value_name = "OUTPUT")]
        output: String,
    },

    /// Print the conda spec a spec file converts to, without building anything
    ///
    /// The output also lists, under `pip_local`, the editable pip packages that
    /// would be installed from their local checkouts.
    Convert {
        /// Path to the poncho JSON spec
        #[arg(value_name = "SPEC")]
        spec: String,
    },

    /// List pip packages installed as editable in the current environment
    Editable,
}
