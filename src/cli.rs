use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "nw-builder")]
#[command(version)]
#[command(about = "Provision and tear down the app OTA demo device bootstrap assets", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control plane API endpoint
    #[arg(long, env = "NW_BUILDER_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Demo stack to operate on
    #[arg(long, env = "NW_BUILDER_STACK", global = true)]
    pub stack: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build and publish the device bootstrap assets, printing the script URL
    PrepareAsset,

    /// Deactivate the device identity and purge all published assets and jobs
    CleanupAsset,

    /// Print the MQTT data endpoint for the demo device
    ServiceEndpoint,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
