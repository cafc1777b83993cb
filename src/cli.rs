// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kubeb")]
#[command(about = "Build, version and deploy applications to Kubernetes with Helm")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize kubeb in the current directory
    Init(InitArgs),

    /// Show project information
    Info,

    /// Build the application image and record a new version
    Build {
        /// Release note; repeat for multiple lines. Opens an editor when omitted
        #[arg(short, long = "message")]
        message: Vec<String>,

        /// Push the image after building
        #[arg(long)]
        push: bool,
    },

    /// Push a built version's image
    Push {
        /// Version tag (defaults to the latest build)
        #[arg(long)]
        version: Option<String>,
    },

    /// Deploy a built version to the current environment
    Deploy {
        /// Version tag (defaults to the latest build)
        #[arg(long, conflicts_with = "previous")]
        version: Option<String>,

        /// Deploy the build before the last deployed one
        #[arg(long)]
        previous: bool,

        /// Chart value overrides, `key=value[,key=value...]`
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Render and validate without changing the cluster
        #[arg(long)]
        dry_run: bool,

        /// Do not roll back automatically when the install fails
        #[arg(long)]
        no_rollback: bool,
    },

    /// Roll the release back to a revision (defaults to the last superseded one)
    Rollback {
        /// Helm revision number
        revision: Option<String>,
    },

    /// Uninstall the release
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List built versions
    Version,

    /// Show the release history
    History,

    /// Switch to an environment, creating it if needed
    Env {
        /// Environment name
        name: String,
    },

    /// Set variables of the current environment
    Setenv {
        /// Assignments, `KEY=VALUE`
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },

    /// Add a user template from a directory
    Template {
        /// Template name
        name: String,

        /// Directory holding the template files
        path: PathBuf,

        /// Replace an existing template
        #[arg(short, long)]
        force: bool,
    },

    /// Remove kubeb files from the current directory
    Destroy {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct InitArgs {
    /// Release name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Image repository without tag (defaults to the release name)
    #[arg(long)]
    pub image: Option<String>,

    /// Maintainer (defaults to $USER)
    #[arg(long)]
    pub user: Option<String>,

    /// Template to scaffold from
    #[arg(short, long, default_value = "laravel")]
    pub template: String,

    /// Initial environment
    #[arg(short, long, default_value = "local")]
    pub env: String,

    /// Overwrite an existing kubeb configuration
    #[arg(short, long)]
    pub force: bool,
}
