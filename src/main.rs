//! awslog: show what changed in an AWS resource's configuration
//!
//! Fetches configuration history from AWS Config and prints unified diffs
//! between consecutive snapshots.

#![allow(clippy::struct_excessive_bools)]

use anyhow::{Context, Result};
use awslog::{
    cli::{self, HistoryCommand},
    config::{self, AppConfig, ConfigOverrides},
    pipeline::exit_codes,
    resolve::ResourceTypeRegistry,
};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "awslog")]
#[command(version)]
#[command(about = "Show configuration changes of an AWS resource recorded by AWS Config", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Latest change to an instance (type inferred from the id)
    awslog i-0123456789abcdef0

    # Last three changes to a security group, looked up by name
    awslog -t EC2::SecurityGroup -n 3 web-frontend

    # Changes within a time range, without color
    awslog -a '2024-03-01' -b '2 days ago' -o vpc-0abc

    # Include resources that have since been deleted
    awslog -d -t AWS::S3::Bucket old-logs-bucket

Snapshot pairs with no configuration change print nothing, so fewer
diffs than --number can appear.")]
struct Cli {
    /// Resource name or id
    #[arg(required_unless_present_any = ["list_types", "completions", "config_schema", "init_config"])]
    name: Option<String>,

    /// Resource type, e.g. AWS::EC2::Instance or EC2::Instance (inferred from the id if omitted)
    #[arg(short = 't', long = "type")]
    resource_type: Option<String>,

    /// Number of changes to show
    #[arg(short, long)]
    number: Option<usize>,

    /// Only changes before this time ("2024-03-01 12:00", "3 days ago", ...)
    #[arg(short, long)]
    before: Option<String>,

    /// Only changes after this time
    #[arg(short, long)]
    after: Option<String>,

    /// Include deleted resources in the lookup
    #[arg(short, long)]
    deleted: bool,

    /// Lines of context around each change
    #[arg(short, long)]
    context: Option<usize>,

    /// Disable colored output (also off for non-terminal stdout or `NO_COLOR`)
    #[arg(short = 'o', long)]
    no_color: bool,

    /// Sort list elements before diffing
    #[arg(long)]
    sort_lists: bool,

    /// AWS region
    #[arg(long, env = "AWSLOG_REGION")]
    region: Option<String>,

    /// Named AWS profile
    #[arg(long)]
    profile: Option<String>,

    /// AWS Config endpoint override
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// List supported resource types and exit
    #[arg(long)]
    list_types: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Print the JSON Schema of the config file format and exit
    #[arg(long)]
    config_schema: bool,

    /// Write a commented .awslog.yaml to the current directory and exit
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
            number: self.number,
            context: self.context,
            include_deleted: self.deleted,
            sort_lists: self.sort_lists,
            no_color: self.no_color,
        }
    }
}

fn init_config_file() -> Result<()> {
    let target = std::env::current_dir()
        .context("cannot determine current directory")?
        .join(".awslog.yaml");
    if target.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first to re-initialize.",
            target.display()
        );
    }
    std::fs::write(&target, config::generate_full_example_config())
        .with_context(|| format!("failed to write {}", target.display()))?;
    eprintln!("Created {}", target.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "awslog", &mut io::stdout());
        return Ok(());
    }

    if cli.config_schema {
        println!("{}", config::generate_json_schema());
        return Ok(());
    }

    if cli.init_config {
        return init_config_file();
    }

    if cli.list_types {
        return cli::list_types(&ResourceTypeRegistry::aws_default(), &mut io::stdout().lock());
    }

    let overrides = cli.overrides();
    let (config, loaded_from) = AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let Some(name) = cli.name else {
        anyhow::bail!("a resource name or id is required");
    };

    let exit_code = cli::run_history(HistoryCommand {
        name,
        resource_type: cli.resource_type,
        before: cli.before,
        after: cli.after,
        config,
    })?;

    if exit_code != exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "awslog", "-t", "EC2::VPC", "-n", "3", "-b", "now", "-a", "today", "-d", "-c", "2",
            "-o", "vpc-1",
        ])
        .unwrap();
        assert_eq!(cli.name.as_deref(), Some("vpc-1"));
        let overrides = cli.overrides();
        assert_eq!(overrides.number, Some(3));
        assert_eq!(overrides.context, Some(2));
        assert!(overrides.include_deleted);
        assert!(overrides.no_color);
        assert_eq!(cli.resource_type.as_deref(), Some("EC2::VPC"));
    }

    #[test]
    fn test_name_required_for_history() {
        assert!(Cli::try_parse_from(["awslog"]).is_err());
        assert!(Cli::try_parse_from(["awslog", "--list-types"]).is_ok());
    }

    #[test]
    fn test_help_explains_silent_pairs() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("no configuration change print nothing"), "{help}");
    }
}
