//! vpc-nuke: delete a VPC and all of its associated resources
//!
//! `list` enumerates VPCs per profile/region; `delete` runs the
//! dependency-ordered teardown. Without `--force`, `delete` only reports
//! what it would remove.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use vpc_nuke::aws::{Ec2Client, FromAwsContext};
use vpc_nuke::config::{self, FileConfig, FleetConfig, TeardownConfig};
use vpc_nuke::orchestrator;

#[derive(Parser, Debug)]
#[command(name = "vpc-nuke")]
#[command(about = "Delete a VPC and everything attached to it, across AWS profiles and regions")]
#[command(version)]
struct Args {
    /// Comma-separated list of AWS regions to use
    #[arg(short = 'r', long = "region-list", global = true, value_delimiter = ',')]
    region_list: Vec<String>,

    /// Comma-separated list of AWS profiles to use
    #[arg(short = 'p', long = "profile-list", global = true, value_delimiter = ',')]
    profile_list: Vec<String>,

    /// Actually delete resources (default is report-only)
    #[arg(short, long, global = true)]
    force: bool,

    /// Record failures and keep going instead of aborting
    #[arg(short, long, global = true)]
    ignore_errors: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all VPCs in the specified regions and profiles
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Delete a VPC and all of its associated resources
    Delete {
        /// The ID of the VPC to delete (default: every VPC per region)
        #[arg(short, long)]
        vpc_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.debug);

    let file = FileConfig::load()?;
    let vpc_id = match &args.command {
        Command::Delete { vpc_id } => vpc_id.clone(),
        Command::List { .. } => None,
    };
    let (fleet, teardown) = config::resolve(
        &file,
        args.region_list,
        args.profile_list,
        args.force,
        args.ignore_errors,
        vpc_id,
    );

    match args.command {
        Command::List { format } => {
            handle_list(&fleet, teardown, &format).await?;
        }
        Command::Delete { .. } => {
            handle_delete(&fleet, teardown).await?;
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();
}

/// Handle the list command
async fn handle_list(fleet: &FleetConfig, config: TeardownConfig, format: &str) -> Result<()> {
    let mut rows: Vec<serde_json::Value> = Vec::new();
    let mut total = 0usize;

    for profile in fleet.profile_list() {
        for region in &fleet.regions {
            let profile_name = profile.as_deref().unwrap_or("default");

            let vpcs = match list_pair(profile.as_deref(), region).await {
                Ok(vpcs) => vpcs,
                Err(err) if config.ignore_errors => {
                    warn!(
                        profile = %profile_name,
                        region = %region,
                        error = %err,
                        "Listing failed, continuing"
                    );
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            total += vpcs.len();

            if format == "json" {
                for vpc in &vpcs {
                    rows.push(serde_json::json!({
                        "profile": profile_name,
                        "region": region,
                        "vpc_id": vpc.id,
                        "name": vpc.name,
                    }));
                }
            } else {
                println!("VPCs in {profile_name} ({region}):");
                if vpcs.is_empty() {
                    println!("  (none)");
                }
                for vpc in &vpcs {
                    println!(
                        "  {:<24} {}",
                        vpc.id,
                        vpc.name.as_deref().unwrap_or("-")
                    );
                }
            }
        }
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("\nTotal: {total} VPCs");
    }

    Ok(())
}

async fn list_pair(
    profile: Option<&str>,
    region: &str,
) -> Result<Vec<vpc_nuke::aws::ec2::Vpc>, vpc_nuke::TeardownError> {
    let ctx = orchestrator::fleet::session(profile, region).await?;
    let ec2 = Ec2Client::from_context(&ctx);

    ec2.list_vpcs()
        .await
        .map_err(|source| vpc_nuke::TeardownError::Discovery {
            kind: vpc_nuke::ResourceKind::Vpc,
            vpc_id: "all".to_string(),
            source,
        })
}

/// Handle the delete command
async fn handle_delete(fleet: &FleetConfig, config: TeardownConfig) -> Result<()> {
    if !config.force {
        info!("Running in report-only mode; no resources will be deleted");
    }

    let summary = orchestrator::delete_fleet(fleet, config).await?;

    print!("{}", summary.render(config.force));

    if summary.is_clean() {
        info!("Teardown run complete");
    } else {
        warn!(
            failed = summary.failed,
            pairs_failed = summary.pairs_failed,
            "Teardown run finished with contained failures"
        );
    }

    Ok(())
}
