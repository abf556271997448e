//! Profile x region fleet iteration
//!
//! Maps the teardown engine over every configured (profile, region)
//! pair, one at a time. The same containment rule applies at this level:
//! a failed pair aborts the run unless ignore-errors is set.

use crate::aws::ec2::Vpc;
use crate::aws::{account, AwsContext, Ec2Client, FromAwsContext};
use crate::config::{FleetConfig, TeardownConfig};
use crate::error::TeardownError;
use crate::orchestrator::{RunSummary, TeardownEngine};
use crate::resource_kind::ResourceKind;
use tracing::{info, warn};

/// Run the teardown over every configured profile/region pair.
pub async fn delete_fleet(
    fleet: &FleetConfig,
    config: TeardownConfig,
) -> Result<RunSummary, TeardownError> {
    let mut summary = RunSummary::default();

    for profile in fleet.profile_list() {
        for region in &fleet.regions {
            info!(
                profile = %profile.as_deref().unwrap_or("default"),
                region = %region,
                "Deleting VPCs"
            );

            match teardown_pair(profile.as_deref(), region, fleet.vpc_id.as_deref(), config).await
            {
                Ok(pair_summary) => summary.merge(pair_summary),
                Err(err) if config.ignore_errors => {
                    warn!(region = %region, error = %err, "Profile/region pair failed, continuing");
                    summary.pairs_failed += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    Ok(summary)
}

/// Tear down the VPCs of one profile/region pair.
async fn teardown_pair(
    profile: Option<&str>,
    region: &str,
    vpc_id: Option<&str>,
    config: TeardownConfig,
) -> Result<RunSummary, TeardownError> {
    let ctx = session(profile, region).await?;
    let ec2 = Ec2Client::from_context(&ctx);

    let vpcs = scope_vpcs(&ec2, vpc_id).await?;
    if vpcs.is_empty() {
        info!(region = %region, "No VPCs to delete");
        return Ok(RunSummary::default());
    }

    let engine = TeardownEngine::new(&ec2, config);
    engine.teardown_all(&vpcs).await
}

/// Build and validate a session for one profile/region pair. The STS
/// probe surfaces credential problems before any EC2 call.
pub async fn session(profile: Option<&str>, region: &str) -> Result<AwsContext, TeardownError> {
    let ctx = AwsContext::with_profile(region, profile).await;

    account::get_current_account_id(ctx.sdk_config())
        .await
        .map_err(|source| TeardownError::Session {
            profile: ctx.profile_name().to_string(),
            region: region.to_string(),
            source,
        })?;

    Ok(ctx)
}

/// Resolve the set of VPCs to tear down: the single scoped VPC when
/// given, every VPC in the region otherwise.
async fn scope_vpcs(ec2: &Ec2Client, vpc_id: Option<&str>) -> Result<Vec<Vpc>, TeardownError> {
    match vpc_id {
        Some(id) => {
            let vpc = ec2
                .describe_vpc(id)
                .await
                .map_err(|source| TeardownError::Discovery {
                    kind: ResourceKind::Vpc,
                    vpc_id: id.to_string(),
                    source,
                })?;

            match vpc {
                Some(vpc) => Ok(vec![vpc]),
                None => {
                    warn!(vpc_id = %id, "VPC not found, nothing to delete");
                    Ok(Vec::new())
                }
            }
        }
        None => ec2
            .list_vpcs()
            .await
            .map_err(|source| TeardownError::Discovery {
                kind: ResourceKind::Vpc,
                vpc_id: "all".to_string(),
                source,
            }),
    }
}
