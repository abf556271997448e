//! EC2 discovery and teardown calls
//!
//! `Ec2Client` wraps the SDK client with one server-side-filtered
//! discovery call per resource kind and one mutating call per
//! (kind, action). The orchestrator consumes it through the
//! [`VpcOperations`] trait so policy logic can be tested against a mock.

mod discovery;
mod operations;
mod teardown;
mod types;

pub use operations::VpcOperations;
pub use types::{
    Address, InternetGateway, NatGateway, NetworkAcl, RouteTable, RouteTableAssociation,
    SecurityGroup, Subnet, Vpc, VpcEndpoint,
};

#[cfg(test)]
pub use operations::MockVpcOperations;

use crate::aws::context::{AwsContext, FromAwsContext};
use aws_sdk_ec2::Client;

/// EC2 client for VPC inventory and teardown
pub struct Ec2Client {
    pub(crate) client: Client,
}

impl Ec2Client {
    /// Create a new EC2 client (loads AWS config from the environment)
    pub async fn new(region: &str) -> Self {
        let ctx = AwsContext::new(region).await;
        Self::from_context(&ctx)
    }
}

impl FromAwsContext for Ec2Client {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }
}

impl std::fmt::Debug for Ec2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ec2Client").finish_non_exhaustive()
    }
}
