//! Per-kind resource discovery
//!
//! One `describe_*` call per resource kind, filtered server-side by VPC
//! association. Each returns an empty `Vec`, never an error, when
//! nothing matches.

use super::types::{
    Address, InternetGateway, NatGateway, NetworkAcl, RouteTable, SecurityGroup, Subnet, Vpc,
    VpcEndpoint,
};
use super::Ec2Client;
use crate::aws::error::ignore_not_found;
use anyhow::{Context, Result};
use aws_sdk_ec2::types::Filter;
use tracing::debug;

fn vpc_filter(vpc_id: &str) -> Filter {
    Filter::builder().name("vpc-id").values(vpc_id).build()
}

impl Ec2Client {
    /// List every VPC visible in the region.
    pub async fn list_vpcs(&self) -> Result<Vec<Vpc>> {
        let response = self
            .client
            .describe_vpcs()
            .send()
            .await
            .context("Failed to list VPCs")?;

        Ok(response.vpcs().iter().filter_map(Vpc::from_sdk).collect())
    }

    /// Look up a single VPC by id; `None` when it does not exist.
    pub async fn describe_vpc(&self, vpc_id: &str) -> Result<Option<Vpc>> {
        let response = ignore_not_found(
            self.client.describe_vpcs().vpc_ids(vpc_id).send().await,
        )
        .with_context(|| format!("Failed to describe VPC {vpc_id}"))?;

        Ok(response
            .as_ref()
            .and_then(|r| r.vpcs().first())
            .and_then(Vpc::from_sdk))
    }

    /// List all subnets belonging to the VPC.
    pub async fn list_subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>> {
        let response = self
            .client
            .describe_subnets()
            .filters(vpc_filter(vpc_id))
            .send()
            .await
            .with_context(|| format!("Failed to list subnets for VPC {vpc_id}"))?;

        let subnets: Vec<_> = response.subnets().iter().filter_map(Subnet::from_sdk).collect();
        debug!(vpc_id = %vpc_id, count = subnets.len(), "Found subnets");
        Ok(subnets)
    }

    /// List NAT gateways in the VPC.
    ///
    /// Gateways already in `deleting`/`deleted` state are excluded so a
    /// re-run against a torn-down VPC finds nothing.
    pub async fn list_nat_gateways(&self, vpc_id: &str) -> Result<Vec<NatGateway>> {
        let response = self
            .client
            .describe_nat_gateways()
            .filter(vpc_filter(vpc_id))
            .filter(
                Filter::builder()
                    .name("state")
                    .values("pending")
                    .values("available")
                    .build(),
            )
            .send()
            .await
            .with_context(|| format!("Failed to list NAT gateways for VPC {vpc_id}"))?;

        Ok(response
            .nat_gateways()
            .iter()
            .filter_map(NatGateway::from_sdk)
            .collect())
    }

    /// List internet gateways attached to the VPC.
    pub async fn list_internet_gateways(&self, vpc_id: &str) -> Result<Vec<InternetGateway>> {
        let response = self
            .client
            .describe_internet_gateways()
            .filters(
                Filter::builder()
                    .name("attachment.vpc-id")
                    .values(vpc_id)
                    .build(),
            )
            .send()
            .await
            .with_context(|| format!("Failed to list internet gateways for VPC {vpc_id}"))?;

        Ok(response
            .internet_gateways()
            .iter()
            .filter_map(InternetGateway::from_sdk)
            .collect())
    }

    /// List VPC endpoints in the VPC.
    pub async fn list_vpc_endpoints(&self, vpc_id: &str) -> Result<Vec<VpcEndpoint>> {
        let response = self
            .client
            .describe_vpc_endpoints()
            .filters(vpc_filter(vpc_id))
            .send()
            .await
            .with_context(|| format!("Failed to list VPC endpoints for VPC {vpc_id}"))?;

        Ok(response
            .vpc_endpoints()
            .iter()
            .filter_map(VpcEndpoint::from_sdk)
            .collect())
    }

    /// List route tables in the VPC, with their associations.
    pub async fn list_route_tables(&self, vpc_id: &str) -> Result<Vec<RouteTable>> {
        let response = self
            .client
            .describe_route_tables()
            .filters(vpc_filter(vpc_id))
            .send()
            .await
            .with_context(|| format!("Failed to list route tables for VPC {vpc_id}"))?;

        Ok(response
            .route_tables()
            .iter()
            .filter_map(RouteTable::from_sdk)
            .collect())
    }

    /// List security groups in the VPC, including the `default` group.
    pub async fn list_security_groups(&self, vpc_id: &str) -> Result<Vec<SecurityGroup>> {
        let response = self
            .client
            .describe_security_groups()
            .filters(vpc_filter(vpc_id))
            .send()
            .await
            .with_context(|| format!("Failed to list security groups for VPC {vpc_id}"))?;

        Ok(response
            .security_groups()
            .iter()
            .filter_map(SecurityGroup::from_sdk)
            .collect())
    }

    /// List network ACLs in the VPC.
    pub async fn list_network_acls(&self, vpc_id: &str) -> Result<Vec<NetworkAcl>> {
        let response = self
            .client
            .describe_network_acls()
            .filters(vpc_filter(vpc_id))
            .send()
            .await
            .with_context(|| format!("Failed to list network ACLs for VPC {vpc_id}"))?;

        Ok(response
            .network_acls()
            .iter()
            .filter_map(NetworkAcl::from_sdk)
            .collect())
    }

    /// List elastic IP addresses bound inside the VPC, using the
    /// domain + network-interface filter.
    pub async fn list_addresses(&self, vpc_id: &str) -> Result<Vec<Address>> {
        let response = self
            .client
            .describe_addresses()
            .filters(Filter::builder().name("domain").values("vpc").build())
            .filters(
                Filter::builder()
                    .name("network-interface-id")
                    .values(vpc_id)
                    .build(),
            )
            .send()
            .await
            .with_context(|| format!("Failed to list elastic IPs for VPC {vpc_id}"))?;

        Ok(response
            .addresses()
            .iter()
            .filter_map(Address::from_sdk)
            .collect())
    }
}
