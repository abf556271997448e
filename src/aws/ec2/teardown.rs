//! Per-kind mutating calls
//!
//! One detach/release/disassociate/delete per resource kind, plus the
//! bounded wait for internet-gateway detachment. No retry layer; every
//! call is a single attempt against the provider.

use super::Ec2Client;
use crate::aws::error::{classify, ignore_not_found};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on the internet-gateway detachment wait (seconds)
const DETACH_WAIT_MAX_SECS: u64 = 300;

/// Poll interval while waiting for detachment
const DETACH_POLL_SECS: u64 = 5;

impl Ec2Client {
    /// Delete a VPC endpoint.
    pub async fn delete_vpc_endpoint(&self, endpoint_id: &str) -> Result<()> {
        info!(endpoint_id = %endpoint_id, "Deleting VPC endpoint");

        self.client
            .delete_vpc_endpoints()
            .vpc_endpoint_ids(endpoint_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete VPC endpoint {endpoint_id}"))?;

        Ok(())
    }

    /// Delete a NAT gateway. The provider completes the deletion
    /// asynchronously; the gateway lingers in `deleting` state.
    pub async fn delete_nat_gateway(&self, nat_gateway_id: &str) -> Result<()> {
        info!(nat_gateway_id = %nat_gateway_id, "Deleting NAT gateway");

        self.client
            .delete_nat_gateway()
            .nat_gateway_id(nat_gateway_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete NAT gateway {nat_gateway_id}"))?;

        Ok(())
    }

    /// Release an elastic IP address. Releasing also drops any
    /// association with a network interface.
    pub async fn release_address(&self, allocation_id: &str) -> Result<()> {
        info!(allocation_id = %allocation_id, "Releasing elastic IP");

        self.client
            .release_address()
            .allocation_id(allocation_id)
            .send()
            .await
            .with_context(|| format!("Failed to release elastic IP {allocation_id}"))?;

        Ok(())
    }

    /// Second-phase elastic IP removal: a release that tolerates the
    /// address already being gone, so the pass is a no-op after a
    /// successful [`release_address`](Self::release_address).
    pub async fn delete_address(&self, allocation_id: &str) -> Result<()> {
        let released = ignore_not_found(
            self.client
                .release_address()
                .allocation_id(allocation_id)
                .send()
                .await,
        )
        .with_context(|| format!("Failed to delete elastic IP {allocation_id}"))?;

        if released.is_none() {
            debug!(allocation_id = %allocation_id, "Elastic IP already released");
        }

        Ok(())
    }

    /// Detach an internet gateway from its VPC. An already-detached
    /// gateway is treated as success.
    pub async fn detach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()> {
        info!(igw_id = %igw_id, vpc_id = %vpc_id, "Detaching internet gateway");

        let detached = ignore_not_found(
            self.client
                .detach_internet_gateway()
                .internet_gateway_id(igw_id)
                .vpc_id(vpc_id)
                .send()
                .await,
        )
        .with_context(|| format!("Failed to detach internet gateway {igw_id} from {vpc_id}"))?;

        if detached.is_none() {
            debug!(igw_id = %igw_id, "Internet gateway was already detached");
        }

        Ok(())
    }

    /// Wait for an internet gateway's attachment list to drain after a
    /// detach call. Bounded; warns and continues when the deadline
    /// passes rather than failing the stage.
    pub async fn wait_for_detached(&self, igw_id: &str) -> Result<()> {
        let start = std::time::Instant::now();

        loop {
            if start.elapsed().as_secs() > DETACH_WAIT_MAX_SECS {
                warn!(igw_id = %igw_id, "Timeout waiting for internet gateway to detach");
                return Ok(());
            }

            let response = ignore_not_found(
                self.client
                    .describe_internet_gateways()
                    .internet_gateway_ids(igw_id)
                    .send()
                    .await,
            )
            .with_context(|| format!("Failed to describe internet gateway {igw_id}"))?;

            let attachments = response
                .as_ref()
                .and_then(|r| r.internet_gateways().first())
                .map(|igw| igw.attachments().len())
                .unwrap_or(0);

            if attachments == 0 {
                debug!(igw_id = %igw_id, "Internet gateway detached");
                return Ok(());
            }

            debug!(igw_id = %igw_id, attachments, "Internet gateway still attached");
            tokio::time::sleep(Duration::from_secs(DETACH_POLL_SECS)).await;
        }
    }

    /// Delete a detached internet gateway.
    pub async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()> {
        info!(igw_id = %igw_id, "Deleting internet gateway");

        self.client
            .delete_internet_gateway()
            .internet_gateway_id(igw_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete internet gateway {igw_id}"))?;

        Ok(())
    }

    /// Remove a non-main route-table association.
    pub async fn disassociate_route_table(&self, association_id: &str) -> Result<()> {
        info!(association_id = %association_id, "Disassociating route table");

        self.client
            .disassociate_route_table()
            .association_id(association_id)
            .send()
            .await
            .with_context(|| format!("Failed to disassociate route table {association_id}"))?;

        Ok(())
    }

    /// Delete a route table. The main table cannot be deleted; callers
    /// never pass it here.
    pub async fn delete_route_table(&self, route_table_id: &str) -> Result<()> {
        info!(route_table_id = %route_table_id, "Deleting route table");

        self.client
            .delete_route_table()
            .route_table_id(route_table_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete route table {route_table_id}"))?;

        Ok(())
    }

    /// Delete a security group. The `default` group is excluded by the
    /// orchestrator and never passed here.
    pub async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        info!(group_id = %group_id, "Deleting security group");

        self.client
            .delete_security_group()
            .group_id(group_id)
            .send()
            .await
            .map_err(|err| {
                if classify(&err).is_dependency_violation() {
                    anyhow::Error::from(err).context(format!(
                        "Security group {group_id} is still referenced by another resource"
                    ))
                } else {
                    anyhow::Error::from(err)
                        .context(format!("Failed to delete security group {group_id}"))
                }
            })?;

        Ok(())
    }

    /// Delete a network ACL. The default ACL is provider-protected and
    /// this call fails against it.
    pub async fn delete_network_acl(&self, network_acl_id: &str) -> Result<()> {
        info!(network_acl_id = %network_acl_id, "Deleting network ACL");

        self.client
            .delete_network_acl()
            .network_acl_id(network_acl_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete network ACL {network_acl_id}"))?;

        Ok(())
    }

    /// Delete a subnet.
    pub async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        info!(subnet_id = %subnet_id, "Deleting subnet");

        self.client
            .delete_subnet()
            .subnet_id(subnet_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete subnet {subnet_id}"))?;

        Ok(())
    }

    /// Delete the VPC itself, after every dependent resource is gone.
    pub async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        info!(vpc_id = %vpc_id, "Deleting VPC");

        self.client
            .delete_vpc()
            .vpc_id(vpc_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete VPC {vpc_id}"))?;

        Ok(())
    }
}
