//! The narrow contract the teardown engine consumes
//!
//! Abstracts the per-kind discovery and mutating calls so the
//! orchestration policy can be unit tested without hitting real AWS.

use super::types::{
    Address, InternetGateway, NatGateway, NetworkAcl, RouteTable, SecurityGroup, Subnet,
    VpcEndpoint,
};
use super::Ec2Client;
use anyhow::Result;

/// Per-kind discovery and teardown operations for one region.
///
/// The real implementation is [`Ec2Client`]; tests substitute
/// `MockVpcOperations`.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait VpcOperations: Send + Sync {
    /// List all subnets belonging to the VPC
    async fn list_subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>>;

    /// List NAT gateways in the VPC (pending/available only)
    async fn list_nat_gateways(&self, vpc_id: &str) -> Result<Vec<NatGateway>>;

    /// List internet gateways attached to the VPC
    async fn list_internet_gateways(&self, vpc_id: &str) -> Result<Vec<InternetGateway>>;

    /// List VPC endpoints in the VPC
    async fn list_vpc_endpoints(&self, vpc_id: &str) -> Result<Vec<VpcEndpoint>>;

    /// List route tables in the VPC, with their associations
    async fn list_route_tables(&self, vpc_id: &str) -> Result<Vec<RouteTable>>;

    /// List security groups in the VPC, including the `default` group
    async fn list_security_groups(&self, vpc_id: &str) -> Result<Vec<SecurityGroup>>;

    /// List network ACLs in the VPC
    async fn list_network_acls(&self, vpc_id: &str) -> Result<Vec<NetworkAcl>>;

    /// List elastic IPs bound inside the VPC
    async fn list_addresses(&self, vpc_id: &str) -> Result<Vec<Address>>;

    /// Delete a VPC endpoint
    async fn delete_vpc_endpoint(&self, endpoint_id: &str) -> Result<()>;

    /// Delete a NAT gateway
    async fn delete_nat_gateway(&self, nat_gateway_id: &str) -> Result<()>;

    /// Release an elastic IP address
    async fn release_address(&self, allocation_id: &str) -> Result<()>;

    /// Second-phase elastic IP removal; no-op when already released
    async fn delete_address(&self, allocation_id: &str) -> Result<()>;

    /// Detach an internet gateway from the VPC
    async fn detach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()>;

    /// Wait for an internet gateway's attachment to drain
    async fn wait_for_detached(&self, igw_id: &str) -> Result<()>;

    /// Delete a detached internet gateway
    async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()>;

    /// Remove a non-main route-table association
    async fn disassociate_route_table(&self, association_id: &str) -> Result<()>;

    /// Delete a non-main route table
    async fn delete_route_table(&self, route_table_id: &str) -> Result<()>;

    /// Delete a security group (never the `default` group)
    async fn delete_security_group(&self, group_id: &str) -> Result<()>;

    /// Delete a network ACL
    async fn delete_network_acl(&self, network_acl_id: &str) -> Result<()>;

    /// Delete a subnet
    async fn delete_subnet(&self, subnet_id: &str) -> Result<()>;

    /// Delete the VPC itself
    async fn delete_vpc(&self, vpc_id: &str) -> Result<()>;
}

impl VpcOperations for Ec2Client {
    async fn list_subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>> {
        Ec2Client::list_subnets(self, vpc_id).await
    }

    async fn list_nat_gateways(&self, vpc_id: &str) -> Result<Vec<NatGateway>> {
        Ec2Client::list_nat_gateways(self, vpc_id).await
    }

    async fn list_internet_gateways(&self, vpc_id: &str) -> Result<Vec<InternetGateway>> {
        Ec2Client::list_internet_gateways(self, vpc_id).await
    }

    async fn list_vpc_endpoints(&self, vpc_id: &str) -> Result<Vec<VpcEndpoint>> {
        Ec2Client::list_vpc_endpoints(self, vpc_id).await
    }

    async fn list_route_tables(&self, vpc_id: &str) -> Result<Vec<RouteTable>> {
        Ec2Client::list_route_tables(self, vpc_id).await
    }

    async fn list_security_groups(&self, vpc_id: &str) -> Result<Vec<SecurityGroup>> {
        Ec2Client::list_security_groups(self, vpc_id).await
    }

    async fn list_network_acls(&self, vpc_id: &str) -> Result<Vec<NetworkAcl>> {
        Ec2Client::list_network_acls(self, vpc_id).await
    }

    async fn list_addresses(&self, vpc_id: &str) -> Result<Vec<Address>> {
        Ec2Client::list_addresses(self, vpc_id).await
    }

    async fn delete_vpc_endpoint(&self, endpoint_id: &str) -> Result<()> {
        Ec2Client::delete_vpc_endpoint(self, endpoint_id).await
    }

    async fn delete_nat_gateway(&self, nat_gateway_id: &str) -> Result<()> {
        Ec2Client::delete_nat_gateway(self, nat_gateway_id).await
    }

    async fn release_address(&self, allocation_id: &str) -> Result<()> {
        Ec2Client::release_address(self, allocation_id).await
    }

    async fn delete_address(&self, allocation_id: &str) -> Result<()> {
        Ec2Client::delete_address(self, allocation_id).await
    }

    async fn detach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()> {
        Ec2Client::detach_internet_gateway(self, igw_id, vpc_id).await
    }

    async fn wait_for_detached(&self, igw_id: &str) -> Result<()> {
        Ec2Client::wait_for_detached(self, igw_id).await
    }

    async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()> {
        Ec2Client::delete_internet_gateway(self, igw_id).await
    }

    async fn disassociate_route_table(&self, association_id: &str) -> Result<()> {
        Ec2Client::disassociate_route_table(self, association_id).await
    }

    async fn delete_route_table(&self, route_table_id: &str) -> Result<()> {
        Ec2Client::delete_route_table(self, route_table_id).await
    }

    async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        Ec2Client::delete_security_group(self, group_id).await
    }

    async fn delete_network_acl(&self, network_acl_id: &str) -> Result<()> {
        Ec2Client::delete_network_acl(self, network_acl_id).await
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        Ec2Client::delete_subnet(self, subnet_id).await
    }

    async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        Ec2Client::delete_vpc(self, vpc_id).await
    }
}
