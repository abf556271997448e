//! Per-VPC resource snapshot
//!
//! All eight dependent kinds are discovered once, before any mutation,
//! and never re-queried mid-teardown.

use crate::aws::ec2::{
    Address, InternetGateway, NatGateway, NetworkAcl, RouteTable, SecurityGroup, Subnet,
    VpcEndpoint,
};

/// Everything attached to one VPC at the moment teardown began.
#[derive(Debug, Clone, Default)]
pub struct VpcSnapshot {
    pub endpoints: Vec<VpcEndpoint>,
    pub nat_gateways: Vec<NatGateway>,
    pub addresses: Vec<Address>,
    pub internet_gateways: Vec<InternetGateway>,
    pub route_tables: Vec<RouteTable>,
    pub security_groups: Vec<SecurityGroup>,
    pub network_acls: Vec<NetworkAcl>,
    pub subnets: Vec<Subnet>,
}

impl VpcSnapshot {
    /// Total number of dependent resources in the snapshot, excluding
    /// the VPC itself.
    pub fn len(&self) -> usize {
        self.endpoints.len()
            + self.nat_gateways.len()
            + self.addresses.len()
            + self.internet_gateways.len()
            + self.route_tables.len()
            + self.security_groups.len()
            + self.network_acls.len()
            + self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
