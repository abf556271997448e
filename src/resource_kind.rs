//! VPC resource kinds and teardown ordering
//!
//! Every dependent resource blocks deletion of something later in the
//! chain, so teardown must follow a fixed dependency order.

use std::fmt;

/// Kinds of VPC-attached resources handled by the teardown engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// VPC endpoint (private connection to a provider service)
    VpcEndpoint,
    /// NAT gateway (occupies a subnet, holds an elastic IP)
    NatGateway,
    /// Elastic IP address (released, then deleted)
    ElasticIp,
    /// Internet gateway (must be detached before deletion)
    InternetGateway,
    /// Route table (non-main associations disassociated first)
    RouteTable,
    /// Security group (the `default` group is never deleted)
    SecurityGroup,
    /// Network ACL (the default ACL is provider-protected)
    NetworkAcl,
    /// Subnet (deletable once gateways and endpoints are gone)
    Subnet,
    /// The VPC itself, deleted last
    Vpc,
}

impl ResourceKind {
    /// Stage order for a single VPC teardown. Each stage removes a class
    /// of resource that blocks deletion of a later stage.
    pub const TEARDOWN_ORDER: [ResourceKind; 9] = [
        ResourceKind::VpcEndpoint,
        ResourceKind::NatGateway,
        ResourceKind::ElasticIp,
        ResourceKind::InternetGateway,
        ResourceKind::RouteTable,
        ResourceKind::SecurityGroup,
        ResourceKind::NetworkAcl,
        ResourceKind::Subnet,
        ResourceKind::Vpc,
    ];

    /// Get teardown priority (lower number = torn down first)
    pub fn teardown_priority(self) -> u8 {
        match self {
            ResourceKind::VpcEndpoint => 0,
            ResourceKind::NatGateway => 1,
            ResourceKind::ElasticIp => 2,
            ResourceKind::InternetGateway => 3,
            ResourceKind::RouteTable => 4,
            ResourceKind::SecurityGroup => 5,
            ResourceKind::NetworkAcl => 6,
            ResourceKind::Subnet => 7,
            ResourceKind::Vpc => 8,
        }
    }

    /// Human-readable label used in logs and reports
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::VpcEndpoint => "VPC endpoint",
            ResourceKind::NatGateway => "NAT gateway",
            ResourceKind::ElasticIp => "elastic IP",
            ResourceKind::InternetGateway => "internet gateway",
            ResourceKind::RouteTable => "route table",
            ResourceKind::SecurityGroup => "security group",
            ResourceKind::NetworkAcl => "network ACL",
            ResourceKind::Subnet => "subnet",
            ResourceKind::Vpc => "VPC",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
