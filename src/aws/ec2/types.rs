//! Plain owned records for VPC-attached resources
//!
//! The orchestrator and its tests work against these records, never
//! against SDK builders. Conversions drop SDK entries with no id; the
//! provider does not return them in practice.

use aws_sdk_ec2::types as sdk;

/// An isolated virtual network; root of the teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vpc {
    pub id: String,
    /// Value of the `Name` tag, when present
    pub name: Option<String>,
}

impl Vpc {
    pub(crate) fn from_sdk(vpc: &sdk::Vpc) -> Option<Self> {
        Some(Self {
            id: vpc.vpc_id()?.to_string(),
            name: name_tag(vpc.tags()),
        })
    }

    /// Display label: the name tag when present, the id otherwise.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// An IP address range within a VPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub id: String,
    pub name: Option<String>,
}

impl Subnet {
    pub(crate) fn from_sdk(subnet: &sdk::Subnet) -> Option<Self> {
        Some(Self {
            id: subnet.subnet_id()?.to_string(),
            name: name_tag(subnet.tags()),
        })
    }
}

/// A managed gateway translating outbound addresses for private subnets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatGateway {
    pub id: String,
}

impl NatGateway {
    pub(crate) fn from_sdk(gateway: &sdk::NatGateway) -> Option<Self> {
        Some(Self {
            id: gateway.nat_gateway_id()?.to_string(),
        })
    }
}

/// A gateway attaching a VPC to the public internet. Carries its
/// zero-or-one attachment record; must be detached before deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetGateway {
    pub id: String,
    pub name: Option<String>,
    /// VPC the gateway is attached to, when attached
    pub attached_vpc: Option<String>,
}

impl InternetGateway {
    pub(crate) fn from_sdk(gateway: &sdk::InternetGateway) -> Option<Self> {
        Some(Self {
            id: gateway.internet_gateway_id()?.to_string(),
            name: name_tag(gateway.tags()),
            attached_vpc: gateway
                .attachments()
                .first()
                .and_then(|a| a.vpc_id())
                .map(str::to_string),
        })
    }
}

/// A private connection point from a VPC to a provider service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcEndpoint {
    pub id: String,
}

impl VpcEndpoint {
    pub(crate) fn from_sdk(endpoint: &sdk::VpcEndpoint) -> Option<Self> {
        Some(Self {
            id: endpoint.vpc_endpoint_id()?.to_string(),
        })
    }
}

/// One subnet-to-route-table association. The `main` association binds
/// the VPC's implicit main table and is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTableAssociation {
    pub id: String,
    pub main: bool,
}

/// A set of routing rules with its associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub id: String,
    pub associations: Vec<RouteTableAssociation>,
}

impl RouteTable {
    pub(crate) fn from_sdk(table: &sdk::RouteTable) -> Option<Self> {
        let associations = table
            .associations()
            .iter()
            .filter_map(|a| {
                Some(RouteTableAssociation {
                    id: a.route_table_association_id()?.to_string(),
                    main: a.main().unwrap_or(false),
                })
            })
            .collect();

        Some(Self {
            id: table.route_table_id()?.to_string(),
            associations,
        })
    }

    /// Whether this is the VPC's main route table. At most one per VPC.
    pub fn is_main(&self) -> bool {
        self.associations.iter().any(|a| a.main)
    }
}

/// A stateful firewall rule set. Every VPC has an undeletable group
/// named `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
}

impl SecurityGroup {
    pub(crate) fn from_sdk(group: &sdk::SecurityGroup) -> Option<Self> {
        Some(Self {
            id: group.group_id()?.to_string(),
            name: group.group_name().unwrap_or_default().to_string(),
        })
    }
}

/// A stateless firewall rule set attached to subnets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAcl {
    pub id: String,
}

impl NetworkAcl {
    pub(crate) fn from_sdk(acl: &sdk::NetworkAcl) -> Option<Self> {
        Some(Self {
            id: acl.network_acl_id()?.to_string(),
        })
    }
}

/// An elastic IP address, optionally bound to a network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub allocation_id: String,
    pub public_ip: String,
    /// Binding to a network interface, when associated
    pub association_id: Option<String>,
}

impl Address {
    pub(crate) fn from_sdk(address: &sdk::Address) -> Option<Self> {
        Some(Self {
            allocation_id: address.allocation_id()?.to_string(),
            public_ip: address.public_ip().unwrap_or_default().to_string(),
            association_id: address.association_id().map(str::to_string),
        })
    }
}

/// Value of the `Name` tag, when present.
pub(crate) fn name_tag(tags: &[sdk::Tag]) -> Option<String> {
    tags.iter()
        .find(|tag| tag.key() == Some("Name"))
        .and_then(|tag| tag.value())
        .map(str::to_string)
}
