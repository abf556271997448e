//! The dependency-ordered teardown engine
//!
//! Given one VPC, the engine snapshots every dependent resource kind,
//! then runs the mutation stages in [`ResourceKind::TEARDOWN_ORDER`],
//! finishing with the VPC itself. The force gate and the ignore-errors
//! containment policy are applied uniformly by [`StageRun`]; the same
//! containment rule governs the inter-VPC loop and the profile x region
//! fleet loop.

pub mod fleet;
mod report;
mod snapshot;
mod stage;

pub use fleet::delete_fleet;
pub use report::{DiscoveryFailure, RunSummary, VpcReport};
pub use snapshot::VpcSnapshot;
pub use stage::{Attempt, StageReport, StageRun};

use crate::aws::ec2::{Vpc, VpcOperations};
use crate::config::TeardownConfig;
use crate::error::TeardownError;
use crate::resource_kind::ResourceKind;
use std::future::Future;
use tracing::{debug, info, warn};

/// Name of the security group that exists in every VPC and cannot be
/// deleted.
pub const DEFAULT_SECURITY_GROUP: &str = "default";

/// Sequences inventory and deleters for one VPC at a time.
pub struct TeardownEngine<'a, O> {
    ops: &'a O,
    config: TeardownConfig,
}

impl<'a, O: VpcOperations> TeardownEngine<'a, O> {
    pub fn new(ops: &'a O, config: TeardownConfig) -> Self {
        Self { ops, config }
    }

    /// Tear down each VPC in turn. A VPC whose teardown aborts stops the
    /// loop; with ignore-errors set, failures are contained inside the
    /// per-VPC stages and never surface here.
    pub async fn teardown_all(&self, vpcs: &[Vpc]) -> Result<RunSummary, TeardownError> {
        let mut summary = RunSummary::default();

        for vpc in vpcs {
            let report = self.teardown_vpc(vpc).await?;
            info!(
                vpc_id = %vpc.id,
                applied = report.applied(),
                failed = report.failed(),
                "VPC teardown finished"
            );
            summary.absorb(&report);
        }

        Ok(summary)
    }

    /// Tear down one VPC: snapshot, then every stage in dependency
    /// order, then the VPC itself.
    pub async fn teardown_vpc(&self, vpc: &Vpc) -> Result<VpcReport, TeardownError> {
        info!(vpc_id = %vpc.id, name = %vpc.label(), "Tearing down VPC");

        let mut report = VpcReport::new(&vpc.id);
        let snapshot = self.snapshot(&vpc.id, &mut report).await?;
        if snapshot.is_empty() {
            debug!(vpc_id = %vpc.id, "No dependent resources found");
        }

        for kind in ResourceKind::TEARDOWN_ORDER {
            let stage = match kind {
                ResourceKind::VpcEndpoint => self.vpc_endpoint_stage(&snapshot).await?,
                ResourceKind::NatGateway => self.nat_gateway_stage(&snapshot).await?,
                ResourceKind::ElasticIp => self.address_stage(&snapshot).await?,
                ResourceKind::InternetGateway => {
                    self.internet_gateway_stage(&vpc.id, &snapshot).await?
                }
                ResourceKind::RouteTable => self.route_table_stage(&snapshot).await?,
                ResourceKind::SecurityGroup => self.security_group_stage(&snapshot).await?,
                ResourceKind::NetworkAcl => self.network_acl_stage(&snapshot).await?,
                ResourceKind::Subnet => self.subnet_stage(&snapshot).await?,
                ResourceKind::Vpc => self.vpc_stage(vpc).await?,
            };
            report.push(stage);
        }

        Ok(report)
    }

    /// Discover all eight dependent kinds before any mutation.
    async fn snapshot(
        &self,
        vpc_id: &str,
        report: &mut VpcReport,
    ) -> Result<VpcSnapshot, TeardownError> {
        Ok(VpcSnapshot {
            endpoints: self
                .discover(
                    ResourceKind::VpcEndpoint,
                    vpc_id,
                    self.ops.list_vpc_endpoints(vpc_id),
                    report,
                )
                .await?,
            nat_gateways: self
                .discover(
                    ResourceKind::NatGateway,
                    vpc_id,
                    self.ops.list_nat_gateways(vpc_id),
                    report,
                )
                .await?,
            addresses: self
                .discover(
                    ResourceKind::ElasticIp,
                    vpc_id,
                    self.ops.list_addresses(vpc_id),
                    report,
                )
                .await?,
            internet_gateways: self
                .discover(
                    ResourceKind::InternetGateway,
                    vpc_id,
                    self.ops.list_internet_gateways(vpc_id),
                    report,
                )
                .await?,
            route_tables: self
                .discover(
                    ResourceKind::RouteTable,
                    vpc_id,
                    self.ops.list_route_tables(vpc_id),
                    report,
                )
                .await?,
            security_groups: self
                .discover(
                    ResourceKind::SecurityGroup,
                    vpc_id,
                    self.ops.list_security_groups(vpc_id),
                    report,
                )
                .await?,
            network_acls: self
                .discover(
                    ResourceKind::NetworkAcl,
                    vpc_id,
                    self.ops.list_network_acls(vpc_id),
                    report,
                )
                .await?,
            subnets: self
                .discover(
                    ResourceKind::Subnet,
                    vpc_id,
                    self.ops.list_subnets(vpc_id),
                    report,
                )
                .await?,
        })
    }

    /// Run one discovery call. A contained failure records a warning and
    /// yields an empty set, so later stages see zero resources of that
    /// kind.
    async fn discover<T, F>(
        &self,
        kind: ResourceKind,
        vpc_id: &str,
        op: F,
        report: &mut VpcReport,
    ) -> Result<Vec<T>, TeardownError>
    where
        F: Future<Output = anyhow::Result<Vec<T>>>,
    {
        match op.await {
            Ok(resources) => {
                debug!(kind = %kind, vpc_id = %vpc_id, count = resources.len(), "Discovered resources");
                Ok(resources)
            }
            Err(source) => {
                if self.config.ignore_errors {
                    warn!(
                        kind = %kind,
                        vpc_id = %vpc_id,
                        error = ?source,
                        "Discovery failed, continuing without this kind"
                    );
                    report.discovery_failures.push(DiscoveryFailure {
                        kind,
                        message: format!("{source:#}"),
                    });
                    Ok(Vec::new())
                } else {
                    Err(TeardownError::Discovery {
                        kind,
                        vpc_id: vpc_id.to_string(),
                        source,
                    })
                }
            }
        }
    }

    async fn vpc_endpoint_stage(&self, snap: &VpcSnapshot) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(ResourceKind::VpcEndpoint, self.config, snap.endpoints.len());
        for endpoint in &snap.endpoints {
            run.attempt(
                "delete",
                &endpoint.id,
                self.ops.delete_vpc_endpoint(&endpoint.id),
            )
            .await?;
        }
        Ok(run.finish())
    }

    async fn nat_gateway_stage(&self, snap: &VpcSnapshot) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(ResourceKind::NatGateway, self.config, snap.nat_gateways.len());
        for gateway in &snap.nat_gateways {
            run.attempt(
                "delete",
                &gateway.id,
                self.ops.delete_nat_gateway(&gateway.id),
            )
            .await?;
        }
        Ok(run.finish())
    }

    /// Elastic IPs are removed in two passes: release every address,
    /// then delete every address. The delete pass is a no-op for any
    /// address the release pass already freed.
    async fn address_stage(&self, snap: &VpcSnapshot) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(ResourceKind::ElasticIp, self.config, snap.addresses.len());

        for address in &snap.addresses {
            run.attempt(
                "release",
                &address.allocation_id,
                self.ops.release_address(&address.allocation_id),
            )
            .await?;
        }

        for address in &snap.addresses {
            run.attempt(
                "delete",
                &address.allocation_id,
                self.ops.delete_address(&address.allocation_id),
            )
            .await?;
        }

        Ok(run.finish())
    }

    /// Internet gateways must be detached before deletion. The
    /// detachment wait only runs after a real detach; the force gate
    /// skips both, and a contained detach failure skips the delete for
    /// that gateway.
    async fn internet_gateway_stage(
        &self,
        vpc_id: &str,
        snap: &VpcSnapshot,
    ) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(
            ResourceKind::InternetGateway,
            self.config,
            snap.internet_gateways.len(),
        );

        for gateway in &snap.internet_gateways {
            let attached_vpc = gateway.attached_vpc.as_deref().unwrap_or(vpc_id);
            let detached = run
                .attempt(
                    "detach",
                    &gateway.id,
                    self.ops.detach_internet_gateway(&gateway.id, attached_vpc),
                )
                .await?;

            if detached == Attempt::Failed {
                continue;
            }
            if detached == Attempt::Applied {
                if let Err(err) = self.ops.wait_for_detached(&gateway.id).await {
                    warn!(igw_id = %gateway.id, error = ?err, "Failed waiting for detachment");
                }
            }

            run.attempt(
                "delete",
                &gateway.id,
                self.ops.delete_internet_gateway(&gateway.id),
            )
            .await?;
        }

        Ok(run.finish())
    }

    /// Every non-main association is disassociated, then the table is
    /// deleted. The main association is skipped unconditionally and its
    /// table is destroyed implicitly with the VPC.
    async fn route_table_stage(&self, snap: &VpcSnapshot) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(ResourceKind::RouteTable, self.config, snap.route_tables.len());

        for table in &snap.route_tables {
            for association in &table.associations {
                if association.main {
                    run.exclude(&table.id, "main route table association");
                    continue;
                }
                run.attempt(
                    "disassociate",
                    &association.id,
                    self.ops.disassociate_route_table(&association.id),
                )
                .await?;
            }

            if table.is_main() {
                continue;
            }
            run.attempt("delete", &table.id, self.ops.delete_route_table(&table.id))
                .await?;
        }

        Ok(run.finish())
    }

    async fn security_group_stage(&self, snap: &VpcSnapshot) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(
            ResourceKind::SecurityGroup,
            self.config,
            snap.security_groups.len(),
        );

        for group in &snap.security_groups {
            if group.name == DEFAULT_SECURITY_GROUP {
                run.exclude(&group.id, "default security group");
                continue;
            }
            run.attempt(
                "delete",
                &group.id,
                self.ops.delete_security_group(&group.id),
            )
            .await?;
        }

        Ok(run.finish())
    }

    async fn network_acl_stage(&self, snap: &VpcSnapshot) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(ResourceKind::NetworkAcl, self.config, snap.network_acls.len());
        for acl in &snap.network_acls {
            run.attempt("delete", &acl.id, self.ops.delete_network_acl(&acl.id))
                .await?;
        }
        Ok(run.finish())
    }

    async fn subnet_stage(&self, snap: &VpcSnapshot) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(ResourceKind::Subnet, self.config, snap.subnets.len());
        for subnet in &snap.subnets {
            run.attempt("delete", &subnet.id, self.ops.delete_subnet(&subnet.id))
                .await?;
        }
        Ok(run.finish())
    }

    async fn vpc_stage(&self, vpc: &Vpc) -> Result<StageReport, TeardownError> {
        let mut run = StageRun::new(ResourceKind::Vpc, self.config, 1);
        run.attempt("delete", &vpc.id, self.ops.delete_vpc(&vpc.id))
            .await?;
        Ok(run.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::ec2::{
        Address, InternetGateway, MockVpcOperations, NatGateway, NetworkAcl, RouteTable,
        RouteTableAssociation, SecurityGroup, Subnet, VpcEndpoint,
    };
    use anyhow::anyhow;
    use mockall::Sequence;

    const FORCE: TeardownConfig = TeardownConfig {
        force: true,
        ignore_errors: false,
    };
    const FORCE_IGNORE: TeardownConfig = TeardownConfig {
        force: true,
        ignore_errors: true,
    };
    const DRY_RUN: TeardownConfig = TeardownConfig {
        force: false,
        ignore_errors: false,
    };

    fn vpc1() -> Vpc {
        Vpc {
            id: "vpc-1".to_string(),
            name: None,
        }
    }

    /// One snapshot's worth of canned discovery results.
    #[derive(Default, Clone)]
    struct Inventory {
        endpoints: Vec<VpcEndpoint>,
        nat_gateways: Vec<NatGateway>,
        addresses: Vec<Address>,
        internet_gateways: Vec<InternetGateway>,
        route_tables: Vec<RouteTable>,
        security_groups: Vec<SecurityGroup>,
        network_acls: Vec<NetworkAcl>,
        subnets: Vec<Subnet>,
    }

    fn expect_inventory(mock: &mut MockVpcOperations, inventory: Inventory) {
        let v = inventory.endpoints;
        mock.expect_list_vpc_endpoints()
            .returning(move |_| Ok(v.clone()));
        let v = inventory.nat_gateways;
        mock.expect_list_nat_gateways()
            .returning(move |_| Ok(v.clone()));
        let v = inventory.addresses;
        mock.expect_list_addresses().returning(move |_| Ok(v.clone()));
        let v = inventory.internet_gateways;
        mock.expect_list_internet_gateways()
            .returning(move |_| Ok(v.clone()));
        let v = inventory.route_tables;
        mock.expect_list_route_tables()
            .returning(move |_| Ok(v.clone()));
        let v = inventory.security_groups;
        mock.expect_list_security_groups()
            .returning(move |_| Ok(v.clone()));
        let v = inventory.network_acls;
        mock.expect_list_network_acls()
            .returning(move |_| Ok(v.clone()));
        let v = inventory.subnets;
        mock.expect_list_subnets().returning(move |_| Ok(v.clone()));
    }

    fn full_inventory() -> Inventory {
        Inventory {
            endpoints: vec![VpcEndpoint {
                id: "vpce-1".to_string(),
            }],
            nat_gateways: vec![NatGateway {
                id: "nat-1".to_string(),
            }],
            addresses: vec![Address {
                allocation_id: "eipalloc-1".to_string(),
                public_ip: "203.0.113.10".to_string(),
                association_id: Some("eipassoc-1".to_string()),
            }],
            internet_gateways: vec![InternetGateway {
                id: "igw-1".to_string(),
                name: None,
                attached_vpc: Some("vpc-1".to_string()),
            }],
            route_tables: vec![RouteTable {
                id: "rtb-1".to_string(),
                associations: vec![RouteTableAssociation {
                    id: "rtbassoc-1".to_string(),
                    main: false,
                }],
            }],
            security_groups: vec![SecurityGroup {
                id: "sg-1".to_string(),
                name: "web".to_string(),
            }],
            network_acls: vec![NetworkAcl {
                id: "acl-1".to_string(),
            }],
            subnets: vec![Subnet {
                id: "subnet-1".to_string(),
                name: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_empty_vpc_only_deletes_the_vpc() {
        let mut mock = MockVpcOperations::new();
        expect_inventory(&mut mock, Inventory::default());
        mock.expect_delete_vpc()
            .withf(|id| id == "vpc-1")
            .times(1)
            .returning(|_| Ok(()));

        let engine = TeardownEngine::new(&mock, FORCE);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        assert_eq!(report.applied(), 1);
        assert_eq!(report.failed(), 0);
    }

    #[tokio::test]
    async fn test_default_security_group_is_never_deleted() {
        let mut mock = MockVpcOperations::new();
        expect_inventory(
            &mut mock,
            Inventory {
                security_groups: vec![
                    SecurityGroup {
                        id: "sg-1".to_string(),
                        name: "web".to_string(),
                    },
                    SecurityGroup {
                        id: "sg-default".to_string(),
                        name: "default".to_string(),
                    },
                ],
                ..Default::default()
            },
        );
        mock.expect_delete_security_group()
            .withf(|id| id == "sg-1")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_delete_security_group()
            .withf(|id| id == "sg-default")
            .never();
        mock.expect_delete_vpc().times(1).returning(|_| Ok(()));

        let engine = TeardownEngine::new(&mock, FORCE);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        let stage = report.stage(ResourceKind::SecurityGroup).unwrap();
        assert_eq!(stage.applied, 1);
        assert_eq!(stage.excluded, 1);
        assert_eq!(stage.failed, 0);
    }

    #[tokio::test]
    async fn test_main_route_table_is_preserved() {
        let mut mock = MockVpcOperations::new();
        expect_inventory(
            &mut mock,
            Inventory {
                route_tables: vec![
                    RouteTable {
                        id: "rtb-main".to_string(),
                        associations: vec![RouteTableAssociation {
                            id: "rtbassoc-main".to_string(),
                            main: true,
                        }],
                    },
                    RouteTable {
                        id: "rtb-1".to_string(),
                        associations: vec![RouteTableAssociation {
                            id: "rtbassoc-1".to_string(),
                            main: false,
                        }],
                    },
                ],
                ..Default::default()
            },
        );
        mock.expect_disassociate_route_table()
            .withf(|id| id == "rtbassoc-1")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_disassociate_route_table()
            .withf(|id| id == "rtbassoc-main")
            .never();
        mock.expect_delete_route_table()
            .withf(|id| id == "rtb-1")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_delete_route_table()
            .withf(|id| id == "rtb-main")
            .never();
        mock.expect_delete_vpc().times(1).returning(|_| Ok(()));

        let engine = TeardownEngine::new(&mock, FORCE);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        let stage = report.stage(ResourceKind::RouteTable).unwrap();
        assert_eq!(stage.applied, 2);
        assert_eq!(stage.excluded, 1);
    }

    #[tokio::test]
    async fn test_dry_run_discovers_but_never_mutates() {
        let mut mock = MockVpcOperations::new();
        // Any mutating call would panic: no expectations are set for them.
        expect_inventory(&mut mock, full_inventory());

        let engine = TeardownEngine::new(&mock, DRY_RUN);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        assert_eq!(report.applied(), 0);
        assert_eq!(report.failed(), 0);
        // endpoint + nat + (release + delete) + (detach + delete)
        // + (disassociate + delete) + sg + acl + subnet + vpc
        assert_eq!(report.dry_run(), 12);
    }

    #[tokio::test]
    async fn test_ignore_errors_runs_all_remaining_stages() {
        let mut mock = MockVpcOperations::new();
        expect_inventory(
            &mut mock,
            Inventory {
                endpoints: vec![VpcEndpoint {
                    id: "vpce-1".to_string(),
                }],
                subnets: vec![Subnet {
                    id: "subnet-1".to_string(),
                    name: None,
                }],
                ..Default::default()
            },
        );
        mock.expect_delete_vpc_endpoint()
            .times(1)
            .returning(|_| Err(anyhow!("endpoint is busy")));
        mock.expect_delete_subnet()
            .withf(|id| id == "subnet-1")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_delete_vpc()
            .withf(|id| id == "vpc-1")
            .times(1)
            .returning(|_| Ok(()));

        let engine = TeardownEngine::new(&mock, FORCE_IGNORE);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.applied(), 2);
    }

    #[tokio::test]
    async fn test_first_failure_aborts_without_ignore_errors() {
        let mut mock = MockVpcOperations::new();
        expect_inventory(
            &mut mock,
            Inventory {
                endpoints: vec![VpcEndpoint {
                    id: "vpce-1".to_string(),
                }],
                subnets: vec![Subnet {
                    id: "subnet-1".to_string(),
                    name: None,
                }],
                ..Default::default()
            },
        );
        mock.expect_delete_vpc_endpoint()
            .times(1)
            .returning(|_| Err(anyhow!("endpoint is busy")));
        mock.expect_delete_subnet().never();
        mock.expect_delete_vpc().never();

        let engine = TeardownEngine::new(&mock, FORCE);
        let err = engine.teardown_vpc(&vpc1()).await.unwrap_err();

        match err {
            TeardownError::Deletion { kind, .. } => {
                assert_eq!(kind, ResourceKind::VpcEndpoint);
            }
            other => panic!("expected Deletion error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nat_discovery_failure_is_contained() {
        let mut mock = MockVpcOperations::new();
        mock.expect_list_vpc_endpoints().returning(|_| Ok(vec![]));
        mock.expect_list_nat_gateways()
            .times(1)
            .returning(|_| Err(anyhow!("throttled")));
        mock.expect_list_addresses().returning(|_| Ok(vec![]));
        mock.expect_list_internet_gateways()
            .returning(|_| Ok(vec![]));
        mock.expect_list_route_tables().returning(|_| Ok(vec![]));
        mock.expect_list_security_groups().returning(|_| Ok(vec![]));
        mock.expect_list_network_acls().returning(|_| Ok(vec![]));
        mock.expect_list_subnets().returning(|_| {
            Ok(vec![Subnet {
                id: "subnet-1".to_string(),
                name: None,
            }])
        });

        mock.expect_delete_nat_gateway().never();
        mock.expect_delete_subnet()
            .withf(|id| id == "subnet-1")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_delete_vpc()
            .withf(|id| id == "vpc-1")
            .times(1)
            .returning(|_| Ok(()));

        let engine = TeardownEngine::new(&mock, FORCE_IGNORE);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        assert_eq!(report.discovery_failures.len(), 1);
        assert_eq!(report.discovery_failures[0].kind, ResourceKind::NatGateway);
        assert_eq!(report.applied(), 2);
    }

    #[tokio::test]
    async fn test_discovery_failure_aborts_without_ignore_errors() {
        let mut mock = MockVpcOperations::new();
        mock.expect_list_vpc_endpoints().returning(|_| Ok(vec![]));
        mock.expect_list_nat_gateways()
            .times(1)
            .returning(|_| Err(anyhow!("throttled")));
        // Discovery stops at the failure; nothing later runs.

        let engine = TeardownEngine::new(&mock, FORCE);
        let err = engine.teardown_vpc(&vpc1()).await.unwrap_err();

        match err {
            TeardownError::Discovery { kind, vpc_id, .. } => {
                assert_eq!(kind, ResourceKind::NatGateway);
                assert_eq!(vpc_id, "vpc-1");
            }
            other => panic!("expected Discovery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stages_run_in_dependency_order() {
        let mut mock = MockVpcOperations::new();
        expect_inventory(&mut mock, full_inventory());

        let mut seq = Sequence::new();
        mock.expect_delete_vpc_endpoint()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_nat_gateway()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_release_address()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_address()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_detach_internet_gateway()
            .withf(|igw, vpc| igw == "igw-1" && vpc == "vpc-1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mock.expect_wait_for_detached()
            .withf(|igw| igw == "igw-1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_internet_gateway()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_disassociate_route_table()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_route_table()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_security_group()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_network_acl()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_subnet()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_delete_vpc()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let engine = TeardownEngine::new(&mock, FORCE);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        assert_eq!(report.applied(), 12);
        assert_eq!(report.failed(), 0);
    }

    #[tokio::test]
    async fn test_contained_detach_failure_skips_the_gateway_delete() {
        let mut mock = MockVpcOperations::new();
        expect_inventory(
            &mut mock,
            Inventory {
                internet_gateways: vec![InternetGateway {
                    id: "igw-1".to_string(),
                    name: None,
                    attached_vpc: Some("vpc-1".to_string()),
                }],
                ..Default::default()
            },
        );
        mock.expect_detach_internet_gateway()
            .times(1)
            .returning(|_, _| Err(anyhow!("still has mapped public addresses")));
        mock.expect_wait_for_detached().never();
        mock.expect_delete_internet_gateway().never();
        mock.expect_delete_vpc().times(1).returning(|_| Ok(()));

        let engine = TeardownEngine::new(&mock, FORCE_IGNORE);
        let report = engine.teardown_vpc(&vpc1()).await.unwrap();

        let stage = report.stage(ResourceKind::InternetGateway).unwrap();
        assert_eq!(stage.failed, 1);
        assert_eq!(stage.applied, 0);
    }

    #[tokio::test]
    async fn test_teardown_all_stops_after_a_failed_vpc() {
        let mut mock = MockVpcOperations::new();
        // Only vpc-1 is ever inventoried; reaching vpc-2 would panic on
        // the unmatched argument.
        mock.expect_list_vpc_endpoints()
            .withf(|id| id == "vpc-1")
            .returning(|_| Ok(vec![]));
        mock.expect_list_nat_gateways()
            .withf(|id| id == "vpc-1")
            .returning(|_| Ok(vec![]));
        mock.expect_list_addresses()
            .withf(|id| id == "vpc-1")
            .returning(|_| Ok(vec![]));
        mock.expect_list_internet_gateways()
            .withf(|id| id == "vpc-1")
            .returning(|_| Ok(vec![]));
        mock.expect_list_route_tables()
            .withf(|id| id == "vpc-1")
            .returning(|_| Ok(vec![]));
        mock.expect_list_security_groups()
            .withf(|id| id == "vpc-1")
            .returning(|_| Ok(vec![]));
        mock.expect_list_network_acls()
            .withf(|id| id == "vpc-1")
            .returning(|_| Ok(vec![]));
        mock.expect_list_subnets()
            .withf(|id| id == "vpc-1")
            .returning(|_| {
                Ok(vec![Subnet {
                    id: "subnet-1".to_string(),
                    name: None,
                }])
            });
        mock.expect_delete_subnet()
            .times(1)
            .returning(|_| Err(anyhow!("subnet has dependencies")));
        mock.expect_delete_vpc().never();

        let vpcs = vec![
            vpc1(),
            Vpc {
                id: "vpc-2".to_string(),
                name: None,
            },
        ];
        let engine = TeardownEngine::new(&mock, FORCE);
        let err = engine.teardown_all(&vpcs).await.unwrap_err();
        assert!(matches!(err, TeardownError::Deletion { .. }));
    }

    #[tokio::test]
    async fn test_teardown_all_with_no_vpcs_is_a_noop() {
        let mock = MockVpcOperations::new();
        let engine = TeardownEngine::new(&mock, FORCE);
        let summary = engine.teardown_all(&[]).await.unwrap();
        assert_eq!(summary.vpcs_processed, 0);
        assert_eq!(summary.applied, 0);
    }
}
