//! Teardown reports
//!
//! Stage counters roll up into a per-VPC report, and per-VPC reports
//! roll up into the run summary printed at the end of `delete`.

use super::stage::StageReport;
use crate::resource_kind::ResourceKind;

/// A contained discovery failure: the kind was treated as empty.
#[derive(Debug, Clone)]
pub struct DiscoveryFailure {
    pub kind: ResourceKind,
    pub message: String,
}

/// Outcome of one VPC's teardown.
#[derive(Debug, Clone)]
pub struct VpcReport {
    pub vpc_id: String,
    pub stages: Vec<StageReport>,
    pub discovery_failures: Vec<DiscoveryFailure>,
}

impl VpcReport {
    pub fn new(vpc_id: &str) -> Self {
        Self {
            vpc_id: vpc_id.to_string(),
            stages: Vec::new(),
            discovery_failures: Vec::new(),
        }
    }

    pub fn push(&mut self, stage: StageReport) {
        self.stages.push(stage);
    }

    /// The report for one stage, when that stage ran.
    pub fn stage(&self, kind: ResourceKind) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.kind == kind)
    }

    pub fn discovered(&self) -> usize {
        self.stages.iter().map(|s| s.discovered).sum()
    }

    pub fn applied(&self) -> usize {
        self.stages.iter().map(|s| s.applied).sum()
    }

    pub fn dry_run(&self) -> usize {
        self.stages.iter().map(|s| s.dry_run).sum()
    }

    pub fn excluded(&self) -> usize {
        self.stages.iter().map(|s| s.excluded).sum()
    }

    /// Contained failures: failed mutations plus failed discoveries.
    pub fn failed(&self) -> usize {
        self.stages.iter().map(|s| s.failed).sum::<usize>() + self.discovery_failures.len()
    }
}

/// Aggregated outcome of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub vpcs_processed: usize,
    pub discovered: usize,
    pub applied: usize,
    pub dry_run: usize,
    pub excluded: usize,
    pub failed: usize,
    /// Profile/region pairs that failed outright and were contained
    pub pairs_failed: usize,
}

impl RunSummary {
    pub fn absorb(&mut self, report: &VpcReport) {
        self.vpcs_processed += 1;
        self.discovered += report.discovered();
        self.applied += report.applied();
        self.dry_run += report.dry_run();
        self.excluded += report.excluded();
        self.failed += report.failed();
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.vpcs_processed += other.vpcs_processed;
        self.discovered += other.discovered;
        self.applied += other.applied;
        self.dry_run += other.dry_run;
        self.excluded += other.excluded;
        self.failed += other.failed;
        self.pairs_failed += other.pairs_failed;
    }

    /// True when nothing failed anywhere, contained or not.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.pairs_failed == 0
    }

    /// Render the end-of-run report block.
    pub fn render(&self, force: bool) -> String {
        let mut out = String::new();
        out.push_str("\n=== Teardown Report ===\n");
        out.push_str(&format!(
            "Mode: {}\n\n",
            if force { "EXECUTE" } else { "DRY-RUN" }
        ));
        out.push_str(&format!("VPCs processed:       {}\n", self.vpcs_processed));
        out.push_str(&format!("Resources discovered: {}\n", self.discovered));
        if force {
            out.push_str(&format!("Mutations applied:    {}\n", self.applied));
            out.push_str(&format!("Failed (contained):   {}\n", self.failed));
        } else {
            out.push_str(&format!("Would mutate:         {}\n", self.dry_run));
        }
        out.push_str(&format!("Excluded (protected): {}\n", self.excluded));
        if self.pairs_failed > 0 {
            out.push_str(&format!("Pairs failed:         {}\n", self.pairs_failed));
        }
        if !force {
            out.push_str("\nRun with --force to actually delete resources.\n");
        }
        out
    }
}
