//! Uniform stage execution: force gate + error containment
//!
//! Every teardown stage funnels its mutating calls through [`StageRun`]
//! so the dry-run and ignore-errors policies live in exactly one place;
//! stage code supplies only the kind-specific mutating future(s) and any
//! ordering within the kind.

use crate::config::TeardownConfig;
use crate::error::TeardownError;
use crate::resource_kind::ResourceKind;
use std::future::Future;
use tracing::{debug, info, warn};

/// Outcome of one gated mutation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The mutating call was issued and succeeded
    Applied,
    /// The force gate is closed; no call was issued
    DryRun,
    /// The call failed and was contained by the ignore-errors policy
    Failed,
}

/// Counters for one stage of one VPC's teardown.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub kind: ResourceKind,
    /// Resources in the snapshot for this stage
    pub discovered: usize,
    /// Mutating calls issued and succeeded
    pub applied: usize,
    /// Mutations skipped by the force gate
    pub dry_run: usize,
    /// Resources excluded by policy (default group, main association)
    pub excluded: usize,
    /// Contained failures
    pub failed: usize,
}

/// Accumulator applying the force gate and error-containment policy to
/// every mutation in a stage.
pub struct StageRun {
    config: TeardownConfig,
    report: StageReport,
}

impl StageRun {
    pub fn new(kind: ResourceKind, config: TeardownConfig, discovered: usize) -> Self {
        if discovered > 0 {
            info!(kind = %kind, count = discovered, "Processing stage");
        } else {
            debug!(kind = %kind, "Nothing to delete");
        }

        Self {
            config,
            report: StageReport {
                kind,
                discovered,
                applied: 0,
                dry_run: 0,
                excluded: 0,
                failed: 0,
            },
        }
    }

    /// Record a resource excluded by policy. Never attempted, never a
    /// failure.
    pub fn exclude(&mut self, resource_id: &str, reason: &str) {
        info!(
            kind = %self.report.kind,
            resource = %resource_id,
            reason,
            "Skipping protected resource"
        );
        self.report.excluded += 1;
    }

    /// Run one mutating call through both gates.
    ///
    /// When the force gate is closed the future is dropped unawaited and
    /// the stage continues as if the call succeeded. A failure is either
    /// contained (recorded, `Attempt::Failed`) or surfaced as a
    /// `Deletion` error that aborts the VPC.
    pub async fn attempt<F>(
        &mut self,
        action: &'static str,
        resource_id: &str,
        op: F,
    ) -> Result<Attempt, TeardownError>
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        if !self.config.force {
            info!(
                kind = %self.report.kind,
                resource = %resource_id,
                "[DRY RUN] Would {action} (pass --force to apply)"
            );
            self.report.dry_run += 1;
            return Ok(Attempt::DryRun);
        }

        match op.await {
            Ok(()) => {
                self.report.applied += 1;
                Ok(Attempt::Applied)
            }
            Err(source) => {
                if self.config.ignore_errors {
                    warn!(
                        kind = %self.report.kind,
                        resource = %resource_id,
                        action,
                        error = ?source,
                        "Mutation failed, continuing"
                    );
                    self.report.failed += 1;
                    Ok(Attempt::Failed)
                } else {
                    Err(TeardownError::Deletion {
                        kind: self.report.kind,
                        action,
                        resource_id: resource_id.to_string(),
                        source,
                    })
                }
            }
        }
    }

    pub fn finish(self) -> StageReport {
        self.report
    }
}
