//! Error taxonomy for a teardown run
//!
//! Every failure belongs to exactly one scope: the profile/region pair
//! (`Session`), one VPC's inventory (`Discovery`), or one resource
//! mutation (`Deletion`). No failure is retried; it is either contained
//! by the ignore-errors policy or terminal for its scope.

use crate::resource_kind::ResourceKind;
use thiserror::Error;

/// A failure during a teardown run, scoped to the unit of work it aborts.
#[derive(Debug, Error)]
pub enum TeardownError {
    /// Credential/session setup failed. Always fatal for the
    /// profile/region pair it belongs to.
    #[error("failed to create session for profile {profile} in {region}")]
    Session {
        profile: String,
        region: String,
        #[source]
        source: anyhow::Error,
    },

    /// A listing call failed. Fatal for the VPC unless contained.
    #[error("failed to list {kind}s for VPC {vpc_id}")]
    Discovery {
        kind: ResourceKind,
        vpc_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A mutating call failed. Fatal for the VPC (and the remaining VPCs
    /// in its region) unless contained.
    #[error("failed to {action} {kind} {resource_id}")]
    Deletion {
        kind: ResourceKind,
        action: &'static str,
        resource_id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl TeardownError {
    /// The resource kind this error is about, if it is scoped to one.
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            TeardownError::Session { .. } => None,
            TeardownError::Discovery { kind, .. } | TeardownError::Deletion { kind, .. } => {
                Some(*kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_scope() {
        let err = TeardownError::Deletion {
            kind: ResourceKind::SecurityGroup,
            action: "delete",
            resource_id: "sg-123".to_string(),
            source: anyhow::anyhow!("DependencyViolation"),
        };
        assert_eq!(err.to_string(), "failed to delete security group sg-123");
        assert_eq!(err.kind(), Some(ResourceKind::SecurityGroup));
    }

    #[test]
    fn test_session_errors_are_not_kind_scoped() {
        let err = TeardownError::Session {
            profile: "default".to_string(),
            region: "us-west-2".to_string(),
            source: anyhow::anyhow!("no credentials"),
        };
        assert!(err.kind().is_none());
    }
}
