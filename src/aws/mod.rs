//! AWS client modules
//!
//! This module wraps the AWS SDK behind the narrow contracts the
//! orchestrator consumes:
//! - EC2: per-kind discovery and teardown calls
//! - STS: credential validation at session construction
//! - error: AWS error-code classification

pub mod account;
pub mod context;
pub mod ec2;
pub mod error;

pub use account::{get_current_account_id, AccountId};
pub use context::{AwsContext, FromAwsContext};
pub use ec2::{Ec2Client, VpcOperations};
pub use error::{classify_aws_error, ignore_not_found, AwsError};
