//! AWS error classification and handling
//!
//! Provides typed errors for AWS SDK operations using the `.code()`
//! method from `ProvideErrorMetadata` instead of string matching on the
//! Debug format.

use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// AWS error categories relevant to teardown
#[derive(Debug, Error)]
pub enum AwsError {
    /// Resource was not found (already gone; safe to skip in teardown)
    #[error("Resource not found ({code})")]
    NotFound { code: String },

    /// Resource has dependent objects (e.g., SG with an attached ENI)
    #[error("Resource has dependent objects")]
    DependencyViolation,

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Check if this is a dependency violation (resource still in use)
    pub fn is_dependency_violation(&self) -> bool {
        matches!(self, AwsError::DependencyViolation)
    }
}

/// Known EC2 error codes for "not found" conditions.
///
/// `Gateway.NotAttached` is included: detaching an already-detached
/// internet gateway reads as the attachment being gone.
const NOT_FOUND_CODES: &[&str] = &[
    "InvalidVpcID.NotFound",
    "InvalidSubnetID.NotFound",
    "InvalidRouteTableID.NotFound",
    "InvalidAssociationID.NotFound",
    "InvalidAllocationID.NotFound",
    "InvalidAddress.NotFound",
    "InvalidGroup.NotFound",
    "InvalidInternetGatewayID.NotFound",
    "InvalidNetworkAclID.NotFound",
    "InvalidVpcEndpointId.NotFound",
    "NatGatewayNotFound",
    "Gateway.NotAttached",
];

/// Known EC2 error codes for dependency violations (resource still in use)
const DEPENDENCY_CODES: &[&str] = &["DependencyViolation"];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound {
            code: c.to_string(),
        },
        Some(c) if DEPENDENCY_CODES.contains(&c) => AwsError::DependencyViolation,
        _ => AwsError::Sdk {
            code: code.map(str::to_string),
            message,
        },
    }
}

/// Classify any error that carries AWS error metadata.
pub fn classify<E>(err: &E) -> AwsError
where
    E: ProvideErrorMetadata,
{
    classify_aws_error(err.code(), err.message())
}

/// Collapse "not found" SDK errors into `Ok(None)`.
///
/// Teardown calls that race the provider's own cleanup (a second release
/// of an address, detaching a gateway that already detached) treat the
/// resource being gone as success.
pub fn ignore_not_found<T, E>(result: Result<T, SdkError<E>>) -> Result<Option<T>, SdkError<E>>
where
    E: ProvideErrorMetadata,
{
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if classify(&err).is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
