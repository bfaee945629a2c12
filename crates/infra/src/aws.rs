//! Shared AWS client wiring.

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};

use crate::config::AwsSettings;

/// Load the shared SDK configuration (credentials chain, region, endpoint).
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()));
    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

/// Coarse classification of an SDK call failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SdkFailure {
    /// The request could not be built.
    Construction(String),
    /// The service answered with an error.
    Service(String),
    /// Dispatch, timeout or an unparseable response.
    Transport(String),
}

pub(crate) fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> SdkFailure
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ConstructionFailure(_) => SdkFailure::Construction(message),
        SdkError::ServiceError(_) => SdkFailure::Service(message),
        _ => SdkFailure::Transport(message),
    }
}
