//! # Remote Auth Service
//!
//! The seam between the login flow and whatever issues and verifies codes.

use crate::login::error::ServiceError;
use crate::login::events::DeliveryChannel;
use async_trait::async_trait;

/// Issues and verifies one-time codes
#[async_trait]
pub trait RemoteAuthService: Send + Sync {
    /// Ask the service to send a code to `mobile_number` over `channel`
    async fn issue_code(
        &self,
        mobile_number: &str,
        channel: DeliveryChannel,
    ) -> Result<(), ServiceError>;

    /// Ask the service whether `code` is valid for `mobile_number`
    async fn verify_code(&self, mobile_number: &str, code: &str) -> Result<(), ServiceError>;
}
