//! External service contracts.
//!
//! Delivery is someone else's job; the core only decides when a message
//! should go out. Implementations are injected into the actions that need
//! them.

use async_trait::async_trait;

use crate::entities::{JoinOrganizationInvite, Organization};
use crate::Error;

/// Sends transactional platform emails.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Notify the invited user that an organization wants them on board.
    async fn send_join_invite(
        &self,
        invite: &JoinOrganizationInvite,
        organization: &Organization,
    ) -> Result<(), Error>;
}
