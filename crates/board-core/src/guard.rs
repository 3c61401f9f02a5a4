//! Ordered validation of state-changing requests.
//!
//! Every mutation must present the user's outstanding one-time token; deletes
//! additionally require ownership of the target post (or the admin user).
//! The checks run in a fixed order:
//!
//! 1. missing/empty token → [`DenyReason::MissingToken`]
//! 2. token consume fails → [`DenyReason::InvalidOrReplayedToken`]
//! 3. (delete only) target absent → [`DenyReason::NotFound`]; non-owner,
//!    non-admin → [`DenyReason::Forbidden`]
//!
//! Note the ordering quirk inherited from the original system: the token is
//! consumed at step 2, BEFORE the existence and ownership checks. A delete
//! denied as `NotFound` or `Forbidden` has still burned the user's token,
//! and the next mutation needs a fresh render. Kept as-is; changing it is a
//! product decision, not a bug fix.

use crate::error::DenyReason;
use crate::token::OneTimeTokenStore;

/// User name granted universal delete authorization.
pub const ADMIN_USER: &str = "admin";

/// Applies the mutation policy against a token store.
pub struct MutationGuard<'a> {
    tokens: &'a OneTimeTokenStore,
}

impl<'a> MutationGuard<'a> {
    /// Creates a guard over the process-wide token store.
    #[must_use]
    pub const fn new(tokens: &'a OneTimeTokenStore) -> Self {
        Self { tokens }
    }

    /// Authorizes a create mutation: token checks only.
    ///
    /// # Errors
    ///
    /// Returns the applicable [`DenyReason`]; the token is consumed on any
    /// outcome past step 1.
    pub fn authorize_create(&self, user_name: &str, submitted_token: &str) -> Result<(), DenyReason> {
        self.consume_token(user_name, submitted_token)
    }

    /// Authorizes a delete mutation: token checks, then existence and
    /// ownership.
    ///
    /// `resource_owner` is `None` when the target does not exist, otherwise
    /// the owner's user name.
    ///
    /// # Errors
    ///
    /// Returns the applicable [`DenyReason`]. The token has already been
    /// consumed when `NotFound` or `Forbidden` is returned.
    pub fn authorize_delete(
        &self,
        user_name: &str,
        submitted_token: &str,
        resource_owner: Option<&str>,
    ) -> Result<(), DenyReason> {
        self.consume_token(user_name, submitted_token)?;

        let Some(owner) = resource_owner else {
            return Err(DenyReason::NotFound);
        };
        if user_name != owner && user_name != ADMIN_USER {
            return Err(DenyReason::Forbidden);
        }
        Ok(())
    }

    fn consume_token(&self, user_name: &str, submitted_token: &str) -> Result<(), DenyReason> {
        if submitted_token.is_empty() {
            return Err(DenyReason::MissingToken);
        }
        if !self.tokens.consume(user_name, submitted_token) {
            return Err(DenyReason::InvalidOrReplayedToken);
        }
        Ok(())
    }
}
