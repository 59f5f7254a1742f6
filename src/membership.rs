use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

/// A membership lookup that could not be answered.
#[derive(Debug, Error)]
#[error("membership lookup failed: {0}")]
pub struct MembershipError(pub String);

/// Decides whether a user may use the bot.
pub trait MembershipChecker {
    /// # Errors
    ///
    /// Returns [`MembershipError`] if the lookup itself failed.
    fn is_member(&self, user_id: i64) -> Result<bool, MembershipError>;
}

/// Lets everyone in. Used when no gating channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysMember;

impl MembershipChecker for AlwaysMember {
    fn is_member(&self, _user_id: i64) -> Result<bool, MembershipError> {
        Ok(true)
    }
}

/// A fixed allow-list of user ids.
#[derive(Debug, Clone, Default)]
pub struct StaticMembership {
    members: HashSet<i64>,
}

impl StaticMembership {
    pub fn new(members: impl IntoIterator<Item = i64>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }
}

impl MembershipChecker for StaticMembership {
    fn is_member(&self, user_id: i64) -> Result<bool, MembershipError> {
        Ok(self.members.contains(&user_id))
    }
}

/// Ask `checker` and treat a failed lookup as "not a member".
pub fn check_membership(checker: &dyn MembershipChecker, user_id: i64) -> bool {
    match checker.is_member(user_id) {
        Ok(member) => member,
        Err(e) => {
            warn!(user = user_id, error = %e, "membership check failed, denying access");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl MembershipChecker for Broken {
        fn is_member(&self, _user_id: i64) -> Result<bool, MembershipError> {
            Err(MembershipError("chat not found".into()))
        }
    }

    #[test]
    fn always_member_admits_everyone() {
        assert!(check_membership(&AlwaysMember, 1));
        assert!(check_membership(&AlwaysMember, -5));
    }

    #[test]
    fn static_membership_checks_allow_list() {
        let checker = StaticMembership::new([10, 20]);
        assert!(check_membership(&checker, 10));
        assert!(!check_membership(&checker, 30));
    }

    #[test]
    fn lookup_failure_counts_as_not_member() {
        assert!(!check_membership(&Broken, 1));
    }

    #[test]
    fn error_message_carries_reason() {
        let err = MembershipError("chat not found".into());
        assert_eq!(err.to_string(), "membership lookup failed: chat not found");
    }
}
