//! Dealer authorization.
//!
//! Who may referee a duel is decided outside this crate (a chat-platform
//! role in practice). The lifecycle only asks [`DealerAuthorizer`].

use async_trait::async_trait;
use std::collections::HashSet;

use crate::UserId;

/// Answers whether a user holds the dealer role
#[async_trait]
pub trait DealerAuthorizer: Send + Sync {
    async fn is_dealer(&self, user_id: UserId) -> bool;
}

/// Fixed set of dealer ids, loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticDealerRoster {
    dealers: HashSet<UserId>,
}

impl StaticDealerRoster {
    pub fn new(dealers: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            dealers: dealers.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.dealers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dealers.is_empty()
    }
}

#[async_trait]
impl DealerAuthorizer for StaticDealerRoster {
    async fn is_dealer(&self, user_id: UserId) -> bool {
        self.dealers.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_roster() {
        let roster = StaticDealerRoster::new([7, 8]);
        assert_eq!(roster.len(), 2);
        assert!(roster.is_dealer(7).await);
        assert!(!roster.is_dealer(9).await);
        assert!(!StaticDealerRoster::default().is_dealer(7).await);
    }
}
