//! Browser tab boundary.

use async_trait::async_trait;

use crate::error::TabOracleError;
use crate::tab::{Tab, TabId};

/// Read and command access to the browser's tabs in the current window.
///
/// Lifecycle events are not pulled through this trait; implementations push
/// them into an event relay as they happen.
#[async_trait]
pub trait TabOracle: Send + Sync {
    /// All tabs in the current window, in browser order.
    async fn query_tabs(&self) -> Result<Vec<Tab>, TabOracleError>;

    /// A single tab by id. Fails if the tab is gone.
    async fn get_tab(&self, id: TabId) -> Result<Tab, TabOracleError>;

    /// Make a tab the active one.
    async fn activate_tab(&self, id: TabId) -> Result<(), TabOracleError>;

    /// Close a tab.
    async fn remove_tab(&self, id: TabId) -> Result<(), TabOracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct SingleTab(Tab);

    #[async_trait]
    impl TabOracle for SingleTab {
        async fn query_tabs(&self) -> Result<Vec<Tab>, TabOracleError> {
            Ok(vec![self.0.clone()])
        }

        async fn get_tab(&self, id: TabId) -> Result<Tab, TabOracleError> {
            if id == self.0.id {
                Ok(self.0.clone())
            } else {
                Err(TabOracleError::TabNotFound(id))
            }
        }

        async fn activate_tab(&self, _id: TabId) -> Result<(), TabOracleError> {
            Ok(())
        }

        async fn remove_tab(&self, id: TabId) -> Result<(), TabOracleError> {
            Err(TabOracleError::CommandFailed(format!("cannot close tab {}", id)))
        }
    }

    #[tokio::test]
    async fn test_oracle_is_object_safe() {
        let oracle: Arc<dyn TabOracle> = Arc::new(SingleTab(Tab::new(1, "a", "u")));
        assert_eq!(oracle.query_tabs().await.unwrap().len(), 1);
        assert!(oracle.get_tab(1).await.is_ok());
        assert!(matches!(
            oracle.get_tab(2).await,
            Err(TabOracleError::TabNotFound(2))
        ));
        assert!(oracle.remove_tab(1).await.is_err());
    }
}
