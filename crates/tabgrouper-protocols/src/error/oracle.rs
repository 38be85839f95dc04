//! Tab boundary errors.

use thiserror::Error;

use crate::tab::TabId;

#[derive(Debug, Error)]
pub enum TabOracleError {
    #[error("Tab not found: {0}")]
    TabNotFound(TabId),

    #[error("Tab boundary unavailable: {0}")]
    Unavailable(String),

    #[error("Tab command failed: {0}")]
    CommandFailed(String),
}
