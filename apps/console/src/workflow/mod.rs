//! Review workflow: login → listing → selection → detail display.

use thiserror::Error;

use crate::repository::RepositoryError;

pub mod controller;
pub mod session;
pub mod views;

pub use controller::{ReviewWorkflow, Transition, WorkflowSettings};
pub use session::{AdminCredentials, SessionGrant, SessionToken};
pub use views::{Dashboard, SelectionView};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("session expired")]
    SessionExpired,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
