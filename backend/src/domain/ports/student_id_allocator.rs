//! Driven port for allocating student identifiers.
//!
//! The default allocator draws a random `S######` value with no uniqueness
//! check, so two concurrent registrations can receive the same identifier.
//! Deployments that need uniqueness can plug in an allocator that reserves
//! identifiers against a ledger; the orchestrator does not change.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::StudentId;

define_port_error! {
    /// Errors raised while allocating an identifier.
    pub enum StudentIdAllocationError {
        /// The backing ledger could not reserve an identifier.
        Unavailable { message: String } =>
            "student id allocation unavailable: {message}",
    }
}

/// Port for producing the identifier attached to a new account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentIdAllocator: Send + Sync {
    /// Allocate an identifier for one registration.
    async fn allocate(&self) -> Result<StudentId, StudentIdAllocationError>;
}

/// Uncoordinated random allocator.
///
/// Draws from the thread-local generator on every call; nothing is shared
/// between requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStudentIdAllocator;

#[async_trait]
impl StudentIdAllocator for RandomStudentIdAllocator {
    async fn allocate(&self) -> Result<StudentId, StudentIdAllocationError> {
        Ok(StudentId::generate(&mut rand::thread_rng()))
    }
}
