//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registration;
mod directory_provider;
mod student_id_allocator;

#[cfg(test)]
pub use account_registration::MockAccountRegistration;
pub use account_registration::AccountRegistration;
#[cfg(test)]
pub use directory_provider::MockDirectoryProvider;
pub use directory_provider::{CreatedDirectoryAccount, DirectoryProvider, DirectoryProviderError};
#[cfg(test)]
pub use student_id_allocator::MockStudentIdAllocator;
pub use student_id_allocator::{
    RandomStudentIdAllocator, StudentIdAllocationError, StudentIdAllocator,
};
