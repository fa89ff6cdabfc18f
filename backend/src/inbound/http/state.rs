//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the driving port,
//! so tests can swap in a double without building the Google client.

use std::sync::Arc;

use crate::domain::ports::AccountRegistration;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn AccountRegistration>,
}

impl HttpState {
    /// Wrap the registration use-case.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use enrolment::domain::{AccountProvisioningService, OrganisationDomain, StudentId};
    /// use enrolment::inbound::http::state::HttpState;
    /// use enrolment::test_support::directory::{
    ///     FixedStudentIdAllocator, ScriptedDirectoryProvider,
    /// };
    ///
    /// let service = AccountProvisioningService::new(
    ///     Arc::new(ScriptedDirectoryProvider::accepting()),
    ///     Arc::new(FixedStudentIdAllocator(StudentId::parse("S123456").expect("id"))),
    ///     OrganisationDomain::new("org.example").expect("domain"),
    /// );
    /// let state = HttpState::new(Arc::new(service));
    /// let _registration = state.registration.clone();
    /// ```
    pub fn new(registration: Arc<dyn AccountRegistration>) -> Self {
        Self { registration }
    }
}
