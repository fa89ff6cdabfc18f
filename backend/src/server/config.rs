//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use enrolment::domain::ports::AccountRegistration;

/// Everything needed to start the listener.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) registration: Arc<dyn AccountRegistration>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, registration: Arc<dyn AccountRegistration>) -> Self {
        Self {
            bind_addr,
            registration,
        }
    }
}
