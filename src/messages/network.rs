//! Network messages - communication between App and Network layers

use crate::remote::ProvidedView;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Resolve the library component through the configured provider
    ResolveView { id: u64 },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Outcome of a [`NetworkCommand::ResolveView`]
    ViewResolved {
        id: u64,
        view: ProvidedView,
        time_ms: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::ViewResolved { id, .. } => *id,
        }
    }
}
