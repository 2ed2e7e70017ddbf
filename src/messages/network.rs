//! Network messages - communication between App and Network layers

use crate::models::{ApiAction, Draft, Exhibit, MutationOutcome, Resource, VirtualTour};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// GET the whole collection
    Fetch {
        id: u64,
        resource: Resource,
    },
    /// POST a new record
    Create {
        id: u64,
        draft: Draft,
    },
    /// PUT the draft fields onto `record_id`
    Update {
        id: u64,
        record_id: i64,
        draft: Draft,
    },
    /// DELETE `?id=record_id`
    Delete {
        id: u64,
        resource: Resource,
        record_id: i64,
    },
    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkCommand::Fetch { id, .. }
            | NetworkCommand::Create { id, .. }
            | NetworkCommand::Update { id, .. }
            | NetworkCommand::Delete { id, .. } => Some(*id),
            NetworkCommand::Shutdown => None,
        }
    }

    pub fn resource(&self) -> Option<Resource> {
        match self {
            NetworkCommand::Fetch { resource, .. } | NetworkCommand::Delete { resource, .. } => {
                Some(*resource)
            }
            NetworkCommand::Create { draft, .. } | NetworkCommand::Update { draft, .. } => {
                Some(draft.resource())
            }
            NetworkCommand::Shutdown => None,
        }
    }

    pub fn action(&self) -> Option<ApiAction> {
        match self {
            NetworkCommand::Fetch { .. } => Some(ApiAction::Fetch),
            NetworkCommand::Create { .. } => Some(ApiAction::Create),
            NetworkCommand::Update { .. } => Some(ApiAction::Update),
            NetworkCommand::Delete { .. } => Some(ApiAction::Delete),
            NetworkCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Exhibits collection fetched
    ExhibitsLoaded {
        id: u64,
        exhibits: Vec<Exhibit>,
    },
    /// Tours collection fetched
    ToursLoaded {
        id: u64,
        tours: Vec<VirtualTour>,
    },
    /// A create/update/delete returned 2xx
    Mutated {
        id: u64,
        outcome: MutationOutcome,
    },
    /// Transport failure, non-2xx status, or undecodable list
    Failed {
        id: u64,
        resource: Resource,
        action: ApiAction,
        message: String,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::ExhibitsLoaded { id, .. } => *id,
            NetworkResponse::ToursLoaded { id, .. } => *id,
            NetworkResponse::Mutated { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }
}
