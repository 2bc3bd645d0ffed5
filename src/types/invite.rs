use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct AcceptRequest {
    /// True: re-stamp the acceptor's solo rows into the workspace.
    /// False: delete them permanently. Resolved exactly once, here.
    pub merge_data: bool,
}

/// Pending invitations addressed to the caller's email, plus whether they
/// have any solo data so the client can offer the merge/fresh-start choice.
#[derive(Serialize, Deserialize, Debug)]
pub struct MyInvitations {
    pub invitations: Vec<entity::invitation::Model>,
    pub has_solo_data: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AcceptResponse {
    pub workspace_id: Uuid,
}
