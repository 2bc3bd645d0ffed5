use crate::types::scope::Role;
use crate::types::user::MemberView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InviteRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TransferRequest {
    pub new_owner_id: Uuid,
}

/// The "my workspace" answer. `invitations` is only populated for the
/// owner; members and solo users get an empty list.
#[derive(Serialize, Deserialize, Debug)]
pub struct WorkspaceView {
    pub team: Option<entity::workspace::Model>,
    pub role: Role,
    pub members: Vec<MemberView>,
    pub invitations: Vec<entity::invitation::Model>,
}
