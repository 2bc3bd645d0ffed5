pub mod candidate;
pub mod candidate_comment;
pub mod company;
pub mod contact;
pub mod invitation;
pub mod membership;
pub mod note;
pub mod todo;
pub mod user;
pub mod workspace;

/*
 Every CRM row belongs to exactly one scope. Either workspace_id is set and
 the row is shared with every member of that workspace, or workspace_id is
 null and only created_by can see it (solo data).

 Users start solo. The first successful invite a solo user sends creates
 their workspace and sweeps their solo rows into it. An invitee resolves the
 same choice at accept time: merge their solo rows into the workspace, or
 drop them and start fresh.
 */
