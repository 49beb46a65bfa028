//! Messages and results exchanged between the router and light clients.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::height::Height;

/// Client lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientStatus {
    /// The client accepts updates and proofs.
    Active,
    /// The client observed misbehaviour; only queries remain available.
    Frozen,
}

/// Outcome of a client update, classified before the proof is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateResult {
    /// A new consensus state was recorded.
    Update(Height),
    /// Conflicting state was proven; the client is now frozen.
    Misbehaviour,
    /// The consensus state was already on record, unchanged.
    NoOp,
}

/// A membership verification request.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MembershipMsg {
    /// Height of the remote state the proof is evaluated against
    pub proof_height: Height,
    /// Strategy-specific proof bytes; empty means "serve from the
    /// execution-scoped cache"
    pub proof: Vec<u8>,
    /// Path segments, prefix included
    pub path: Vec<Vec<u8>>,
    /// Expected value bound at the path; must be non-empty
    pub value: Vec<u8>,
}

/// A non-membership verification request.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NonMembershipMsg {
    /// Height of the remote state the proof is evaluated against
    pub proof_height: Height,
    /// Strategy-specific proof bytes
    pub proof: Vec<u8>,
    /// Path segments, prefix included
    pub path: Vec<Vec<u8>>,
}

/// Flattens path segments into the full path bytes proofs commit to.
#[must_use]
pub fn flatten_path(segments: &[Vec<u8>]) -> Vec<u8> {
    segments.concat()
}
