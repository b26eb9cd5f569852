use serde::{Deserialize, Serialize};
use std::fmt;

/// End user who applies to campaigns and owns applications, reviews and points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Operator performing review decisions and settlement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who triggered a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Applicant(UserId),
    Staff(StaffId),
}

impl Actor {
    pub const fn role(&self) -> ActorRole {
        match self {
            Actor::Applicant(_) => ActorRole::Applicant,
            Actor::Staff(_) => ActorRole::Staff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Applicant,
    Staff,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            ActorRole::Applicant => "applicant",
            ActorRole::Staff => "staff",
        }
    }
}
