//! Scenario - 外部契約で固定された scenario id の対応表

use std::fmt;

/// Scenario ids as assigned by the provisioning API.
pub const CREATE_SCENARIO_ID: i64 = 1002;
pub const DELETE_SCENARIO_ID: i64 = 1003;
pub const READ_SCENARIO_ID: i64 = 1004;
pub const UPDATE_SCENARIO_ID: i64 = 1005;

/// Operation selected by an activity's scenario id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Create,
    Delete,
    Read,
    Update,
}

impl Scenario {
    /// Map a wire scenario id. Unknown ids yield `None` (a no-op, not an error).
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            CREATE_SCENARIO_ID => Some(Scenario::Create),
            DELETE_SCENARIO_ID => Some(Scenario::Delete),
            READ_SCENARIO_ID => Some(Scenario::Read),
            UPDATE_SCENARIO_ID => Some(Scenario::Update),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Scenario::Create => CREATE_SCENARIO_ID,
            Scenario::Delete => DELETE_SCENARIO_ID,
            Scenario::Read => READ_SCENARIO_ID,
            Scenario::Update => UPDATE_SCENARIO_ID,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Create => "create",
            Scenario::Delete => "delete",
            Scenario::Read => "read",
            Scenario::Update => "update",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}
