use serde::{Deserialize, Serialize};

/// Account status shared by users and admins. Stored as `SMALLINT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum PrincipalStatus {
    Disabled = 0,
    Active = 1,
}

impl PrincipalStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl From<PrincipalStatus> for i16 {
    fn from(status: PrincipalStatus) -> Self {
        status as i16
    }
}

impl TryFrom<i16> for PrincipalStatus {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Active),
            other => Err(format!("invalid status: {other}")),
        }
    }
}
