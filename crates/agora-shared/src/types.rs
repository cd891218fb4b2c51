use serde::{Deserialize, Serialize};

// Backend identifiers are plain integers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ReplyId(pub i64);

impl std::fmt::Display for ReplyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author role as reported by the backend.
///
/// The backend spells roles `ALUNO`, `MONITOR` and `PROFESSOR`. Any other
/// value is kept verbatim in [`Role::Unknown`] so a newer backend never
/// breaks deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Student,
    Monitor,
    Instructor,
    Unknown(String),
}

impl Role {
    /// Wire spelling of the role.
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Student => "ALUNO",
            Self::Monitor => "MONITOR",
            Self::Instructor => "PROFESSOR",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ALUNO" | "STUDENT" => Self::Student,
            "MONITOR" => Self::Monitor,
            "PROFESSOR" | "INSTRUCTOR" => Self::Instructor,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_wire().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}
