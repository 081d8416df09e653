use serde::Deserialize;

/// An ordered, non-empty list of member handles sharing one standing.
///
/// A single-member party is an individual contestant; a multi-member party
/// is an ICPC-style team whose members share one rating delta.
#[derive(Debug, Clone, Deserialize)]
pub struct Party {
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub handle: String,
}

impl Party {
    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.handle.as_str())
    }
}
