use crate::error::{Result, TeamError};
use crate::types::Member;
use tracing::debug;

/// Ordered list of eligible members.
///
/// Ids come from a counter that never rewinds, so an id freed by
/// `remove_member` is not handed out again.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<Member>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member. Blank names are ignored and return `None`.
    pub fn add_member(&mut self, name: &str) -> Option<&Member> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.next_id += 1;
        let member = Member::new(format!("m{}", self.next_id), name);
        debug!(id = %member.id, name = %member.name, "member added");
        self.members.push(member);
        self.members.last()
    }

    pub fn remove_member(&mut self, id: &str) -> Result<Member> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| TeamError::MemberNotFound(id.to_string()))?;
        let removed = self.members.remove(pos);
        debug!(id = %removed.id, "member removed");
        Ok(removed)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Roster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for name in iter {
            roster.add_member(name.as_ref());
        }
        roster
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trims_and_appends() {
        let mut roster = Roster::new();
        let id = roster.add_member("  Ada ").unwrap().id.clone();
        roster.add_member("Grace");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.members()[0].name, "Ada");
        assert_eq!(roster.members()[1].name, "Grace");
        assert_eq!(roster.get(&id).unwrap().name, "Ada");
    }

    #[test]
    fn blank_names_are_ignored() {
        let mut roster = Roster::new();
        assert!(roster.add_member("").is_none());
        assert!(roster.add_member("   \t").is_none());
        assert!(roster.is_empty());
    }

    #[test]
    fn ids_are_unique_after_removal() {
        let mut roster: Roster = ["A", "B"].into_iter().collect();
        let first = roster.members()[0].id.clone();
        roster.remove_member(&first).unwrap();
        let added = roster.add_member("C").unwrap().id.clone();
        assert_ne!(added, first);
        let ids: Vec<&str> = roster.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m3"]);
    }

    #[test]
    fn remove_unknown_id_fails() {
        let mut roster: Roster = ["A"].into_iter().collect();
        let err = roster.remove_member("m99").unwrap_err();
        assert!(matches!(err, TeamError::MemberNotFound(ref id) if id == "m99"));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn remove_keeps_order() {
        let mut roster: Roster = ["A", "B", "C"].into_iter().collect();
        let removed = roster.remove_member("m2").unwrap();
        assert_eq!(removed.name, "B");
        let names: Vec<&str> = roster.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}
