//! Users, organizations, and the directory that resolves them.
//!
//! Work is assigned either to an individual user or to an organization
//! acting as a pool from which an individual eventually claims it.
//! Well-known organizations (board, mail team, ...) are registry
//! entries resolved by name and injected into components — never
//! referenced as globals — so distributors and workflows stay testable
//! in isolation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::UserId;

/// Well-known organization names.
pub mod org {
    /// The board itself; owns disposition tasks.
    pub const BOARD: &str = "board";
    /// Receives evidence-submission-window tasks.
    pub const MAIL_TEAM: &str = "mail-team";
    /// Receives transcription tasks after a held hearing.
    pub const TRANSCRIPTION_TEAM: &str = "transcription-team";
    /// Receives hearing admin actions and no-show follow-ups.
    pub const HEARINGS_MANAGEMENT: &str = "hearings-management";
    /// Pool backing the colocated task distributor.
    pub const COLOCATED: &str = "colocated";
}

/// A user who can be assigned work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate id; pools are ordered by it ascending.
    pub id: UserId,
    /// Login identifier (e.g., "BVALJUDGE1").
    pub css_id: String,
    /// Display name. Empty if the live record carries none.
    pub full_name: String,
}

impl User {
    /// Creates a user.
    pub fn new(id: UserId, css_id: impl Into<String>) -> Self {
        Self {
            id,
            css_id: css_id.into(),
            full_name: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }
}

/// A judge's staff-record entry, as carried by the scheduling system
/// of record. Distinct from the live [`User`] record, which may be
/// absent for a judge who has never signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Login identifier; joins to [`User::css_id`].
    pub css_id: String,
    /// Board-member id; joins to a hearing day's pre-assigned judge.
    pub judge_id: String,
    /// First name.
    pub first_name: String,
    /// Middle initial (may be empty).
    pub middle_initial: String,
    /// Last name.
    pub last_name: String,
}

impl StaffRecord {
    /// Creates a staff record.
    pub fn new(
        css_id: impl Into<String>,
        judge_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            css_id: css_id.into(),
            judge_id: judge_id.into(),
            first_name: first_name.into(),
            middle_initial: String::new(),
            last_name: last_name.into(),
        }
    }

    /// Sets the middle initial.
    pub fn with_middle_initial(mut self, initial: impl Into<String>) -> Self {
        self.middle_initial = initial.into();
        self
    }

    /// Display name composed from the record's name parts.
    ///
    /// Used as a fallback when no live user record exists.
    pub fn composed_name(&self) -> String {
        [&self.first_name, &self.middle_initial, &self.last_name]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An organization: a named pool of users with a subset of admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Registry name (see [`org`]).
    pub name: String,
    /// Member user ids.
    pub members: BTreeSet<UserId>,
    /// Admin user ids (admins are also members).
    pub admins: BTreeSet<UserId>,
}

impl Organization {
    /// Creates an empty organization.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeSet::new(),
            admins: BTreeSet::new(),
        }
    }

    /// Adds a member.
    pub fn with_member(mut self, user_id: UserId) -> Self {
        self.members.insert(user_id);
        self
    }

    /// Adds an admin (implies membership).
    pub fn with_admin(mut self, user_id: UserId) -> Self {
        self.members.insert(user_id);
        self.admins.insert(user_id);
        self
    }

    /// Whether a user belongs to this organization.
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    /// Whether a user administers this organization.
    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admins.contains(&user_id)
    }

    /// Non-admin members, ascending by id.
    ///
    /// This is the assignee pool for the colocated distributor.
    pub fn non_admins(&self) -> Vec<UserId> {
        self.members
            .iter()
            .copied()
            .filter(|id| !self.admins.contains(id))
            .collect()
    }
}

/// Registry of users, organizations, and regional offices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    users: BTreeMap<UserId, User>,
    organizations: BTreeMap<String, Organization>,
    regional_offices: BTreeSet<String>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Registers an organization.
    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organizations
            .insert(organization.name.clone(), organization);
        self
    }

    /// Registers a regional office key.
    pub fn with_regional_office(mut self, key: impl Into<String>) -> Self {
        self.regional_offices.insert(key.into());
        self
    }

    /// Looks up a user by id.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Looks up a user by login identifier.
    pub fn user_by_css_id(&self, css_id: &str) -> Option<&User> {
        self.users.values().find(|u| u.css_id == css_id)
    }

    /// Looks up an organization by name.
    pub fn organization(&self, name: &str) -> Option<&Organization> {
        self.organizations.get(name)
    }

    /// Whether a regional office key is known.
    pub fn has_regional_office(&self, key: &str) -> bool {
        self.regional_offices.contains(key)
    }

    /// Display name for a user, if registered.
    pub fn display_name(&self, id: UserId) -> Option<&str> {
        self.users.get(&id).map(|u| u.full_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_admins_ordered_ascending() {
        let organization = Organization::new(org::COLOCATED)
            .with_member(30)
            .with_member(10)
            .with_admin(20)
            .with_member(25);

        assert_eq!(organization.non_admins(), vec![10, 25, 30]);
        assert!(organization.is_member(20));
        assert!(organization.is_admin(20));
        assert!(!organization.is_admin(10));
    }

    #[test]
    fn test_composed_name_skips_empty_initial() {
        let staff = StaffRecord::new("BVAJ1", "101", "Anaya", "Juarez");
        assert_eq!(staff.composed_name(), "Anaya Juarez");

        let staff = staff.with_middle_initial("Q");
        assert_eq!(staff.composed_name(), "Anaya Q Juarez");
    }

    #[test]
    fn test_directory_lookups() {
        let directory = Directory::new()
            .with_user(User::new(1, "CSS1").with_full_name("First User"))
            .with_organization(Organization::new(org::MAIL_TEAM).with_member(1))
            .with_regional_office("RO17");

        assert_eq!(directory.user(1).map(|u| u.css_id.as_str()), Some("CSS1"));
        assert!(directory.user(2).is_none());
        assert_eq!(directory.user_by_css_id("CSS1").map(|u| u.id), Some(1));
        assert!(directory.organization(org::MAIL_TEAM).is_some());
        assert!(directory.organization(org::BOARD).is_none());
        assert!(directory.has_regional_office("RO17"));
        assert!(!directory.has_regional_office("RO99"));
        assert_eq!(directory.display_name(1), Some("First User"));
    }
}
