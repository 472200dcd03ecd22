// Authorization rules for privileged commands.
//
// Pure functions over plain ids. The Discord layer collects the caller's roles
// once per invocation and hands them over as a `CallerIdentity`.

use std::collections::HashSet;
use std::str::FromStr;

/// Who is invoking a command, reduced to what authorization needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: u64,
    pub role_ids: HashSet<u64>,
}

impl CallerIdentity {
    pub fn new(user_id: u64, role_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            user_id,
            role_ids: role_ids.into_iter().collect(),
        }
    }
}

/// What a command demands of its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Only this one account, whatever roles it holds.
    ExactUser(u64),
    /// At least one of these roles.
    AnyOfRoles(HashSet<u64>),
}

pub fn is_authorized(caller: &CallerIdentity, required: &RoleRequirement) -> bool {
    match required {
        RoleRequirement::ExactUser(user_id) => caller.user_id == *user_id,
        RoleRequirement::AnyOfRoles(roles) => !caller.role_ids.is_disjoint(roles),
    }
}

/// How unauthorized callers are answered. Applies to every gated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenialPolicy {
    /// Reply with a short denial (ephemeral for slash commands).
    #[default]
    Reply,
    /// Ignore the invocation entirely.
    Silent,
}

impl FromStr for DenialPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reply" => Ok(Self::Reply),
            "silent" => Ok(Self::Silent),
            other => Err(format!("unknown denial policy `{}`", other)),
        }
    }
}

/// The privileged identities configured for this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub owner_id: u64,
    pub ownership_role_id: u64,
    pub mod_role_id: u64,
    pub denial: DenialPolicy,
}

impl AccessPolicy {
    /// Presence and shutdown commands.
    pub fn owner(&self) -> RoleRequirement {
        RoleRequirement::ExactUser(self.owner_id)
    }

    /// `$kick` and `$ban`.
    pub fn moderator(&self) -> RoleRequirement {
        RoleRequirement::AnyOfRoles(HashSet::from([self.mod_role_id]))
    }

    /// `$purge`.
    pub fn ownership(&self) -> RoleRequirement {
        RoleRequirement::AnyOfRoles(HashSet::from([self.ownership_role_id]))
    }

    /// `/embed`.
    pub fn staff(&self) -> RoleRequirement {
        RoleRequirement::AnyOfRoles(HashSet::from([self.mod_role_id, self.ownership_role_id]))
    }

    /// How a caller failing `required` is answered. Owner commands never
    /// acknowledge anyone else, whatever the configured policy.
    pub fn denial_for(&self, required: &RoleRequirement) -> DenialPolicy {
        match required {
            RoleRequirement::ExactUser(_) => DenialPolicy::Silent,
            RoleRequirement::AnyOfRoles(_) => self.denial,
        }
    }
}
