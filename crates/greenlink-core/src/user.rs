//! # Users and Roles
//!
//! A user exists only for the lifetime of a session: created at sign-in,
//! mutated by profile edits or by completing professional verification,
//! dropped at logout.
//!
//! Consumers are verified at creation. Technicians, recyclers and NGO /
//! government operators start unverified and must pass the verification
//! gate before their dashboard is reachable.

use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// A platform role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Citizen handing in devices.
    Consumer,
    /// Repair technician at a hub node.
    Technician,
    /// Material recovery plant operator.
    Recycler,
    /// NGO or government supervisor.
    NgoGov,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Role; 4] = [Self::Consumer, Self::Technician, Self::Recycler, Self::NgoGov];

    /// Whether this role must pass the verification gate.
    pub fn requires_verification(&self) -> bool {
        !matches!(self, Self::Consumer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Consumer => "CONSUMER",
            Self::Technician => "TECHNICIAN",
            Self::Recycler => "RECYCLER",
            Self::NgoGov => "NGO_GOV",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::GreenlinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "CONSUMER" => Ok(Self::Consumer),
            "TECHNICIAN" => Ok(Self::Technician),
            "RECYCLER" => Ok(Self::Recycler),
            "NGO_GOV" | "NGO" => Ok(Self::NgoGov),
            other => Err(crate::error::GreenlinkError::Validation(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// Role-dependent profile details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialties: Vec<String>,
}

/// A partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_id: Option<String>,
    pub organization: Option<String>,
    pub address: Option<String>,
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_data: Option<ProfileData>,
}

impl User {
    /// Create a user at sign-in.
    ///
    /// Without a name, phone sign-ups are called `User <last four digits>`
    /// and everyone else `Citizen Agent`. The email is derived from the
    /// name, or `user@example.com` when no name was given.
    pub fn register(name: Option<&str>, phone: Option<&str>, role: Role) -> Self {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let phone = phone.map(str::trim).filter(|p| !p.is_empty());

        let display_name = match (name, phone) {
            (Some(n), _) => n.to_string(),
            (None, Some(p)) => {
                let tail: String = p.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
                format!("User {tail}")
            }
            (None, None) => "Citizen Agent".to_string(),
        };
        let email = match name {
            Some(n) => format!(
                "{}@example.com",
                n.to_lowercase().split_whitespace().collect::<Vec<_>>().join(".")
            ),
            None => "user@example.com".to_string(),
        };

        Self {
            id: UserId::generate(),
            role,
            name: display_name,
            email,
            phone: phone.map(str::to_string),
            is_verified: !role.requires_verification(),
            profile_data: None,
        }
    }

    /// Whether the verification gate stands between this user and their dashboard.
    pub fn needs_verification(&self) -> bool {
        self.role.requires_verification() && !self.is_verified
    }

    /// Mark the user verified. Idempotent.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
    }

    /// Apply a profile edit. Never touches role or verification.
    pub fn apply_profile(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if patch.license_id.is_some() || patch.organization.is_some() || patch.address.is_some() {
            let data = self.profile_data.get_or_insert_with(ProfileData::default);
            if let Some(license_id) = patch.license_id {
                data.license_id = Some(license_id);
            }
            if let Some(organization) = patch.organization {
                data.organization = Some(organization);
            }
            if let Some(address) = patch.address {
                data.address = Some(address);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_is_auto_verified() {
        let user = User::register(Some("Asha Rao"), None, Role::Consumer);
        assert!(user.is_verified);
        assert!(!user.needs_verification());
    }

    #[test]
    fn professionals_start_unverified() {
        for role in [Role::Technician, Role::Recycler, Role::NgoGov] {
            let user = User::register(Some("Ops"), None, role);
            assert!(!user.is_verified, "{role} must start unverified");
            assert!(user.needs_verification());
        }
    }

    #[test]
    fn email_derived_from_name() {
        let user = User::register(Some("Asha  Rao"), None, Role::Consumer);
        assert_eq!(user.email, "asha.rao@example.com");
    }

    #[test]
    fn phone_signup_without_name() {
        let user = User::register(None, Some("9876543210"), Role::Consumer);
        assert_eq!(user.name, "User 3210");
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn anonymous_signup() {
        let user = User::register(None, None, Role::Recycler);
        assert_eq!(user.name, "Citizen Agent");
    }

    #[test]
    fn profile_patch_preserves_role_and_verification() {
        let mut user = User::register(Some("Ravi"), None, Role::Technician);
        user.apply_profile(ProfilePatch {
            organization: Some("EcoFix Hub".into()),
            license_id: Some("TS-EW-TECH-882".into()),
            ..Default::default()
        });
        assert_eq!(user.role, Role::Technician);
        assert!(!user.is_verified);
        let data = user.profile_data.unwrap();
        assert_eq!(data.organization.as_deref(), Some("EcoFix Hub"));
        assert_eq!(data.license_id.as_deref(), Some("TS-EW-TECH-882"));
        assert_eq!(data.address, None);
    }

    #[test]
    fn role_parsing() {
        assert_eq!("ngo-gov".parse::<Role>().unwrap(), Role::NgoGov);
        assert_eq!("technician".parse::<Role>().unwrap(), Role::Technician);
        assert!("landing".parse::<Role>().is_err());
    }
}
