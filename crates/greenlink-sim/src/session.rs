//! # Session Shell
//!
//! Holds the signed-in user and the requested view, and decides which
//! screen is shown. The shell has no domain logic; dashboards are built
//! separately and handed whatever the session routes to.
//!
//! Routing precedence: an open profile page, then the verification gate
//! for an unverified professional, then the requested dashboard or the
//! network directory, then the landing page.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use greenlink_core::{ProfilePatch, Role, User};

use crate::error::WorkflowError;
use crate::verification::VerificationGate;

/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "view", content = "role")]
pub enum View {
    Landing,
    Network,
    Dashboard(Role),
}

/// What is actually rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "screen", content = "role")]
pub enum Screen {
    Landing,
    Network,
    Profile,
    VerificationGate(Role),
    Dashboard(Role),
}

/// Outcome of picking a role card on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSelection {
    Navigated,
    AuthRequired,
}

#[derive(Debug, Clone)]
pub struct Session {
    user: Option<User>,
    view: View,
    profile_open: bool,
    auth_prompt: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            user: None,
            view: View::Landing,
            profile_open: false,
            auth_prompt: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn auth_prompt_open(&self) -> bool {
        self.auth_prompt
    }

    pub fn login(&mut self, user: User) {
        info!(user_id = %user.id, role = %user.role, verified = user.is_verified, "session started");
        self.view = View::Dashboard(user.role);
        self.user = Some(user);
        self.auth_prompt = false;
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "session ended");
        }
        self.view = View::Landing;
        self.profile_open = false;
    }

    pub fn navigate(&mut self, view: View) {
        debug!(?view, "navigate");
        self.profile_open = false;
        self.view = view;
    }

    pub fn open_auth(&mut self) {
        self.auth_prompt = true;
    }

    pub fn close_auth(&mut self) {
        self.auth_prompt = false;
    }

    /// Only meaningful while signed in.
    pub fn open_profile(&mut self) -> Result<(), WorkflowError> {
        self.require_user()?;
        self.profile_open = true;
        Ok(())
    }

    pub fn close_profile(&mut self) {
        self.profile_open = false;
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<&User, WorkflowError> {
        let user = self.user_mut()?;
        user.apply_profile(patch);
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    /// Mark the signed-in professional verified once their gate is done.
    pub fn complete_verification(&mut self, gate: &VerificationGate) -> Result<(), WorkflowError> {
        let user = self.user_mut()?;
        if gate.role() != user.role {
            return Err(WorkflowError::ValidationBlocked(format!(
                "verification gate is for {}, user is {}",
                gate.role(),
                user.role
            )));
        }
        gate.ensure_complete()?;
        user.mark_verified();
        info!(user_id = %user.id, role = %user.role, "user verified");
        Ok(())
    }

    /// A role card was picked on the landing page.
    pub fn select_role_from_landing(&mut self, role: Role) -> RoleSelection {
        if self.user.as_ref().is_some_and(|u| u.role == role) {
            self.navigate(View::Dashboard(role));
            RoleSelection::Navigated
        } else {
            self.auth_prompt = true;
            RoleSelection::AuthRequired
        }
    }

    pub fn route(&self) -> Screen {
        let Some(user) = &self.user else {
            return match self.view {
                View::Network => Screen::Network,
                View::Landing | View::Dashboard(_) => Screen::Landing,
            };
        };
        if self.profile_open {
            return Screen::Profile;
        }
        if user.needs_verification() {
            return Screen::VerificationGate(user.role);
        }
        match self.view {
            View::Landing => Screen::Landing,
            View::Network => Screen::Network,
            View::Dashboard(role) => Screen::Dashboard(role),
        }
    }

    fn require_user(&self) -> Result<&User, WorkflowError> {
        self.user
            .as_ref()
            .ok_or_else(|| WorkflowError::ValidationBlocked("no user signed in".to_string()))
    }

    fn user_mut(&mut self) -> Result<&mut User, WorkflowError> {
        self.user
            .as_mut()
            .ok_or_else(|| WorkflowError::ValidationBlocked("no user signed in".to_string()))
    }
}
