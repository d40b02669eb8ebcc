//! Employee records management.
//!
//! Accounts are provisioned elsewhere; this module only reads profiles and
//! lets admins rename, re-type and (de)activate them.

use crate::error::TrackError;
use crate::store::{ProfileRepository, StoreError};
use crate::timer::validate;
use crate::types::{Actor, Profile, ProfileUpdate, Role};

/// Admin operations over profiles.
#[derive(Debug)]
pub struct ProfileManager<R> {
    repo: R,
}

impl<R: ProfileRepository> ProfileManager<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the employee-role profiles, as listed on the employees page.
    pub async fn employees(&self) -> Result<Vec<Profile>, TrackError> {
        let mut profiles = self.repo.list_profiles().await?;
        profiles.retain(|p| p.role == Role::Employee);
        Ok(profiles)
    }

    /// Finds a profile by id, falling back to a case-insensitive email match.
    pub async fn resolve(&self, key: &str) -> Result<Option<Profile>, TrackError> {
        if let Some(profile) = self.repo.get_profile(key).await? {
            return Ok(Some(profile));
        }
        let profiles = self.repo.list_profiles().await?;
        Ok(profiles
            .into_iter()
            .find(|p| p.email.eq_ignore_ascii_case(key)))
    }

    /// Renames or re-types a profile.
    ///
    /// # Errors
    ///
    /// Validation runs first, then the admin check, then the store call.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, TrackError> {
        let update = validate::profile_update(update)?;
        require_admin(actor, "edit employee records")?;

        let profile = self.repo.update_profile(id, &update).await?;
        tracing::info!(profile_id = %profile.id, "profile updated");
        Ok(profile)
    }

    /// Sets whether a profile is active.
    pub async fn set_active(&self, actor: &Actor, id: &str, active: bool) -> Result<(), TrackError> {
        require_admin(actor, "activate or deactivate employees")?;
        self.repo.set_active(id, active).await?;
        tracing::info!(profile_id = id, active, "profile activation changed");
        Ok(())
    }

    /// Flips a profile's active flag and returns the new value.
    pub async fn toggle_active(&self, actor: &Actor, id: &str) -> Result<bool, TrackError> {
        require_admin(actor, "activate or deactivate employees")?;
        let profile = self
            .repo
            .get_profile(id)
            .await?
            .ok_or_else(|| StoreError::profile_not_found(id))?;

        let active = !profile.is_active;
        self.set_active(actor, id, active).await?;
        Ok(active)
    }
}

fn require_admin(actor: &Actor, action: &'static str) -> Result<(), TrackError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(TrackError::Forbidden { action })
    }
}
