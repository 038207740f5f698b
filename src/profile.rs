// Profile editing. A signed-in user edits their own profile; admins may edit anyone's.
use crate::directory::Profile;
use crate::error::{AccessError, FormError};
use crate::model::{Artist, UserProfile};
use crate::session::Session;
use crate::source::LocalBackend;
use anyhow::Result;

/// Fields of the "Edit Profile" form. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub bio: Option<String>,
    pub graduation_year: Option<u16>,
    pub profile_image_url: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self) -> Result<(), FormError> {
        if self.is_empty() {
            return Err(FormError::InvalidArgument("nothing to update".to_string()));
        }
        match &self.name {
            Some(name) if name.trim().is_empty() => Err(FormError::MissingField("name")),
            _ => Ok(()),
        }
    }

    pub fn apply_to_user(&self, user: &mut UserProfile) {
        if let Some(name) = &self.name {
            user.name = name.trim().to_string();
        }
        if let Some(domain) = &self.domain {
            user.domain = domain.trim().to_string();
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.trim().to_string();
        }
        if self.graduation_year.is_some() {
            user.graduation_year = self.graduation_year;
        }
        if let Some(url) = &self.profile_image_url {
            user.profile_image_url = url.trim().to_string();
        }
    }

    pub fn apply_to_artist(&self, artist: &mut Artist) {
        if let Some(name) = &self.name {
            artist.name = name.trim().to_string();
        }
        if let Some(domain) = &self.domain {
            artist.domain = domain.trim().to_string();
        }
        if let Some(bio) = &self.bio {
            artist.bio = bio.trim().to_string();
        }
        if self.graduation_year.is_some() {
            artist.graduation_year = self.graduation_year;
        }
        if let Some(url) = &self.profile_image_url {
            artist.image_url = url.trim().to_string();
        }
    }
}

/// Only the owner of a profile, or an admin, may change it.
pub fn authorize_edit(session: &Session, uid: &str) -> Result<(), AccessError> {
    let user = session.require_user()?;
    if user.uid == uid || session.is_admin() {
        Ok(())
    } else {
        Err(AccessError::PermissionDenied)
    }
}

/// Applies `changes` to the profile `uid`, looking among users first and
/// then among artists. Returns the profile as saved.
pub fn update_profile(
    backend: &LocalBackend,
    session: &Session,
    uid: &str,
    changes: &ProfileChanges,
) -> Result<Profile> {
    let uid = uid.trim();
    if uid.is_empty() {
        return Err(FormError::InvalidArgument("no user id provided".to_string()).into());
    }
    authorize_edit(session, uid).map_err(FormError::from)?;
    changes.validate()?;

    if let Some(user) = backend.update_user(uid, |u| changes.apply_to_user(u))? {
        log::info!("Updated user profile {}", uid);
        return Ok(Profile::User(user));
    }
    if let Some(artist) = backend.update_artist(uid, |a| changes.apply_to_artist(a))? {
        log::info!("Updated artist profile {}", uid);
        return Ok(Profile::Artist(artist));
    }

    log::warn!("No profile document found to update for {}", uid);
    Err(FormError::ProfileNotFound(uid.to_string()).into())
}
