//! In-memory store used by unit and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo::{StoreError, UniqueField, UserStore};
use crate::auth::repo_types::User;
use crate::smes::repo::SmeStore;
use crate::smes::repo_types::{OwnerSummary, Sme, SmeListing};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    smes: Mutex<Vec<Sme>>,
    unavailable: bool,
    blind_lookups: bool,
    vanishing_smes: bool,
}

impl MemoryStore {
    /// Every call fails as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Lookups by username/email/phone see nothing, so only the insert-time
    /// uniqueness check can catch duplicates.
    pub fn with_blind_lookups(mut self) -> Self {
        self.blind_lookups = true;
        self
    }

    /// Listings disappear between the ownership check and the write, as if
    /// deleted concurrently.
    pub fn with_vanishing_smes(mut self) -> Self {
        self.vanishing_smes = true;
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Other(anyhow::anyhow!("store unavailable")));
        }
        Ok(())
    }

    fn find_user(&self, pred: impl Fn(&User) -> bool) -> Result<Option<User>, StoreError> {
        self.check()?;
        if self.blind_lookups {
            return Ok(None);
        }
        Ok(self.users.lock().unwrap().values().find(|u| pred(*u)).cloned())
    }

    fn conflict(existing: &User, user: &User) -> Option<UniqueField> {
        if existing.username == user.username {
            return Some(UniqueField::Username);
        }
        if user.email.is_some() && existing.email == user.email {
            return Some(UniqueField::Email);
        }
        if user.phone_number.is_some() && existing.phone_number == user.phone_number {
            return Some(UniqueField::PhoneNumber);
        }
        None
    }

    fn listing(&self, sme: &Sme) -> SmeListing {
        let users = self.users.lock().unwrap();
        let owner = users.get(&sme.owner_id);
        SmeListing {
            owner: OwnerSummary {
                id: sme.owner_id,
                name: owner.map(|u| u.name.clone()).unwrap_or_default(),
                email: owner.and_then(|u| u.email.clone()),
            },
            sme: sme.clone(),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if let Some(field) = users.values().find_map(|u| Self::conflict(u, user)) {
            return Err(StoreError::Conflict(field));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if let Some(field) = users
            .values()
            .filter(|u| u.id != user.id)
            .find_map(|u| Self::conflict(u, user))
        {
            return Err(StoreError::Conflict(field));
        }
        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(StoreError::Other(anyhow::anyhow!("user {} vanished", user.id))),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_lowercase();
        self.find_user(|u| u.username == username)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        self.find_user(|u| u.email.as_deref() == Some(email.as_str()))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        self.find_user(|u| u.phone_number.as_deref() == Some(phone))
    }
}

#[async_trait]
impl SmeStore for MemoryStore {
    async fn insert(&self, sme: &Sme) -> Result<(), StoreError> {
        self.check()?;
        self.smes.lock().unwrap().push(sme.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SmeListing>, StoreError> {
        self.check()?;
        let smes = self.smes.lock().unwrap().clone();
        Ok(smes.iter().rev().map(|s| self.listing(s)).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<SmeListing>, StoreError> {
        self.check()?;
        let sme = self.smes.lock().unwrap().iter().find(|s| s.id == id).cloned();
        Ok(sme.map(|s| self.listing(&s)))
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Sme>, StoreError> {
        self.check()?;
        Ok(self
            .smes
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && s.owner_id == owner_id)
            .cloned())
    }

    async fn update(&self, sme: &Sme) -> Result<bool, StoreError> {
        self.check()?;
        let mut smes = self.smes.lock().unwrap();
        if self.vanishing_smes {
            smes.retain(|s| s.id != sme.id);
        }
        match smes
            .iter_mut()
            .find(|s| s.id == sme.id && s.owner_id == sme.owner_id)
        {
            Some(slot) => {
                *slot = sme.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut smes = self.smes.lock().unwrap();
        let before = smes.len();
        smes.retain(|s| !(s.id == id && s.owner_id == owner_id));
        Ok(smes.len() != before)
    }
}
