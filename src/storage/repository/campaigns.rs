// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campaign repository.
//!
//! A `CampaignRepository` is always bound to an [`OwnerScope`]; it has no
//! operation that reads or writes outside the scoped subject's records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::document::{
    from_document, to_document, Collection, DocumentStore, StoreResult,
};
use super::super::ownership::{OwnedResource, OwnerScope, OwnershipCheck};
use crate::models::{Campaign, CampaignFields};

/// Campaign as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredCampaign {
    /// Unique campaign identifier (UUID)
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub banner_url: String,
    /// Owner user ID, set once at creation
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for StoredCampaign {
    fn owner_user_id(&self) -> &str {
        &self.created_by
    }
}

impl From<StoredCampaign> for Campaign {
    fn from(stored: StoredCampaign) -> Self {
        Campaign {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            start_date: stored.start_date,
            end_date: stored.end_date,
            banner_url: stored.banner_url,
            created_by: stored.created_by,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// Mutable campaign fields plus `updated_at`, as written by an update.
#[derive(Serialize)]
struct CampaignChanges<'f> {
    name: &'f str,
    description: &'f str,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    banner_url: &'f str,
    updated_at: DateTime<Utc>,
}

/// Owner-scoped repository for campaigns.
pub struct CampaignRepository<'a> {
    store: &'a dyn DocumentStore,
    scope: OwnerScope,
}

impl<'a> CampaignRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore, scope: OwnerScope) -> Self {
        Self { store, scope }
    }

    /// Create a campaign owned by the scoped subject.
    pub fn create(&self, fields: &CampaignFields, now: DateTime<Utc>) -> StoreResult<StoredCampaign> {
        let mut campaign = StoredCampaign {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            start_date: fields.start_date,
            end_date: fields.end_date,
            banner_url: fields.banner_url.clone(),
            created_by: self.scope.subject().to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut document = to_document(&campaign)?;
        self.scope.stamp(&mut document);
        campaign.id = self.store.insert_one(Collection::Campaigns, document)?;

        Ok(campaign)
    }

    /// All campaigns owned by the scoped subject, oldest first.
    pub fn list(&self) -> StoreResult<Vec<StoredCampaign>> {
        let mut campaigns = self
            .store
            .find_many(Collection::Campaigns, &self.scope.filter())?
            .into_iter()
            .map(from_document)
            .collect::<StoreResult<Vec<StoredCampaign>>>()?;

        campaigns.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(campaigns)
    }

    /// One campaign, if it exists and the scoped subject owns it.
    pub fn get(&self, id: &str) -> StoreResult<Option<StoredCampaign>> {
        let found = self
            .store
            .find_one(Collection::Campaigns, &self.scope.filter_by_id(id))?
            .map(from_document::<StoredCampaign>)
            .transpose()?;

        Ok(found.verify_owner(&self.scope))
    }

    /// Replace the mutable fields of an owned campaign.
    ///
    /// Returns `false` when no owned campaign has this id.
    pub fn update(&self, id: &str, fields: &CampaignFields, now: DateTime<Utc>) -> StoreResult<bool> {
        let changes = to_document(&CampaignChanges {
            name: &fields.name,
            description: &fields.description,
            start_date: fields.start_date,
            end_date: fields.end_date,
            banner_url: &fields.banner_url,
            updated_at: now,
        })?;

        self.store
            .update_one(Collection::Campaigns, &self.scope.filter_by_id(id), changes)
    }

    /// Delete an owned campaign. Returns `false` when no owned campaign has
    /// this id.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.store
            .delete_one(Collection::Campaigns, &self.scope.filter_by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthContext, TOKEN_ISSUER};
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn scope(subject: &str) -> OwnerScope {
        OwnerScope::of(&AuthContext::new(subject, "Test", TOKEN_ISSUER).unwrap())
    }

    fn fields(name: &str) -> CampaignFields {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        CampaignFields {
            name: name.to_string(),
            description: "Launch campaign".to_string(),
            start_date: start,
            end_date: start + Duration::days(30),
            banner_url: "https://cdn.example.com/banner.png".to_string(),
        }
    }

    #[test]
    fn create_stamps_owner_and_timestamps() {
        let store = MemoryStore::new();
        let repo = CampaignRepository::new(&store, scope("u1"));
        let now = Utc::now();

        let created = repo.create(&fields("Spring"), now).unwrap();

        assert_eq!(created.created_by, "u1");
        assert_eq!(created.created_at, now);
        assert_eq!(created.updated_at, now);
        assert_eq!(repo.get(&created.id).unwrap(), Some(created));
    }

    #[test]
    fn list_only_returns_own_campaigns() {
        let store = MemoryStore::new();
        let mine = CampaignRepository::new(&store, scope("u1"));
        let theirs = CampaignRepository::new(&store, scope("u2"));
        let now = Utc::now();

        mine.create(&fields("First"), now).unwrap();
        theirs.create(&fields("Other"), now).unwrap();
        mine.create(&fields("Second"), now + Duration::seconds(1)).unwrap();

        let names: Vec<_> = mine.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn foreign_campaign_is_unreachable() {
        let store = MemoryStore::new();
        let owner = CampaignRepository::new(&store, scope("u1"));
        let intruder = CampaignRepository::new(&store, scope("u2"));

        let created = owner.create(&fields("Private"), Utc::now()).unwrap();

        assert_eq!(intruder.get(&created.id).unwrap(), None);
        assert!(!intruder.update(&created.id, &fields("Hijacked"), Utc::now()).unwrap());
        assert!(!intruder.delete(&created.id).unwrap());

        let still_there = owner.get(&created.id).unwrap().unwrap();
        assert_eq!(still_there.name, "Private");
    }

    #[test]
    fn update_keeps_owner_and_created_at() {
        let store = MemoryStore::new();
        let repo = CampaignRepository::new(&store, scope("u1"));
        let created_at = Utc::now();
        let created = repo.create(&fields("Spring"), created_at).unwrap();

        let later = created_at + Duration::minutes(5);
        assert!(repo.update(&created.id, &fields("Summer"), later).unwrap());

        let updated = repo.get(&created.id).unwrap().unwrap();
        assert_eq!(updated.name, "Summer");
        assert_eq!(updated.created_by, "u1");
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn delete_removes_campaign() {
        let store = MemoryStore::new();
        let repo = CampaignRepository::new(&store, scope("u1"));
        let created = repo.create(&fields("Spring"), Utc::now()).unwrap();

        assert!(repo.delete(&created.id).unwrap());
        assert_eq!(repo.get(&created.id).unwrap(), None);
        assert!(!repo.delete(&created.id).unwrap());
    }
}
