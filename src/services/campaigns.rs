// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campaign CRUD scoped to the authenticated caller.
//!
//! Every method takes the caller's [`AuthContext`] and works through a
//! [`CampaignRepository`] bound to that caller. A campaign owned by someone
//! else is indistinguishable from one that does not exist.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::AuthContext;
use crate::error::ServiceError;
use crate::models::{Campaign, CampaignFields};
use crate::storage::{CampaignRepository, DocumentStore, OwnerScope};

pub struct CampaignService {
    store: Arc<dyn DocumentStore>,
}

impl CampaignService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn repository(&self, ctx: &AuthContext) -> CampaignRepository<'_> {
        CampaignRepository::new(self.store.as_ref(), OwnerScope::of(ctx))
    }

    pub fn create(&self, ctx: &AuthContext, fields: &CampaignFields) -> Result<Campaign, ServiceError> {
        let campaign = self.repository(ctx).create(fields, Utc::now()).map_err(|e| {
            tracing::error!(user_id = %ctx.subject(), error = %e, "Error creating campaign");
            ServiceError::OperationFailed("error creating campaign")
        })?;

        tracing::info!(user_id = %ctx.subject(), campaign_id = %campaign.id, "Campaign created");
        Ok(campaign.into())
    }

    pub fn list(&self, ctx: &AuthContext) -> Result<Vec<Campaign>, ServiceError> {
        let campaigns = self.repository(ctx).list().map_err(|e| {
            tracing::error!(user_id = %ctx.subject(), error = %e, "Error getting campaigns");
            ServiceError::OperationFailed("error getting campaigns")
        })?;

        Ok(campaigns.into_iter().map(Campaign::from).collect())
    }

    pub fn get(&self, ctx: &AuthContext, id: &str) -> Result<Campaign, ServiceError> {
        match self.repository(ctx).get(id) {
            Ok(Some(campaign)) => Ok(campaign.into()),
            Ok(None) => Err(ServiceError::ResourceNotFound),
            Err(e) => {
                tracing::error!(user_id = %ctx.subject(), campaign_id = %id, error = %e, "Error getting campaign");
                Err(ServiceError::ResourceNotFound)
            }
        }
    }

    pub fn update(
        &self,
        ctx: &AuthContext,
        id: &str,
        fields: &CampaignFields,
    ) -> Result<(), ServiceError> {
        match self.repository(ctx).update(id, fields, Utc::now()) {
            Ok(true) => {
                tracing::info!(user_id = %ctx.subject(), campaign_id = %id, "Campaign updated");
                Ok(())
            }
            Ok(false) => Err(ServiceError::ResourceNotFound),
            Err(e) => {
                tracing::error!(user_id = %ctx.subject(), campaign_id = %id, error = %e, "Error updating campaign");
                Err(ServiceError::OperationFailed("error updating campaign"))
            }
        }
    }

    pub fn delete(&self, ctx: &AuthContext, id: &str) -> Result<(), ServiceError> {
        match self.repository(ctx).delete(id) {
            Ok(true) => {
                tracing::info!(user_id = %ctx.subject(), campaign_id = %id, "Campaign deleted");
                Ok(())
            }
            Ok(false) => Err(ServiceError::ResourceNotFound),
            Err(e) => {
                tracing::error!(user_id = %ctx.subject(), campaign_id = %id, error = %e, "Error deleting campaign");
                Err(ServiceError::OperationFailed("error deleting campaign"))
            }
        }
    }
}
