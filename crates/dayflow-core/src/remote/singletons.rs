//! Singleton-per-user rows with get-or-create-default semantics.
//!
//! Absence of a row is never surfaced to callers: the first access inserts
//! the documented defaults and every later access returns that same row. The
//! insert uses ignore-duplicates resolution so two callers racing on the same
//! missing row converge at the storage boundary instead of double-inserting.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::model::{UserPreferences, UserProfile, UserSettings};
use crate::remote::client::{OnConflict, RemoteClient};
use crate::remote::query::Query;
use crate::remote::query::{PreferencesPatch, ProfilePatch, SettingsPatch};

const PREFERENCES: &str = "user_preferences";
const PROFILES: &str = "user_profiles";
const SETTINGS: &str = "user_settings";

impl RemoteClient {
    async fn get_or_create<T>(
        &self,
        table: &'static str,
        user_id: Uuid,
        defaults: &T,
    ) -> Result<T, RemoteError>
    where
        T: Serialize + DeserializeOwned,
    {
        // Ignore-duplicates insert: fresh row comes back in the
        // representation, an existing row yields an empty one.
        let inserted: Vec<T> = self.insert(table, defaults, OnConflict::Ignore).await?;
        if let Some(row) = inserted.into_iter().next() {
            return Ok(row);
        }
        let rows: Vec<T> = self.select(table, &Query::new().into_pairs(user_id)).await?;
        rows.into_iter()
            .next()
            .ok_or(RemoteError::MissingRow { table })
    }

    pub async fn get_or_create_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<UserPreferences, RemoteError> {
        self.get_or_create(PREFERENCES, user_id, &UserPreferences::defaults_for(user_id))
            .await
    }

    pub async fn get_or_create_profile(&self, user_id: Uuid) -> Result<UserProfile, RemoteError> {
        self.get_or_create(PROFILES, user_id, &UserProfile::defaults_for(user_id))
            .await
    }

    pub async fn get_or_create_settings(
        &self,
        user_id: Uuid,
    ) -> Result<UserSettings, RemoteError> {
        self.get_or_create(SETTINGS, user_id, &UserSettings::defaults_for(user_id))
            .await
    }

    async fn update_singleton<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &'static str,
        user_id: Uuid,
        patch: &B,
    ) -> Result<T, RemoteError> {
        let pairs = vec![("user_id".to_string(), format!("eq.{user_id}"))];
        let rows = self.update(table, &pairs, patch).await?;
        rows.into_iter()
            .next()
            .ok_or(RemoteError::MissingRow { table })
    }

    pub async fn update_preferences(
        &self,
        user_id: Uuid,
        patch: &PreferencesPatch,
    ) -> Result<UserPreferences, RemoteError> {
        self.update_singleton(PREFERENCES, user_id, patch).await
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, RemoteError> {
        self.update_singleton(PROFILES, user_id, patch).await
    }

    pub async fn update_settings(
        &self,
        user_id: Uuid,
        patch: &SettingsPatch,
    ) -> Result<UserSettings, RemoteError> {
        self.update_singleton(SETTINGS, user_id, patch).await
    }
}
