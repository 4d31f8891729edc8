//! Typed access to the persisted Settings Snapshot.
//!
//! Every read goes to the store, so callers always see the latest value any
//! context has written. Missing or malformed keys fail with
//! [`CoreError::Config`] instead of leaking nulls into string handling.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::storage::SharedStore;

pub const DEFAULT_LANGUAGE: &str = "defaultLanguage";
pub const CAPITALIZATION: &str = "capitalization";
pub const TEXT_REPLACEMENT_MAP: &str = "textReplacementMap";
pub const IS_MIC_LISTENING: &str = "isMicListening";
pub const DATA: &str = "data";
pub const MOUNT_ACK_ID: &str = "mountAckId";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub label: String,
}

#[derive(Clone)]
pub struct Settings {
    store: SharedStore,
}

impl Settings {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn default_language(&self) -> CoreResult<Language> {
        let mut values = self.store.get(&[DEFAULT_LANGUAGE]).await?;
        required(&mut values, DEFAULT_LANGUAGE)
    }

    /// Language and capitalization flag, read together for input processing.
    pub async fn input_settings(&self) -> CoreResult<(Language, bool)> {
        let mut values = self.store.get(&[DEFAULT_LANGUAGE, CAPITALIZATION]).await?;
        let language = required(&mut values, DEFAULT_LANGUAGE)?;
        let capitalization = required(&mut values, CAPITALIZATION)?;
        Ok((language, capitalization))
    }

    /// Language and listening flag, read together when restarting recognition.
    pub async fn restart_settings(&self) -> CoreResult<(Language, bool)> {
        let mut values = self
            .store
            .get(&[DEFAULT_LANGUAGE, IS_MIC_LISTENING])
            .await?;
        let language = required(&mut values, DEFAULT_LANGUAGE)?;
        let listening = required(&mut values, IS_MIC_LISTENING)?;
        Ok((language, listening))
    }

    pub async fn text_replacement_map(&self) -> CoreResult<HashMap<String, String>> {
        let mut values = self.store.get(&[TEXT_REPLACEMENT_MAP]).await?;
        required(&mut values, TEXT_REPLACEMENT_MAP)
    }

    pub async fn is_mic_listening(&self) -> CoreResult<bool> {
        let mut values = self.store.get(&[IS_MIC_LISTENING]).await?;
        required(&mut values, IS_MIC_LISTENING)
    }

    pub async fn set_mic_listening(&self, listening: bool) -> CoreResult<()> {
        self.set_one(IS_MIC_LISTENING, Value::Bool(listening)).await
    }

    /// The last selected text payload, shaped as `{ "data": ... }`.
    pub async fn data(&self) -> CoreResult<Map<String, Value>> {
        let mut values = self.store.get(&[DATA]).await?;
        values.entry(DATA).or_insert(Value::Null);
        Ok(values)
    }

    pub async fn set_data(&self, data: Value) -> CoreResult<()> {
        self.set_one(DATA, data).await
    }

    /// Content-script mount acknowledgement id; null until a content script
    /// has mounted.
    pub async fn mount_ack_id(&self) -> CoreResult<Value> {
        let mut values = self.store.get(&[MOUNT_ACK_ID]).await?;
        Ok(values.remove(MOUNT_ACK_ID).unwrap_or(Value::Null))
    }

    /// Writes install-time defaults for every required key that is missing.
    pub async fn seed_defaults(&self, language: &Language) -> CoreResult<()> {
        let existing = self
            .store
            .get(&[
                DEFAULT_LANGUAGE,
                CAPITALIZATION,
                TEXT_REPLACEMENT_MAP,
                IS_MIC_LISTENING,
            ])
            .await?;
        let language = serde_json::to_value(language).map_err(|error| {
            CoreError::Internal(format!("failed to serialize language: {error}"))
        })?;
        let defaults = [
            (DEFAULT_LANGUAGE, language),
            (CAPITALIZATION, Value::Bool(false)),
            (TEXT_REPLACEMENT_MAP, Value::Object(Map::new())),
            (IS_MIC_LISTENING, Value::Bool(false)),
        ];
        let missing: Map<String, Value> = defaults
            .into_iter()
            .filter(|(key, _)| !existing.contains_key(*key))
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        tracing::info!(keys = ?missing.keys().collect::<Vec<_>>(), "seeding default settings");
        self.store.set(missing).await
    }

    async fn set_one(&self, key: &str, value: Value) -> CoreResult<()> {
        let mut values = Map::new();
        values.insert(key.to_string(), value);
        self.store.set(values).await
    }
}

fn required<T: DeserializeOwned>(values: &mut Map<String, Value>, key: &str) -> CoreResult<T> {
    let value = values
        .remove(key)
        .filter(|value| !value.is_null())
        .ok_or_else(|| CoreError::Config(format!("setting `{key}` is missing")))?;
    serde_json::from_value(value)
        .map_err(|error| CoreError::Config(format!("setting `{key}` is malformed: {error}")))
}
