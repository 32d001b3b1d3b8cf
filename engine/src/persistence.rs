//
// Copyright 2025-2026 The Wulin Project Developers. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Skill persistence boundary
//!
//! The engine talks to storage only through [`SkillService`]: load at
//! character-enter, checkpoint at exit. [`PgSkillStore`] is the production
//! implementation over `wulin.entity_skills`; [`MemorySkillStore`] backs
//! tests and offline tools.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use wulin_common::SkillRecord;

/// Storage-layer failure. The manager logs and swallows these at save
/// checkpoints; load failures are surfaced to the session layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store rejected write: {0}")]
    Rejected(String),
}

/// CRUD boundary for one character's skill rows.
#[async_trait]
pub trait SkillService: Send + Sync {
    /// Every skill row belonging to `character_id`.
    async fn find_by_character(&self, character_id: Uuid) -> Result<Vec<SkillRecord>, StoreError>;

    /// Insert a new row.
    async fn create(&self, record: &SkillRecord) -> Result<(), StoreError>;

    /// Update an existing row by id.
    async fn update(&self, record: &SkillRecord) -> Result<(), StoreError>;

    /// Delete a row by id. Deleting a missing row is not an error.
    async fn delete(&self, record_id: Uuid) -> Result<(), StoreError>;

    /// Update a batch of rows atomically. One remap touches several rows;
    /// either all of them land or none do.
    async fn update_many(&self, records: &[SkillRecord]) -> Result<(), StoreError>;
}

/// Postgres-backed store over `wulin.entity_skills`.
pub struct PgSkillStore {
    pool: PgPool,
}

impl PgSkillStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillService for PgSkillStore {
    async fn find_by_character(&self, character_id: Uuid) -> Result<Vec<SkillRecord>, StoreError> {
        let records = sqlx::query_as::<_, SkillRecord>(
            "SELECT id, character_id, skill_id, skill_type, level, learned,
                    is_mapped, mapped_slot, is_active_force, is_locked, created_at
             FROM wulin.entity_skills
             WHERE character_id = $1",
        )
        .bind(character_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn create(&self, record: &SkillRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO wulin.entity_skills
             (id, character_id, skill_id, skill_type, level, learned,
              is_mapped, mapped_slot, is_active_force, is_locked, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(record.id)
        .bind(record.character_id)
        .bind(&record.skill_id)
        .bind(&record.skill_type)
        .bind(record.level)
        .bind(record.learned)
        .bind(record.is_mapped)
        .bind(&record.mapped_slot)
        .bind(record.is_active_force)
        .bind(record.is_locked)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, record: &SkillRecord) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE wulin.entity_skills
             SET level = $2, learned = $3, is_mapped = $4, mapped_slot = $5,
                 is_active_force = $6, is_locked = $7
             WHERE id = $1",
        )
        .bind(record.id)
        .bind(record.level)
        .bind(record.learned)
        .bind(record.is_mapped)
        .bind(&record.mapped_slot)
        .bind(record.is_active_force)
        .bind(record.is_locked)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, record_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM wulin.entity_skills WHERE id = $1")
            .bind(record_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_many(&self, records: &[SkillRecord]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(
                "UPDATE wulin.entity_skills
                 SET level = $2, learned = $3, is_mapped = $4, mapped_slot = $5,
                     is_active_force = $6, is_locked = $7
                 WHERE id = $1",
            )
            .bind(record.id)
            .bind(record.level)
            .bind(record.learned)
            .bind(record.is_mapped)
            .bind(&record.mapped_slot)
            .bind(record.is_active_force)
            .bind(record.is_locked)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

/// In-memory store keyed by row id. Tests can flip `fail_writes` to
/// exercise the save-and-swallow path in the manager.
#[derive(Default)]
pub struct MemorySkillStore {
    rows: RwLock<HashMap<Uuid, SkillRecord>>,
    fail_writes: RwLock<bool>,
}

impl MemorySkillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail.
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn check_writable(&self) -> Result<(), StoreError> {
        if *self.fail_writes.read().await {
            return Err(StoreError::Rejected("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SkillService for MemorySkillStore {
    async fn find_by_character(&self, character_id: Uuid) -> Result<Vec<SkillRecord>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|record| record.character_id == character_id)
            .cloned()
            .collect())
    }

    async fn create(&self, record: &SkillRecord) -> Result<(), StoreError> {
        self.check_writable().await?;
        self.rows.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &SkillRecord) -> Result<(), StoreError> {
        self.check_writable().await?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::Rejected(format!(
                "no row with id {}",
                record.id
            ))),
        }
    }

    async fn delete(&self, record_id: Uuid) -> Result<(), StoreError> {
        self.check_writable().await?;
        self.rows.write().await.remove(&record_id);
        Ok(())
    }

    async fn update_many(&self, records: &[SkillRecord]) -> Result<(), StoreError> {
        self.check_writable().await?;
        let mut rows = self.rows.write().await;
        // All-or-nothing, matching the transactional contract.
        for record in records {
            if !rows.contains_key(&record.id) {
                return Err(StoreError::Rejected(format!(
                    "no row with id {}",
                    record.id
                )));
            }
        }
        for record in records {
            rows.insert(record.id, record.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(character_id: Uuid, skill_id: &str) -> SkillRecord {
        SkillRecord::new(character_id, skill_id, "sword")
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySkillStore::new();
        let character = Uuid::new_v4();
        let mut row = record(character, "jiben-jianfa");
        store.create(&row).await.unwrap();

        row.level = 7;
        store.update(&row).await.unwrap();

        let found = store.find_by_character(character).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].level, 7);

        store.delete(row.id).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_store_scopes_by_character() {
        let store = MemorySkillStore::new();
        let one = Uuid::new_v4();
        let two = Uuid::new_v4();
        store.create(&record(one, "jiben-jianfa")).await.unwrap();
        store.create(&record(two, "jiben-qinggong")).await.unwrap();

        assert_eq!(store.find_by_character(one).await.unwrap().len(), 1);
        assert_eq!(store.find_by_character(two).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_many_is_all_or_nothing() {
        let store = MemorySkillStore::new();
        let character = Uuid::new_v4();
        let mut known = record(character, "jiben-jianfa");
        store.create(&known).await.unwrap();

        known.level = 3;
        let unknown = record(character, "jiben-qinggong");
        let result = store.update_many(&[known.clone(), unknown]).await;
        assert!(result.is_err());

        // The known row must be untouched.
        let found = store.find_by_character(character).await.unwrap();
        assert_eq!(found[0].level, 0);
    }

    #[test]
    fn test_fail_writes_toggle() {
        tokio_test::block_on(async {
            let store = MemorySkillStore::new();
            let character = Uuid::new_v4();
            store.set_fail_writes(true).await;
            assert!(store.create(&record(character, "jiben-jianfa")).await.is_err());
            store.set_fail_writes(false).await;
            assert!(store.create(&record(character, "jiben-jianfa")).await.is_ok());
        });
    }
}
