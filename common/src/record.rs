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

//! Persistent row types for the skill ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted ledger row.
/// Maps to: `wulin.entity_skills` table (one row per learned skill)
///
/// Slot and type columns are stored as their lowercase string forms so the
/// table stays readable; the engine converts back through `SlotType::from_str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SkillRecord {
    pub id: Uuid,
    pub character_id: Uuid,
    pub skill_id: String,
    pub skill_type: String,
    pub level: i32,
    pub learned: i32,
    pub is_mapped: bool,
    pub mapped_slot: Option<String>,
    pub is_active_force: bool,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}

impl SkillRecord {
    /// Fresh row for a newly learned skill at level 0.
    pub fn new(character_id: Uuid, skill_id: impl Into<String>, skill_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            character_id,
            skill_id: skill_id.into(),
            skill_type: skill_type.into(),
            level: 0,
            learned: 0,
            is_mapped: false,
            mapped_slot: None,
            is_active_force: false,
            is_locked: false,
            created_at: Utc::now(),
        }
    }
}
