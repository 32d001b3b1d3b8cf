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

//! Outbound payload contracts consumed by the transport/UI layer
//!
//! Field names are part of the wire contract; everything serializes in
//! camelCase and the payload shapes here must stay in lockstep with the
//! client panel code.

use crate::skill::{BonusSummary, SkillCategory, SlotType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the skill list/panel payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPanelEntry {
    pub skill_id: String,
    pub skill_name: String,
    pub skill_type: SlotType,
    pub category: SkillCategory,
    pub level: i32,
    pub learned: i32,
    /// Experience required for the next level, `(level + 1)^2`.
    pub learned_max: i32,
    pub is_mapped: bool,
    pub mapped_slot: Option<SlotType>,
    pub is_active_force: bool,
    pub is_locked: bool,
}

/// Full skill panel: every ledger entry plus the slot map, the active
/// force, and the aggregated bonus summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPanel {
    pub skills: Vec<SkillPanelEntry>,
    pub slot_map: HashMap<SlotType, String>,
    pub active_force: Option<String>,
    pub summary: BonusSummary,
}

/// Result of a slot map/unmap operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResult {
    pub success: bool,
    pub slot_type: SlotType,
    pub skill_id: Option<String>,
    pub skill_name: Option<String>,
    pub message: String,
    pub updated_map: HashMap<SlotType, String>,
}

/// Result of a learn/practice/research batch.
///
/// `reason` is drawn from a closed set of stable codes; the client keys
/// its messaging off them. See `UnlockReason` in the engine crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnResult {
    pub success: bool,
    pub skill_id: String,
    pub skill_name: String,
    pub times_completed: u32,
    pub times_requested: u32,
    pub current_level: i32,
    pub learned: i32,
    pub learned_max: i32,
    pub level_up: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of an exert effect invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExertResult {
    pub success: bool,
    pub message: String,
    pub resource_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buff_applied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buff_removed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healing_started: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healing_stopped: Option<bool>,
}

impl ExertResult {
    /// Failure outcome carrying only a user-facing message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }
}
