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

//! Wulin Common Types
//!
//! This crate defines shared types used across the Wulin MUD:
//! - Skill taxonomy primitives (slots, categories, bonus summaries)
//! - Outbound payload contracts consumed by the transport/UI layer
//! - Persistent row types for the skill ledger

pub mod payload;
pub mod record;
pub mod skill;

pub use payload::{ExertResult, LearnResult, MapResult, SkillPanel, SkillPanelEntry};
pub use record::SkillRecord;
pub use skill::{BonusSummary, SkillCategory, SlotType};
