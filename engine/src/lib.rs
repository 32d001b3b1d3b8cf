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

//! Wulin Progression Engine
//!
//! This crate is the rules engine behind character advancement in the Wulin
//! MUD: how a character learns, maps, advances, and loses skills, and how
//! eligibility for faction arts is decided from rank, attributes,
//! prerequisite skills, narrative puzzle steps, and one-off challenge flags.
//!
//! The major pieces:
//! - [`skill::definition`] — immutable skill descriptors and their rules
//! - [`skill::registry`] — process-wide id → definition lookup
//! - [`skill::unlock`] — the ordered unlock evaluator and its reason codes
//! - [`skill::manager`] — the mutable per-character skill ledger
//! - [`exert`] — consumable abilities usable while a force is active
//! - [`scheduler`] — cancellable tick tasks for sustained effects
//! - [`persistence`] — the `SkillService` save/load boundary
//!
//! The transport layer, command parser, room graph, and damage resolution
//! are external collaborators reached through the narrow traits in
//! [`character`] and [`faction`].

pub mod character;
pub mod config;
pub mod content;
pub mod exert;
pub mod faction;
pub mod persistence;
pub mod scheduler;
pub mod skill;
pub mod test_utils;

pub use character::{Character, SharedCharacter};
pub use config::{Configuration, ProgressionConfig};
pub use faction::{RankLadder, StaticLadder};
pub use persistence::{MemorySkillStore, PgSkillStore, SkillService, StoreError};
pub use scheduler::{Scheduler, TickControl};
pub use skill::definition::{SkillDefinition, UnlockRules};
pub use skill::manager::SkillManager;
pub use skill::registry::SkillRegistry;
pub use skill::unlock::{UnlockEvaluator, UnlockReason, UnlockResult, UnlockState};

use exert::ExertRegistry;

/// Build the process-wide skill registry.
///
/// Registration order is explicit and deterministic: shared basics first,
/// then each faction's tree. Collisions overwrite last-write-wins and are
/// logged by the registry itself.
pub fn bootstrap_skills() -> SkillRegistry {
    let mut registry = SkillRegistry::new();
    content::common::register(&mut registry);
    content::lingyun::register(&mut registry);
    registry
}

/// Build the process-wide exert effect registry.
pub fn bootstrap_exerts() -> ExertRegistry {
    let mut registry = ExertRegistry::new();
    exert::universal::register(&mut registry);
    exert::special::register(&mut registry);
    registry
}
