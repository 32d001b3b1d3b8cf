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

//! Character collaborator interface
//!
//! The entity layer lives outside this crate; the engine only needs a
//! narrow view of a character: generic attribute read/write by key, boolean
//! quest/challenge flags, transient per-session storage, and an outbound
//! message primitive.

use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Well-known attribute keys consumed by the progression rules.
pub mod attrs {
    /// Lifetime combat experience, gates martial skill advancement.
    pub const COMBAT_EXP: &str = "combat_exp";
    /// Current internal energy.
    pub const ENERGY: &str = "energy";
    pub const MAX_ENERGY: &str = "max_energy";
    pub const HP: &str = "hp";
    pub const MAX_HP: &str = "max_hp";
    /// Capped pool of allowed advancement actions.
    pub const POTENTIAL: &str = "potential";
    /// Lifetime advancement actions spent against the potential pool.
    pub const LEARNED_POINTS: &str = "learned_points";
    pub const SILVER: &str = "silver";
    /// Contribution earned within the current faction.
    pub const CONTRIBUTION: &str = "contribution";
    pub const PERCEPTION: &str = "perception";
    pub const STRENGTH: &str = "strength";
    pub const CONSTITUTION: &str = "constitution";
    pub const AGILITY: &str = "agility";
}

/// Narrow interface the engine consumes from the entity layer.
///
/// Numeric attributes default to 0 when unset; flags default to false.
/// Implementations live with the session/entity code, with a map-backed
/// double in [`crate::test_utils`].
pub trait Character: Send {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;

    /// Read a numeric attribute, 0 when unset.
    fn get(&self, key: &str) -> i64;
    /// Write a numeric attribute.
    fn set(&mut self, key: &str, value: i64);

    /// Read a boolean flag (puzzle steps, challenges, crippled legacy).
    fn get_flag(&self, key: &str) -> bool;
    fn set_flag(&mut self, key: &str, value: bool);

    /// Transient per-session storage, cleared on logout.
    fn get_temp(&self, key: &str) -> Option<String>;
    fn set_temp(&mut self, key: &str, value: Option<String>);

    /// Current faction id, if any.
    fn faction(&self) -> Option<String>;

    fn in_combat(&self) -> bool;

    /// False once the character has died or despawned. Scheduled ticks
    /// check this and stop instead of firing against a stale handle.
    fn alive(&self) -> bool;

    /// Outbound message primitive.
    fn send(&self, message: &str);
}

/// Shared handle used by scheduled tasks that outlive a single call.
pub type SharedCharacter = Arc<Mutex<dyn Character>>;

/// Adjust a numeric attribute by a delta, flooring at zero.
pub fn drain(character: &mut dyn Character, key: &str, amount: i64) {
    let current = character.get(key);
    character.set(key, (current - amount).max(0));
}

/// Add to a numeric attribute, clamping to a companion maximum key.
pub fn restore(character: &mut dyn Character, key: &str, max_key: &str, amount: i64) {
    let cap = character.get(max_key);
    let next = (character.get(key) + amount).min(cap);
    character.set(key, next);
}
