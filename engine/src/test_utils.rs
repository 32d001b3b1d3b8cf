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

//! Shared test doubles and fixtures
//!
//! Used by the unit tests in this crate and by the integration tests under
//! `tests/`. Not compiled out in release builds so the integration tests
//! can reach it; nothing here is exported for production use.

use crate::character::Character;
use crate::config::ProgressionConfig;
use crate::faction::StaticLadder;
use crate::skill::manager::SkillManager;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use uuid::Uuid;

/// Map-backed [`Character`] double. Attributes default to 0, flags to
/// false, exactly like the production contract.
pub struct TestCharacter {
    id: Uuid,
    name: String,
    attrs: HashMap<String, i64>,
    flags: HashMap<String, bool>,
    temps: HashMap<String, String>,
    faction: Option<String>,
    in_combat: bool,
    alive: bool,
    /// Messages captured from `send`, for assertions.
    pub sent: Mutex<Vec<String>>,
}

impl TestCharacter {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            attrs: HashMap::new(),
            flags: HashMap::new(),
            temps: HashMap::new(),
            faction: None,
            in_combat: false,
            alive: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_faction(&mut self, faction: Option<&str>) {
        self.faction = faction.map(str::to_string);
    }

    pub fn set_in_combat(&mut self, in_combat: bool) {
        self.in_combat = in_combat;
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Character for TestCharacter {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> i64 {
        self.attrs.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: i64) {
        self.attrs.insert(key.to_string(), value);
    }

    fn get_flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    fn get_temp(&self, key: &str) -> Option<String> {
        self.temps.get(key).cloned()
    }

    fn set_temp(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => {
                self.temps.insert(key.to_string(), value);
            }
            None => {
                self.temps.remove(key);
            }
        }
    }

    fn faction(&self) -> Option<String> {
        self.faction.clone()
    }

    fn in_combat(&self) -> bool {
        self.in_combat
    }

    fn alive(&self) -> bool {
        self.alive
    }

    fn send(&self, message: &str) {
        self.sent.lock().unwrap().push(message.to_string());
    }
}

/// A fresh Lingyun member with no contribution and no attributes set.
pub fn lingyun_member(name: &str) -> TestCharacter {
    let mut character = TestCharacter::new(name);
    character.set_faction(Some("lingyun"));
    character
}

/// A senior Lingyun member clearing every rank and attribute bar in the
/// shipped tree.
pub fn lingyun_elder(name: &str) -> TestCharacter {
    use crate::character::attrs;
    let mut character = lingyun_member(name);
    character.set(attrs::CONTRIBUTION, 5_000);
    character.set(attrs::PERCEPTION, 50);
    character.set(attrs::AGILITY, 50);
    character.set(attrs::STRENGTH, 50);
    character.set(attrs::CONSTITUTION, 50);
    character
}

/// Manager over the full bootstrapped content with default settings.
pub fn test_manager() -> SkillManager {
    test_manager_with_config(ProgressionConfig::default())
}

pub fn test_manager_with_config(config: ProgressionConfig) -> SkillManager {
    SkillManager::new(
        Uuid::new_v4(),
        Arc::new(crate::bootstrap_skills()),
        Arc::new(StaticLadder::with_defaults()),
        config,
    )
}
