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

//! Skill content
//!
//! Every skill in the game is declared here and registered through the
//! explicit `register` entry points called from [`crate::bootstrap_skills`].
//! There is no registration side effect at module load; a registry contains
//! exactly what bootstrap put in it, in the order it was put in.

pub mod common;
pub mod lingyun;
