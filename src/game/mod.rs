// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

#[cfg(feature = "random")]
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Color;

/// Opaque identifier a host can use to tell game sessions apart.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameId(u64);

impl GameId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
    #[cfg(feature = "random")]
    pub fn random() -> Self {
        Self(thread_rng().gen())
    }
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// The winner, by checkmate.
    Win(Color),
    Draw(DrawReason),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    StaleMate,
    /// Only the two kings are left.
    Insufficient,
}
