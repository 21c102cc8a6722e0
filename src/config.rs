// config.rs - configuration of internalizer
//
// cardgen - Internalize cardinality, pseudo-boolean and parity constraints
// Copyright (C) 2022  Mateusz Szpakowski
//
// This library is free software; you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public
// License as published by the Free Software Foundation; either
// version 2.1 of the License, or (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this library; if not, write to the Free Software
// Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA  02110-1301  USA

/// Configuration of internalizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// If true then atom that is whole asserted formula can be registered without
    /// reifying variable (only if no user scope is open).
    pub root_assert: bool,
    /// If true then registered constraints and clauses are redundant (removable).
    pub redundant: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root_assert: true,
            redundant: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_assert(mut self, root_assert: bool) -> Self {
        self.root_assert = root_assert;
        self
    }

    pub fn with_redundant(mut self, redundant: bool) -> Self {
        self.redundant = redundant;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config() {
        assert_eq!(
            Config {
                root_assert: true,
                redundant: false
            },
            Config::new()
        );
        assert_eq!(
            Config {
                root_assert: false,
                redundant: true
            },
            Config::new().with_root_assert(false).with_redundant(true)
        );
    }
}
