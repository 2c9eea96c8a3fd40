// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use serde::{Deserialize, Serialize};

/// The target-specific widths needed to size memory accesses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineModel {
    /// The name of the architecture
    pub architecture: String,
    /// Width of a C `_Bool`, in bits
    pub bool_width: u64,
    /// Width of a `char`, in bits. Sizes in bytes are measured in chars.
    pub char_width: u64,
    pub int_width: u64,
    pub is_big_endian: bool,
    pub null_is_zero: bool,
    /// Width of a pointer (and of `size_t`), in bits
    pub pointer_width: u64,
}

impl MachineModel {
    pub fn bool_width(&self) -> u64 {
        self.bool_width
    }

    pub fn char_width(&self) -> u64 {
        self.char_width
    }

    pub fn int_width(&self) -> u64 {
        self.int_width
    }

    pub fn pointer_width(&self) -> u64 {
        self.pointer_width
    }
}

/// 64-bit little-endian x86.
impl Default for MachineModel {
    fn default() -> Self {
        MachineModel {
            architecture: "x86_64".to_string(),
            bool_width: 8,
            char_width: 8,
            int_width: 32,
            is_big_endian: false,
            null_is_zero: true,
            pointer_width: 64,
        }
    }
}
