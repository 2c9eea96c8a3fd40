// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Middle-end passes over GOTO programs and SSA equations.
//!
//! * [dereference] replaces pointer accesses in a GOTO program by accesses to the objects they
//!   may point to, and instruments the program with the memory-safety assertions that justify
//!   the replacement.
//! * [slice] marks the steps of an SSA equation that no assertion depends on, so that they are
//!   left out of the formula handed to the solver.
//!
//! Both passes are configured through [PassOptions]. They log through `tracing`; the embedding
//! tool installs the subscriber, conventionally filtered by the `GOTO_PASSES_LOG` environment
//! variable.

pub mod dereference;
pub mod error;
pub mod guard;
pub mod options;
pub mod simplify;
pub mod slice;
pub mod value_set;

#[cfg(test)]
mod test_util;

pub use error::{MalformedIr, Result};
pub use options::PassOptions;

/// Environment variable conventionally used to filter the logs of these passes.
pub const LOG_ENV_VAR: &str = "GOTO_PASSES_LOG";
