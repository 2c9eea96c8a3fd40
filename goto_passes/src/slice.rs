// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Slicing of the SSA equation.
//!
//! A slicer marks the steps that cannot influence any assertion as ignored, so that they are
//! not encoded into the formula. Steps are never removed or reordered.

use crate::options::PassOptions;
use fxhash::FxHashSet;
use goto_ir::InternedString;
use goto_ir::goto_program::Expr;
use goto_ir::ssa::{SsaStep, SsaStepKind, ssa_base_name};
use std::time::Instant;
use tracing::{debug, info};

/// An algorithm that runs over the steps of an SSA equation.
pub trait SsaStepAlgorithm {
    /// Run over `steps`. Returns whether any step was newly marked as ignored.
    fn run(&mut self, steps: &mut [SsaStep]) -> bool;

    /// How many steps this algorithm has marked as ignored so far, over all runs.
    fn ignored(&self) -> u64;

    /// Dispatch `step` to the hook for its kind.
    fn run_on_step(&mut self, step: &mut SsaStep) {
        match step.kind {
            SsaStepKind::Assignment { .. } => self.run_on_assignment(step),
            SsaStepKind::Assume { .. } => self.run_on_assume(step),
            SsaStepKind::Assert { .. } => self.run_on_assert(step),
            SsaStepKind::Renumber { .. } => self.run_on_renumber(step),
            SsaStepKind::Output { .. } | SsaStepKind::Skip => {}
        }
    }

    fn run_on_assignment(&mut self, _step: &mut SsaStep) {}

    fn run_on_assume(&mut self, _step: &mut SsaStep) {}

    fn run_on_assert(&mut self, _step: &mut SsaStep) {}

    fn run_on_renumber(&mut self, _step: &mut SsaStep) {}
}

/// Ignores every step after the last assertion.
#[derive(Debug, Default)]
pub struct SimpleSlice {
    ignored: u64,
}

impl SimpleSlice {
    pub fn new() -> Self {
        SimpleSlice::default()
    }
}

impl SsaStepAlgorithm for SimpleSlice {
    fn run(&mut self, steps: &mut [SsaStep]) -> bool {
        let Some(last_assert) = steps.iter().rposition(SsaStep::is_assert) else {
            return false;
        };
        let mut removed = 0;
        for step in steps[last_assert + 1..].iter_mut().filter(|s| !s.ignored) {
            step.ignored = true;
            removed += 1;
        }
        self.ignored += removed;
        debug!(removed, "simple slice");
        removed > 0
    }

    fn ignored(&self) -> u64 {
        self.ignored
    }
}

/// Backward dependency slicing.
///
/// Walking the equation from the end, the slicer keeps the set of SSA symbols the assertions
/// seen so far depend on. An assignment whose left-hand side is not in that set cannot
/// influence any of those assertions and is ignored; a kept assignment adds the symbols of its
/// guard and right-hand side to the set.
///
/// Assumptions constrain every path, so they are only sliced when `slice_assumes` is set.
#[derive(Debug, Default)]
pub struct SymexSlice {
    slice_assumes: bool,
    no_slice_names: FxHashSet<String>,
    no_slice_ids: FxHashSet<String>,
    depends: FxHashSet<InternedString>,
    ignored: u64,
    removed: u64,
}

impl SymexSlice {
    pub fn new(options: &PassOptions) -> Self {
        SymexSlice {
            slice_assumes: options.slice_assumes,
            no_slice_names: options.no_slice_names.iter().cloned().collect(),
            no_slice_ids: options.no_slice_ids.iter().cloned().collect(),
            ..Default::default()
        }
    }

    /// The symbols the assertions depend on, as of the end of the last run.
    pub fn depends(&self) -> &FxHashSet<InternedString> {
        &self.depends
    }

    fn add_symbols(&mut self, expr: &Expr) {
        expr.for_each_symbol(&mut |id| {
            self.depends.insert(id);
        });
    }

    /// Whether a step defining or reading `identifier` is kept regardless of dependencies:
    /// the full SSA identifier is in `no_slice_ids`, or its base name is in `no_slice_names`.
    fn is_exempt(&self, identifier: InternedString) -> bool {
        identifier.map(|id| {
            self.no_slice_ids.contains(id) || self.no_slice_names.contains(ssa_base_name(id))
        })
    }

    fn mark_ignored(&mut self, step: &mut SsaStep) {
        step.ignored = true;
        self.removed += 1;
    }

    /// Keep an assignment or renumbering only if the symbol it defines is needed.
    fn slice_definition(&mut self, step: &mut SsaStep) {
        let needed = match step.defined_symbol() {
            Some(lhs) => self.depends.contains(&lhs) || self.is_exempt(lhs),
            None => true,
        };
        if !needed {
            self.mark_ignored(step);
            return;
        }
        self.add_symbols(&step.guard);
        if let SsaStepKind::Assignment { rhs, .. } = &step.kind {
            self.add_symbols(rhs);
        }
    }
}

impl SsaStepAlgorithm for SymexSlice {
    fn run(&mut self, steps: &mut [SsaStep]) -> bool {
        let start = Instant::now();
        self.depends.clear();
        self.removed = 0;
        for step in steps.iter_mut().rev().filter(|s| !s.ignored) {
            self.run_on_step(step);
        }
        self.ignored += self.removed;
        info!(
            "Slicing time: {:.3}s (removed {} assignments)",
            start.elapsed().as_secs_f64(),
            self.removed
        );
        self.removed > 0
    }

    fn ignored(&self) -> u64 {
        self.ignored
    }

    fn run_on_assert(&mut self, step: &mut SsaStep) {
        self.add_symbols(&step.guard);
        if let SsaStepKind::Assert { cond, .. } = &step.kind {
            self.add_symbols(cond);
        }
    }

    fn run_on_assume(&mut self, step: &mut SsaStep) {
        let SsaStepKind::Assume { cond } = &step.kind else {
            return;
        };
        let symbols = cond.symbols();
        if self.slice_assumes
            && !symbols.iter().any(|s| self.depends.contains(s) || self.is_exempt(*s))
        {
            self.mark_ignored(step);
            return;
        }
        self.add_symbols(&step.guard);
        self.depends.extend(symbols);
    }

    fn run_on_assignment(&mut self, step: &mut SsaStep) {
        self.slice_definition(step);
    }

    fn run_on_renumber(&mut self, step: &mut SsaStep) {
        self.slice_definition(step);
    }
}

/// The slicer selected by `options`.
pub fn slicer_for(options: &PassOptions) -> Box<dyn SsaStepAlgorithm> {
    if options.no_slice {
        Box::new(SimpleSlice::new())
    } else {
        Box::new(SymexSlice::new(options))
    }
}
