//! Fresh variable allocation for rule firings

use crate::term::Var;
use std::sync::Arc;

/// Default base name for generated variables
pub const DEFAULT_VAR_BASE: &str = "_v";

/// Run-scoped source of fresh variables
///
/// Every call to [`VarAlloc::fresh`] yields a generated variable tagged
/// with `base` and the counter, then advances the counter, so no two
/// firings within one run share a variable. Generated variables never
/// collide with variables written in rule text.
#[derive(Debug, Clone)]
pub struct VarAlloc {
    base: Arc<str>,
    counter: u64,
}

impl VarAlloc {
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: Arc::from(base.as_ref()),
            counter: 0,
        }
    }

    pub fn fresh(&mut self) -> Var {
        let var = Var::fresh(Arc::clone(&self.base), self.counter);
        self.counter += 1;
        var
    }

    /// Number of variables handed out so far
    pub fn allocated(&self) -> u64 {
        self.counter
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for VarAlloc {
    fn default() -> Self {
        Self::new(DEFAULT_VAR_BASE)
    }
}
