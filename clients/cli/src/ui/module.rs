//! Per-module refresh bookkeeping shared by the list screens.

/// Counts successful mutations. Each bump asks the module to refetch its
/// metrics and list; responses tagged with an older trigger are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleState {
    refresh_trigger: u64,
}

impl ModuleState {
    pub fn refresh_trigger(&self) -> u64 {
        self.refresh_trigger
    }

    pub fn bump(&mut self) -> u64 {
        self.refresh_trigger = self.refresh_trigger.wrapping_add(1);
        self.refresh_trigger
    }

    pub fn is_current(&self, trigger: u64) -> bool {
        trigger == self.refresh_trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_invalidates_older_triggers() {
        let mut state = ModuleState::default();
        let first = state.refresh_trigger();
        assert!(state.is_current(first));
        let second = state.bump();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }
}
