//! Loaded / not-loaded tracking driven by media signals

/// Whether the media element has produced its first frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
}

impl LoadState {
    pub fn on_load_start(&mut self) {
        *self = LoadState::NotLoaded;
    }

    /// Idempotent
    pub fn on_load_complete(&mut self) {
        *self = LoadState::Loaded;
    }

    pub fn reset(&mut self) {
        *self = LoadState::NotLoaded;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_not_loaded() {
        assert!(!LoadState::default().is_loaded());
    }

    #[test]
    fn test_load_complete_twice_stays_loaded() {
        let mut state = LoadState::default();
        state.on_load_complete();
        state.on_load_complete();
        assert_eq!(state, LoadState::Loaded);
    }

    #[test]
    fn test_load_start_returns_to_not_loaded() {
        let mut state = LoadState::Loaded;
        state.on_load_start();
        assert!(!state.is_loaded());

        state.on_load_complete();
        state.reset();
        assert_eq!(state, LoadState::NotLoaded);
    }
}
