//! Motion state - latest tilt plus the live parameter store

use super::tilt::TiltSample;
use super::transform::{derive, DerivedVisualState};
use crate::params::ParameterStore;

/// Owns everything the renderer reads.
///
/// Lives on the UI thread. The sensor never touches it directly; the app
/// polls the sensor once per frame and hands the newest sample to
/// [`MotionState::set_tilt`].
pub struct MotionState {
    tilt: TiltSample,
    store: ParameterStore,
}

impl MotionState {
    /// Start level, with the given parameter store
    pub fn new(store: ParameterStore) -> Self {
        Self {
            tilt: TiltSample::LEVEL,
            store,
        }
    }

    pub fn tilt(&self) -> TiltSample {
        self.tilt
    }

    pub fn set_tilt(&mut self, tilt: TiltSample) {
        self.tilt = tilt;
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    /// Derived visual state for the current tilt and parameters.
    ///
    /// Recomputed on every call; nothing is cached.
    pub fn derived(&self) -> DerivedVisualState {
        derive(self.tilt, self.store.params())
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new(ParameterStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParamEdit, ParamId};

    #[test]
    fn test_starts_level() {
        let state = MotionState::default();
        assert_eq!(state.tilt(), TiltSample::LEVEL);
        assert_eq!(state.derived().shadow_offset, (0.0, 0.0));
    }

    #[test]
    fn test_derived_tracks_edits_immediately() {
        let mut state = MotionState::default();
        state.set_tilt(TiltSample::new(0.5, 0.0));
        let before = state.derived();

        state
            .store_mut()
            .apply(ParamEdit::number(ParamId::RotationIntensity, 40.0))
            .unwrap();
        let after = state.derived();

        assert!((before.y_rotation_degrees - 10.0).abs() < 1e-6);
        assert!((after.y_rotation_degrees - 20.0).abs() < 1e-6);
    }
}
