//! Parameter store - the single writer of [`VisualParameters`]
//!
//! Edits come in as [`ParamEdit`]s from the panel or MIDI, are clamped to
//! the parameter's declared range, and then every registered listener is
//! told what changed. The store lives on the UI thread; listeners do not
//! need to be `Send`.

use thiserror::Error;

use super::visual::{ParamId, ParamValue, VisualParameters};

/// Why an edit was rejected.
///
/// Out-of-range numbers are never an error: they are clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{param} expects a {expected} value, got {got}")]
    TypeMismatch {
        param: ParamId,
        expected: &'static str,
        got: &'static str,
    },

    #[error("{param} rejected a non-finite value")]
    NotFinite { param: ParamId },
}

/// A requested change to one parameter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamEdit {
    pub id: ParamId,
    pub value: ParamValue,
}

impl ParamEdit {
    pub fn new(id: ParamId, value: ParamValue) -> Self {
        Self { id, value }
    }

    pub fn number(id: ParamId, value: f32) -> Self {
        Self::new(id, ParamValue::Number(value))
    }

    pub fn toggle(id: ParamId, value: bool) -> Self {
        Self::new(id, ParamValue::Toggle(value))
    }
}

/// Notification handed to listeners after a parameter actually changed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamChange {
    pub id: ParamId,
    pub old: ParamValue,
    pub new: ParamValue,
}

/// Handle returned by [`ParameterStore::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ParamChange)>;

/// Validate and clamp a value for `id`
pub fn sanitize(id: ParamId, value: ParamValue) -> Result<ParamValue, ParamError> {
    if id.kind() != value.kind() {
        return Err(ParamError::TypeMismatch {
            param: id,
            expected: id.kind().name(),
            got: value.kind().name(),
        });
    }

    match value {
        ParamValue::Number(v) => {
            if !v.is_finite() {
                return Err(ParamError::NotFinite { param: id });
            }
            let clamped = match id.range() {
                Some((min, max)) => v.clamp(min, max),
                None => v,
            };
            Ok(ParamValue::Number(clamped))
        }
        ParamValue::Color(c) => {
            if !c.is_finite() {
                return Err(ParamError::NotFinite { param: id });
            }
            Ok(ParamValue::Color(c.clamped()))
        }
        ParamValue::Toggle(_) => Ok(value),
    }
}

/// Observable container for the live parameter set
pub struct ParameterStore {
    params: VisualParameters,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    /// Create a store holding the documented defaults
    pub fn new() -> Self {
        Self::with_params(VisualParameters::default())
    }

    /// Create a store from an arbitrary parameter set.
    ///
    /// Every field is pushed through the same clamping as a live edit, so the
    /// range invariant holds from the start.
    pub fn with_params(params: VisualParameters) -> Self {
        let mut store = Self {
            params: VisualParameters::default(),
            listeners: Vec::new(),
            next_listener: 0,
        };
        for &id in ParamId::ALL {
            match sanitize(id, params.get(id)) {
                Ok(value) => store.params.put(id, value),
                Err(e) => log::warn!("Keeping default for {}: {}", id, e),
            }
        }
        store
    }

    pub fn params(&self) -> &VisualParameters {
        &self.params
    }

    pub fn get(&self, id: ParamId) -> ParamValue {
        self.params.get(id)
    }

    /// Register a listener called after every effective change
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ParamChange) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Set one parameter.
    ///
    /// Returns `Ok(true)` if the stored value changed (listeners were
    /// notified), `Ok(false)` if the clamped value equals the current one.
    pub fn set(&mut self, id: ParamId, value: ParamValue) -> Result<bool, ParamError> {
        let new = sanitize(id, value)?;
        let old = self.params.get(id);
        if old == new {
            return Ok(false);
        }

        self.params.put(id, new);
        log::debug!("{}: {} -> {}", id, old, new);

        let change = ParamChange { id, old, new };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
        Ok(true)
    }

    pub fn apply(&mut self, edit: ParamEdit) -> Result<bool, ParamError> {
        self.set(edit.id, edit.value)
    }

    /// Apply a batch of edits in order, logging rejected ones.
    ///
    /// Returns how many edits changed the store.
    pub fn apply_all<I>(&mut self, edits: I) -> usize
    where
        I: IntoIterator<Item = ParamEdit>,
    {
        let mut changed = 0;
        for edit in edits {
            match self.apply(edit) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(e) => log::warn!("Rejected edit: {}", e),
            }
        }
        changed
    }

    /// Restore every parameter in `ids` to its default
    pub fn reset<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ParamId>,
    {
        let defaults = VisualParameters::default();
        self.apply_all(
            ids.into_iter()
                .map(|id| ParamEdit::new(id, defaults.get(id))),
        )
    }

    pub fn reset_all(&mut self) -> usize {
        self.reset(ParamId::ALL.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::visual::{ParamGroup, ParamKind, Rgba};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_round_trip_in_range() {
        let mut store = ParameterStore::new();
        for &id in ParamId::ALL {
            let value = match id.kind() {
                ParamKind::Number => {
                    let (min, max) = id.range().unwrap();
                    ParamValue::Number(min + (max - min) * 0.37)
                }
                ParamKind::Toggle => match store.get(id) {
                    ParamValue::Toggle(b) => ParamValue::Toggle(!b),
                    _ => unreachable!(),
                },
                ParamKind::Color => ParamValue::Color(Rgba::new(0.1, 0.2, 0.3, 0.4)),
            };
            assert_eq!(store.set(id, value), Ok(true), "{}", id);
            assert_eq!(store.get(id), value, "{}", id);
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let mut store = ParameterStore::new();
        store.set(ParamId::RotationIntensity, ParamValue::Number(90.0)).unwrap();
        assert_eq!(store.params().rotation_intensity, 40.0);

        store.set(ParamId::MotionResponsiveness, ParamValue::Number(-3.0)).unwrap();
        assert_eq!(store.params().motion_responsiveness, 0.0);

        store.set(ParamId::AmbientShadowBlur, ParamValue::Number(25.0)).unwrap();
        assert_eq!(store.params().ambient_shadow_blur, 20.0);

        store.set(ParamId::SpecularBlur, ParamValue::Number(25.0)).unwrap();
        assert_eq!(store.params().specular_blur, 10.0);

        store
            .set(ParamId::PrimaryColor, ParamValue::Color(Rgba::new(2.0, 0.5, -1.0, 1.0)))
            .unwrap();
        assert_eq!(store.params().primary_color, Rgba::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn test_rejects_wrong_kind_and_nan() {
        let mut store = ParameterStore::new();
        let before = store.params().clone();

        let err = store.set(ParamId::EnableShapeMotion, ParamValue::Number(1.0));
        assert!(matches!(err, Err(ParamError::TypeMismatch { .. })));

        let err = store.set(ParamId::RotationIntensity, ParamValue::Number(f32::NAN));
        assert_eq!(err, Err(ParamError::NotFinite { param: ParamId::RotationIntensity }));

        assert_eq!(store.params(), &before);
    }

    #[test]
    fn test_listeners_notified_on_change_only() {
        let mut store = ParameterStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |change| sink.borrow_mut().push(*change));

        store.set(ParamId::RotationIntensity, ParamValue::Number(30.0)).unwrap();
        // Same value again: no notification
        assert_eq!(store.set(ParamId::RotationIntensity, ParamValue::Number(30.0)), Ok(false));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, ParamId::RotationIntensity);
        assert_eq!(seen[0].old, ParamValue::Number(20.0));
        assert_eq!(seen[0].new, ParamValue::Number(30.0));
    }

    #[test]
    fn test_read_back_is_exact() {
        let mut store = ParameterStore::new();
        store.set(ParamId::MotionResponsiveness, ParamValue::Number(0.12345)).unwrap();
        let read = store.get(ParamId::MotionResponsiveness);
        assert_eq!(read, ParamValue::Number(0.12345));
        assert_eq!(read.exact(), "0.12345");
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = ParameterStore::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let id = store.subscribe(move |_| *c.borrow_mut() += 1);

        store.apply(ParamEdit::toggle(ParamId::ShowDebugOverlay, false)).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.apply(ParamEdit::toggle(ParamId::ShowDebugOverlay, true)).unwrap();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_apply_all_counts_and_skips_errors() {
        let mut store = ParameterStore::new();
        let changed = store.apply_all(vec![
            ParamEdit::number(ParamId::RotationIntensity, 10.0),
            ParamEdit::number(ParamId::RotationIntensity, 10.0),
            ParamEdit::toggle(ParamId::RotationIntensity, true),
            ParamEdit::number(ParamId::SpecularBlur, 3.0),
        ]);
        assert_eq!(changed, 2);
        assert_eq!(store.params().specular_blur, 3.0);
    }

    #[test]
    fn test_reset_group() {
        let mut store = ParameterStore::new();
        store.apply(ParamEdit::number(ParamId::RotationIntensity, 5.0)).unwrap();
        store.apply(ParamEdit::number(ParamId::SpecularBlur, 7.0)).unwrap();

        store.reset(ParamGroup::Motion.params());
        assert_eq!(store.params().rotation_intensity, 20.0);
        assert_eq!(store.params().specular_blur, 7.0);

        assert_eq!(store.reset_all(), 1);
        assert_eq!(store.params(), &VisualParameters::default());
    }

    #[test]
    fn test_with_params_clamps() {
        let params = VisualParameters {
            rotation_intensity: 100.0,
            overlay_border_opacity: f32::NAN,
            ..VisualParameters::default()
        };
        let store = ParameterStore::with_params(params);
        assert_eq!(store.params().rotation_intensity, 40.0);
        assert_eq!(store.params().overlay_border_opacity, 0.5);
    }
}
