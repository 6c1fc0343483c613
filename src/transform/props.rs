//! Configuration accepted by the view transformer, and the forwarding filter
//!
//! The set of keys passed through from [`MediaProps`] is an explicit list
//! owned here. Bump [`FORWARDED_PROPS_VERSION`] whenever it changes.

use super::TransformState;
use crate::components::MediaProps;
use std::fmt;
use std::rc::Rc;

/// Called with the tap position in view pixels
pub type TapCallback = Rc<dyn Fn((f32, f32))>;

/// Called with the transform after a change or a finished gesture
pub type TransformCallback = Rc<dyn Fn(&TransformState)>;

/// Keys the view transformer accepts from its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKey {
    EnableTransform,
    EnableScale,
    EnableTranslate,
    EnableResistance,
    MaxScale,
    MaxOverScrollDistance,
    OnSingleTapConfirmed,
    OnTransformGestureReleased,
    OnViewTransformed,
}

pub const FORWARDED_PROPS_VERSION: u32 = 1;

pub const FORWARDED_PROPS: &[PropKey] = &[
    PropKey::EnableTransform,
    PropKey::EnableScale,
    PropKey::EnableTranslate,
    PropKey::EnableResistance,
    PropKey::MaxScale,
    PropKey::MaxOverScrollDistance,
    PropKey::OnSingleTapConfirmed,
    PropKey::OnTransformGestureReleased,
    PropKey::OnViewTransformed,
];

/// View transformer configuration; `None` means "use the default"
#[derive(Clone, Default)]
pub struct TransformerProps {
    pub enable_transform: Option<bool>,
    pub enable_scale: Option<bool>,
    pub enable_translate: Option<bool>,
    pub enable_resistance: Option<bool>,
    pub max_scale: Option<f32>,
    pub content_aspect_ratio: Option<f32>,
    pub max_overscroll_distance: Option<f32>,
    pub on_single_tap_confirmed: Option<TapCallback>,
    pub on_transform_gesture_released: Option<TransformCallback>,
    pub on_view_transformed: Option<TransformCallback>,
}

impl TransformerProps {
    /// Replace every field that is set in `other`
    pub fn overlay(&mut self, other: TransformerProps) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            enable_transform,
            enable_scale,
            enable_translate,
            enable_resistance,
            max_scale,
            content_aspect_ratio,
            max_overscroll_distance,
            on_single_tap_confirmed,
            on_transform_gesture_released,
            on_view_transformed
        );
    }

    /// Keys that carry a value
    pub fn keys(&self) -> Vec<PropKey> {
        FORWARDED_PROPS
            .iter()
            .copied()
            .filter(|key| match key {
                PropKey::EnableTransform => self.enable_transform.is_some(),
                PropKey::EnableScale => self.enable_scale.is_some(),
                PropKey::EnableTranslate => self.enable_translate.is_some(),
                PropKey::EnableResistance => self.enable_resistance.is_some(),
                PropKey::MaxScale => self.max_scale.is_some(),
                PropKey::MaxOverScrollDistance => self.max_overscroll_distance.is_some(),
                PropKey::OnSingleTapConfirmed => self.on_single_tap_confirmed.is_some(),
                PropKey::OnTransformGestureReleased => {
                    self.on_transform_gesture_released.is_some()
                }
                PropKey::OnViewTransformed => self.on_view_transformed.is_some(),
            })
            .collect()
    }
}

impl fmt::Debug for TransformerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerProps")
            .field("enable_transform", &self.enable_transform)
            .field("enable_scale", &self.enable_scale)
            .field("enable_translate", &self.enable_translate)
            .field("enable_resistance", &self.enable_resistance)
            .field("max_scale", &self.max_scale)
            .field("content_aspect_ratio", &self.content_aspect_ratio)
            .field("max_overscroll_distance", &self.max_overscroll_distance)
            .field("keys", &self.keys())
            .finish()
    }
}

/// Copy the forwarded keys that are set on `props`; unset keys stay `None`
pub fn forward(props: &MediaProps) -> TransformerProps {
    let mut out = TransformerProps::default();
    for key in FORWARDED_PROPS {
        match key {
            PropKey::EnableTransform => out.enable_transform = props.enable_transform,
            PropKey::EnableScale => out.enable_scale = props.enable_scale,
            PropKey::EnableTranslate => out.enable_translate = props.enable_translate,
            PropKey::EnableResistance => out.enable_resistance = props.enable_resistance,
            PropKey::MaxScale => out.max_scale = props.max_scale,
            PropKey::MaxOverScrollDistance => {
                out.max_overscroll_distance = props.max_overscroll_distance
            }
            PropKey::OnSingleTapConfirmed => {
                out.on_single_tap_confirmed = props.on_single_tap_confirmed.clone()
            }
            PropKey::OnTransformGestureReleased => {
                out.on_transform_gesture_released = props.on_transform_gesture_released.clone()
            }
            PropKey::OnViewTransformed => {
                out.on_view_transformed = props.on_view_transformed.clone()
            }
        }
    }
    out
}
