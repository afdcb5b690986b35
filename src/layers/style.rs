//! Interaction state of a geometry and its style identifier encoding.
//!
//! The engine only knows style identifiers (`road`, `road_hover`,
//! `road_selected`); inside the crate a geometry carries a [`StyleState`] and
//! the string form is produced at the engine boundary.

use serde::{Deserialize, Serialize};

use crate::core::constants::{HOVER_SUFFIX, SELECTED_SUFFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StyleState {
    #[default]
    Normal,
    Hover,
    Selected,
}

impl StyleState {
    pub fn is_selected(&self) -> bool {
        matches!(self, StyleState::Selected)
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            StyleState::Normal => "",
            StyleState::Hover => HOVER_SUFFIX,
            StyleState::Selected => SELECTED_SUFFIX,
        }
    }
}

impl std::fmt::Display for StyleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleState::Normal => write!(f, "normal"),
            StyleState::Hover => write!(f, "hover"),
            StyleState::Selected => write!(f, "selected"),
        }
    }
}

/// Style identifier for `base_key` in `state`
pub fn derive_style(base_key: &str, state: StyleState) -> String {
    format!("{}{}", base_key, state.suffix())
}

/// Recovers the state encoded in `style_id`.
///
/// Returns `None` when `style_id` was not derived from `base_key`.
pub fn classify(style_id: &str, base_key: &str) -> Option<StyleState> {
    match style_id.strip_prefix(base_key)? {
        "" => Some(StyleState::Normal),
        HOVER_SUFFIX => Some(StyleState::Hover),
        SELECTED_SUFFIX => Some(StyleState::Selected),
        _ => None,
    }
}
