use serde::{Deserialize, Serialize};

/// Drag model enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragModel {
    /// Gravity only
    Vacuum,
    /// Force proportional to v², opposing the velocity
    #[default]
    Quadratic,
}

impl DragModel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vacuum" | "none" | "off" => Some(DragModel::Vacuum),
            "quadratic" | "on" => Some(DragModel::Quadratic),
            _ => None,
        }
    }
}

impl std::fmt::Display for DragModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragModel::Vacuum => write!(f, "vacuum"),
            DragModel::Quadratic => write!(f, "quadratic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_model_from_str() {
        assert_eq!(DragModel::from_str("vacuum"), Some(DragModel::Vacuum));
        assert_eq!(DragModel::from_str("none"), Some(DragModel::Vacuum));
        assert_eq!(DragModel::from_str("quadratic"), Some(DragModel::Quadratic));
        assert_eq!(DragModel::from_str("Quadratic"), Some(DragModel::Quadratic));
        assert_eq!(DragModel::from_str("linear"), None);
    }

    #[test]
    fn test_drag_model_display_round_trips() {
        for model in [DragModel::Vacuum, DragModel::Quadratic] {
            assert_eq!(DragModel::from_str(&model.to_string()), Some(model));
        }
    }
}
