use serde::{Deserialize, Serialize};

use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::style::{classify, derive_style, StyleState},
};

/// Shape data of a geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// A marker or dot
    Point(LatLng),
    /// An open polyline
    Path(Vec<LatLng>),
    /// A closed ring; the closing edge is implied
    Polygon(Vec<LatLng>),
    /// A text label anchored at a position
    Label { position: LatLng, content: String },
}

impl Shape {
    pub fn bounds(&self) -> Option<LatLngBounds> {
        match self {
            Shape::Point(position) | Shape::Label { position, .. } => {
                Some(LatLngBounds::new(*position, *position))
            }
            Shape::Path(points) | Shape::Polygon(points) => LatLngBounds::from_points(points),
        }
    }
}

/// Opaque bag stored next to each engine record.
///
/// `style_id` holds the base key so restyling can recover it no matter which
/// derived identifier the record currently shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryProperties {
    pub style_id: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A geometry as the render engine stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub id: String,
    pub style_id: String,
    pub shape: Shape,
    pub properties: GeometryProperties,
}

impl GeometryRecord {
    pub fn base_key(&self) -> &str {
        &self.properties.style_id
    }

    /// Interaction state encoded in the current style identifier
    pub fn state(&self) -> Option<StyleState> {
        classify(&self.style_id, self.base_key())
    }

    pub fn is_selected(&self) -> bool {
        self.state().is_some_and(|state| state.is_selected())
    }

    /// Copy of this record restyled to `state`
    pub fn restyled(&self, state: StyleState) -> GeometryRecord {
        GeometryRecord {
            style_id: derive_style(self.base_key(), state),
            ..self.clone()
        }
    }
}

/// A geometry owned by a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub id: String,
    base_key: String,
    pub state: StyleState,
    pub shape: Shape,
    pub data: serde_json::Value,
}

impl Geometry {
    pub fn new(id: impl Into<String>, base_key: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            base_key: base_key.into(),
            state: StyleState::Normal,
            shape,
            data: serde_json::Value::Null,
        }
    }

    pub fn point(id: impl Into<String>, base_key: impl Into<String>, position: LatLng) -> Self {
        Self::new(id, base_key, Shape::Point(position))
    }

    pub fn path(id: impl Into<String>, base_key: impl Into<String>, points: Vec<LatLng>) -> Self {
        Self::new(id, base_key, Shape::Path(points))
    }

    pub fn polygon(
        id: impl Into<String>,
        base_key: impl Into<String>,
        ring: Vec<LatLng>,
    ) -> Self {
        Self::new(id, base_key, Shape::Polygon(ring))
    }

    pub fn label(
        id: impl Into<String>,
        base_key: impl Into<String>,
        position: LatLng,
        content: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            base_key,
            Shape::Label {
                position,
                content: content.into(),
            },
        )
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_state(mut self, state: StyleState) -> Self {
        self.state = state;
        self
    }

    pub fn base_key(&self) -> &str {
        &self.base_key
    }

    pub fn style_id(&self) -> String {
        derive_style(&self.base_key, self.state)
    }

    pub fn is_selected(&self) -> bool {
        self.state.is_selected()
    }

    pub fn to_record(&self) -> GeometryRecord {
        GeometryRecord {
            id: self.id.clone(),
            style_id: self.style_id(),
            shape: self.shape.clone(),
            properties: GeometryProperties {
                style_id: self.base_key.clone(),
                data: self.data.clone(),
            },
        }
    }

    /// Rebuilds a geometry from an engine record.
    ///
    /// Returns `None` when the record's style identifier was not derived from
    /// the base key stored in its properties.
    pub fn from_record(record: &GeometryRecord) -> Option<Geometry> {
        let state = record.state()?;
        Some(Geometry {
            id: record.id.clone(),
            base_key: record.properties.style_id.clone(),
            state,
            shape: record.shape.clone(),
            data: record.properties.data.clone(),
        })
    }
}

impl From<&Geometry> for GeometryRecord {
    fn from(geometry: &Geometry) -> Self {
        geometry.to_record()
    }
}

impl From<Geometry> for GeometryRecord {
    fn from(geometry: Geometry) -> Self {
        geometry.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_carries_base_key_and_payload() {
        let geometry = Geometry::point("a", "dot", LatLng::new(1.0, 2.0))
            .with_data(json!({"name": "pump"}))
            .with_state(StyleState::Hover);
        let record = geometry.to_record();

        assert_eq!(record.style_id, "dot_hover");
        assert_eq!(record.base_key(), "dot");
        assert_eq!(record.properties.data["name"], "pump");
        assert_eq!(Geometry::from_record(&record), Some(geometry));
    }

    #[test]
    fn test_restyle_recovers_base_after_mutation() {
        let record = Geometry::path("l", "road", vec![LatLng::new(0.0, 0.0)]).to_record();
        let hovered = record.restyled(StyleState::Hover);
        let selected = hovered.restyled(StyleState::Selected);
        let normal = selected.restyled(StyleState::Normal);

        assert_eq!(hovered.style_id, "road_hover");
        assert_eq!(selected.style_id, "road_selected");
        assert!(selected.is_selected());
        assert_eq!(normal.style_id, "road");
    }

    #[test]
    fn test_foreign_style_id_is_not_resolvable() {
        let mut record = Geometry::point("a", "dot", LatLng::default()).to_record();
        record.style_id = "pin".to_string();
        assert_eq!(record.state(), None);
        assert!(Geometry::from_record(&record).is_none());
    }

    #[test]
    fn test_shape_bounds() {
        let shape = Shape::Polygon(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(2.0, 0.0),
            LatLng::new(2.0, 3.0),
        ]);
        assert_eq!(
            shape.bounds(),
            Some(LatLngBounds::from_coords(0.0, 0.0, 2.0, 3.0))
        );
        assert_eq!(Shape::Path(Vec::new()).bounds(), None);
    }
}
