//! Boundary datasets loaded from `GeoJSON`.
//!
//! Each region type lives in its own `FeatureCollection` file named after
//! the kind (`wards.geojson`, `zips.geojson`). Every feature must carry a
//! Polygon or `MultiPolygon` geometry and an identifier property.

use std::path::{Path, PathBuf};

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, GeoJson};
use reporter_geography_models::RegionKind;
use reporter_spatial::{BoundingBox, multi_polygon_contains};

use crate::GeoError;

/// One region polygon with its identifier and precomputed bounding box.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    identifier: String,
    geometry: MultiPolygon<f64>,
    bbox: BoundingBox,
    feature: Feature,
}

impl BoundaryFeature {
    /// Ward number or ZIP code.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The region's polygons.
    #[must_use]
    pub const fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Bounding box of [`Self::geometry`].
    #[must_use]
    pub const fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The source feature, properties included.
    #[must_use]
    pub const fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Exact point-in-polygon test, holes excluded.
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.bbox.contains_point(lon, lat) && multi_polygon_contains(&self.geometry, lon, lat)
    }
}

/// All regions of one kind, in file order.
#[derive(Debug, Clone)]
pub struct BoundaryDataset {
    kind: RegionKind,
    features: Vec<BoundaryFeature>,
}

impl BoundaryDataset {
    /// Path of the boundary file for `kind` inside `dir`.
    #[must_use]
    pub fn path_for(kind: RegionKind, dir: &Path) -> PathBuf {
        dir.join(format!("{kind}.geojson"))
    }

    /// Reads `<dir>/<kind>.geojson`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Io`] if the file cannot be read, or any error
    /// from [`Self::from_geojson_str`].
    pub fn load(kind: RegionKind, dir: &Path) -> Result<Self, GeoError> {
        let path = Self::path_for(kind, dir);
        let contents = std::fs::read_to_string(&path).map_err(|source| GeoError::Io {
            path: path.clone(),
            source,
        })?;

        let dataset = Self::from_geojson_str(kind, &contents)?;
        log::info!(
            "Loaded {} {kind} boundaries from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parses a `FeatureCollection` document.
    ///
    /// # Errors
    ///
    /// * [`GeoError::GeoJson`] if the text is not valid `GeoJSON`.
    /// * [`GeoError::MalformedBoundary`] if it is not a `FeatureCollection`
    ///   or any feature lacks an identifier or polygon geometry.
    pub fn from_geojson_str(kind: RegionKind, geojson: &str) -> Result<Self, GeoError> {
        match geojson.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => {
                Self::from_feature_collection(kind, collection)
            }
            GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(GeoError::MalformedBoundary {
                message: format!("{kind} boundaries must be a FeatureCollection"),
            }),
        }
    }

    /// Converts an already parsed `FeatureCollection`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::MalformedBoundary`] if any feature lacks an
    /// identifier or polygon geometry.
    pub fn from_feature_collection(
        kind: RegionKind,
        collection: FeatureCollection,
    ) -> Result<Self, GeoError> {
        let features = collection
            .features
            .into_iter()
            .enumerate()
            .map(|(position, feature)| boundary_feature(kind, position, feature))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { kind, features })
    }

    /// Which boundary set this is.
    #[must_use]
    pub const fn kind(&self) -> RegionKind {
        self.kind
    }

    /// Regions in file order.
    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the dataset has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn boundary_feature(
    kind: RegionKind,
    position: usize,
    feature: Feature,
) -> Result<BoundaryFeature, GeoError> {
    let identifier =
        feature_identifier(kind, &feature).ok_or_else(|| GeoError::MalformedBoundary {
            message: format!(
                "{kind} feature #{position} has no '{}' property",
                kind.identifier_field()
            ),
        })?;

    let geometry = feature_geometry(&feature).ok_or_else(|| GeoError::MalformedBoundary {
        message: format!("{kind} feature '{identifier}' has no polygon geometry"),
    })?;

    let bbox = BoundingBox::of_multi_polygon(&geometry).ok_or_else(|| {
        GeoError::MalformedBoundary {
            message: format!("{kind} feature '{identifier}' has an empty geometry"),
        }
    })?;

    Ok(BoundaryFeature {
        identifier,
        geometry,
        bbox,
        feature,
    })
}

/// Reads the identifier property, falling back to the kind's alternate
/// property names.
fn feature_identifier(kind: RegionKind, feature: &Feature) -> Option<String> {
    std::iter::once(kind.identifier_field())
        .chain(kind.fallback_fields().iter().copied())
        .find_map(|field| feature.property(field).and_then(identifier_value))
}

/// Ward numbers are often stored as JSON numbers; ZIP codes as strings.
fn identifier_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{f:.0}")),
                _ => Some(n.to_string()),
            }
        }
        _ => None,
    }
}

/// Converts a feature's geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn feature_geometry(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
