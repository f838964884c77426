//! GeoJSON ingestion and export for flowering records.
//!
//! Source documents are feature collections whose features carry `Family`,
//! `Genus`, `Season`, `year`, `Area` and, for predictions, `confidence`
//! properties. Geometry is a Point, Polygon or MultiPolygon.

use crate::compute::validation::{require_text, validate_confidence, validate_location};
use crate::error::{BloomError, Result};
use bloomscope_types::record::Record;
use bloomscope_types::season::Season;
use geo::{Centroid, Coord, LineString, MultiPolygon, Point, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};

/// Records parsed from a document, plus how many features were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    pub records: Vec<Record>,
    pub dropped: usize,
}

impl Ingested {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for a dataset load, or `InvalidDataset` when none survived.
    pub fn into_dataset(self) -> Result<Vec<Record>> {
        if self.records.is_empty() {
            return Err(BloomError::InvalidDataset(format!(
                "No valid features found in dataset ({} dropped)",
                self.dropped
            )));
        }
        Ok(self.records)
    }
}

/// Parses a GeoJSON document into records.
///
/// Features missing a required field, or with an unusable location or
/// confidence, are dropped and counted. Only a document that is not GeoJSON
/// at all, or is a bare geometry, is an error; an empty result is not.
pub fn ingest_feature_collection(json: &str) -> Result<Ingested> {
    let document: GeoJson = json
        .parse()
        .map_err(|e| BloomError::InvalidDataset(format!("Failed to parse GeoJSON: {}", e)))?;

    let features = match document {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(BloomError::InvalidDataset(
                "Expected a Feature or FeatureCollection, got a bare geometry".to_string(),
            ));
        }
    };

    let mut ingested = Ingested::default();
    for (idx, feature) in features.iter().enumerate() {
        match record_from_feature(feature) {
            Ok(record) => ingested.records.push(record),
            Err(e) => {
                log::debug!("Dropping feature {}: {}", idx, e);
                ingested.dropped += 1;
            }
        }
    }

    if ingested.dropped > 0 {
        log::warn!(
            "Dropped {} of {} features without usable family, genus, season, year or location",
            ingested.dropped,
            features.len()
        );
    }
    log::info!("Ingested {} records", ingested.records.len());

    Ok(ingested)
}

/// Converts one GeoJSON feature into a record.
pub fn record_from_feature(feature: &Feature) -> Result<Record> {
    let empty = JsonObject::new();
    let props = feature.properties.as_ref().unwrap_or(&empty);

    let family = require_text("Family", text_property(props, "Family"))?;
    let genus = require_text("Genus", text_property(props, "Genus"))?;
    let season: Season = require_text("Season", text_property(props, "Season"))?
        .parse()
        .map_err(|e| BloomError::InvalidInput(format!("{}", e)))?;
    let year = year_property(props)?;
    let area = number_property(props, "Area").unwrap_or(0.0);

    let confidence = match number_property(props, "confidence") {
        Some(value) => {
            validate_confidence(value)?;
            Some(value)
        }
        None => None,
    };

    let (location, footprint) = match &feature.geometry {
        Some(geometry) => locate_geometry(geometry)?,
        None => (location_from_properties(props)?, None),
    };
    validate_location(&location)?;

    let mut record = Record::new(family, genus, year, season, area, location);
    record.confidence = confidence;
    record.footprint = footprint;
    Ok(record)
}

/// Converts records into a GeoJSON FeatureCollection string.
pub fn records_to_feature_collection<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let features: Vec<Feature> = records.into_iter().map(record_to_feature).collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    serde_json::to_string(&collection).map_err(BloomError::from)
}

fn record_to_feature(record: &Record) -> Feature {
    let value = match &record.footprint {
        Some(footprint) => Value::MultiPolygon(
            footprint.iter().map(polygon_rings).collect(),
        ),
        None => Value::Point(vec![record.location.x(), record.location.y()]),
    };

    let mut props = JsonObject::new();
    props.insert("Family".into(), JsonValue::from(record.family.clone()));
    props.insert("Genus".into(), JsonValue::from(record.genus.clone()));
    props.insert("Season".into(), JsonValue::from(record.season.as_str()));
    props.insert("year".into(), JsonValue::from(record.year));
    props.insert("Area".into(), JsonValue::from(record.area));
    if let Some(confidence) = record.confidence {
        props.insert("confidence".into(), JsonValue::from(confidence));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
        .collect()
}

/// Looks up a property by its canonical name, falling back to lowercase.
fn property<'a>(props: &'a JsonObject, name: &str) -> Option<&'a JsonValue> {
    props
        .get(name)
        .filter(|v| !v.is_null())
        .or_else(|| props.get(&name.to_ascii_lowercase()).filter(|v| !v.is_null()))
}

fn text_property<'a>(props: &'a JsonObject, name: &str) -> Option<&'a str> {
    property(props, name).and_then(JsonValue::as_str)
}

fn number_property(props: &JsonObject, name: &str) -> Option<f64> {
    property(props, name)
        .and_then(JsonValue::as_f64)
        .filter(|v| v.is_finite())
}

fn year_property(props: &JsonObject) -> Result<i32> {
    let value = property(props, "year")
        .ok_or_else(|| BloomError::InvalidInput("Missing required field `year`".to_string()))?;

    let year = match value.as_i64() {
        Some(year) => Some(year),
        // Some exporters write integral years as floats.
        None => value
            .as_f64()
            .filter(|y| y.is_finite() && y.fract() == 0.0)
            .map(|y| y as i64),
    };

    year.and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| BloomError::InvalidInput(format!("`year` must be an integer, got {}", value)))
}

fn location_from_properties(props: &JsonObject) -> Result<Point<f64>> {
    match (number_property(props, "lon"), number_property(props, "lat")) {
        (Some(lon), Some(lat)) => Ok(Point::new(lon, lat)),
        _ => Err(BloomError::InvalidInput(
            "Feature has neither geometry nor lat/lon properties".to_string(),
        )),
    }
}

fn locate_geometry(geometry: &Geometry) -> Result<(Point<f64>, Option<MultiPolygon<f64>>)> {
    match &geometry.value {
        Value::Point(coords) => Ok((point_from_coords(coords)?, None)),
        Value::Polygon(rings) => {
            let footprint = MultiPolygon::new(vec![polygon_from_rings(rings)?]);
            Ok((centroid_of(&footprint)?, Some(footprint)))
        }
        Value::MultiPolygon(polygons) => {
            let footprint = MultiPolygon::new(
                polygons
                    .iter()
                    .map(|rings| polygon_from_rings(rings))
                    .collect::<Result<Vec<_>>>()?,
            );
            Ok((centroid_of(&footprint)?, Some(footprint)))
        }
        _ => Err(BloomError::InvalidInput(
            "GeoJSON geometry must be a Point, Polygon or MultiPolygon".to_string(),
        )),
    }
}

fn centroid_of(footprint: &MultiPolygon<f64>) -> Result<Point<f64>> {
    footprint
        .centroid()
        .ok_or_else(|| BloomError::InvalidInput("Polygon geometry has no centroid".to_string()))
}

fn point_from_coords(coords: &[f64]) -> Result<Point<f64>> {
    if coords.len() < 2 {
        return Err(BloomError::InvalidInput(
            "Point must have at least 2 coordinates".to_string(),
        ));
    }
    Ok(Point::new(coords[0], coords[1]))
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Err(BloomError::InvalidInput(
            "Polygon must have at least one ring".to_string(),
        ));
    };

    let interiors = interiors
        .iter()
        .map(|ring| line_string(ring))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(line_string(exterior)?, interiors))
}

fn line_string(ring: &[Vec<f64>]) -> Result<LineString<f64>> {
    ring.iter()
        .map(|coords| {
            let point = point_from_coords(coords)?;
            Ok(Coord {
                x: point.x(),
                y: point.y(),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::from)
}
