#[cfg(test)]
mod tests {
    use bloomscope::compute::geojson::{ingest_feature_collection, records_to_feature_collection};
    use bloomscope::compute::spatial::{select_within_area, select_within_polygon, select_within_radius};
    use bloomscope::prelude::*;
    use bloomscope::{DatasetCatalog, load_dataset_file};
    use geo::{Point, polygon};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SITES: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature",
         "geometry": {"type": "MultiPolygon", "coordinates": [[[[-99.2, 19.3], [-99.0, 19.3], [-99.0, 19.5], [-99.2, 19.5], [-99.2, 19.3]]]]},
         "properties": {"Family": "Apocynaceae", "Genus": "Asclepias", "Season": "Spring", "year": 2000, "Area": 400000}},
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [-103.35, 20.67]},
         "properties": {"Family": "Asteraceae", "Genus": "Helianthus", "Season": "spring", "year": 2000.0, "Area": 1000}},
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [-3.70, 40.42]},
         "properties": {"Family": "Rosaceae", "Genus": "Rosa", "Season": "Autumn", "year": 2001}},
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [-3.70, 40.42]},
         "properties": {"Family": "Rosaceae", "Genus": "Rosa", "Season": "Monsoon", "year": 2001}},
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [-3.70, 40.42]},
         "properties": {"Family": "Rosaceae", "Genus": "Rosa", "Season": "Fall", "year": 2001, "confidence": 1.4}}
      ]
    }"#;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write_sites() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SITES.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_to_session() {
        init_logging();
        let file = write_sites();
        let ingested = load_dataset_file(file.path()).unwrap();
        assert_eq!(ingested.records.len(), 3);
        assert_eq!(ingested.dropped, 2);

        let mut session = SessionBuilder::new().build(ManualScheduler::new()).unwrap();
        session.load_dataset(ingested.into_dataset().unwrap()).unwrap();

        assert_eq!(session.timeline().steps().len(), 8);
        assert_eq!(session.view().records().len(), 2);
        assert!(!session.registry().is_prediction_set());

        let footprint = session.registry().records()[0].footprint.as_ref();
        assert!(footprint.is_some());
        let asclepias = session.registry().points()[0].radius;
        assert!((asclepias - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_empty_collection_is_invalid_dataset() {
        let ingested = ingest_feature_collection(
            r#"{"type": "FeatureCollection", "features": []}"#,
        )
        .unwrap();
        let err = ingested.into_dataset().unwrap_err();
        assert!(matches!(err, BloomError::InvalidDataset(_)));

        let err = ingest_feature_collection("not json").unwrap_err();
        assert!(matches!(err, BloomError::InvalidDataset(_)));
    }

    #[test]
    fn test_spatial_helpers_feed_selections() {
        init_logging();
        let file = write_sites();
        let records = load_dataset_file(file.path()).unwrap().into_dataset().unwrap();
        let mut session = SessionBuilder::new().build(ManualScheduler::new()).unwrap();
        session.load_dataset(records.clone()).unwrap();

        let mexico = MapArea::new(-118.4, 14.5, -86.7, 32.7);
        let in_mexico = select_within_area(&records, &mexico).unwrap();
        assert_eq!(in_mexico.len(), 2);

        let valley = polygon![
            (x: -99.1, y: 19.4),
            (x: -98.0, y: 19.4),
            (x: -98.0, y: 21.0),
            (x: -99.1, y: 21.0),
            (x: -99.1, y: 19.4),
        ];
        let drawn = select_within_polygon(&records, &valley).unwrap();
        assert_eq!(drawn.len(), 1);

        session.dispatch(Command::SetAreaSelection(Some(in_mexico))).unwrap();
        session.dispatch(Command::SetSpatialSelection(Some(drawn))).unwrap();
        let genera: Vec<&str> = session.view().records().iter().map(|r| r.genus.as_str()).collect();
        assert_eq!(genera, vec!["Asclepias"]);

        let near_madrid = select_within_radius(&records, &Point::new(-3.7, 40.4), 10_000.0).unwrap();
        session.dispatch(Command::SetSpatialSelection(Some(near_madrid))).unwrap();
        assert!(session.view().records().is_empty());

        session.dispatch(Command::SetSpatialSelection(None)).unwrap();
        session.dispatch(Command::SetAreaSelection(None)).unwrap();
        assert_eq!(session.view().records().len(), 2);
    }

    #[test]
    fn test_catalog_loads_named_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sites.geojson"), SITES).unwrap();

        let config = Config::default().with_dataset("sites", "sites.geojson");
        let catalog = DatasetCatalog::from_config(&config).with_root(dir.path());
        assert_eq!(catalog.load("sites").unwrap().records.len(), 3);
        assert!(catalog.load("flowering_sites").is_err());
    }

    #[test]
    fn test_export_reingests() {
        let file = write_sites();
        let records = load_dataset_file(file.path()).unwrap().records;
        let exported = records_to_feature_collection(&records).unwrap();
        let again = ingest_feature_collection(&exported).unwrap();
        assert_eq!(again.dropped, 0);
        assert_eq!(again.records.len(), records.len());
        assert_eq!(again.records[2].season, Season::Fall);
    }
}
