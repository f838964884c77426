use bloomscope::compute::spatial::select_within_radius;
use bloomscope::prelude::*;
use bloomscope::{VisibleStats, geojson};
use geo::Point;

const SITES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-99.13, 19.43]},
     "properties": {"Family": "Apocynaceae", "Genus": "Asclepias", "Season": "Spring", "year": 2000, "Area": 420000}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-100.39, 20.59]},
     "properties": {"Family": "Nymphalidae", "Genus": "Danaus", "Season": "Summer", "year": 2000, "Area": 150000}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-103.35, 20.67]},
     "properties": {"Family": "Asteraceae", "Genus": "Helianthus", "Season": "Spring", "year": 2001, "Area": 90000}},
    {"type": "Feature", "geometry": null,
     "properties": {"Family": "Asteraceae", "Season": "Spring", "year": 2001}}
  ]
}"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== bloomscope - Getting Started ===\n");

    // === INGESTION ===
    println!("1. Ingesting a feature collection");
    let ingested = geojson::ingest_feature_collection(SITES)?;
    println!(
        "   {} records, {} features dropped\n",
        ingested.records.len(),
        ingested.dropped
    );
    let records = ingested.into_dataset()?;

    // === SESSION ===
    println!("2. Building a session");
    let mut session = SessionBuilder::new()
        .renderer(|frame: &RenderFrame| {
            println!(
                "   [render] {} points at {}",
                frame.points.len(),
                frame.controls.label.as_deref().unwrap_or("-")
            );
        })
        .metrics_sink(|_: &[Record], stats: &VisibleStats| {
            println!("   [metrics] {:?}", stats.per_family);
        })
        .build(ManualScheduler::new())?;
    session.load_dataset(records.clone())?;
    println!();

    // === PLAYBACK ===
    println!("3. Playing forward until the timeline ends");
    session.dispatch(Command::Play(Direction::Forward))?;
    while let Some(timer) = session.scheduler().current() {
        session.dispatch(Command::Tick(timer))?;
    }
    println!();

    // === FILTERS ===
    println!("4. Filtering");
    session.dispatch(Command::JumpTo(TimelineStep::new(2000, Season::Spring)))?;
    session.dispatch(Command::ToggleFamily {
        family: "Apocynaceae".to_string(),
        checked: false,
    })?;
    println!("   Selected genera: {:?}", session.filters().selected_genera());

    let near_mexico_city = select_within_radius(&records, &Point::new(-99.1, 19.4), 200_000.0)?;
    session.dispatch(Command::SelectFamilies(Vec::new()))?;
    session.dispatch(Command::SetSpatialSelection(Some(near_mexico_city)))?;
    println!();

    // === PREDICTIONS ===
    println!("5. Prediction request");
    let query = PredictionQuery::new(
        AreaOfInterest::state("Jalisco"),
        TimelineStep::new(2025, Season::Spring),
    )
    .with_end(TimelineStep::new(2025, Season::Fall));
    println!("   {}", query.url(&session.config().api_base_url)?);

    let outcome = session.load_predictions(&query, Vec::new())?;
    println!("   Empty response: {:?}", outcome);

    println!("\n=== Done ===");
    Ok(())
}
