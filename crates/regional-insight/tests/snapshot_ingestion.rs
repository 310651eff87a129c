use regional_insight::engine::Presence;
use regional_insight::snapshot::{
    BoundaryCache, CsvSnapshotReader, FileSnapshotSource, Snapshot, SnapshotError, SnapshotSource,
};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "regional-insight-{}-{}",
        name,
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("scratch dir created");
    dir
}

#[test]
fn csv_export_loads_through_file_source() {
    let dir = scratch_dir("csv");
    let path = dir.join("villages.csv");
    fs::write(
        &path,
        "id,name,district,disease.infectious_cases,digital.village_information_system,economy.primary_income\n\
         2001,Lampuuk,Lhoknga,7,Ada,\"Perikanan, Pariwisata\"\n\
         2002,Mon Ikeun,Lhoknga,1,Tidak,Pertanian\n",
    )
    .expect("csv written");

    let snapshot = FileSnapshotSource::new(&path)
        .list_villages()
        .expect("csv snapshot loads");

    assert_eq!(snapshot.len(), 2);
    let lampuuk = snapshot.find("2001").expect("Lampuuk present");
    assert_eq!(lampuuk.disease.infectious_cases, 7.0);
    assert_eq!(lampuuk.digital.village_information_system, Presence::Present);
    assert_eq!(lampuuk.economy.primary_income, "Perikanan, Pariwisata");
    assert!(!snapshot.version().is_empty());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn json_file_with_boundaries_is_cached_per_version() {
    let dir = scratch_dir("json");
    let villages = dir.join("villages.json");
    let boundaries = dir.join("districts.geojson");
    fs::write(&villages, r#"[{ "id": "1", "name": "Lampuuk" }]"#).expect("villages written");
    fs::write(
        &boundaries,
        r#"{ "type": "FeatureCollection", "features": [{ "type": "Feature" }] }"#,
    )
    .expect("boundaries written");

    let source = FileSnapshotSource::new(&villages).with_boundaries(&boundaries);
    let snapshot = source.list_villages().expect("json snapshot loads");
    let cache = BoundaryCache::new();

    let first = cache
        .get_or_load(snapshot.version(), || source.list_boundaries())
        .expect("boundaries load")
        .expect("boundaries configured");
    assert_eq!(first["features"].as_array().map(Vec::len), Some(1));

    let second = cache
        .get_or_load(snapshot.version(), || Err(SnapshotError::Shape))
        .expect("served from cache");
    assert!(second.is_some());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_file_surfaces_io_error() {
    let source = FileSnapshotSource::new("/definitely/not/here/villages.json");
    assert!(matches!(source.list_villages(), Err(SnapshotError::Io(_))));
}

#[test]
fn csv_reader_keeps_row_order() {
    let villages = CsvSnapshotReader::from_reader("id,name\nb,Beta\na,Alpha\n".as_bytes())
        .expect("csv parses");
    let snapshot = Snapshot::new("inline", villages).expect("unique ids");
    let ids: Vec<_> = snapshot.villages().iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
}
