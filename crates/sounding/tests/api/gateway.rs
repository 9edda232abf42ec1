use crate::helpers::{document, raw_station, spawn_mock_server, test_logger};
use sounding::{JsonFetcher, LatestQuery, Radius, StationCollection, SynopticGateway};
use std::path::PathBuf;

fn gateway(base_url: String, cache_file: PathBuf) -> SynopticGateway {
    let logger = test_logger();
    SynopticGateway::new(
        logger.clone(),
        JsonFetcher::new(logger, String::from("sounding-tests/1.0")),
        base_url,
        cache_file,
    )
}

fn query() -> LatestQuery {
    LatestQuery {
        radius: Radius {
            latitude: 40.66,
            longitude: -89.69,
            miles: 25.0,
        },
        vars: vec!["air_temp", "pressure"],
        need_all_vars: false,
        enable_wind: false,
        all_stations: false,
        within_minutes: 15,
    }
}

#[tokio::test]
async fn fetch_latest_caches_raw_response() {
    let body = document(vec![raw_station(
        "KPIA",
        Some(650.0),
        Some(12.0),
        Some(4.0),
        Some(98_500.0),
    )])
    .to_string();
    let (base_url, server) = spawn_mock_server(200, body.clone());
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache/last_result.json");

    let doc = gateway(base_url, cache.clone())
        .fetch_latest(&query(), "tok")
        .await
        .unwrap();

    let request = server.join().unwrap();
    assert!(request.starts_with("GET /stations/latest?"), "{}", request);
    assert!(request.contains("token=tok"));
    assert!(request.contains("status=active"));
    assert!(request.contains("within=15"));
    assert!(request.contains("varsoperator=or"));

    assert_eq!(std::fs::read_to_string(&cache).unwrap(), body);
    let collection = StationCollection::from_document(&doc, &test_logger()).unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.stations()[0].pressure_mb, Some(985.0));
}

#[tokio::test]
async fn failed_request_leaves_no_cache() {
    let (base_url, server) = spawn_mock_server(500, String::from("{\"error\":\"boom\"}"));
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("last_result.json");

    let result = gateway(base_url, cache.clone())
        .fetch_latest(&query(), "tok")
        .await;
    server.join().unwrap();

    assert!(result.is_err());
    assert!(!cache.exists());
}

#[tokio::test]
async fn malformed_body_is_still_cached() {
    let (base_url, server) = spawn_mock_server(200, String::from("not json"));
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("last_result.json");

    let result = gateway(base_url, cache.clone())
        .fetch_latest(&query(), "tok")
        .await;
    server.join().unwrap();

    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&cache).unwrap(), "not json");
}

#[test]
fn load_file_reads_cached_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_result.json");
    let doc = document(vec![
        raw_station("A", Some(600.0), Some(10.0), None, Some(98_000.0)),
        raw_station("B", Some(900.0), Some(8.0), None, None),
    ]);
    std::fs::write(&path, doc.to_string()).unwrap();

    let gw = gateway(String::from("http://127.0.0.1:9"), dir.path().join("unused.json"));
    let loaded = gw.load_file(&path).unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(loaded["STATION"].as_array().unwrap().len(), 2);
}

#[test]
fn load_file_errors_on_missing_or_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let gw = gateway(String::from("http://127.0.0.1:9"), dir.path().join("unused.json"));
    assert!(gw.load_file(&dir.path().join("missing.json")).is_err());

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ nope").unwrap();
    assert!(gw.load_file(&bad).is_err());
}
