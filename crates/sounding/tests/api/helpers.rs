use serde_json::{json, Map, Value};
use slog::{o, Logger};
use sounding::StationRecord;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

pub fn test_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// A raw Synoptic station; `None` sensors are left out of the payload entirely.
pub fn raw_station(
    stid: &str,
    elevation_ft: Option<f64>,
    temp_c: Option<f64>,
    dew_point_c: Option<f64>,
    pressure_pa: Option<f64>,
) -> Value {
    let mut sensors = Map::new();
    let mut observations = Map::new();
    for (category, instance, value) in [
        ("air_temp", "air_temp_value_1", temp_c),
        ("dew_point_temperature", "dew_point_temperature_value_1d", dew_point_c),
        ("pressure", "pressure_value_1d", pressure_pa),
    ] {
        if let Some(value) = value {
            let mut instances = Map::new();
            instances.insert(instance.to_string(), json!({ "position": "" }));
            sensors.insert(category.to_string(), Value::Object(instances));
            observations.insert(
                instance.to_string(),
                json!({ "value": value, "date_time": "2024-05-01T12:00:00Z" }),
            );
        }
    }

    json!({
        "ID": format!("id-{}", stid),
        "STID": stid,
        "NAME": format!("{} test station", stid),
        "LATITUDE": "40.6642",
        "LONGITUDE": "-89.6931",
        "ELEVATION": elevation_ft.map(|e| e.to_string()),
        "ELEV_DEM": null,
        "QC_FLAGGED": false,
        "SENSOR_VARIABLES": sensors,
        "OBSERVATIONS": observations,
    })
}

pub fn document(stations: Vec<Value>) -> Value {
    json!({
        "SUMMARY": { "RESPONSE_CODE": 1, "NUMBER_OF_OBJECTS": stations.len() },
        "STATION": stations,
    })
}

/// Station whose observed pressure and elevation carry the same number.
pub fn mirrored_station(id: &str, y: f64, temp: f64) -> StationRecord {
    StationRecord {
        station_id: id.to_string(),
        internal_id: id.to_string(),
        position: (40.0, -89.0),
        elevation_m: Some(y),
        elevation_dem_m: Some(y),
        pressure_uncorrected_mb: None,
        pressure_uncorrected_dem_mb: None,
        temperature_c: Some(temp),
        dew_point_c: None,
        pressure_mb: Some(y),
        wind_speed: None,
        wind_gust: None,
        qc_flagged: false,
    }
}

/// Serves a single HTTP response on localhost; the handle yields the request head.
pub fn spawn_mock_server(status: u16, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock server");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("Failed to accept connection");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = stream.read(&mut buf).expect("Failed to read request");
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
        }

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        stream
            .write_all(response.as_bytes())
            .expect("Failed to write response");
        String::from_utf8_lossy(&request).to_string()
    });

    (base_url, handle)
}
