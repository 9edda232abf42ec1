use crate::helpers::{document, mirrored_station, raw_station, test_logger};
use sounding::{
    generate_report, Attribute, Bounds, ReportOptions, ReportOutcome, SoundingReport,
    StationCollection, XAxis, YAxis,
};

fn chart(outcome: ReportOutcome) -> SoundingReport {
    match outcome {
        ReportOutcome::Chart(report) => report,
        ReportOutcome::NoData => panic!("expected a chart"),
    }
}

fn pressure_options() -> ReportOptions {
    ReportOptions {
        width: 10,
        height: 5,
        y_axis: YAxis::Pressure,
        x_axis: XAxis::Temperature,
        y_bounds: Bounds::new(Some(850.0), Some(1025.0)),
        ..Default::default()
    }
}

#[test]
fn three_station_pressure_sounding() {
    let logger = test_logger();
    let doc = document(vec![
        raw_station("K900", Some(3200.0), Some(10.0), None, Some(90_000.0)),
        raw_station("K950", Some(1800.0), Some(15.0), None, Some(95_000.0)),
        raw_station("K1000", Some(300.0), Some(20.0), None, Some(100_000.0)),
    ]);
    let mut collection = StationCollection::from_document(&doc, &logger).unwrap();

    let report = chart(generate_report(&mut collection, &pressure_options(), &logger).unwrap());

    // lowest pressure lands in bin 0, drawn as the first chart row
    assert_eq!(report.y_bins[0], vec!["K900".to_string()]);
    assert_eq!(report.y_bins[2], vec!["K950".to_string()]);
    assert_eq!(report.y_bins[4], vec!["K1000".to_string()]);

    let expected = vec![
        "     +pres vs temp+".to_string(),
        " 920 |#         | n=1".to_string(),
        " 940 |          | n=0".to_string(),
        " 960 |    #     | n=1".to_string(),
        " 980 |          | n=0".to_string(),
        "1000 |         #| n=1".to_string(),
        "     +----------+".to_string(),
        format!("{}10{}20", " ".repeat(6), " ".repeat(7)),
    ];
    assert_eq!(report.lines(), expected.as_slice());
    assert_eq!(report.render(), expected.join("\n"));

    assert_eq!(report.summary.y_min, 900.0);
    assert_eq!(report.summary.y_max, 1000.0);
    assert_eq!(report.summary.stations["K950"], serde_json::json!([950.0, 15.0]));
    let ids: Vec<&str> = report.summary.stations.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["K900", "K950", "K1000"]);
}

#[test]
fn spread_row_marks_start_and_stop_at_extremes() {
    let logger = test_logger();
    let doc = document(vec![
        raw_station("A", Some(600.0), Some(10.0), None, Some(95_000.0)),
        raw_station("B", Some(610.0), Some(15.0), None, Some(95_100.0)),
        raw_station("C", Some(620.0), Some(20.0), None, Some(95_200.0)),
    ]);
    let mut collection = StationCollection::from_document(&doc, &logger).unwrap();

    let report = chart(generate_report(&mut collection, &pressure_options(), &logger).unwrap());

    // natural 950..952 mb is widened to 942..960 by the 10 mb minimum span
    assert_eq!(report.summary.y_min, 942.0);
    assert_eq!(report.summary.y_max, 960.0);
    assert_eq!(report.y_bins[2].len(), 3);
    assert_eq!(report.lines()[3], " 952 |%...#....%| n=3");
    for (i, line) in report.lines()[1..=5].iter().enumerate() {
        if i != 2 {
            assert!(line.ends_with("| n=0"), "row {} should be empty: {}", i, line);
        }
    }
}

#[test]
fn station_without_pressure_is_dropped_by_prune() {
    let logger = test_logger();
    let doc = document(vec![
        raw_station("WITH", Some(600.0), Some(10.0), None, Some(98_000.0)),
        raw_station("WITHOUT", Some(650.0), Some(12.0), None, None),
    ]);
    let mut collection = StationCollection::from_document(&doc, &logger).unwrap();
    assert_eq!(collection.len(), 2);

    collection.prune(Attribute::Pressure);
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.stations()[0].station_id, "WITH");
}

#[test]
fn empty_after_pruning_reports_no_data() {
    let logger = test_logger();
    let doc = document(vec![
        raw_station("A", Some(600.0), Some(10.0), None, Some(98_000.0)),
        raw_station("B", Some(650.0), Some(12.0), None, Some(97_500.0)),
    ]);
    let mut collection = StationCollection::from_document(&doc, &logger).unwrap();
    let options = ReportOptions {
        x_axis: XAxis::DewPoint,
        ..pressure_options()
    };

    let outcome = generate_report(&mut collection, &options, &logger).unwrap();
    assert_eq!(outcome, ReportOutcome::NoData);
    assert!(collection.is_empty());
}

#[test]
fn empty_document_reports_no_data() {
    let logger = test_logger();
    let mut collection = StationCollection::from_document(&document(vec![]), &logger).unwrap();
    let outcome = generate_report(&mut collection, &ReportOptions::default(), &logger).unwrap();
    assert_eq!(outcome, ReportOutcome::NoData);
}

#[test]
fn elevation_report_reverses_pressure_rows() {
    let logger = test_logger();
    let stations = vec![
        mirrored_station("A", 900.0, 10.0),
        mirrored_station("B", 950.0, 15.0),
        mirrored_station("C", 1000.0, 20.0),
    ];
    let base = ReportOptions {
        width: 10,
        height: 5,
        ..Default::default()
    };

    let pressure = chart(
        generate_report(
            &mut StationCollection::new(stations.clone()),
            &ReportOptions {
                y_axis: YAxis::Pressure,
                ..base.clone()
            },
            &logger,
        )
        .unwrap(),
    );
    let elevation = chart(
        generate_report(
            &mut StationCollection::new(stations),
            &ReportOptions {
                y_axis: YAxis::Elevation,
                ..base
            },
            &logger,
        )
        .unwrap(),
    );

    let pressure_rows = &pressure.lines()[1..=5];
    let mut elevation_rows = elevation.lines()[1..=5].to_vec();
    elevation_rows.reverse();
    assert_eq!(pressure_rows, elevation_rows.as_slice());
    assert_eq!(elevation.lines()[0], "     +elevation vs temp+");
    assert_eq!(elevation.lines()[1], "1000 |         #| n=1");
}

#[test]
fn summary_is_written_as_json() {
    let logger = test_logger();
    let doc = document(vec![
        raw_station("A", Some(600.0), Some(-2.5), Some(-8.0), Some(98_000.0)),
        raw_station("B", Some(900.0), Some(4.0), Some(-1.0), Some(97_000.0)),
    ]);
    let mut collection = StationCollection::from_document(&doc, &logger).unwrap();
    let report = chart(
        generate_report(
            &mut collection,
            &ReportOptions {
                x_axis: XAxis::DewPoint,
                ..pressure_options()
            },
            &logger,
        )
        .unwrap(),
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/summary.json");
    report.write_json(&path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["x-axis"], "dewp");
    assert_eq!(written["y-axis"], "pres");
    assert_eq!(written["stations"]["A"], serde_json::json!([980.0, -8.0]));
    assert_eq!(written["x-min"], -11.0);
    assert_eq!(written["x-max"], 2.0);
    let console: Vec<String> = serde_json::from_value(written["console_output"].clone()).unwrap();
    assert_eq!(console, report.lines());
}
