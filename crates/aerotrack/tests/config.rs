use std::time::Duration;

use aerotrack::{JsonConfig, RelayConfig, Resolution, SenderConfig};

#[test]
fn sender_config_survives_a_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sender.json");

    let mut cfg = SenderConfig::default();
    cfg.destination = "192.168.1.20:6000".parse().unwrap();
    cfg.send_period = Duration::from_millis(4);
    cfg.resolution = Resolution {
        width: 640,
        height: 480,
    };
    cfg.pipeline.tracker.alpha = 0.25;
    cfg.pipeline.segmentation.lower = [15, 80, 80];
    cfg.write_json(&path).unwrap();

    let back = SenderConfig::load_json(&path).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn hand_written_sender_file_keeps_defaults_for_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sender.json");
    std::fs::write(
        &path,
        r#"{
            "destination": "127.0.0.1:7777",
            "pipeline": { "detector": { "min_area_ratio": 0.001, "max_regions": 3 } }
        }"#,
    )
    .unwrap();

    let cfg = SenderConfig::load_json(&path).unwrap();
    assert_eq!(cfg.destination.port(), 7777);
    assert_eq!(cfg.pipeline.detector.min_area_ratio, 0.001);
    assert_eq!(cfg.pipeline.tracker.alpha, 0.1);
    assert_eq!(cfg.send_period, Duration::from_millis(2));
}

#[test]
fn relay_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relay.json");
    let cfg = RelayConfig {
        listen: "0.0.0.0:9100".parse().unwrap(),
        forward: "10.0.0.5:9200".parse().unwrap(),
    };
    cfg.write_json(&path).unwrap();
    assert_eq!(RelayConfig::load_json(&path).unwrap(), cfg);
}

#[test]
fn malformed_file_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        SenderConfig::load_json(&path),
        Err(aerotrack::ConfigError::Json(_))
    ));
    assert!(matches!(
        SenderConfig::load_json(dir.path().join("missing.json")),
        Err(aerotrack::ConfigError::Io(_))
    ));
}
