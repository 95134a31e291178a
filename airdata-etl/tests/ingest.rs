use std::fs;

use assert_cmd::Command;
use httpmock::prelude::*;
use tempfile::tempdir;

const BIN: &str = "airdata-etl";

const RECENT: &str = r##"[
  {
    "isLive": 1,
    "personalProfileImageSrc": "https://x/p.png",
    "fullAddress": "Mountain View, CA",
    "pilotFullName": "Jane Doe",
    "shareLink": "https://x/y?sid=42",
    "shareLinkPreviewImg": "https://x/preview.png",
    "rtmpURL": "rtmp://x/live/42",
    "lastStarted": 1000,
    "lastStopped": false,
    "latitude": 37.4,
    "longitude": -122.1
  },
  {
    "isLive": 0,
    "personalProfileImageSrc": "",
    "fullAddress": "",
    "pilotFullName": "John Roe",
    "shareLink": "https://x/y?sid=43",
    "shareLinkPreviewImg": "",
    "rtmpURL": "rtmp://x/live/43",
    "lastStarted": 1000,
    "lastStopped": 2000,
    "latitude": 0.0,
    "longitude": 0.0
  }
]"##;

#[test]
fn test_run_into_file() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/broadcasts/recent")
            .header("authorization", "Basic YWJjOg==");
        then.status(200)
            .header("content-type", "application/json")
            .body(RECENT);
    });

    let dir = tempdir().unwrap();
    let out = dir.path().join("features.json");
    let cfg = dir.path().join("airdata.hcl");
    fs::write(
        &cfg,
        format!(
            "version = 1\nshape = \"minimal\"\n\nsite {{\n  base_url = \"{}\"\n}}\n",
            server.base_url()
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.env_remove("AIRDATA_API_TOKEN")
        .arg("-c")
        .arg(&cfg)
        .arg("-t")
        .arg("abc")
        .arg("-o")
        .arg(&out)
        .arg("run")
        .assert()
        .success();

    m.assert();

    let fc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!("FeatureCollection", fc["type"]);
    let features = fc["features"].as_array().unwrap();
    assert_eq!(1, features.len());
    assert_eq!("airdata-42", features[0]["id"]);
    assert_eq!(
        serde_json::json!([-122.1, 37.4]),
        features[0]["geometry"]["coordinates"]
    );
}

#[test]
fn test_run_unauthorized() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/broadcasts/recent");
        then.status(401).body("bad key");
    });

    let dir = tempdir().unwrap();
    let out = dir.path().join("features.json");
    let cfg = dir.path().join("airdata.hcl");
    fs::write(
        &cfg,
        format!(
            "version = 1\napi_token = \"wrong\"\n\nsite {{\n  base_url = \"{}\"\n}}\n",
            server.base_url()
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.env_remove("AIRDATA_API_TOKEN")
        .arg("-c")
        .arg(&cfg)
        .arg("-o")
        .arg(&out)
        .arg("run")
        .assert()
        .failure();

    assert!(!out.exists());
}
