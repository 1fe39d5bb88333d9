use std::process::Command;
use std::sync::Arc;

use rflayout::document::HeadlessDocument;
use rflayout::platform::{ElementQuery, EmulatedViewport, EventDispatcher, EventKind};
use rflayout::{LayoutConfig, LayoutSynchronizer, Viewport};

fn marker_present(doc: &HeadlessDocument) -> bool {
    doc.find(&ElementQuery::tag("body"))
        .map(|n| n.classes.iter().any(|c| c == "small-screen"))
        .unwrap_or(false)
}

#[test]
fn every_event_kind_resynchronizes() {
    let doc = Arc::new(HeadlessDocument::from_path("tests/fixtures/page.html").unwrap());
    let viewport = Arc::new(EmulatedViewport::new(Viewport { width: 1024, height: 600 }));
    let sync = Arc::new(LayoutSynchronizer::new(LayoutConfig::default(), viewport.clone(), doc.clone()));

    let mut dispatcher = EventDispatcher::new();
    LayoutSynchronizer::bind(sync, &mut dispatcher);

    assert_eq!(dispatcher.dispatch(EventKind::Ready), 1);
    assert!(!marker_present(&doc));

    // Portrait phone: rotating a 600x1024 device into landscape crosses the breakpoint.
    viewport.resize(600, 1024);
    dispatcher.dispatch(EventKind::Resize);
    assert!(marker_present(&doc));

    viewport.rotate();
    dispatcher.dispatch(EventKind::OrientationChange);
    assert!(!marker_present(&doc));
}

#[test]
fn rapid_resizes_are_each_applied() {
    let doc = Arc::new(HeadlessDocument::from_path("tests/fixtures/page.html").unwrap());
    let viewport = Arc::new(EmulatedViewport::default());
    let sync = Arc::new(LayoutSynchronizer::new(LayoutConfig::default(), viewport.clone(), doc.clone()));
    let mut dispatcher = EventDispatcher::new();
    LayoutSynchronizer::bind(sync, &mut dispatcher);

    for (w, small) in [(690, true), (700, false), (699, true), (1280, false)] {
        viewport.resize(w, 720);
        dispatcher.dispatch(EventKind::Resize);
        assert_eq!(marker_present(&doc), small, "width {}", w);
    }
}

#[test]
fn unbound_events_do_nothing() {
    let doc = Arc::new(HeadlessDocument::from_path("tests/fixtures/page.html").unwrap());
    let viewport = Arc::new(EmulatedViewport::new(Viewport { width: 320, height: 480 }));
    let sync = Arc::new(LayoutSynchronizer::new(LayoutConfig::default(), viewport, doc.clone()));
    let mut dispatcher = EventDispatcher::new();
    LayoutSynchronizer::bind(sync, &mut dispatcher);
    dispatcher.clear(EventKind::Ready);

    let before = doc.fingerprint().unwrap();
    assert_eq!(dispatcher.dispatch(EventKind::Ready), 0);
    assert_eq!(doc.fingerprint().unwrap(), before);
}

#[test]
fn cli_reports_each_step() {
    let out = Command::new(env!("CARGO_BIN_EXE_rflayout"))
        .args(["tests/fixtures/page.html", "--width", "650", "--then", "resize:750", "--then", "rotate"])
        .output()
        .expect("run rflayout");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");
    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["event"], "ready");
    assert_eq!(steps[0]["marker_present"], true);
    assert_eq!(steps[0]["spacer_height"], "74px");
    assert_eq!(steps[1]["event"], "resize");
    assert_eq!(steps[1]["marker_present"], false);
    // 750x720 rotated to 720x750 stays above the breakpoint
    assert_eq!(steps[2]["event"], "orientationchange");
    assert_eq!(steps[2]["width"], 720);
    assert_eq!(steps[2]["marker_present"], false);
    assert_eq!(report["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn cli_rejects_bad_config() {
    let dir = std::env::temp_dir().join(format!("rflayout-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let cfg = dir.join("bad.json");
    std::fs::write(&cfg, r#"{ "breakpoint": -3 }"#).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_rflayout"))
        .arg("tests/fixtures/page.html")
        .arg("--config")
        .arg(&cfg)
        .output()
        .expect("run rflayout");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid configuration"));
    let _ = std::fs::remove_dir_all(&dir);
}
