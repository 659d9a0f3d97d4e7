#![allow(clippy::unwrap_used)]

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use ratbag_core::{CoreError, ErrorKind, FixtureService, Mutation, Outcome, Session, exit_code};

const STATE: &str = include_str!("fixtures/devices.json");
const MARMOT: &str = "hollering-marmot";

// ── Helpers ─────────────────────────────────────────────────────────

async fn session() -> Session<FixtureService> {
    let service = FixtureService::from_json(STATE).unwrap();
    Session::load(service).await.unwrap()
}

fn args(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Run a command against the G303 fixture.
async fn marmot(session: &Session<FixtureService>, line: &str) -> Outcome {
    session.run(&args(&format!("{MARMOT} {line}"))).await
}

async fn ok(session: &Session<FixtureService>, line: &str) -> String {
    let out = marmot(session, line).await;
    assert!(out.success(), "`{line}` failed: {}", out.stderr);
    assert!(out.stderr.is_empty());
    out.stdout
}

async fn fails(session: &Session<FixtureService>, line: &str, status: i32) {
    let out = marmot(session, line).await;
    assert_eq!(out.status, status, "`{line}`: {}", out.stderr);
    assert!(out.stdout.is_empty(), "`{line}` printed {:?}", out.stdout);
    assert!(!out.stderr.is_empty());
}

// ── Listing and info ────────────────────────────────────────────────

#[tokio::test]
async fn list_prints_one_line_per_device() {
    let s = session().await;
    let out = s.run(&args("list")).await;
    assert_eq!(
        out.stdout,
        "hollering-marmot:    Logitech G303\nsleepy-wombat:       Generic Wireless Mouse"
    );
}

#[tokio::test]
async fn info_shows_device_and_profiles() {
    let s = session().await;
    let out = s.run(&args("sleepy-wombat info")).await;
    assert_snapshot!(out.stdout, @r"
    sleepy-wombat - Generic Wireless Mouse
      Model: usb:1d57:fa60:0
      Firmware: 0.9.2
      Number of Profiles: 1
    Profile 0: (active)
      Name: Default
      Report Rate: 125Hz
      Resolutions:
        0: 1000dpi (active) (default)
    ");
}

#[tokio::test]
async fn active_profile_block() {
    let s = session().await;
    assert_snapshot!(ok(&s, "profile get").await, @r"
    Profile 2: (active)
      Name: Gaming
      Report Rate: 1000Hz
      Resolutions:
        0: 800dpi
        1: 1200x1300dpi (default)
        2: 2300x2400dpi (active)
        3: 400dpi
      Button: 0 is mapped to 'button 1'
      Button: 1 is mapped to 'button 2'
      Button: 2 is mapped to 'profile-cycle-up'
      Button: 3 is mapped to macro '↕B 300ms'
      LED: 0, depth: rgb, mode: on, color: ff0000
      LED: 1, depth: monochrome, mode: off
    ");
}

#[tokio::test]
async fn unknown_device_is_a_usage_error() {
    let s = session().await;
    let out = s.run(&args("no-such-mouse info")).await;
    assert_eq!(out.status, exit_code::USAGE);
    assert!(out.stdout.is_empty());
    assert!(out.stderr.contains("no-such-mouse"));
}

// ── Profiles ────────────────────────────────────────────────────────

#[tokio::test]
async fn enabling_a_disabled_profile() {
    let s = session().await;
    assert!(ok(&s, "profile 3 get").await.starts_with("Profile 3: (disabled)\n"));
    assert_eq!(ok(&s, "profile 3 enable").await, "");
    let block = ok(&s, "profile 3 get").await;
    assert!(!block.contains("(disabled)"), "{block}");
}

#[tokio::test]
async fn active_profile_is_unique_after_set() {
    let s = session().await;
    ok(&s, "profile active set 0").await;
    assert_eq!(ok(&s, "profile active get").await, "0");

    let device = s.device(MARMOT).await.unwrap();
    let active: Vec<_> = device.profiles.iter().filter(|p| p.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].index, 0);
}

#[tokio::test]
async fn prefix_equivalence_with_active_profile() {
    let s = session().await;
    ok(&s, "profile active set 1").await;
    assert_eq!(ok(&s, "rate get").await, ok(&s, "profile 1 rate get").await);
    assert_eq!(ok(&s, "rate get").await, "500");
}

#[tokio::test]
async fn disabled_profile_cannot_be_activated() {
    let s = session().await;
    fails(&s, "profile active set 3", exit_code::CAPABILITY).await;
    fails(&s, "profile active set 4", exit_code::NOT_FOUND).await;
    assert_eq!(ok(&s, "profile active get").await, "2");
}

#[tokio::test]
async fn huge_prefix_index_is_out_of_range() {
    let s = session().await;
    fails(&s, "profile 99999999999999999999 get", exit_code::NOT_FOUND).await;
    fails(&s, "resolution 99999999999999999999 get", exit_code::NOT_FOUND).await;
    fails(&s, "profile 1 profile active get", exit_code::USAGE).await;
}

#[tokio::test]
async fn read_only_name_is_untouched_on_rejection() {
    let s = session().await;
    fails(&s, "profile 0 name set Renamed", exit_code::CAPABILITY).await;
    assert_eq!(ok(&s, "profile 0 name get").await, "");
    assert!(s.service().calls().await.is_empty());

    ok(&s, "profile 1 name set Desk").await;
    assert_eq!(ok(&s, "profile 1 name get").await, "Desk");
}

// ── Report rate ─────────────────────────────────────────────────────

#[tokio::test]
async fn report_rate_round_trip_and_range() {
    let s = session().await;
    assert_eq!(ok(&s, "rate get-all").await, "125 250 500 1000");
    ok(&s, "rate set 250").await;
    assert_eq!(ok(&s, "rate get").await, "250");
    fails(&s, "rate set 333", exit_code::RANGE).await;
    assert_eq!(ok(&s, "rate get").await, "250");
}

#[tokio::test]
async fn device_without_rates_cannot_set_rate() {
    let s = session().await;
    let out = s.run(&args("sleepy-wombat rate set 125")).await;
    assert_eq!(out.status, exit_code::CAPABILITY);
}

// ── Resolutions and DPI ─────────────────────────────────────────────

#[tokio::test]
async fn resolution_lines() {
    let s = session().await;
    assert_eq!(ok(&s, "resolution 1 get").await, "1: 1200x1300dpi (default)");
    assert_eq!(ok(&s, "resolution 2 get").await, "2: 2300x2400dpi (active)");
    assert_eq!(ok(&s, "dpi get").await, "2300x2400dpi");
    assert_eq!(ok(&s, "resolution active get").await, "2");
    assert_eq!(ok(&s, "resolution default get").await, "1");
}

#[tokio::test]
async fn dpi_round_trip_and_rejections() {
    let s = session().await;
    ok(&s, "resolution 0 dpi set 1600").await;
    assert_eq!(ok(&s, "resolution 0 dpi get").await, "1600dpi");

    fails(&s, "resolution 0 dpi set 1000", exit_code::RANGE).await;
    fails(&s, "resolution 0 dpi set 50000", exit_code::RANGE).await;
    fails(&s, "resolution 0 dpi set 900x1000", exit_code::CAPABILITY).await;
    fails(&s, "resolution 0 dpi set fast", exit_code::USAGE).await;
    assert_eq!(ok(&s, "resolution 0 dpi get").await, "1600dpi");

    ok(&s, "resolution 1 dpi set 1000x1100dpi").await;
    assert_eq!(ok(&s, "resolution 1 dpi get").await, "1000x1100dpi");
}

#[tokio::test]
async fn resolution_active_and_default_stay_unique() {
    let s = session().await;
    ok(&s, "resolution active set 0").await;
    ok(&s, "resolution default set 2").await;
    let device = s.device(MARMOT).await.unwrap();
    let p = &device.profiles[2];
    assert_eq!(p.resolutions.iter().filter(|r| r.is_active).count(), 1);
    assert_eq!(p.resolutions.iter().filter(|r| r.is_default).count(), 1);
    assert_eq!(p.active_resolution(), Some(0));
    assert_eq!(p.default_resolution(), Some(2));
}

#[tokio::test]
async fn disabling_a_resolution() {
    let s = session().await;
    fails(&s, "resolution 1 disabled set", exit_code::CAPABILITY).await;
    ok(&s, "resolution 3 disabled set").await;
    assert_eq!(ok(&s, "resolution 3 disabled get").await, "true");
    assert_eq!(ok(&s, "resolution 3 enabled get").await, "false");
    assert_eq!(ok(&s, "resolution 3 get").await, "3: 400dpi (disabled)");
    fails(&s, "resolution active set 3", exit_code::CAPABILITY).await;
    fails(&s, "resolution 3 dpi set 800", exit_code::CAPABILITY).await;
}

// ── Buttons ─────────────────────────────────────────────────────────

#[tokio::test]
async fn macro_round_trip() {
    let s = session().await;
    assert_eq!(
        ok(&s, "button 3 get").await,
        "Button: 3 is mapped to macro '↕B 300ms'"
    );
    ok(&s, "button 0 action set macro +KEY_A -KEY_A t50 +leftshift").await;
    assert_eq!(
        ok(&s, "button 0 action get").await,
        "Button: 0 is mapped to macro '↕A 50ms ↓LEFTSHIFT'"
    );
    ok(&s, "button 0 action set macro").await;
    assert_eq!(
        ok(&s, "button 0 get").await,
        "Button: 0 is mapped to macro 'None'"
    );
}

#[tokio::test]
async fn button_action_kinds_are_gated() {
    let s = session().await;
    fails(&s, "button 1 action set special wheel-up", exit_code::CAPABILITY).await;
    fails(&s, "button 1 action set button 0", exit_code::RANGE).await;
    fails(&s, "button 1 action set special warp-drive", exit_code::USAGE).await;
    ok(&s, "button 1 action set button 5").await;
    assert_eq!(ok(&s, "button 1 get").await, "Button: 1 is mapped to 'button 5'");
    assert_eq!(ok(&s, "button count").await, "4");
}

// ── LEDs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn led_mode_change_keeps_prior_values() {
    let s = session().await;
    ok(&s, "led 0 set mode cycle").await;
    assert_eq!(
        ok(&s, "led 0 get").await,
        "LED: 0, depth: rgb, mode: cycle, duration: 1000, brightness: 20"
    );
}

#[tokio::test]
async fn led_patches_and_rejections() {
    let s = session().await;
    ok(&s, "led 0 set mode breathing color 0x00FF7f duration 500 brightness 9").await;
    assert_eq!(
        ok(&s, "led 0 get").await,
        "LED: 0, depth: rgb, mode: breathing, duration: 500, brightness: 9, color: 00ff7f"
    );
    fails(&s, "led 1 set color ff00ff", exit_code::CAPABILITY).await;
    fails(&s, "led 1 set mode cycle", exit_code::CAPABILITY).await;
    fails(&s, "led 0 set brightness 256", exit_code::RANGE).await;
    fails(&s, "led 0 set duration 10001", exit_code::RANGE).await;
    fails(&s, "led 0 set colour ff0000", exit_code::USAGE).await;
    assert_eq!(ok(&s, "led 1 capabilities").await, "Modes: breathing, off, on");
    assert_eq!(ok(&s, "led count").await, "2");
}

// ── Grammar rejection ───────────────────────────────────────────────

#[tokio::test]
async fn malformed_commands_fail_without_output() {
    let s = session().await;
    fails(&s, "profile 1 profile 2 get", exit_code::USAGE).await;
    fails(&s, "resolution 0 resolution 1 get", exit_code::USAGE).await;
    fails(&s, "profile 9 get", exit_code::NOT_FOUND).await;
    fails(&s, "button 7 get", exit_code::NOT_FOUND).await;
    fails(&s, "name extra", exit_code::USAGE).await;
    fails(&s, "profile 1", exit_code::USAGE).await;
    fails(&s, "frobnicate", exit_code::USAGE).await;
}

#[tokio::test]
async fn execute_reports_typed_errors() {
    let s = session().await;
    let err = s
        .execute(&args("hollering-marmot profile 0 name set X"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capability);
    assert!(matches!(err, CoreError::Capability { .. }));
}

// ── Device Service ──────────────────────────────────────────────────

#[tokio::test]
async fn service_receives_typed_calls() {
    let s = session().await;
    ok(&s, "profile active set 1").await;
    ok(&s, "profile 1 rate get").await;

    let calls = s.service().calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].device_id, MARMOT);
    assert_eq!(calls[0].method, "set_active_profile");
    assert_eq!(calls[0].mutation, Mutation::SetActiveProfile { profile: 1 });
    assert_eq!(s.service().snapshot().await[0].active_profile(), Some(1));
}

#[tokio::test]
async fn sync_failure_is_reported_after_local_change() {
    let s = session().await;
    s.service().fail_synchronize(true);
    fails(&s, "rate set 500", exit_code::SERVICE).await;
    assert_eq!(ok(&s, "rate get").await, "500");
}

#[tokio::test]
async fn concurrent_commands_on_one_device_serialize() {
    let s = session().await;
    let first = args("hollering-marmot profile 1 rate set 125");
    let second = args("hollering-marmot profile 1 rate set 1000");
    let (a, b) = tokio::join!(s.run(&first), s.run(&second));
    assert!(a.success() && b.success());
    assert_eq!(s.service().calls().await.len(), 2);
}

#[tokio::test]
async fn state_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.json");
    std::fs::write(&path, STATE).unwrap();

    let s = Session::load(FixtureService::open(&path).await.unwrap())
        .await
        .unwrap();
    ok(&s, "profile 1 name set Desk").await;

    let reloaded = Session::load(FixtureService::open(&path).await.unwrap())
        .await
        .unwrap();
    assert_eq!(ok(&reloaded, "profile 1 name get").await, "Desk");
}

#[tokio::test]
async fn duplicate_active_profiles_are_rejected_on_load() {
    let broken = STATE.replacen("\"is_active\": false", "\"is_active\": true", 1);
    let err = Session::load(FixtureService::from_json(&broken).unwrap())
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Service);
}
