//! Single evaluation pass specs
//!
//! `gld --once` evaluates every configured trigger immediately, ignoring
//! schedules, and prints one outcome line per trigger. A held gate or a
//! faulted tick is a normal outcome, not a process failure.

use crate::prelude::*;

#[test]
fn once_triggers_when_every_upstream_is_green() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 142, "SUCCESS");
    temp.record_run("deploy-web", 7, "SUCCESS");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api, deploy-web"
build = "touch fired"
"#,
    );

    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_has("trigger 'deploy-all': triggered");

    assert!(
        temp.path().join("fired").exists(),
        "build command should have run"
    );
}

#[test]
fn once_exports_the_cause_to_the_build_command() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 142, "SUCCESS");
    temp.record_run("deploy-web", 7, "SUCCESS");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api, deploy-web"
build = "printf '%s' \"$GL_CAUSE\" > cause.json && printf '%s' \"$GL_TRIGGER\" > trigger.txt"
"#,
    );

    temp.gld().args(&["--once"]).passes();

    let cause = std::fs::read_to_string(temp.path().join("cause.json")).unwrap();
    assert!(
        cause.contains("\"trigger\":\"deploy-all\""),
        "cause should name the trigger, got: {cause}"
    );
    assert!(
        cause.contains("deploy-api #142"),
        "cause should list the consulted runs, got: {cause}"
    );
    assert!(
        cause.contains("deploy-web #7"),
        "cause should list the consulted runs, got: {cause}"
    );

    let trigger = std::fs::read_to_string(temp.path().join("trigger.txt")).unwrap();
    assert_eq!(trigger, "deploy-all");
}

#[test]
fn once_holds_when_an_upstream_failed() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 142, "SUCCESS");
    temp.record_run("deploy-web", 8, "FAILURE");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api, deploy-web"
build = "touch fired"
"#,
    );

    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_eq("trigger 'deploy-all': held (deploy-web FAILURE)\n");

    assert!(
        !temp.path().join("fired").exists(),
        "held gate must not run the build command"
    );
}

#[test]
fn once_holds_on_an_unstable_upstream() {
    let temp = Fixture::empty();
    temp.record_run("qa-suite", 55, "UNSTABLE");
    temp.config(
        r#"
[trigger.release]
schedule = "0 2 * * *"
upstream = "qa-suite"
build = "touch fired"
"#,
    );

    // Only stable successes open the gate.
    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_eq("trigger 'release': held (qa-suite UNSTABLE)\n");
}

#[test]
fn once_holds_when_an_upstream_has_never_built() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 142, "SUCCESS");
    temp.add_job("deploy-web");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api, deploy-web"
build = "touch fired"
"#,
    );

    // The job exists but has no completed run; that is NOT_BUILT, not missing.
    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_eq("trigger 'deploy-all': held (deploy-web NOT_BUILT)\n");
}

#[test]
fn once_holds_when_an_upstream_job_is_unknown() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 142, "SUCCESS");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api, no-such-job"
build = "touch fired"
"#,
    );

    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_eq("trigger 'deploy-all': held (no-such-job missing)\n");
}

#[test]
fn once_ignores_runs_still_in_progress() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 141, "SUCCESS");
    temp.record_in_progress("deploy-api", 142);
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api"
build = "printf '%s' \"$GL_CAUSE\" > cause.json"
"#,
    );

    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_has("trigger 'deploy-all': triggered");

    // The verdict came from the completed #141, not the running #142.
    let cause = std::fs::read_to_string(temp.path().join("cause.json")).unwrap();
    assert!(
        cause.contains("deploy-api #141"),
        "cause should cite the completed run, got: {cause}"
    );
}

#[test]
fn once_reports_a_malformed_record_as_an_error() {
    let temp = Fixture::empty();
    temp.file("registry/deploy-api/9.json", "not json");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api"
build = "touch fired"
"#,
    );

    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_has("trigger 'deploy-all': error:")
        .stdout_has("malformed run record");

    assert!(!temp.path().join("fired").exists());
}

#[test]
fn once_reports_a_failing_build_command_as_an_error() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 142, "SUCCESS");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api"
build = "exit 3"
"#,
    );

    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_has("trigger 'deploy-all': error:")
        .stdout_has("build command exited with code 3");
}

#[test]
fn once_dry_run_skips_the_build_command() {
    let temp = Fixture::empty();
    temp.record_run("deploy-api", 142, "SUCCESS");
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api"
build = "touch fired"
"#,
    );

    temp.gld()
        .args(&["--once", "--dry-run"])
        .passes()
        .stdout_has("trigger 'deploy-all': triggered");

    assert!(
        !temp.path().join("fired").exists(),
        "dry run must not execute the build command"
    );
}

#[test]
fn once_evaluates_triggers_in_file_order() {
    let temp = Fixture::empty();
    temp.record_run("build-web", 3, "SUCCESS");
    temp.record_run("build-api", 9, "ABORTED");
    temp.config(
        r#"
[trigger.web]
schedule = "0 * * * *"
upstream = "build-web"
build = "true"

[trigger.api]
schedule = "0 * * * *"
upstream = "build-api"
build = "true"
"#,
    );

    // Cause ids are random, so match the lines positionally instead of
    // comparing the whole output.
    let out = temp.gld().args(&["--once"]).passes().stdout();
    let web = out
        .find("trigger 'web': triggered (")
        .expect("web line should be present");
    let api = out
        .find("trigger 'api': held (build-api ABORTED)")
        .expect("api line should be present");
    assert!(web < api, "triggers should report in file order:\n{out}");
}

#[test]
fn once_reports_an_empty_config() {
    let temp = Fixture::empty();
    temp.config("");

    temp.gld()
        .args(&["--once"])
        .passes()
        .stdout_eq("no triggers configured\n");
}
