//! Config validation specs
//!
//! `gld --check` prints one report line per trigger and exits non-zero
//! only when some trigger cannot run. Warnings do not fail the check.

use crate::prelude::*;

#[test]
fn check_reports_ok_for_a_valid_trigger() {
    let temp = Fixture::empty();
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "*/5 * * * *"
upstream = "deploy-api, deploy-web"
build = "true"
"#,
    );

    temp.gld()
        .args(&["--check"])
        .passes()
        .stdout_eq("trigger 'deploy-all': ok\n");
}

#[test]
fn check_reports_triggers_in_file_order() {
    let temp = Fixture::empty();
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

    temp.gld()
        .args(&["--check"])
        .passes()
        .stdout_eq("trigger 'web': ok\ntrigger 'api': ok\n");
}

#[test]
fn check_warns_on_every_minute_schedule() {
    let temp = Fixture::empty();
    temp.config(
        r#"
[trigger.noisy]
schedule = "* * * * *"
upstream = "build-api"
build = "true"
"#,
    );

    // Warnings are advisory; the check still passes.
    temp.gld()
        .args(&["--check"])
        .passes()
        .stdout_has("trigger 'noisy': warning:")
        .stdout_has("every minute");
}

#[test]
fn check_fails_on_a_bad_schedule() {
    let temp = Fixture::empty();
    temp.config(
        r#"
[trigger.broken]
schedule = "not a cron"
upstream = "build-api"
build = "true"
"#,
    );

    temp.gld()
        .args(&["--check"])
        .fails()
        .stdout_has("trigger 'broken': error: invalid cron expression");
}

#[test]
fn check_keeps_reporting_after_an_error() {
    let temp = Fixture::empty();
    temp.config(
        r#"
[trigger.broken]
schedule = "not a cron"
upstream = "build-api"
build = "true"

[trigger.good]
schedule = "0 2 * * *"
upstream = "build-api"
build = "true"
"#,
    );

    temp.gld()
        .args(&["--check"])
        .fails()
        .stdout_has("trigger 'broken': error:")
        .stdout_has("trigger 'good': ok");
}

#[test]
fn check_fails_on_an_empty_upstream_list() {
    let temp = Fixture::empty();
    temp.config(
        r#"
[trigger.lonely]
schedule = "0 2 * * *"
upstream = " , "
build = "true"
"#,
    );

    temp.gld()
        .args(&["--check"])
        .fails()
        .stdout_eq("trigger 'lonely': error: upstream list is empty\n");
}

#[test]
fn check_reports_an_empty_config() {
    let temp = Fixture::empty();
    temp.config("");

    temp.gld()
        .args(&["--check"])
        .passes()
        .stdout_eq("no triggers configured\n");
}

#[test]
fn check_fails_when_the_config_is_missing() {
    let temp = Fixture::empty();

    temp.gld()
        .args(&["--check"])
        .fails()
        .stderr_has("failed to read");
}

#[test]
fn check_fails_on_malformed_toml() {
    let temp = Fixture::empty();
    temp.file("config.toml", "this is [not toml");

    temp.gld()
        .args(&["--check"])
        .fails()
        .stderr_has("failed to parse");
}

#[test]
fn check_rejects_unknown_trigger_keys() {
    let temp = Fixture::empty();
    temp.config(
        r#"
[trigger.deploy-all]
schedule = "0 2 * * *"
upstream = "build-api"
build = "true"
branch = "main"
"#,
    );

    temp.gld()
        .args(&["--check"])
        .fails()
        .stderr_has("failed to parse");
}

#[test]
fn check_honors_the_config_flag_over_the_environment() {
    let temp = Fixture::empty();
    // GL_CONFIG points at a path that does not exist; the flag must win.
    temp.file(
        "alt.toml",
        &format!(
            "[settings]\nregistry_root = \"{}\"\n\n[trigger.alt]\nschedule = \"0 2 * * *\"\nupstream = \"build-api\"\nbuild = \"true\"\n",
            temp.registry_root().display()
        ),
    );

    let alt = temp.path().join("alt.toml");
    temp.gld()
        .args(&["--check", "--config", &alt.to_string_lossy()])
        .passes()
        .stdout_eq("trigger 'alt': ok\n");
}
