//! Integration tests for the `addon-wrapper` binary.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `addon-wrapper` binary with a config that
/// does not depend on the user's machine.
fn addon_wrapper() -> Command {
    let mut cmd =
        Command::cargo_bin("addon-wrapper").expect("binary 'addon-wrapper' should be built");
    cmd.args(["--config", "/nonexistent/addon-wrapper.toml"]);
    cmd.env_remove("ADDON_WRAPPER_PROXY_ENABLED");
    cmd.env_remove("ADDON_WRAPPER_PROXY_RULES");
    cmd.env_remove("ADDON_WRAPPER_TIMEOUT_MS");
    cmd
}

#[test]
fn help_lists_subcommands() {
    addon_wrapper()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("streams"))
        .stdout(predicate::str::contains("manifest"))
        .stdout(predicate::str::contains("route"));
}

#[test]
fn manifest_canonicalizes_url() {
    addon_wrapper()
        .args(["manifest", "stremio://addon.example.com/cfg/"])
        .assert()
        .success()
        .stdout("https://addon.example.com/cfg/manifest.json\n");
}

#[test]
fn route_follows_env_rules() {
    addon_wrapper()
        .env("ADDON_WRAPPER_PROXY_ENABLED", "true")
        .env("ADDON_WRAPPER_PROXY_RULES", "*:false,addon.example.com:true")
        .args(["route", "https://addon.example.com/manifest.json"])
        .assert()
        .success()
        .stdout("proxy\n");

    addon_wrapper()
        .env("ADDON_WRAPPER_PROXY_ENABLED", "true")
        .env("ADDON_WRAPPER_PROXY_RULES", "*:false,addon.example.com:true")
        .args(["route", "https://other.example.com/manifest.json"])
        .assert()
        .success()
        .stdout("direct\n");
}

#[test]
fn unreachable_addon_reports_error_json() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    addon_wrapper()
        .args([
            "streams",
            &format!("http://127.0.0.1:{port}/"),
            "movie",
            "tt0133093",
            "--name",
            "Local",
        ])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"streams\": []"))
        .stdout(predicate::str::contains("Local request failed"));
}
