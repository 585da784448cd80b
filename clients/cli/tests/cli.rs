use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary home directory
fn temp_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get the session file path under the temp home
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".contadesk").join("config.json")
}

const BINARY_NAME: &str = "contadesk";

fn contadesk(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.env("HOME", home.path()).env_remove("CONTADESK_ENVIRONMENT");
    cmd
}

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let home = temp_home();
    contadesk(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("ContaDesk"))
        .stdout(contains("login"))
        .stdout(contains("report"));
}

#[test]
/// Logout command should delete an existing session file.
fn logout_deletes_config_file() {
    let home = temp_home();
    let config_path = config_file_path(&home);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, r#"{"token":"abc"}"#).unwrap();

    contadesk(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Cerrando sesión"));

    assert!(!config_path.exists());
}

#[test]
fn logout_without_session_succeeds() {
    let home = temp_home();
    contadesk(&home).arg("logout").assert().success();
}

#[test]
fn igv_of_a_taxed_amount() {
    let home = temp_home();
    contadesk(&home)
        .args(["igv", "--monto", "100"])
        .assert()
        .success()
        .stdout(contains("GRAVADA"))
        .stdout(contains("18.00"))
        .stdout(contains("118.00"));
}

#[test]
fn igv_of_an_exempt_amount_is_zero() {
    let home = temp_home();
    contadesk(&home)
        .args(["igv", "--monto", "250.5", "--tipo", "exonerada"])
        .assert()
        .success()
        .stdout(contains("EXONERADA"))
        .stdout(contains("0.00"))
        .stdout(contains("250.50"));
}

#[test]
fn igv_rejects_garbage_amounts() {
    let home = temp_home();
    contadesk(&home)
        .args(["igv", "--monto", "abc"])
        .assert()
        .failure()
        .stderr(contains("Monto inválido"));
}

#[test]
fn list_requires_a_stored_session() {
    let home = temp_home();
    contadesk(&home)
        .args(["list", "ingresos"])
        .assert()
        .failure()
        .stderr(contains("contadesk login"));
}

#[test]
fn list_rejects_unknown_modules() {
    let home = temp_home();
    contadesk(&home)
        .args(["list", "nominas"])
        .assert()
        .failure()
        .stderr(contains("módulo desconocido"));
}

#[test]
fn whoami_reads_the_stored_profile() {
    let home = temp_home();
    let config_path = config_file_path(&home);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(
        &config_path,
        r#"{
            "token": "abc",
            "environment": "Local",
            "profile": { "usuarioId": 3, "username": "bodega.sol", "rol": "CLIENTE" }
        }"#,
    )
    .unwrap();

    contadesk(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("bodega.sol"))
        .stdout(contains("CLIENTE"));
}

#[test]
fn blank_stored_token_asks_for_login() {
    let home = temp_home();
    let config_path = config_file_path(&home);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, r#"{ "token": "", "environment": "Local" }"#).unwrap();

    contadesk(&home)
        .args(["list", "alertas"])
        .assert()
        .failure()
        .stderr(contains("contadesk login"));
}
