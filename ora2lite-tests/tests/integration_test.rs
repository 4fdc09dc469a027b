//! Integration tests for ora2lite with an Oracle Free testcontainer
//!
//! These tests run the full pipeline: dictionary introspection, DDL,
//! row copy with large-object switches, keys and indices, against a real
//! Oracle database. They need Docker and the Oracle client libraries, so
//! they are ignored by default:
//!
//! ```bash
//! cargo test -p ora2lite-tests -- --ignored
//! ```
//!
//! A single container is shared across all tests and started on first use.
//! Tests run sequentially with `serial_test`; each writes its own SQLite file.
//!
//! Container cleanup:
//! - The `watchdog` feature handles cleanup on CTRL+C or SIGTERM signals
//! - For normal process exit, we use `shutdown_hooks` to signal the container thread to stop
//! - The container lives inside the thread, so it's dropped when the thread exits

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use ora2lite::{MigrateConfig, MigrateError, MigrationBuilder};
use ora2lite_db::OracleSource;
use rusqlite::Connection;
use serial_test::serial;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::SyncRunner;
use testcontainers::{GenericImage, ImageExt};

const USER: &str = "scott";
const PASSWORD: &str = "tiger";

// Holds the connect string (container lives in the thread)
static DSN: OnceLock<String> = OnceLock::new();
// Flag to signal the container thread to exit
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Cleanup function called on process exit.
/// Signals the container thread to stop and waits for it to finish.
extern "C" fn cleanup_on_exit() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(500));
}

fn start_container() -> String {
    shutdown_hooks::add_shutdown_hook(cleanup_on_exit);

    let (ready_tx, ready_rx) = std::sync::mpsc::channel();

    thread::spawn(move || {
        let container = GenericImage::new("gvenzl/oracle-free", "23-slim-faststart")
            .with_exposed_port(1521.tcp())
            .with_wait_for(WaitFor::message_on_stdout("DATABASE IS READY TO USE!"))
            .with_env_var("ORACLE_PASSWORD", "testcontainers")
            .with_env_var("APP_USER", USER)
            .with_env_var("APP_USER_PASSWORD", PASSWORD)
            .with_startup_timeout(Duration::from_secs(300))
            .start()
            .unwrap();
        let port = container.get_host_port_ipv4(1521.tcp()).unwrap();
        let dsn = format!("//127.0.0.1:{}/FREEPDB1", port);

        load_fixture(&dsn);
        ready_tx.send(dsn).unwrap();

        // Keep container alive until shutdown is signaled
        while !SHUTDOWN.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(100));
        }
    });

    ready_rx.recv().unwrap()
}

fn load_fixture(dsn: &str) {
    let source = OracleSource::connect(USER, PASSWORD, dsn).unwrap();
    let schema = include_str!("../fixtures/schema.sql");
    for stmt in schema.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        source.inner().execute(stmt, &[]).unwrap();
    }
    source.inner().commit().unwrap();
    source.close().unwrap();
}

fn dsn() -> &'static str {
    DSN.get_or_init(start_container)
}

fn builder() -> MigrationBuilder {
    MigrationBuilder::new(USER, PASSWORD, dsn())
}

fn query_one<T: rusqlite::types::FromSql>(path: &Path, sql: &str) -> T {
    let conn = Connection::open(path).unwrap();
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
#[ignore = "needs Docker and the Oracle client libraries"]
#[serial]
fn test_migrate_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scott.db");

    let report = builder().output(&path).migrate().unwrap();
    assert_eq!(report.tables, 2);
    assert_eq!(report.views, 0);
    assert_eq!(report.rows, 5);

    // Large objects are NULL with the switches off
    let lobs: i64 = query_one(
        &path,
        "SELECT COUNT(\"PHOTO\") + COUNT(\"RESUME\") + COUNT(\"PROFILE\") FROM \"EMP\"",
    );
    assert_eq!(lobs, 0);

    let sal: f64 = query_one(&path, "SELECT \"SAL\" FROM \"EMP\" WHERE \"ENAME\" = 'ALLEN'");
    assert_eq!(sal, 1600.5);

    let empno: i64 = query_one(&path, "SELECT \"EMPNO\" FROM \"EMP\" WHERE \"ENAME\" = 'SMITH'");
    assert_eq!(empno, 7369);

    let hiredate: String =
        query_one(&path, "SELECT \"HIREDATE\" FROM \"EMP\" WHERE \"EMPNO\" = 7369");
    assert!(hiredate.starts_with("1980-12-17 00:00:00"));

    let updated: String =
        query_one(&path, "SELECT \"UPDATED_AT\" FROM \"EMP\" WHERE \"EMPNO\" = 7369");
    assert_eq!(updated, "2024-01-02 03:04:05.123456+02:00");

    let types: String = query_one(
        &path,
        "SELECT group_concat(name || ' ' || type, ', ') FROM pragma_table_info('EMP')",
    );
    assert_eq!(
        types,
        "EMPNO INTEGER, ENAME TEXT, HIREDATE TEXT, SAL NUMERIC, COMM REAL, DEPTNO INTEGER, \
         PHOTO BLOB, RESUME TEXT, PROFILE TEXT, UPDATED_AT TEXT"
    );
}

#[test]
#[ignore = "needs Docker and the Oracle client libraries"]
#[serial]
fn test_migrate_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scott.db");

    let report = builder()
        .output(&path)
        .views()
        .blobs()
        .clobs()
        .xml()
        .keys()
        .indices()
        .migrate()
        .unwrap();
    assert_eq!(report.views, 1);
    assert_eq!(report.rows, 8);
    // EMP_UPPER_IX is function-based and PK/UK indices come with the keys
    assert_eq!(report.indices_created, 1);
    assert_eq!(report.indices_failed, 0);

    let photo: Vec<u8> = query_one(&path, "SELECT \"PHOTO\" FROM \"EMP\" WHERE \"EMPNO\" = 7369");
    assert_eq!(photo, vec![0xCA, 0xFE]);

    let resume: String =
        query_one(&path, "SELECT \"RESUME\" FROM \"EMP\" WHERE \"EMPNO\" = 7521");
    assert_eq!(resume, "resume of ward");

    let profile: String =
        query_one(&path, "SELECT \"PROFILE\" FROM \"EMP\" WHERE \"EMPNO\" = 7369");
    assert!(profile.contains("<skill>sql</skill>"));

    let fk: String = query_one(
        &path,
        "SELECT \"table\" || ' ' || on_delete FROM pragma_foreign_key_list('EMP')",
    );
    assert_eq!(fk, "DEPT CASCADE");

    let indexes: String = query_one(
        &path,
        "SELECT group_concat(name) FROM sqlite_master WHERE type = 'index' AND sql IS NOT NULL",
    );
    assert_eq!(indexes, "EMP_DEPT_IX");

    let default: String = query_one(
        &path,
        "SELECT dflt_value FROM pragma_table_info('DEPT') WHERE name = 'LOC'",
    );
    assert_eq!(default, "'NEW YORK'");
}

#[test]
#[ignore = "needs Docker and the Oracle client libraries"]
#[serial]
fn test_migrate_filtered_with_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emp.db");

    let report = builder()
        .output(&path)
        .include_tables(&["emp"])
        .keys()
        .row_limit(2)
        .name_case(ora2lite::NameCase::Lower)
        .migrate()
        .unwrap();
    assert_eq!(report.tables, 1);
    assert_eq!(report.rows, 2);

    // DEPT is not migrated, so the foreign key is dropped
    let fks: i64 = query_one(&path, "SELECT COUNT(*) FROM pragma_foreign_key_list('emp')");
    assert_eq!(fks, 0);
}

#[test]
#[ignore = "needs Docker and the Oracle client libraries"]
#[serial]
fn test_bad_password_is_usage_error() {
    let config = MigrateConfig {
        user: USER.into(),
        password: "wrong".into(),
        dsn: dsn().into(),
        dry_run: true,
        ..Default::default()
    };

    let err = ora2lite::migrate(&config).unwrap_err();
    assert!(matches!(err, MigrateError::Database(_)));
    assert!(err.is_usage_error());
}
