use rusqlite::Connection;
use startpage_core::db::migrations::latest_version;
use startpage_core::db::{open_db, open_db_in_memory, DbError};
use startpage_core::{
    LaunchParams, LoadOutcome, RepoError, SqliteStateRepository, StateRepository, Store,
    STATE_KEY,
};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_state");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "db_version_unsupported");
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile").join("state").join("startpage.sqlite3");

    let conn = open_db(&path).unwrap();
    assert!(path.exists());
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn open_db_reports_unusable_parent_as_create_dir_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"plain file").unwrap();
    let path = blocker.join("nested").join("startpage.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "db_create_dir_failed");
    match err {
        DbError::CreateDir { path: parent, .. } => {
            assert_eq!(parent, blocker.join("nested"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sqlite_repository_overwrites_and_removes() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteStateRepository::new(&conn);

    assert_eq!(repo.get(STATE_KEY).unwrap(), None);
    repo.set(STATE_KEY, "first").unwrap();
    repo.set(STATE_KEY, "second").unwrap();
    assert_eq!(repo.get(STATE_KEY).unwrap().as_deref(), Some("second"));

    repo.remove(STATE_KEY).unwrap();
    assert_eq!(repo.get(STATE_KEY).unwrap(), None);
}

#[test]
fn non_text_value_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_state (key, value) VALUES (?1, ?2);",
        rusqlite::params![STATE_KEY, vec![0xffu8, 0x00]],
    )
    .unwrap();

    let repo = SqliteStateRepository::new(&conn);
    assert!(matches!(
        repo.get(STATE_KEY).unwrap_err(),
        RepoError::InvalidData(_)
    ));

    let store = Store::open(repo, &LaunchParams::default());
    assert!(matches!(
        store.load_outcome(),
        LoadOutcome::StorageUnavailable(_)
    ));
}

#[test]
fn store_state_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("startpage.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut store = Store::open(SqliteStateRepository::new(&conn), &LaunchParams::default());
        let dev = store.add_container("dev").unwrap();
        store.add_bookmark(dev, "", "");
        store.commit_edit("github", "https://github.com/").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = Store::open(SqliteStateRepository::new(&conn), &LaunchParams::default());
    assert_eq!(store.load_outcome(), &LoadOutcome::Stored);
    assert_eq!(store.containers()[0].title, "dev");
    let bookmark = store.containers()[0].items[0].as_bookmark().unwrap();
    assert_eq!(bookmark.url, "https://github.com/");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
