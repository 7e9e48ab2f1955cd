use betslip_db::{Db, MIGRATIONS};
use rusqlite::Connection;

#[test]
fn migrate_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("migrate.sqlite");

    let mut db = Db::open(&db_path).expect("open db");
    db.migrate().expect("first migrate");
    db.migrate().expect("second migrate");

    let applied = db.applied_migrations().expect("applied");
    let expected: Vec<String> = MIGRATIONS
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(applied, expected);
}

#[test]
fn migrate_keeps_existing_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("existing.sqlite");
    {
        let mut db = Db::open(&db_path).expect("open db");
        db.migrate().expect("migrate");
        db.grant_tokens("u1", 12).expect("grant");
    }

    let mut db = Db::open(&db_path).expect("reopen db");
    db.migrate().expect("migrate again");
    let balance = db.get_balance("u1").expect("balance").expect("row");
    assert_eq!(balance.balance, 12);

    let conn = Connection::open(&db_path).expect("open conn");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .expect("count");
    assert_eq!(count, MIGRATIONS.len() as i64);
}

#[test]
fn balance_check_constraint_rejects_negative_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("check.sqlite");
    let mut db = Db::open(&db_path).expect("open db");
    db.migrate().expect("migrate");

    let conn = Connection::open(&db_path).expect("open conn");
    let result = conn.execute(
        "INSERT INTO user_tokens (user_id, balance, updated_at) VALUES ('u1', -1, '2025-01-01T00:00:00.000Z')",
        [],
    );
    assert!(result.is_err());
}
