use rusqlite::Connection;

use crate::store::{self, Status};

/// Open the in-memory attendance database and seed it with the sample
/// roster. All state lives in this connection; dropping it (process exit)
/// discards every mutation.
pub fn open_memory_db() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;

    conn.execute(
        "CREATE TABLE students(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            roll_number TEXT NOT NULL,
            course TEXT NOT NULL,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX idx_students_roll ON students(roll_number)",
        [],
    )?;

    // No FOREIGN KEY on student_id: a record may cite a student that was
    // never registered, and queries drop such rows via the join instead.
    // AUTOINCREMENT keeps the id a true insertion index even after a
    // replace-by-date deletes rows.
    conn.execute(
        "CREATE TABLE attendance_records(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id TEXT NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX idx_attendance_date ON attendance_records(date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX idx_attendance_student ON attendance_records(student_id)",
        [],
    )?;

    seed_sample_data(&conn)?;

    Ok(conn)
}

/// The demo roster every session starts from, written through the store's
/// own mutation operations.
fn seed_sample_data(conn: &Connection) -> anyhow::Result<()> {
    let alice = store::add_student(conn, "Alice Johnson", "BCA001", "BCA")?;
    let bob = store::add_student(conn, "Bob Williams", "BCA002", "BCA")?;
    let charlie = store::add_student(conn, "Charlie Brown", "BCA003", "BCA")?;

    store::set_attendance_for_date(
        conn,
        "2024-07-20",
        &[
            (alice.id.clone(), Status::Present),
            (bob.id.clone(), Status::Absent),
            (charlie.id.clone(), Status::Present),
        ],
    )?;
    store::set_attendance_for_date(
        conn,
        "2024-07-21",
        &[
            (alice.id, Status::Present),
            (bob.id, Status::Present),
            (charlie.id, Status::Absent),
        ],
    )?;

    Ok(())
}
