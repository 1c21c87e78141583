use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, types::Value, Connection, OptionalExtension, ToSql};
use serde::Serialize;
use uuid::Uuid;

use crate::calc::{self, AttendanceBreakdown};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("student not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Present,
    Absent,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::Absent => "Absent",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "Present" => Some(Status::Present),
            "Absent" => Some(Status::Absent),
            _ => None,
        }
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|s| {
            Status::parse(s).ok_or_else(|| FromSqlError::Other(Box::from("unknown attendance status")))
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub course: String,
    pub sort_order: i64,
}

/// One attendance record joined with the student it belongs to. Records
/// whose student was never registered have no row shape here; the queries
/// drop them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub date: String,
    pub status: Status,
    pub student_id: String,
    pub roll_number: String,
    pub student_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub date: String,
    pub status: Status,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRow {
    pub student_id: String,
    pub student_name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ReplaceOutcome {
    pub replaced: usize,
    pub inserted: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFilter<'a> {
    pub date: Option<&'a str>,
    pub name_contains: Option<&'a str>,
}

fn required_field(value: &str, field: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn validate_iso_date(date: &str) -> Result<(), StoreError> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| StoreError::Validation(format!("date must be YYYY-MM-DD, got {:?}", date)))
}

fn student_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: r.get(0)?,
        name: r.get(1)?,
        roll_number: r.get(2)?,
        course: r.get(3)?,
        sort_order: r.get(4)?,
    })
}

const STUDENT_COLUMNS: &str = "id, name, roll_number, course, sort_order";

/// Register a student. Blank fields are rejected; a duplicate roll number
/// is not (lookups return the earliest registration).
pub fn add_student(
    conn: &Connection,
    name: &str,
    roll_number: &str,
    course: &str,
) -> Result<Student, StoreError> {
    let name = required_field(name, "name")?;
    let roll_number = required_field(roll_number, "rollNumber")?;
    let course = required_field(course, "course")?;

    let sort_order: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM students",
        [],
        |r| r.get(0),
    )?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO students(id, name, roll_number, course, sort_order)
         VALUES(?, ?, ?, ?, ?)",
        (&id, &name, &roll_number, &course, sort_order),
    )?;

    Ok(Student {
        id,
        name,
        roll_number,
        course,
        sort_order,
    })
}

pub fn list_students(conn: &Connection) -> Result<Vec<Student>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM students ORDER BY sort_order",
        STUDENT_COLUMNS
    ))?;
    let students = stmt
        .query_map([], student_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(students)
}

pub fn get_student(conn: &Connection, student_id: &str) -> Result<Student, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM students WHERE id = ?", STUDENT_COLUMNS),
        [student_id],
        student_from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound)
}

/// Case-insensitive exact match on roll number; the earliest registered
/// student wins when duplicates exist.
pub fn find_student_by_roll(conn: &Connection, roll_number: &str) -> Result<Student, StoreError> {
    conn.query_row(
        &format!(
            "SELECT {} FROM students WHERE roll_number = ? COLLATE NOCASE
             ORDER BY sort_order LIMIT 1",
            STUDENT_COLUMNS
        ),
        [roll_number],
        student_from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound)
}

/// Replace the whole day: every existing record for `date` is deleted,
/// then one record per entry is inserted. A student omitted from `entries`
/// loses any record they had for that date. Entries may cite unknown
/// student ids; such records are stored and later dropped by query joins.
pub fn set_attendance_for_date(
    conn: &Connection,
    date: &str,
    entries: &[(String, Status)],
) -> Result<ReplaceOutcome, StoreError> {
    validate_iso_date(date)?;

    let tx = conn.unchecked_transaction()?;
    let replaced = tx.execute("DELETE FROM attendance_records WHERE date = ?", [date])?;
    let mut inserted = 0usize;
    for (student_id, status) in entries {
        tx.execute(
            "INSERT INTO attendance_records(student_id, date, status) VALUES(?, ?, ?)",
            (student_id, date, status),
        )?;
        inserted += 1;
    }
    tx.commit()?;

    Ok(ReplaceOutcome { replaced, inserted })
}

/// Joined (record, student) rows, newest date first with insertion order
/// breaking ties. Both filters are optional; the name filter is a
/// case-insensitive substring match.
pub fn query_records(
    conn: &Connection,
    filter: RecordFilter<'_>,
) -> Result<Vec<RecordRow>, StoreError> {
    let mut sql = String::from(
        "SELECT r.date, r.status, s.id, s.roll_number, s.name
         FROM attendance_records r
         JOIN students s ON s.id = r.student_id",
    );
    let mut clauses: Vec<&str> = Vec::new();
    let mut args: Vec<Value> = Vec::new();
    if let Some(date) = filter.date {
        clauses.push("r.date = ?");
        args.push(Value::from(date.to_string()));
    }
    if let Some(needle) = filter.name_contains {
        clauses.push("instr(lower(s.name), lower(?)) > 0");
        args.push(Value::from(needle.to_string()));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY r.date DESC, r.id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(args), |r| {
            Ok(RecordRow {
                date: r.get(0)?,
                status: r.get(1)?,
                student_id: r.get(2)?,
                roll_number: r.get(3)?,
                student_name: r.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// A student's full history in insertion order.
pub fn student_history(conn: &Connection, student_id: &str) -> Result<Vec<HistoryRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT date, status FROM attendance_records WHERE student_id = ? ORDER BY id",
    )?;
    let rows = stmt
        .query_map([student_id], |r| {
            Ok(HistoryRow {
                date: r.get(0)?,
                status: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn summarize_student(
    conn: &Connection,
    student_id: &str,
) -> Result<AttendanceBreakdown, StoreError> {
    let (present, absent): (i64, i64) = conn.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN status = 'Present' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'Absent' THEN 1 ELSE 0 END), 0)
         FROM attendance_records WHERE student_id = ?",
        [student_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok(calc::breakdown(present, absent))
}

/// One row per registered student in insertion order, zero-record students
/// included at 0. The class-wide percentages stay unrounded; only the
/// single-student view rounds.
pub fn summarize_class(conn: &Connection) -> Result<Vec<ClassRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name,
            COUNT(r.id),
            COALESCE(SUM(CASE WHEN r.status = 'Present' THEN 1 ELSE 0 END), 0)
         FROM students s
         LEFT JOIN attendance_records r ON r.student_id = s.id
         GROUP BY s.id
         ORDER BY s.sort_order",
    )?;
    let rows = stmt
        .query_map([], |r| {
            let id: String = r.get(0)?;
            let name: String = r.get(1)?;
            let total: i64 = r.get(2)?;
            let present: i64 = r.get(3)?;
            Ok(ClassRow {
                student_id: id,
                student_name: name,
                percentage: calc::percent_present(present, total),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn collection_counts(conn: &Connection) -> Result<(i64, i64), StoreError> {
    let students: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
    let records: i64 =
        conn.query_row("SELECT COUNT(*) FROM attendance_records", [], |r| r.get(0))?;
    Ok((students, records))
}
