mod test_support;

use serde_json::json;
use test_support::{find_student_id_by_roll, request_err, request_ok, spawn_daemon};

#[test]
fn remarking_a_date_discards_omitted_students() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();
    let bob = find_student_id_by_roll(&mut stdin, &mut reader, "1", "BCA002");

    // The seed has three records for 2024-07-20. Resubmitting the day with
    // only Bob replaces all of them.
    let outcome = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.setForDate",
        json!({ "date": "2024-07-20", "entries": { (bob.as_str()): "Absent" } }),
    );
    assert_eq!(outcome.get("replaced").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(outcome.get("inserted").and_then(|v| v.as_u64()), Some(1));

    let day = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.records",
        json!({ "date": "2024-07-20" }),
    );
    let records = day
        .get("records")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("studentId").and_then(|v| v.as_str()),
        Some(bob.as_str())
    );
    assert_eq!(
        records[0].get("status").and_then(|v| v.as_str()),
        Some("Absent")
    );

    // The other seeded day is untouched.
    let other = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "attendance.records",
        json!({ "date": "2024-07-21" }),
    );
    assert_eq!(
        other.get("records").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(3)
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn remarking_is_idempotent_for_included_students() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();
    let alice = find_student_id_by_roll(&mut stdin, &mut reader, "1", "BCA001");

    let payload = json!({ "date": "2024-07-20", "entries": { (alice.as_str()): "Present" } });
    let first = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.setForDate",
        payload.clone(),
    );
    assert_eq!(first.get("replaced").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(first.get("inserted").and_then(|v| v.as_u64()), Some(1));

    let second = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.setForDate",
        payload,
    );
    assert_eq!(second.get("replaced").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(second.get("inserted").and_then(|v| v.as_u64()), Some(1));

    let day = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "attendance.records",
        json!({ "date": "2024-07-20" }),
    );
    let records = day
        .get("records")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("status").and_then(|v| v.as_str()),
        Some("Present")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn unknown_student_ids_are_stored_but_never_surface() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let outcome = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.setForDate",
        json!({ "date": "2030-01-01", "entries": { "no-such-student": "Present" } }),
    );
    assert_eq!(outcome.get("inserted").and_then(|v| v.as_u64()), Some(1));

    // Stored (the record count grew) ...
    let health = request_ok(&mut stdin, &mut reader, "2", "health", json!({}));
    assert_eq!(health.get("records").and_then(|v| v.as_i64()), Some(7));

    // ... but dropped from every query.
    let day = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.records",
        json!({ "date": "2030-01-01" }),
    );
    assert_eq!(
        day.get("records").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(0)
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn malformed_dates_statuses_and_entries_are_rejected() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();
    let alice = find_student_id_by_roll(&mut stdin, &mut reader, "1", "BCA001");

    for (i, bad_date) in ["2024-13-40", "July 20", "2024/07/20"].iter().enumerate() {
        let code = request_err(
            &mut stdin,
            &mut reader,
            &format!("d{}", i),
            "attendance.setForDate",
            json!({ "date": bad_date, "entries": { (alice.as_str()): "Present" } }),
        );
        assert_eq!(code, "bad_params", "date {:?} must be rejected", bad_date);
    }

    let code = request_err(
        &mut stdin,
        &mut reader,
        "s1",
        "attendance.setForDate",
        json!({ "date": "2024-07-22", "entries": { (alice.as_str()): "Late" } }),
    );
    assert_eq!(code, "bad_params");

    let code = request_err(
        &mut stdin,
        &mut reader,
        "s2",
        "attendance.setForDate",
        json!({ "date": "2024-07-22" }),
    );
    assert_eq!(code, "bad_params");

    // Failed submissions must not have touched the seed.
    let health = request_ok(&mut stdin, &mut reader, "h", "health", json!({}));
    assert_eq!(health.get("records").and_then(|v| v.as_i64()), Some(6));

    drop(stdin);
    let _ = child.wait();
}
