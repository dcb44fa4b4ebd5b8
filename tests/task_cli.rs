mod support;

use predicates::str::contains;
use serde_json::Value;
use support::TestDesk;

fn ids(value: &Value) -> Vec<String> {
    value["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|task| task["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn list_is_sorted_by_due_date() {
    let desk = TestDesk::new();
    for due in ["2024-03-03", "2024-01-01", "2024-02-02"] {
        desk.new_task("Dated task", due, "default");
    }

    let value = desk.json(&["task", "ls"]);
    let dates: Vec<&str> = value["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|task| task["dueDate"].as_str())
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-02-02", "2024-03-03"]);
}

#[test]
fn new_task_defaults() {
    let desk = TestDesk::new();
    let value = desk.json(&["task", "new", "Water plants", "--due", "2024-05-01"]);
    assert_eq!(value["code"], 201);
    assert_eq!(value["data"]["priority"], "Medium");
    assert_eq!(value["data"]["status"], "Active");
    assert_eq!(value["data"]["categoryId"], "default");
    assert!(value["data"].get("description").is_none());
}

#[test]
fn validation_failures_are_reported() {
    let desk = TestDesk::new();
    let cases: [(&[&str], &str); 5] = [
        (&["task", "new", "ab", "--due", "2024-01-01"], "title"),
        (&["task", "new", "Valid", "--due", "not-a-date"], "due date"),
        (
            &["task", "new", "Valid", "--due", "2024-01-01", "--priority", "Urgent"],
            "priority",
        ),
        (
            &["task", "new", "Valid", "--due", "2024-01-01", "--status", "Paused"],
            "status",
        ),
        (
            &["task", "new", "Valid", "--due", "2024-01-01", "--category", "nope"],
            "Category does not exist",
        ),
    ];

    for (args, needle) in cases {
        let value = desk.json_err(args, 2);
        assert_eq!(value["error"]["status"], 400);
        let message = value["error"]["message"].as_str().expect("message");
        assert!(message.contains(needle), "{message} should mention {needle}");
    }

    let long = "d".repeat(251);
    let value = desk.json_err(
        &["task", "new", "Valid", "--due", "2024-01-01", "--description", &long],
        2,
    );
    assert!(value["error"]["message"]
        .as_str()
        .expect("message")
        .contains("description"));

    let tasks = desk.json(&["task", "ls"]);
    assert!(ids(&tasks).is_empty());
}

#[test]
fn three_character_title_is_accepted() {
    let desk = TestDesk::new();
    desk.json(&["task", "new", "abc", "--due", "2024-01-01"]);
}

#[test]
fn edit_replaces_fields_and_keeps_id() {
    let desk = TestDesk::new();
    let id = desk.new_task("Original", "2024-01-01", "default");

    let value = desk.json(&[
        "task", "edit", &id, "--title", "Renamed", "--priority", "High", "--due", "2024-02-02",
    ]);
    assert_eq!(value["data"]["id"], id.as_str());
    assert_eq!(value["data"]["title"], "Renamed");
    assert_eq!(value["data"]["priority"], "High");
    assert_eq!(value["data"]["dueDate"], "2024-02-02");
    assert_eq!(value["data"]["status"], "Active");
}

#[test]
fn done_marks_status() {
    let desk = TestDesk::new();
    let id = desk.new_task("Finish me", "2024-01-01", "default");
    let value = desk.json(&["task", "done", &id]);
    assert_eq!(value["command"], "task done");
    assert_eq!(value["data"]["status"], "Done");

    let value = desk.json_err(&["task", "done", "missing"], 2);
    assert_eq!(value["command"], "task done");

    let shown = desk.json(&["task", "show", &id]);
    assert_eq!(shown["data"]["status"], "Done");
}

#[test]
fn delete_and_missing_ids() {
    let desk = TestDesk::new();
    let id = desk.new_task("Short lived", "2024-01-01", "default");

    let value = desk.json(&["task", "rm", &id]);
    assert_eq!(value["code"], 204);

    let value = desk.json_err(&["task", "rm", &id], 2);
    assert_eq!(value["error"]["status"], 404);
    assert_eq!(value["error"]["details"]["task_id"], id.as_str());
}

#[test]
fn filters_are_conjunctive() {
    let desk = TestDesk::new();
    let a = desk.new_category("Alpha", "#111111");
    let b = desk.new_category("Beta", "#222222");
    let a_active = desk.new_task("A active", "2024-06-12", &a);
    let a_done = desk.new_task("A done", "2024-06-12", &a);
    desk.json(&["task", "done", &a_done]);
    desk.new_task("B active", "2024-06-12", &b);

    let value = desk.json(&["task", "ls", "--category", &a, "--status", "Active"]);
    assert_eq!(ids(&value), vec![a_active]);
}

#[test]
fn due_buckets_use_evaluation_date() {
    let desk = TestDesk::new();
    // 2024-06-12 is a Wednesday
    let today = desk.new_task("Today", "2024-06-12", "default");
    let monday = desk.new_task("Monday", "2024-06-10", "default");
    let later = desk.new_task("Later in month", "2024-06-28", "default");
    desk.new_task("Next year", "2025-06-12", "default");

    let on = ["--on", "2024-06-12"];
    let value = desk.json(&["task", "ls", "--due", "today", on[0], on[1]]);
    assert_eq!(ids(&value), vec![today.clone()]);

    let value = desk.json(&["task", "ls", "--due", "week", on[0], on[1]]);
    assert_eq!(ids(&value), vec![monday.clone(), today.clone()]);

    let value = desk.json(&["task", "ls", "--due", "month", on[0], on[1]]);
    assert_eq!(ids(&value), vec![monday, today, later]);
}

#[test]
fn unknown_filter_value_is_user_error() {
    let desk = TestDesk::new();
    let value = desk.json_err(&["task", "ls", "--due", "decade"], 2);
    assert_eq!(value["error"]["kind"], "user_error");
}

#[test]
fn localized_records_on_disk_are_read() {
    let desk = TestDesk::new();
    desk.write_file(
        "data/tasks.json",
        r#"[{"id":"legacy","title":"Starý úkol","description":"","dueDate":"2024-01-05T00:00:00.000Z","priority":"Vysoká","status":"Hotovo","categoryId":"default"}]"#,
    )
    .expect("seed tasks");

    let value = desk.json(&["task", "show", "legacy"]);
    assert_eq!(value["data"]["priority"], "High");
    assert_eq!(value["data"]["status"], "Done");
    assert_eq!(value["data"]["dueDate"], "2024-01-05");
}

#[test]
fn human_listing_shows_category_names() {
    let desk = TestDesk::new();
    let home = desk.new_category("Home", "#123456");
    desk.new_task("Vacuum floor", "2024-01-01", &home);

    desk.cmd()
        .args(["task", "ls"])
        .assert()
        .success()
        .stdout(contains("1 tasks"))
        .stdout(contains("Vacuum floor"))
        .stdout(contains("(Home)"));
}

#[test]
fn undecodable_task_file_is_left_intact() {
    let desk = TestDesk::new();
    let seeded = r#"[{"id":"keep1","title":"Good task","dueDate":"2024-01-01","priority":"Low","status":"Active","categoryId":"default"},{"id":"keep2","title":"Odd date","dueDate":"someday","priority":"Low","status":"Active","categoryId":"default"}]"#;
    desk.write_file("data/tasks.json", seeded).expect("seed tasks");

    let value = desk.json_err(&["task", "new", "Fresh task", "--due", "2024-02-02"], 4);
    assert_eq!(value["error"]["status"], 500);
    assert_eq!(value["error"]["kind"], "storage_failure");

    let tasks = desk.read_collection("tasks");
    let ids: Vec<&str> = tasks
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|task| task["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["keep1", "keep2"]);
}

#[test]
fn listing_warns_about_unknown_categories() {
    let desk = TestDesk::new();
    desk.write_file(
        "data/tasks.json",
        r#"[{"id":"stray","title":"Stray task","dueDate":"2024-01-05","priority":"High","status":"Active","categoryId":"ghost"}]"#,
    )
    .expect("seed tasks");

    let value = desk.json(&["task", "ls"]);
    let warnings = value["warnings"].as_array().expect("warnings");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().expect("warning").contains("ghost"));

    desk.cmd()
        .args(["task", "show", "stray"])
        .assert()
        .success()
        .stdout(contains("priority: High #dc3545"))
        .stdout(contains("status: Active [badge bg-success]"));
}
