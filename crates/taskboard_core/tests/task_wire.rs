use chrono::NaiveDate;
use serde_json::json;
use taskboard_core::{Column, NewTask, Priority, Task, TaskDraft, TaskId, DEFAULT_USER_ID};

#[test]
fn plain_remote_todo_decodes_with_defaults() {
    let task: Task = serde_json::from_value(json!({
        "userId": 1,
        "id": 1,
        "title": "delectus aut autem",
        "completed": false
    }))
    .unwrap();

    assert_eq!(task.id, TaskId(1));
    assert_eq!(task.user_id, 1);
    assert_eq!(task.column, Column::Todo);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.body, None);
    assert_eq!(task.due_date, None);
}

#[test]
fn ambiguous_flags_collapse_by_precedence() {
    let done: Task = serde_json::from_value(json!({
        "id": 1, "title": "t", "completed": true, "inProgress": true
    }))
    .unwrap();
    let review: Task = serde_json::from_value(json!({
        "id": 2, "title": "t", "inProgress": true, "inReview": true
    }))
    .unwrap();
    let in_progress: Task = serde_json::from_value(json!({
        "id": 3, "title": "t", "inProgress": true
    }))
    .unwrap();

    assert_eq!(done.column, Column::Done);
    assert_eq!(review.column, Column::Review);
    assert_eq!(in_progress.column, Column::InProgress);

    let reencoded = serde_json::to_value(&done).unwrap();
    assert_eq!(reencoded["completed"], true);
    assert_eq!(reencoded["inProgress"], false);
    assert_eq!(reencoded["inReview"], false);
}

#[test]
fn full_task_uses_camel_case_wire_fields() {
    let task = Task {
        id: TaskId(12),
        user_id: 3,
        title: "plan sprint".to_string(),
        body: Some("backlog grooming".to_string()),
        priority: Priority::High,
        due_date: NaiveDate::from_ymd_opt(2026, 12, 1),
        column: Column::InProgress,
    };

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 12,
            "userId": 3,
            "title": "plan sprint",
            "body": "backlog grooming",
            "completed": false,
            "inProgress": true,
            "inReview": false,
            "priority": "high",
            "dueDate": "2026-12-01"
        })
    );

    let decoded: Task = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn empty_form_values_decode_as_absent() {
    let task: Task = serde_json::from_value(json!({
        "id": 201,
        "title": "from form",
        "body": "",
        "dueDate": "",
        "priority": "low"
    }))
    .unwrap();

    assert_eq!(task.user_id, DEFAULT_USER_ID);
    assert_eq!(task.body, None);
    assert_eq!(task.due_date, None);
    assert_eq!(task.priority, Priority::Low);
}

#[test]
fn record_without_id_is_not_a_confirmed_task() {
    let err = serde_json::from_value::<Task>(json!({ "title": "draft" })).unwrap_err();
    assert!(err.to_string().contains("no `id`"), "unexpected error: {err}");
}

#[test]
fn malformed_due_date_is_rejected() {
    let err = serde_json::from_value::<Task>(json!({
        "id": 1, "title": "t", "dueDate": "next tuesday"
    }))
    .unwrap_err();
    assert!(err.to_string().contains("invalid dueDate"), "unexpected error: {err}");
}

#[test]
fn create_payload_omits_id_and_sets_column_flags() {
    let draft = TaskDraft {
        title: "write docs".to_string(),
        due_date: NaiveDate::from_ymd_opt(2026, 10, 31),
        ..TaskDraft::default()
    };
    let new_task = NewTask::from_draft(draft, Column::Done).unwrap();

    let value = serde_json::to_value(&new_task).unwrap();
    assert!(value.get("id").is_none());
    assert_eq!(value["completed"], true);
    assert_eq!(value["inProgress"], false);
    assert_eq!(value["inReview"], false);
    assert_eq!(value["priority"], "medium");
    assert_eq!(value["userId"], 1);
    assert_eq!(value["dueDate"], "2026-10-31");
}
