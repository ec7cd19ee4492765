//! Plain-text board rendering.

use std::fmt::Write;
use taskboard_core::{BoardSnapshot, Task};

pub fn render_board(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    for view in &snapshot.columns {
        let _ = writeln!(out, "== {} ({}) ==", view.title(), view.tasks.len());
        for task in &view.tasks {
            let marker = if snapshot.dragged == Some(task.id) {
                '*'
            } else {
                ' '
            };
            let _ = writeln!(out, "{marker} {}", render_task(task));
        }
        out.push('\n');
    }
    out
}

/// One line per task, prefixed by its column id.
pub fn render_list(tasks: &[&Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(out, "{:<11} {}", task.column.id(), render_task(task));
    }
    out
}

fn render_task(task: &Task) -> String {
    let mut line = format!("#{} {} [{}] user {}", task.id, task.title, task.priority, task.user_id);
    if let Some(due) = task.due_date {
        let _ = write!(line, " due {}", due.format("%Y-%m-%d"));
    }
    line
}
