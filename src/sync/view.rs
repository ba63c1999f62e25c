use std::cmp::Ordering;

use crate::core::task::Task;
use crate::core::temporal::DueMoment;

use super::ReplicaData;

/// A display-ready task: the raw record joined with its project and label
/// names and a resolved due moment.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub id: String,
    pub content: String,
    pub priority: u8,
    pub project_name: String,
    pub label_names: Vec<String>,
    pub due: Option<DueMoment>,
    pub child_order: i64,
}

/// Build the sorted task list the new-tab page renders.
///
/// Checked and deleted items are dropped. Dated tasks come first in
/// chronological order; undated tasks follow, ordered by `child_order`,
/// which also breaks ties among equal due moments.
pub fn build_task_views(data: &ReplicaData) -> Vec<TaskView> {
    let mut views: Vec<TaskView> = data
        .items
        .iter()
        .filter(|item| !item.checked && !item.is_deleted)
        .map(|item| project_task(item, data))
        .collect();

    views.sort_by(|a, b| match (&a.due, &b.due) {
        (Some(a_due), Some(b_due)) => a_due
            .when
            .cmp(&b_due.when)
            .then(a.child_order.cmp(&b.child_order)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.child_order.cmp(&b.child_order),
    });

    views
}

fn project_task(item: &Task, data: &ReplicaData) -> TaskView {
    let project_name = item
        .project_id
        .as_deref()
        .and_then(|id| data.projects.iter().find(|p| p.id == id))
        .map(|p| p.name.clone())
        .unwrap_or_default();

    // Unknown label ids are silently dropped
    let label_names = item
        .labels
        .iter()
        .filter_map(|id| data.labels.iter().find(|l| &l.id == id))
        .map(|l| l.name.clone())
        .collect();

    TaskView {
        id: item.id.clone(),
        content: item.content.clone(),
        priority: item.priority,
        project_name,
        label_names,
        due: item.due_moment(),
        child_order: item.child_order,
    }
}
