//! HTML fragment builders for the server-rendered list views.
//!
//! Views are assembled from small cell builders: each produces the plain
//! value of one column and wraps it in an escaped `<td>`. The owner cell
//! resolves substitution, so the shown name is the actor the task was
//! meant for rather than the substitute holding it.

use flowgate_core::executor::Executor;
use flowgate_core::process::WfProcess;
use flowgate_core::task::WfTask;
use flowgate_core::types::ExecutorId;

/// CSS class applied to every list-view table cell.
pub const CLASS_LIST_TABLE_TD: &str = "list";

/// Escape text for safe inclusion in HTML element content and attribute
/// values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn td(value: &str) -> String {
    format!("<td class=\"{CLASS_LIST_TABLE_TD}\">{}</td>", escape(value))
}

/// One column of a list view: a plain value for sorting/export and a
/// `<td>` fragment for the rendered table.
pub trait CellBuilder {
    type Item;

    /// Plain text value of the cell.
    fn value(&self, item: &Self::Item) -> String;

    /// Escaped `<td>` fragment.
    fn build(&self, item: &Self::Item) -> String {
        td(&self.value(item))
    }
}

// ---------------------------------------------------------------------------
// Process cells
// ---------------------------------------------------------------------------

pub struct ProcessIdCell;

impl CellBuilder for ProcessIdCell {
    type Item = WfProcess;

    fn value(&self, process: &WfProcess) -> String {
        process.id.to_string()
    }
}

pub struct ProcessDefinitionCell;

impl CellBuilder for ProcessDefinitionCell {
    type Item = WfProcess;

    fn value(&self, process: &WfProcess) -> String {
        format!(
            "{} v{}",
            process.definition_name, process.definition_version
        )
    }
}

pub struct ProcessStatusCell;

impl CellBuilder for ProcessStatusCell {
    type Item = WfProcess;

    fn value(&self, process: &WfProcess) -> String {
        process.status.as_str().to_string()
    }
}

pub struct ProcessStartDateCell;

impl CellBuilder for ProcessStartDateCell {
    type Item = WfProcess;

    fn value(&self, process: &WfProcess) -> String {
        process.start_date.format("%Y-%m-%d %H:%M").to_string()
    }
}

pub struct ProcessEndDateCell;

impl CellBuilder for ProcessEndDateCell {
    type Item = WfProcess;

    fn value(&self, process: &WfProcess) -> String {
        match process.end_date {
            Some(end) => end.format("%Y-%m-%d %H:%M").to_string(),
            None => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Task owner cell
// ---------------------------------------------------------------------------

/// Owner column of a task list. Shows the substitution target's display
/// name when the task was acquired by substitution.
pub struct TaskOwnerCell;

impl CellBuilder for TaskOwnerCell {
    type Item = WfTask;

    fn value(&self, task: &WfTask) -> String {
        task.effective_owner().display_name().to_string()
    }
}

// ---------------------------------------------------------------------------
// Composite fragments
// ---------------------------------------------------------------------------

/// Render the process list as an HTML table.
pub fn process_table(processes: &[WfProcess]) -> String {
    let mut html = String::from(
        "<table class=\"list\">\n<tr><th>Id</th><th>Definition</th>\
         <th>Status</th><th>Started</th><th>Ended</th></tr>\n",
    );
    for process in processes {
        html.push_str("<tr>");
        html.push_str(&ProcessIdCell.build(process));
        html.push_str(&ProcessDefinitionCell.build(process));
        html.push_str(&ProcessStatusCell.build(process));
        html.push_str(&ProcessStartDateCell.build(process));
        html.push_str(&ProcessEndDateCell.build(process));
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

/// Render a `<select>` of executors. `selected`, when present, marks the
/// matching option; inactive actors are expected to be filtered out by the
/// caller.
pub fn executor_select(
    name: &str,
    executors: &[Executor],
    selected: Option<ExecutorId>,
) -> String {
    let mut html = format!("<select name=\"{}\">\n", escape(name));
    for executor in executors {
        let marker = if selected == Some(executor.id()) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>\n",
            executor.id(),
            escape(executor.display_name()),
        ));
    }
    html.push_str("</select>\n");
    html
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use flowgate_core::executor::{Actor, Group};
    use flowgate_core::process::ExecutionStatus;

    use super::*;

    fn process() -> WfProcess {
        WfProcess {
            id: 7,
            definition_name: "pay<ment>".into(),
            definition_version: 2,
            status: ExecutionStatus::Active,
            start_date: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
            end_date: None,
            parent_id: None,
            hierarchy_ids: vec![7],
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn cells_escape_values() {
        let cell = ProcessDefinitionCell.build(&process());
        assert_eq!(cell, "<td class=\"list\">pay&lt;ment&gt; v2</td>");
    }

    #[test]
    fn end_date_cell_is_empty_for_running_processes() {
        assert_eq!(ProcessEndDateCell.value(&process()), "");
    }

    #[test]
    fn task_owner_cell_resolves_substitution() {
        let task = WfTask {
            id: 1,
            name: "approve".into(),
            process_id: 7,
            owner: Executor::Actor(Actor {
                id: 5,
                name: "substitute".into(),
                full_name: String::new(),
                active: true,
            }),
            target_actor: Some(Actor {
                id: 6,
                name: "boss".into(),
                full_name: "Big Boss".into(),
                active: true,
            }),
            acquired_by_substitution: true,
        };
        assert_eq!(TaskOwnerCell.value(&task), "Big Boss");
    }

    #[test]
    fn select_marks_the_selected_executor() {
        let executors = vec![
            Executor::Actor(Actor {
                id: 1,
                name: "jdoe".into(),
                full_name: "John Doe".into(),
                active: true,
            }),
            Executor::Group(Group {
                id: 2,
                name: "managers".into(),
                description: String::new(),
            }),
        ];
        let html = executor_select("owner", &executors, Some(2));
        assert!(html.contains("<option value=\"2\" selected>managers</option>"));
        assert!(html.contains("<option value=\"1\">John Doe</option>"));
    }

    #[test]
    fn process_table_contains_one_row_per_process() {
        let html = process_table(&[process()]);
        assert_eq!(html.matches("<tr>").count(), 2); // header + one row
        assert!(html.contains("pay&lt;ment&gt; v2"));
    }
}
