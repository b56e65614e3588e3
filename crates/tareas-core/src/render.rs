use std::io::{self, IsTerminal, Write};

use tareas_shared::{DueMarker, TaskListView, TaskRow};
use unicode_width::UnicodeWidthStr;

const SHORT_ID_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colors only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn for_stdout() -> Self {
        let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::new(color)
    }

    #[tracing::instrument(skip_all, fields(rows = view.rows().len()))]
    pub fn write_task_list<W: Write>(&self, mut out: W, view: &TaskListView) -> anyhow::Result<()> {
        let rows = match view {
            TaskListView::Empty { message } => {
                writeln!(out, "{message}")?;
                return Ok(());
            }
            TaskListView::Rows(rows) => rows,
        };

        let with_dates = rows.iter().any(|row| row.marker.is_some());
        let mut headers = vec!["ID", "Status", "Category", "Task"];
        if with_dates {
            headers.extend(["Due", "Priority"]);
        }

        let table: Vec<Vec<String>> = rows.iter().map(|row| self.cells(row, with_dates)).collect();
        write_table(
            &mut out,
            headers.into_iter().map(str::to_string).collect(),
            table,
        )?;
        Ok(())
    }

    fn cells(&self, row: &TaskRow, with_dates: bool) -> Vec<String> {
        let id = if row.marker.is_none() && row.key.len() > SHORT_ID_LEN {
            row.key[..SHORT_ID_LEN].to_string()
        } else {
            row.key.clone()
        };
        let status = if row.completed {
            self.paint("done", "2")
        } else {
            "open".to_string()
        };

        let mut title = row.title.clone();
        if let Some(description) = row.description.as_deref() {
            title = format!("{title}: {description}");
        }

        let mut cells = vec![
            self.paint(&id, "33"),
            status,
            row.category_label.clone().unwrap_or_default(),
            title,
        ];

        if with_dates {
            let due = row.due.clone().unwrap_or_default();
            let due = match row.marker {
                Some(DueMarker::Overdue) => self.paint(&due, "31"),
                Some(DueMarker::NearDue) => self.paint(&due, "33"),
                Some(DueMarker::Upcoming) => self.paint(&due, "32"),
                None => due,
            };
            cells.push(due);
            cells.push(row.priority.clone().unwrap_or_default());
        }

        cells
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || text.is_empty() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

/// Writes a header, a dashed rule and the rows with columns padded to
/// their widest visible cell. Trailing padding is dropped from each line.
fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| visible_width(h)).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(visible_width(cell));
        }
    }

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    for line in std::iter::once(&headers).chain([&rule]).chain(&rows) {
        let mut text = String::new();
        for (cell, width) in line.iter().zip(&widths) {
            let pad = width.saturating_sub(visible_width(cell));
            text.push_str(cell);
            text.extend(std::iter::repeat_n(' ', pad + 2));
        }
        writeln!(writer, "{}", text.trim_end())?;
    }
    Ok(())
}

fn visible_width(cell: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(cell).as_str())
}

/// Drops `ESC [ ... m` colour sequences.
fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            plain.push(ch);
            continue;
        }
        for code in chars.by_ref() {
            if code == 'm' {
                break;
            }
        }
    }
    plain
}
