use crate::dispatch::ResultSet;
use crate::text::{display_width, pad_right, sanitize_cell};
use crossterm::style::Stylize;
use protocol::{Issue, Query};
use std::io::{self, Write};

pub(crate) const COLUMN_COUNT: usize = 4;
const INDENT: &str = "  ";
const GUTTER: &str = "  ";

/// Display cells of one issue: key, summary, assignee, labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderRow([String; COLUMN_COUNT]);

impl RenderRow {
    pub(crate) fn from_issue(issue: &Issue) -> Self {
        Self([
            sanitize_cell(&issue.key),
            sanitize_cell(issue.summary()),
            sanitize_cell(issue.assignee_display_name()),
            sanitize_cell(&issue.labels().join(" ")),
        ])
    }

    pub(crate) fn cells(&self) -> &[String; COLUMN_COUNT] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ColumnWidths([usize; COLUMN_COUNT]);

impl ColumnWidths {
    /// Widest cell per column; zero for a column with no rows.
    pub(crate) fn measure<'a>(rows: impl IntoIterator<Item = &'a RenderRow>) -> Self {
        let mut widths = [0usize; COLUMN_COUNT];
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(display_width(cell));
            }
        }
        Self(widths)
    }

    pub(crate) fn as_array(&self) -> [usize; COLUMN_COUNT] {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderStyle {
    Plain,
    Highlight,
}

impl HeaderStyle {
    fn apply(self, name: &str) -> String {
        match self {
            Self::Plain => name.to_string(),
            Self::Highlight => name.yellow().to_string(),
        }
    }
}

/// Lays out every query as a header followed by one aligned line per issue
/// and a blank line. Blocks follow `queries`, never map order; widths are
/// shared by all blocks so columns line up across the whole output.
pub(crate) fn render(results: &ResultSet, queries: &[Query], style: HeaderStyle) -> Vec<String> {
    let all_rows: Vec<RenderRow> = results
        .iter()
        .flat_map(|(_, issues)| issues.iter().map(RenderRow::from_issue))
        .collect();
    let widths = ColumnWidths::measure(&all_rows);

    let mut lines = Vec::new();
    for query in queries {
        lines.push(style.apply(&query.name));
        for issue in results.get(&query.name).unwrap_or_default() {
            lines.push(format_row(&RenderRow::from_issue(issue), &widths));
        }
        lines.push(String::new());
    }
    lines
}

fn format_row(row: &RenderRow, widths: &ColumnWidths) -> String {
    let mut line = String::from(INDENT);
    for (cell, width) in row.cells().iter().zip(widths.as_array()) {
        line.push_str(&pad_right(cell, width));
        line.push_str(GUTTER);
    }
    line
}

pub(crate) fn write_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
