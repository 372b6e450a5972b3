//! Elastic plain-text tables for terminal output.

use std::{borrow::Cow, fmt::Write as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let align = vec![Align::Left; headers.len()];
        Self {
            headers,
            align,
            rows: Vec::new(),
        }
    }

    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.align.get_mut(column) {
            *slot = align;
        }
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }
        widths.into_iter().map(|w| w.max(3)).collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut output = String::new();
        let _ = writeln!(output, "{}", self.line(&self.headers, &widths, false));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(output, "{}", self.line(&rule, &widths, false));
        for row in &self.rows {
            let _ = writeln!(output, "{}", self.line(row, &widths, true));
        }
        output
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }

    fn line(&self, values: &[String], widths: &[usize], body: bool) -> String {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(idx, width)| {
                let value = values.get(idx).map_or("", String::as_str);
                let value = flatten(value);
                let pad = " ".repeat(width.saturating_sub(display_width(&value)));
                match (body, self.align[idx]) {
                    (true, Align::Right) => format!("{pad}{value}"),
                    _ => format!("{value}{pad}"),
                }
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    }
}

fn display_width(value: &str) -> usize {
    flatten(value).chars().count()
}

fn flatten(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
