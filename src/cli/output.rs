//! Output formatting: result tables and facet summaries.

use std::io::Write;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::search::{FacetResult, Projection, SearchResult};

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A plain ASCII table with `+---+` borders.
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Create a table; `aligns` pairs with `headers` and defaults to left.
    pub fn new(headers: Vec<String>, aligns: Vec<Align>) -> Self {
        TextTable {
            headers,
            aligns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| display_width(cell))
                    .chain(std::iter::once(display_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Write the table.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let widths = self.widths();
        let border = border_line(&widths);

        writeln!(out, "{border}")?;
        writeln!(out, "{}", self.format_row(&self.headers, &widths, false))?;
        writeln!(out, "{border}")?;
        for row in &self.rows {
            writeln!(out, "{}", self.format_row(row, &widths, true))?;
        }
        if !self.rows.is_empty() {
            writeln!(out, "{border}")?;
        }

        Ok(())
    }

    fn format_row(&self, cells: &[String], widths: &[usize], aligned: bool) -> String {
        let mut line = String::from("|");
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = " ".repeat(width.saturating_sub(display_width(cell)));
            let align = if aligned {
                self.aligns.get(i).copied().unwrap_or(Align::Left)
            } else {
                Align::Left
            };
            match align {
                Align::Left => line.push_str(&format!(" {cell}{pad} |")),
                Align::Right => line.push_str(&format!(" {pad}{cell} |")),
            }
        }
        line
    }
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

/// Width of a string in grapheme clusters.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Renders search results as a table of projected fields.
#[derive(Debug, Clone)]
pub struct ResultRenderer {
    projection: Projection,
    show_facets: bool,
}

impl ResultRenderer {
    pub fn new(projection: Projection) -> Self {
        ResultRenderer {
            projection,
            show_facets: false,
        }
    }

    /// Also print hit counts and facet buckets after the table.
    pub fn with_facets(mut self, show_facets: bool) -> Self {
        self.show_facets = show_facets;
        self
    }

    /// Write `result` to `out`.
    ///
    /// Every hit is checked against the projection first; on a type
    /// mismatch nothing is written and the contract error is returned.
    pub fn render<W: Write>(&self, result: &SearchResult, out: &mut W) -> Result<()> {
        let rows = result
            .hits
            .iter()
            .map(|hit| self.projection.row(hit).map(|row| (hit, row)))
            .collect::<Result<Vec<_>>>()?;

        let fields = self.projection.fields();
        let mut table = TextTable::new(
            fields.iter().map(|f| f.label.clone()).collect(),
            fields
                .iter()
                .map(|f| if f.kind.is_numeric() { Align::Right } else { Align::Left })
                .collect(),
        );

        for (hit, row) in rows {
            let cells = row
                .iter()
                .zip(fields)
                .map(|(value, field)| match value {
                    Some(value) => value.to_string(),
                    None => {
                        log::warn!("Hit '{}' has no value for '{}'", hit.id, field.name);
                        String::new()
                    }
                })
                .collect();
            table.add_row(cells);
        }

        table.write_to(out)?;

        if self.show_facets {
            writeln!(out, "{} of {} hits", result.hits.len(), result.total_hits)?;
            for (name, facet) in &result.facets {
                writeln!(out, "{}", facet_summary(name, facet))?;
            }
        }

        Ok(())
    }
}

/// One-line summary of a facet, e.g. `gender: female (3), male (2)`.
pub fn facet_summary(name: &str, facet: &FacetResult) -> String {
    let buckets: Vec<String> = if facet.ranges.is_empty() {
        facet
            .terms
            .iter()
            .map(|t| format!("{} ({})", t.term, t.count))
            .collect()
    } else {
        facet
            .ranges
            .iter()
            .map(|r| format!("{} ({})", r.label, r.count))
            .collect()
    };

    format!("{name}: {}", buckets.join(", "))
}
