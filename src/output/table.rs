use comfy_table::{ContentArrangement, Table, presets};

use super::OutputFormat;

const NULL_DISPLAY: &str = "—";
const ELLIPSIS: &str = "…";
const DEFAULT_MAX_CELL_WIDTH: usize = 140;
const DEFAULT_MAX_OUTPUT_CHARS: usize = 25_000;

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub max_cell_width: usize,
    pub max_output_chars: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_cell_width: DEFAULT_MAX_CELL_WIDTH,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
        }
    }
}

/// Render rows under a header; `None` cells show as a dash.
pub fn render_rows_table(
    headers: &[&str],
    rows: &[Vec<Option<String>>],
    format: OutputFormat,
    options: &TableOptions,
) -> String {
    let mut table = new_table(format);
    table.set_header(headers.iter().map(|h| h.to_string()).collect::<Vec<_>>());

    for row in rows {
        let cells = row
            .iter()
            .map(|value| format_cell(value.as_deref(), options.max_cell_width))
            .collect::<Vec<_>>();
        table.add_row(cells);
    }

    truncate_output(table.to_string(), options.max_output_chars)
}

pub fn render_key_value_table(
    title: &str,
    rows: &[(String, Option<String>)],
    format: OutputFormat,
    options: &TableOptions,
) -> String {
    let mut table = new_table(format);
    table.set_header(vec![title.to_string(), "Value".to_string()]);

    for (key, value) in rows {
        let key = truncate_string(key, options.max_cell_width);
        let value = format_cell(value.as_deref(), options.max_cell_width);
        table.add_row(vec![key, value]);
    }

    truncate_output(table.to_string(), options.max_output_chars)
}

fn new_table(format: OutputFormat) -> Table {
    let mut table = Table::new();
    match format {
        OutputFormat::Markdown => {
            table.load_preset(presets::ASCII_MARKDOWN);
        }
        _ => {
            table.load_preset(presets::UTF8_FULL);
        }
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn format_cell(value: Option<&str>, max_cell_width: usize) -> String {
    match value {
        Some(value) => truncate_string(value, max_cell_width),
        None => NULL_DISPLAY.to_string(),
    }
}

fn truncate_string(input: &str, max_len: usize) -> String {
    let len = input.chars().count();
    if len <= max_len {
        return input.to_string();
    }
    if max_len <= 1 {
        return ELLIPSIS.to_string();
    }
    let truncated: String = input.chars().take(max_len - 1).collect();
    format!("{}{}", truncated, ELLIPSIS)
}

fn truncate_output(output: String, max_len: usize) -> String {
    if output.len() <= max_len {
        return output;
    }
    let mut truncated = output.chars().take(max_len).collect::<String>();
    truncated.push_str("\n[output truncated]");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_cells() {
        let out = format_cell(Some("abcdefghijklmnopqrstuvwxyz"), 8);
        assert_eq!(out, "abcdefg…");
    }

    #[test]
    fn renders_missing_values_as_dash() {
        let rows = vec![("schema".to_string(), None)];
        let out = render_key_value_table(
            "Environment",
            &rows,
            OutputFormat::Pretty,
            &TableOptions::default(),
        );
        assert!(out.contains("—"));
    }

    #[test]
    fn markdown_rows_use_pipes() {
        let rows = vec![vec![Some("development".to_string()), Some("sqlite3".to_string())]];
        let out = render_rows_table(
            &["Name", "Dialect"],
            &rows,
            OutputFormat::Markdown,
            &TableOptions::default(),
        );
        assert!(out.contains("| development"));
        assert!(out.contains("sqlite3"));
    }

    #[test]
    fn truncates_output_when_too_long() {
        let rows = vec![vec![Some("x".repeat(200))]];
        let options = TableOptions {
            max_output_chars: 50,
            ..TableOptions::default()
        };
        let out = render_rows_table(&["value"], &rows, OutputFormat::Pretty, &options);
        assert!(out.contains("[output truncated]"));
    }
}
