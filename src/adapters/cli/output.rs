//! Rendering of API records for the terminal.

use std::io::Write;

use clap::ValueEnum;
use serde_json::Value;

use crate::application::formatters::{
    EMPTY, Locale, format_currency, format_date, format_datetime, format_document, format_phone,
};
use crate::domain::entities::{Pagination, page_window};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, locale-formatted text (default)
    #[default]
    Human,
    /// Raw JSON as returned by the API
    Json,
}

const SUMMARY_FIELDS: [&str; 6] = ["name", "title", "description", "status", "scheduledAt", "total"];
const PAGE_WINDOW: u32 = 5;

pub struct Printer<'w> {
    format: OutputFormat,
    locale: Locale,
    out: &'w mut dyn Write,
}

impl<'w> Printer<'w> {
    pub fn new(format: OutputFormat, locale: Locale, out: &'w mut dyn Write) -> Self {
        Self {
            format,
            locale,
            out,
        }
    }

    pub fn message(&mut self, text: &str) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Human => writeln!(self.out, "{text}"),
            OutputFormat::Json => writeln!(self.out, "{}", serde_json::json!({ "message": text })),
        }
    }

    pub fn record(&mut self, record: &Value) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(self.out, "{}", pretty(record)),
            OutputFormat::Human => match record {
                Value::Object(map) => {
                    let width = map.keys().map(String::len).max().unwrap_or(0);
                    for (key, value) in map {
                        writeln!(
                            self.out,
                            "{key:<width$}  {}",
                            display_field(key, value, self.locale)
                        )?;
                    }
                    Ok(())
                }
                other => writeln!(self.out, "{}", display_field("", other, self.locale)),
            },
        }
    }

    pub fn records(
        &mut self,
        records: &[Value],
        pagination: Option<&Pagination>,
    ) -> std::io::Result<()> {
        if self.format == OutputFormat::Json {
            let body = serde_json::json!({ "data": records, "pagination": pagination });
            return writeln!(self.out, "{}", pretty(&body));
        }

        if records.is_empty() {
            writeln!(self.out, "No records found.")?;
        }
        for record in records {
            let id = record.get("id").map(scalar).unwrap_or_else(|| EMPTY.to_string());
            let summary: Vec<String> = SUMMARY_FIELDS
                .iter()
                .filter_map(|field| {
                    record
                        .get(*field)
                        .filter(|v| !v.is_null())
                        .map(|v| display_field(field, v, self.locale))
                })
                .collect();
            writeln!(self.out, "{id:<24}  {}", summary.join("  |  "))?;
        }

        if let Some(p) = pagination {
            writeln!(self.out, "{}", footer(p))?;
        }
        Ok(())
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => EMPTY.to_string(),
        Value::String(s) if s.is_empty() => EMPTY.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Table footer, e.g. `21-40 of 95  ·  page 2/5  ·  1 [2] 3 4 5`.
pub fn footer(p: &Pagination) -> String {
    let rows = p
        .row_range()
        .map(|(start, end)| format!("{start}-{end} of {}", p.total))
        .unwrap_or_else(|| format!("0 of {}", p.total));
    let pages: Vec<String> = page_window(p.page, p.total_pages, PAGE_WINDOW)
        .into_iter()
        .map(|n| if n == p.page { format!("[{n}]") } else { n.to_string() })
        .collect();
    format!(
        "{rows}  ·  page {}/{}  ·  {}",
        p.page,
        p.total_pages.max(1),
        pages.join(" ")
    )
}

/// Format a field by what its name says it holds.
pub fn display_field(key: &str, value: &Value, locale: Locale) -> String {
    let lower = key.to_ascii_lowercase();
    match value {
        Value::String(s) if lower.ends_with("at") => format_datetime(Some(s), locale),
        Value::String(s) if lower.ends_with("date") || lower == "birthday" => {
            format_date(Some(s), locale)
        }
        Value::String(s) if lower.contains("phone") => format_phone(Some(s)),
        Value::String(s) if lower == "document" || lower == "cpf" || lower == "cnpj" => {
            format_document(Some(s))
        }
        Value::Number(n) if is_money(&lower) => format_currency(n.as_f64(), locale),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(_) => value.to_string(),
        other => scalar(other),
    }
}

fn is_money(key: &str) -> bool {
    ["amount", "price", "total", "balance", "income", "expense"]
        .iter()
        .any(|k| key.contains(k))
}
