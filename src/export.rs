//! Collection export.
//!
//! JSON keeps the full entry payloads; CSV flattens each entry to its first
//! definition, one quoted row per entry.

use crate::shared::error::AppResult;
use crate::shared::types::CollectedEntry;
use chrono::SecondsFormat;

/// CSV header row, matching the columns of `csv_row`.
pub const CSV_HEADER: &str = "Word,Part of Speech,Definition,Example,Translation,Collected At";

/// Pretty-printed JSON array of the entries, as handed over.
pub fn export_json(entries: &[CollectedEntry]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// CSV rendering: header plus one row per entry. Every field is
/// double-quoted, embedded quotes doubled.
pub fn export_csv(entries: &[CollectedEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for entry in entries {
        lines.push(csv_row(entry));
    }
    lines.join("\n")
}

fn csv_row(entry: &CollectedEntry) -> String {
    let def = entry.data.definitions.first();
    let collected_at = entry
        .collected_at
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let fields = [
        entry.word.as_str(),
        def.map_or("", |d| d.part_of_speech.as_str()),
        def.map_or("", |d| d.definition.as_str()),
        def.map_or("", |d| d.example.as_str()),
        def.map_or("", |d| d.translation.as_str()),
        collected_at.as_str(),
    ];
    fields.map(quote).join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
