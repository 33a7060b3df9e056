//! Result rendering for stdout.
//!
//! Renders revealed versions and secret listings as raw text, JSON, YAML
//! or an aligned table.

use std::io::Write;

use serde::Serialize;

use crate::core::config::OutputFormat;
use crate::core::domain::Secret;
use crate::core::vault::Revealed;
use crate::error::Result;

/// Separator between table columns.
const GAP: &str = "   ";

#[derive(Serialize)]
struct VersionRecord<'a> {
    name: &'a str,
    version: String,
    payload: &'a str,
}

#[derive(Serialize)]
struct SecretRecord<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,
}

/// Render a revealed version.
pub fn version(out: &mut impl Write, format: OutputFormat, revealed: &Revealed) -> Result<()> {
    let text = revealed.text();
    let record = VersionRecord {
        name: &revealed.name,
        version: revealed.version.to_string(),
        payload: &text,
    };

    match format {
        OutputFormat::Native => writeln!(out, "{}", record.payload)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &record)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, &record)?,
        OutputFormat::Table => table(
            out,
            &["NAME", "VERSION", "PAYLOAD"],
            &[vec![
                record.name.to_string(),
                record.version.clone(),
                record.payload.to_string(),
            ]],
        )?,
    }
    Ok(())
}

/// Render a list of secrets.
pub fn secrets(out: &mut impl Write, format: OutputFormat, secrets: &[Secret]) -> Result<()> {
    match format {
        OutputFormat::Native => {
            for secret in secrets {
                writeln!(out, "{}", secret.name())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &records(secrets))?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, &records(secrets))?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = secrets
                .iter()
                .map(|s| vec![s.name().to_string(), created(s).unwrap_or_default()])
                .collect();
            table(out, &["NAME", "CREATED"], &rows)?;
        }
    }
    Ok(())
}

fn records(secrets: &[Secret]) -> Vec<SecretRecord<'_>> {
    secrets
        .iter()
        .map(|s| SecretRecord {
            name: s.name(),
            created: created(s),
        })
        .collect()
}

fn created(secret: &Secret) -> Option<String> {
    secret
        .created()
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// Write a borderless table, columns padded to their widest cell.
fn table(out: &mut impl Write, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header).chain(rows) {
        let mut line = String::new();
        for (i, (cell, width)) in row.iter().zip(&widths).enumerate() {
            if i > 0 {
                line.push_str(GAP);
            }
            line.push_str(&format!("{:<width$}", cell, width = width));
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
