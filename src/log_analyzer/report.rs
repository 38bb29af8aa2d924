//! Отчёты по результату анализа: текст для терминала, Markdown и JSON

use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use valtools_core::{Incident, LogAnalysisResult, ModEntry, Result, ValtoolsError};

/// Разделитель между блоками инцидентов
pub const INCIDENT_SEPARATOR: &str = "────────────────────────────────────────";

/// Формат вывода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Markdown => "markdown",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ValtoolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(ValtoolsError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Отрисовать результат в выбранном формате
pub fn render(result: &LogAnalysisResult, format: OutputFormat, color: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result, color)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Markdown => Ok(render_markdown(result)),
    }
}

/// Отчёт по одному файлу в JSON-массиве для нескольких входов
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub path: String,
    pub result: &'a LogAnalysisResult,
}

/// Несколько результатов одним JSON-массивом `[{path, result}, ...]`
pub fn render_json_batch(reports: &[FileReport<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// Заголовок блока инцидента
fn incident_header(incident: &Incident) -> String {
    if incident.is_repeated() {
        format!(
            "🔄 {}x occurrences (first at line {}):",
            incident.count, incident.line_number
        )
    } else {
        format!("📍 Line {}:", incident.line_number)
    }
}

/// Список инцидентов с заголовками-счётчиками, блоки через разделитель
pub fn format_incidents(incidents: &[Incident]) -> String {
    incidents
        .iter()
        .map(|incident| format!("{}\n\n{}", incident_header(incident), incident.formatted_message))
        .collect::<Vec<_>>()
        .join(&format!("\n\n{}\n\n", INCIDENT_SEPARATOR))
}

/// То же, что [`format_incidents`], но строки контекста приглушены цветом
fn format_incidents_colored(incidents: &[Incident]) -> String {
    incidents
        .iter()
        .map(|incident| {
            let body = incident
                .context
                .iter()
                .map(|line| {
                    let rendered = line.render();
                    if line.is_muted() {
                        rendered.dimmed().to_string()
                    } else {
                        rendered
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}\n\n{}", incident_header(incident).bold(), body)
        })
        .collect::<Vec<_>>()
        .join(&format!("\n\n{}\n\n", INCIDENT_SEPARATOR.dimmed()))
}

fn version_or_unknown(version: &Option<String>) -> &str {
    version.as_deref().unwrap_or("Unknown")
}

fn push_entries(out: &mut String, entries: &[ModEntry]) {
    for entry in entries {
        if entry.version.is_empty() {
            out.push_str(&format!("  - {}\n", entry.name));
        } else {
            out.push_str(&format!("  - {} {}\n", entry.name, entry.version));
        }
    }
}

/// Текстовый отчёт для терминала
pub fn render_text(result: &LogAnalysisResult, color: bool) -> String {
    let mut out = String::new();
    let heading = |title: String| -> String {
        if color {
            title.bold().to_string()
        } else {
            title
        }
    };

    out.push_str(&heading("Environment".to_string()));
    out.push('\n');
    out.push_str(&format!(
        "  Valheim:     {}\n",
        version_or_unknown(&result.valheim_version)
    ));
    out.push_str(&format!(
        "  BepInEx:     {}\n",
        version_or_unknown(&result.bepinex_version)
    ));
    if let Some(ref pack) = result.bepinex_pack_version {
        out.push_str(&format!("  BepInExPack: {}\n", pack));
    }
    out.push_str(&format!(
        "  Unity:       {}\n\n",
        version_or_unknown(&result.unity_version)
    ));

    out.push_str(&format!(
        "Mods: {}  Patchers: {}  Warnings: {}  Errors: {}",
        result.mods.len(),
        result.patchers.len(),
        result.warnings.len(),
        result.errors.len()
    ));
    if !result.outdated_mods.is_empty() {
        out.push_str(&format!("  Outdated: {}", result.outdated_mods.len()));
    }
    out.push_str("\n\n");

    if !result.outdated_mods.is_empty() {
        out.push_str(&heading(format!("Outdated Mods ({})", result.outdated_mods.len())));
        out.push('\n');
        for entry in &result.outdated_mods {
            out.push_str(&format!(
                "  - {}: {} → {}\n",
                entry.name, entry.current_version, entry.latest_version
            ));
        }
        out.push('\n');
    }

    out.push_str(&heading(format!("Loaded Mods ({})", result.mods.len())));
    out.push('\n');
    push_entries(&mut out, &result.mods);
    out.push('\n');

    out.push_str(&heading(format!("Loaded Patchers ({})", result.patchers.len())));
    out.push('\n');
    push_entries(&mut out, &result.patchers);
    out.push('\n');

    for (title, incidents, empty_text) in [
        ("Warnings", &result.warnings, "No warnings found."),
        ("Errors", &result.errors, "No errors found."),
    ] {
        out.push_str(&heading(format!("{} ({})", title, incidents.len())));
        out.push_str("\n\n");
        if incidents.is_empty() {
            out.push_str(empty_text);
        } else if color {
            out.push_str(&format_incidents_colored(incidents));
        } else {
            out.push_str(&format_incidents(incidents));
        }
        out.push_str("\n\n");
    }

    out
}

/// Отчёт в формате Markdown
pub fn render_markdown(result: &LogAnalysisResult) -> String {
    let mut report = String::new();

    report.push_str("# BepInEx Log Analysis\n\n");

    report.push_str("## Environment\n\n");
    report.push_str(&format!(
        "- **Valheim version:** {}\n",
        version_or_unknown(&result.valheim_version)
    ));
    report.push_str(&format!(
        "- **BepInEx version:** {}\n",
        version_or_unknown(&result.bepinex_version)
    ));
    if let Some(ref pack) = result.bepinex_pack_version {
        report.push_str(&format!("- **BepInExPack version:** {}\n", pack));
    }
    report.push_str(&format!(
        "- **Unity version:** {}\n\n",
        version_or_unknown(&result.unity_version)
    ));

    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Lines analyzed:** {}\n", result.summary.total_lines));
    report.push_str(&format!("- **Mods loaded:** {}\n", result.mods.len()));
    report.push_str(&format!("- **Patchers loaded:** {}\n", result.patchers.len()));
    report.push_str(&format!(
        "- **Warnings:** {} ({} occurrences)\n",
        result.warnings.len(),
        result.summary.warning_occurrences
    ));
    report.push_str(&format!(
        "- **Errors:** {} ({} occurrences)\n",
        result.errors.len(),
        result.summary.error_occurrences
    ));
    if !result.outdated_mods.is_empty() {
        report.push_str(&format!(
            "- **Outdated mods:** {}\n",
            result.outdated_mods.len()
        ));
    }
    report.push('\n');

    if !result.outdated_mods.is_empty() {
        report.push_str("## Outdated Mods\n\n");
        report.push_str("| Mod | Current | Latest |\n|---|---|---|\n");
        for entry in &result.outdated_mods {
            report.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.name, entry.current_version, entry.latest_version
            ));
        }
        report.push('\n');
    }

    for (title, entries) in [("Loaded Mods", &result.mods), ("Loaded Patchers", &result.patchers)] {
        report.push_str(&format!("## {} ({})\n\n", title, entries.len()));
        for entry in entries {
            report.push_str(&format!("- {} `{}`\n", entry.name, entry.version));
        }
        report.push('\n');
    }

    for (title, incidents) in [("Warnings", &result.warnings), ("Errors", &result.errors)] {
        report.push_str(&format!("## {} ({})\n\n", title, incidents.len()));
        for incident in incidents {
            report.push_str(&format!("**{}**\n\n", incident_header(incident)));
            report.push_str("```\n");
            report.push_str(&incident.formatted_message);
            report.push_str("\n```\n\n");
        }
    }

    report
}
