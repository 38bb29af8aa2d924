//! Командная строка

use crate::log_analyzer::report::{self, FileReport, OutputFormat};
use crate::log_analyzer::{read_log_from, LogAnalysisResult, LogAnalyzer};
use crate::settings::{Settings, SettingsManager};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use valtools_core::i18n::Language;
use valtools_core::Result;

#[derive(Debug, Parser)]
#[command(name = "valtools", version, about = "Analyze BepInEx logs from modded Valheim")]
pub struct Cli {
    /// Path to valtools.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Language for error messages (en, ru)
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one or more log files (`-` reads stdin)
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the known latest mod versions used for the outdated check
    KnownVersions,
}

impl Cli {
    /// Настройки из файла с учётом флагов командной строки
    pub fn effective_settings(&self) -> Result<Settings> {
        let mut settings = SettingsManager::load(self.config.as_deref())?;
        if let Some(lang) = self.lang {
            settings.language = lang;
        }
        if self.verbose {
            settings.log_level = "debug".to_string();
        } else if self.quiet {
            settings.log_level = "error".to_string();
        }
        if let Command::Analyze { format, no_color, .. } = &self.command {
            if let Some(format) = format {
                settings.format = *format;
            }
            if *no_color {
                settings.color = false;
            }
        }
        Ok(settings)
    }
}

/// Выполнить команду. Возвращает true, если все логи обработаны без ошибок.
pub fn execute(cli: &Cli, settings: &Settings) -> Result<bool> {
    match &cli.command {
        Command::Analyze { files, output, .. } => {
            analyze(files, output.as_deref(), settings, std::io::stdin().lock())
        }
        Command::KnownVersions => {
            let table = settings.version_table();
            let mut stdout = std::io::stdout().lock();
            for (name, version) in table.iter() {
                writeln!(stdout, "{} {}", name, version)?;
            }
            Ok(true)
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Результаты по всем входам в порядке аргументов. `-` читается из stdin
/// один раз, файлы анализируются параллельно.
fn analyze_inputs<R: Read>(
    analyzer: &LogAnalyzer,
    files: &[PathBuf],
    mut stdin: R,
) -> Vec<(PathBuf, Result<LogAnalysisResult>)> {
    let paths: Vec<PathBuf> = files.iter().filter(|f| !is_stdin(f)).cloned().collect();
    let mut file_results = analyzer.analyze_files(&paths).into_iter();
    let mut stdin_content: Option<std::io::Result<String>> = None;

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        if is_stdin(file) {
            let content =
                stdin_content.get_or_insert_with(|| read_log_from(&mut stdin, "<stdin>"));
            let result: Result<LogAnalysisResult> = match content {
                Ok(text) => Ok(analyzer.analyze(text)),
                Err(e) => Err(std::io::Error::new(e.kind(), e.to_string()).into()),
            };
            results.push((file.clone(), result));
        } else if let Some(entry) = file_results.next() {
            results.push(entry);
        }
    }
    results
}

fn analyze<R: Read>(
    files: &[PathBuf],
    output: Option<&Path>,
    settings: &Settings,
    stdin: R,
) -> Result<bool> {
    let analyzer = LogAnalyzer::with_version_source(Box::new(settings.version_table()));
    // Цвет только для текста в терминал
    let color = settings.color && output.is_none() && settings.format == OutputFormat::Text;

    let results = analyze_inputs(&analyzer, files, stdin);
    let multiple = results.len() > 1;
    let mut all_ok = true;

    let mut succeeded = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(result) => succeeded.push((path, result)),
            Err(e) => {
                all_ok = false;
                log::error!("Failed to analyze {:?}: {}", path, e);
                eprintln!("{}", e.localized_error_info(settings.language));
            }
        }
    }

    let rendered = if multiple && settings.format == OutputFormat::Json {
        let reports: Vec<FileReport<'_>> = succeeded
            .iter()
            .map(|(path, result)| FileReport {
                path: path.display().to_string(),
                result,
            })
            .collect();
        let mut rendered = report::render_json_batch(&reports)?;
        rendered.push('\n');
        rendered
    } else {
        let mut rendered = String::new();
        for (path, result) in &succeeded {
            if multiple {
                rendered.push_str(&format!("==> {} <==\n\n", path.display()));
            }
            rendered.push_str(&report::render(result, settings.format, color)?);
            rendered.push('\n');
        }
        rendered
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            log::info!("Report written to {:?}", path);
        }
        None => std::io::stdout().lock().write_all(rendered.as_bytes())?,
    }

    Ok(all_ok)
}
