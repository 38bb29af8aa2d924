pub mod cli;
pub mod log_analyzer;
pub mod settings;
pub mod utils;

// Re-export core crate
pub use valtools_core::{error, i18n, types};
pub use valtools_core::{ErrorInfo, Language, Result, ValtoolsError};

use chrono::Local;
use clap::Parser;
use settings::Settings;

/// Setup logging. stdout is reserved for reports, so log lines go to stderr
/// and optionally to the file from settings.
fn setup_logging(settings: &Settings) {
    let level = settings
        .log_level_filter()
        .unwrap_or(log::LevelFilter::Info);

    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    let dispatch = match settings.log_file {
        Some(ref path) => {
            let file_output: fern::Output = match fern::log_file(path) {
                Ok(file) => file.into(),
                Err(e) => {
                    eprintln!("Failed to open log file {:?}: {}", path, e);
                    fern::Output::writer(Box::new(std::io::sink()), "\n")
                }
            };
            dispatch.chain(file_output)
        }
        None => dispatch,
    };

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

/// Точка входа бинарника. Возвращает код выхода процесса.
pub fn run() -> i32 {
    let cli = cli::Cli::parse();

    let settings = match cli.effective_settings() {
        Ok(settings) => settings,
        Err(e) => {
            let lang = cli.lang.unwrap_or_default();
            eprintln!("{}", e.localized_error_info(lang));
            return 2;
        }
    };

    setup_logging(&settings);
    log::debug!("Settings: {:?}", settings);

    match cli::execute(&cli, &settings) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.localized_error_info(settings.language));
            1
        }
    }
}
