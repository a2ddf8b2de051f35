#![warn(clippy::pedantic)]

pub mod replay;
pub mod script;
pub mod settings;

use anyhow::Result as AnyResult;

fn main() -> AnyResult<()> {
    // Settings come first, they decide how loud the log is.
    let settings = settings::Settings::load();

    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(settings.level_filter())
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", settings.level_filter());
    }

    if settings.did_fail_to_load() {
        log::warn!("failed to load settings, using defaults");
        // Only write defaults where nothing exists, a malformed file is the user's to fix.
        if settings::Settings::path().is_some_and(|path| !path.exists()) {
            if let Err(e) = settings.save() {
                log::warn!("failed to save default settings: {e:#}");
            }
        }
    }

    // Args are a simple list of scripts to replay, in order.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        log::info!("usage: sketchpad <script.toml>...");
        return Ok(());
    }

    let mut had_success = false;
    for path in &paths {
        match replay::replay_path(path, &settings) {
            Ok(report) => {
                had_success = true;
                println!("{}:\n{report}", path.display());
            }
            Err(e) => log::error!("failed to replay {path:?}: {e:#}"),
        }
    }
    if !had_success {
        log::warn!("no scripts replayed successfully");
    }
    Ok(())
}
