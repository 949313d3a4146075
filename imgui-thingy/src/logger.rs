use std::io::Write;

use env_logger::fmt::style::{AnsiColor, Style};
use log::Level;

/// Color of the `[LEVEL]` tag.
pub fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Cyan,
        Level::Debug | Level::Trace => AnsiColor::BrightBlack,
    };
    color.on_default()
}

/// Installs the global logger: `[INFO] message` lines on stdout.
///
/// The default level is `info`, `RUST_LOG` overrides it.
pub fn init() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let style = level_style(record.level());
            writeln!(buf, "{style}[{}]{style:#} {}", record.level(), record.args())
        })
        .init();
}
