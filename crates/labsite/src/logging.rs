use colored::{ColoredString, Colorize};
use env_logger::{Builder, Env};
use log::{LevelFilter, info};
use std::io::Write;
use std::time::Duration;

pub struct FormatElapsedTimeOptions<'a> {
    pub sec_yellow_threshold: u64,
    pub sec_red_threshold: u64,
    pub millis_yellow_threshold: Option<u128>,
    pub millis_red_threshold: Option<u128>,
    pub additional_fn: Option<&'a (dyn Fn(ColoredString) -> ColoredString + Sync)>,
}

impl Default for FormatElapsedTimeOptions<'_> {
    fn default() -> Self {
        Self {
            sec_yellow_threshold: 1,
            sec_red_threshold: 2,
            millis_yellow_threshold: Some(100),
            millis_red_threshold: Some(500),
            additional_fn: None,
        }
    }
}

/// Installs the global logger. With `quiet`, only errors are printed.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(quiet: bool) {
    let logging_env = Env::default().filter_or("RUST_LOG", "info");
    let mut builder = Builder::from_env(logging_env);

    if quiet {
        builder.filter_level(LevelFilter::Error);
    }

    builder
        .format(|buf, record| {
            if record.target() == "SKIP_FORMAT" {
                return writeln!(buf, "{}", record.args());
            }

            let target = match record.level() {
                log::Level::Error => record.target().to_ascii_lowercase().bold().bright_red(),
                log::Level::Warn => record.target().to_ascii_lowercase().bold().yellow(),
                _ => record.target().to_ascii_lowercase().bold().bright_yellow(),
            };

            writeln!(
                buf,
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                target,
                record.args()
            )
        })
        .init();
}

pub fn format_elapsed_time(elapsed: Duration, options: &FormatElapsedTimeOptions) -> ColoredString {
    let result = match elapsed.as_secs() {
        secs if secs > 60 => format!("{}m{}s", secs / 60, secs % 60).red(),
        secs if secs > options.sec_red_threshold => format!("{}s", secs).red(),
        secs if secs > options.sec_yellow_threshold => format!("{}s", secs).yellow(),
        secs if secs > 0 => format!("{}s", secs).normal(),
        _ => match elapsed.as_millis() {
            millis
                if options
                    .millis_red_threshold
                    .is_some_and(|threshold| millis > threshold) =>
            {
                format!("{}ms", millis).red()
            }
            millis
                if options
                    .millis_yellow_threshold
                    .is_some_and(|threshold| millis > threshold) =>
            {
                format!("{}ms", millis).yellow()
            }
            millis if millis > 0 => format!("{}ms", millis).normal(),
            _ => format!("{}μs", elapsed.as_micros()).normal(),
        },
    };

    if let Some(additional_fn) = &options.additional_fn {
        additional_fn(result)
    } else {
        result
    }
}

pub fn print_title(title: &str) {
    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "SKIP_FORMAT", "{}", format!(" {} ", title).on_green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units() {
        let options = FormatElapsedTimeOptions::default();

        assert_eq!(
            format_elapsed_time(Duration::from_micros(12), &options).to_string(),
            "12μs".normal().to_string()
        );
        assert_eq!(
            format_elapsed_time(Duration::from_millis(40), &options).to_string(),
            "40ms".normal().to_string()
        );
        assert_eq!(
            format_elapsed_time(Duration::from_millis(600), &options).to_string(),
            "600ms".red().to_string()
        );
        assert_eq!(
            format_elapsed_time(Duration::from_secs(125), &options).to_string(),
            "2m5s".red().to_string()
        );
    }

    #[test]
    fn test_format_additional_fn() {
        let wrap = |msg: ColoredString| format!("(+{})", msg).normal();
        let options = FormatElapsedTimeOptions {
            additional_fn: Some(&wrap),
            ..Default::default()
        };

        let formatted = format_elapsed_time(Duration::from_millis(3), &options).to_string();
        assert!(formatted.starts_with("(+"));
        assert!(formatted.contains("3ms"));
    }
}
