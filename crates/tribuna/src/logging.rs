use colored::{ColoredString, Colorize};
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;
use std::time::Duration;

/// Log target whose records are printed as-is, without the time and
/// target prefix.
pub(crate) const RAW_TARGET: &str = "raw";

pub(crate) struct FormatElapsedTimeOptions {
    pub(crate) red_secs: u64,
    pub(crate) yellow_secs: u64,
    pub(crate) red_millis: Option<u128>,
    pub(crate) yellow_millis: Option<u128>,
    pub(crate) decorate: Option<Box<dyn Fn(ColoredString) -> ColoredString + Send + Sync>>,
}

impl Default for FormatElapsedTimeOptions {
    fn default() -> Self {
        Self {
            red_secs: 2,
            yellow_secs: 1,
            red_millis: Some(500),
            yellow_millis: Some(100),
            decorate: None,
        }
    }
}

pub(crate) fn format_elapsed_time(
    elapsed: Duration,
    options: &FormatElapsedTimeOptions,
) -> ColoredString {
    let formatted = match elapsed {
        elapsed if elapsed.as_secs() > options.red_secs => {
            format!("{}s", elapsed.as_secs()).red()
        }
        elapsed if elapsed.as_secs() > options.yellow_secs => {
            format!("{}s", elapsed.as_secs()).yellow()
        }
        elapsed
            if options
                .red_millis
                .is_some_and(|threshold| elapsed.as_millis() > threshold) =>
        {
            format!("{}ms", elapsed.as_millis()).red()
        }
        elapsed
            if options
                .yellow_millis
                .is_some_and(|threshold| elapsed.as_millis() > threshold) =>
        {
            format!("{}ms", elapsed.as_millis()).yellow()
        }
        _ => format!("{}ms", elapsed.as_millis()).normal(),
    };

    match &options.decorate {
        Some(decorate) => decorate(formatted),
        None => formatted,
    }
}

pub fn init_logging() {
    let env = Env::default().filter_or("RUST_LOG", "info");

    // try_init so that repeated entrypoint calls in one process (tests,
    // mostly) don't panic on the global logger.
    let _ = Builder::from_env(env)
        .format(|buf, record| {
            if std::env::args().any(|arg| arg == "--quiet") {
                return Ok(());
            }

            if record.target() == RAW_TARGET {
                return writeln!(buf, "{}", record.args());
            }

            let time = chrono::Local::now().format("%H:%M:%S");
            writeln!(
                buf,
                "{} {} {}",
                time.to_string().dimmed(),
                record.target().to_lowercase().bright_yellow().bold(),
                record.args()
            )
        })
        .try_init();
}

pub(crate) fn print_title(title: &str) {
    info!(target: RAW_TARGET, "\n{}", format!(" {} ", title).on_green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::Color;

    #[test]
    fn fast_timings_stay_uncolored() {
        let options = FormatElapsedTimeOptions::default();

        let formatted = format_elapsed_time(Duration::from_millis(42), &options);

        assert_eq!(&*formatted, "42ms");
        assert_eq!(formatted.fgcolor, None);
    }

    #[test]
    fn slow_timings_warn_then_alert() {
        let options = FormatElapsedTimeOptions::default();

        let warned = format_elapsed_time(Duration::from_millis(250), &options);
        assert_eq!(&*warned, "250ms");
        assert_eq!(warned.fgcolor, Some(Color::Yellow));

        let alerted = format_elapsed_time(Duration::from_secs(3), &options);
        assert_eq!(&*alerted, "3s");
        assert_eq!(alerted.fgcolor, Some(Color::Red));
    }

    #[test]
    fn millis_thresholds_can_be_disabled() {
        let options = FormatElapsedTimeOptions {
            red_millis: None,
            yellow_millis: None,
            ..Default::default()
        };

        let formatted = format_elapsed_time(Duration::from_millis(800), &options);

        assert_eq!(formatted.fgcolor, None);
    }

    #[test]
    fn decorate_wraps_the_formatted_time() {
        let options = FormatElapsedTimeOptions {
            decorate: Some(Box::new(|msg| format!("(+{})", msg).normal())),
            ..Default::default()
        };

        let formatted = format_elapsed_time(Duration::from_millis(10), &options);

        assert_eq!(&*formatted, "(+10ms)");
    }
}
