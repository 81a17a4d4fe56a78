use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use env_logger::{Builder, Env, fmt::Color};
use std::io::Write;
use once_cell::sync::OnceCell;

/// Environment variable overriding the command line verbosity (e.g. `HEREDITY_LOG=pedigree=trace`)
pub const LOG_ENV_VAR: &str = "HEREDITY_LOG";

const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {msg} {bar:40.cyan/blue} {pos}/{len} ({eta})";

static INSTANCE: OnceCell<Logger> = OnceCell::new();

#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Initialize the global logger. Subsequent calls are no-ops.
    pub fn init(verbosity: u8) {
        if INSTANCE.get().is_some() {
            Self::set_level(verbosity);
            return
        }

        let env = Env::default().filter(LOG_ENV_VAR);
        let logger = Builder::new().filter_level(Self::u8_to_loglevel(verbosity))
            .format(|buf, record| {
                // Only errors get a traceback and an intense message.
                let (traceback, intense) = match record.level() {
                    Level::Error => (
                        format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0)),
                        true
                    ),
                    _ => (String::new(), false),
                };

                let mut arg_style = buf.style();
                arg_style.set_intense(intense);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        // Route log lines through the progress bars, so that neither gets garbled.
        let level = logger.filter();
        let multi_pg = MultiProgress::new();
        if LogWrapper::new(multi_pg.clone(), logger).try_init().is_err() {
            eprintln!("Another logger was already registered. heredity-rs log lines may not be displayed.");
        }
        log::set_max_level(level);
        let _ = INSTANCE.set(Self{multi_pg});
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Error,
            1            => LevelFilter::Warn,
            2            => LevelFilter::Info,
            3            => LevelFilter::Debug,
            4..= u8::MAX => LevelFilter::Trace
        }
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Shared progress bar container. `None` if the logger was never initialized.
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }

    /// Create a progress bar of length `len`, attached to the shared `MultiProgress`.
    /// 
    /// The bar is hidden whenever the logger is uninitialized, or when verbosity is
    /// below `Info`
    pub fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
        let multi = match Self::multi() {
            Some(multi) if log::max_level() >= LevelFilter::Info => multi,
            _ => return ProgressBar::hidden(),
        };

        let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let pb = multi.add(ProgressBar::new(len));
        pb.set_style(style);
        pb.set_message(message);
        pb
    }
}
