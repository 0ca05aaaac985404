use std::{
    sync::{
        Mutex, OnceLock, PoisonError,
        atomic::{AtomicI8, Ordering},
    },
};

use core::str::FromStr;

use termcolor::{WriteColor, StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use rustc_hash::FxHashMap;

use compact_str::CompactString;

use crate::*;

use crate::fmt::SegmentSpec;

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Level {

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

/// Handle to a format registered with [`custom_fmt`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CustomFmt(usize);

pub enum LevelFmt {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Other(CustomFmt, Level),
}

impl LevelFmt {

    #[inline(always)]
    pub fn level(&self) -> Level {
        match *self {
            Self::Error => Level::Error,
            Self::Warn => Level::Warn,
            Self::Info => Level::Info,
            Self::Debug => Level::Debug,
            Self::Trace => Level::Trace,
            Self::Other(_, level) => level,
        }
    }
}

/// Per-target level filter in `RUST_LOG` syntax.
///
/// `info,sarja_mem=trace` logs everything at `info` and `sarja_mem` (and every
/// `sarja_mem::...` module) at `trace`. Unparsable entries are ignored.
#[derive(Clone, Debug)]
pub struct Filters {
    target_levels: FxHashMap<CompactString, Level>,
    base_level: Level,
}

impl Default for Filters {

    fn default() -> Self {
        Self {
            target_levels: FxHashMap::default(),
            base_level: Level::Error,
        }
    }
}

impl Filters {

    pub fn parse(spec: &str) -> Self {
        let mut filters = Self::default();
        for arg in spec.split(',') {
            let (module, level) = match arg.find('=') {
                Some(j) => (Some(arg[0..j].trim()), arg[j + 1..].trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            match module {
                Some(module) if !module.is_empty() => {
                    let entry = filters.target_levels
                        .entry(CompactString::new(module))
                        .or_insert(level);
                    *entry = (*entry).min(level);
                },
                _ => filters.base_level = level,
            }
        }
        filters
    }

    pub fn from_env() -> Self {
        match std::env::var("RUST_LOG") {
            Ok(env) => Self::parse(&env),
            Err(_) => Self::default(),
        }
    }

    pub fn base_level(&self) -> Level {
        self.base_level
    }

    pub fn target_level(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[0..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }

    /// The most verbose level any target can reach.
    pub fn max_level(&self) -> Level {
        self.target_levels
            .values()
            .copied()
            .fold(self.base_level, Level::max)
    }
}

/// Writes one record laid out by `fmt`, followed by a newline.
pub fn write_record(
    out: &mut impl WriteColor,
    fmt: &LogFmt,
    target: &str,
    msg: core::fmt::Arguments,
) -> Result<()>
{
    for segment in fmt {
        match segment {
            SegmentSpec::Message(spec) => write_segment(out, spec, msg)?,
            SegmentSpec::Target(spec) => write_segment(out, spec, format_args!("{}", target))?,
            SegmentSpec::Text(text, spec) => write_segment(out, spec, format_args!("{}", text))?,
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn write_segment(
    out: &mut impl WriteColor,
    spec: &LogSpec,
    args: core::fmt::Arguments,
) -> Result<()>
{
    if let Some(color_spec) = &spec.color_spec {
        out.set_color(color_spec)?;
        out.write_fmt(args)?;
        out.reset()?;
    } else {
        out.write_fmt(args)?;
    }
    Ok(())
}

struct Logger {
    stderr: StandardStream,
    error_fmt: LogFmt,
    warn_fmt: LogFmt,
    info_fmt: LogFmt,
    debug_fmt: LogFmt,
    trace_fmt: LogFmt,
    custom_fmt: Vec<LogFmt>,
    filters: Filters,
}

impl Logger {

    #[inline(always)]
    fn new(filters: Filters) -> Self {
        Self {
            stderr: StandardStream::stderr(ColorChoice::Auto),
            error_fmt: LogFmt::for_level(Level::Error),
            warn_fmt: LogFmt::for_level(Level::Warn),
            info_fmt: LogFmt::for_level(Level::Info),
            debug_fmt: LogFmt::for_level(Level::Debug),
            trace_fmt: LogFmt::for_level(Level::Trace),
            custom_fmt: Vec::new(),
            filters,
        }
    }

    fn log(&mut self, target: &str, level: LevelFmt, msg: core::fmt::Arguments) -> Result<bool> {
        if self.filters.target_level(target) < level.level() {
            return Ok(false)
        }
        let fmt = match level {
            LevelFmt::Error => &self.error_fmt,
            LevelFmt::Warn => &self.warn_fmt,
            LevelFmt::Info => &self.info_fmt,
            LevelFmt::Debug => &self.debug_fmt,
            LevelFmt::Trace => &self.trace_fmt,
            LevelFmt::Other(fmt, _) => self.custom_fmt
                .get(fmt.0)
                .ok_or(LogError::UnknownFormat(fmt))?,
        };
        write_record(&mut self.stderr, fmt, target, msg)?;
        Ok(true)
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// `-1` until [`init`] runs, so every record is filtered without locking.
static MAX_LEVEL: AtomicI8 = AtomicI8::new(-1);

/// Installs the global logger configured from `RUST_LOG`. Later calls do nothing.
pub fn init() {
    init_with(Filters::from_env())
}

pub fn init_with(filters: Filters) {
    if LOGGER.get().is_some() { return }
    let max_level = filters.max_level();
    if LOGGER.set(Mutex::new(Logger::new(filters))).is_ok() {
        MAX_LEVEL.store(max_level as i8, Ordering::Relaxed);
    }
}

#[inline(always)]
pub fn enabled(level: Level) -> bool {
    level as i8 <= MAX_LEVEL.load(Ordering::Relaxed)
}

fn with_logger<R>(f: impl FnOnce(&mut Logger) -> R) -> Option<R> {
    let logger = LOGGER.get()?;
    let mut guard = logger.lock().unwrap_or_else(PoisonError::into_inner);
    Some(f(&mut guard))
}

macro_rules! level_fmt_fns {
    ($($level:ident),+ $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Replaces the `" $level "` record layout. Does nothing before [`init`]."]
                #[inline(always)]
                pub fn [<$level:lower _fmt>](f: impl FnOnce(&mut LogFmtBuilder)) {
                    with_logger(|logger| {
                        let mut builder = LogFmtBuilder::new(&mut logger.[<$level:lower _fmt>]);
                        f(&mut builder);
                    });
                }
            )+
        }
    };
}

level_fmt_fns!(Error, Warn, Info, Debug, Trace);

/// Registers a format for use with [`LevelFmt::Other`]; `None` before [`init`].
pub fn custom_fmt(fmt: LogFmt) -> Option<CustomFmt> {
    with_logger(|logger| {
        logger.custom_fmt.push(fmt);
        CustomFmt(logger.custom_fmt.len() - 1)
    })
}

/// Emits a record. Returns whether anything was written.
#[inline(always)]
pub fn log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    if !enabled(level.level()) {
        return Ok(false)
    }
    with_logger(|logger| logger.log(target, level, args))
        .unwrap_or(Ok(false))
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}
