use compact_str::CompactString;

use termcolor::{Color, ColorSpec};

use crate::Level;

/// An ordered list of segments making up one log line.
#[derive(Default, Clone)]
pub struct LogFmt {
    segments: Vec<SegmentSpec>,
}

impl LogFmt {

    /// `[LEVEL] target: message`, with the level tag colored.
    pub fn for_level(level: Level) -> Self {
        let color = match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Blue,
            Level::Trace => Color::Magenta,
        };
        let mut fmt = Self::default();
        LogFmtBuilder::new(&mut fmt)
            .text("[", |spec| spec)
            .text(level.as_str(), |spec| spec.with_color_spec(|c| {
                c.set_fg(Some(color)).set_bold(true);
            }))
            .text("] ", |spec| spec)
            .target(|spec| spec.with_color_spec(|c| { c.set_dimmed(true); }))
            .text(": ", |spec| spec)
            .message(|spec| spec);
        fmt
    }

    fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<'a> IntoIterator for &'a LogFmt {

    type Item = &'a SegmentSpec;
    type IntoIter = core::slice::Iter<'a, SegmentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[derive(Default, Clone)]
pub struct LogSpec {
    pub color_spec: Option<ColorSpec>,
}

impl LogSpec {

    #[inline(always)]
    pub fn with_color_spec(mut self, f: impl FnOnce(&mut ColorSpec)) -> Self {
        let color_spec = self.color_spec.insert(ColorSpec::new());
        f(color_spec);
        self
    }
}

#[derive(Clone)]
pub enum SegmentSpec {
    Message(LogSpec),
    Target(LogSpec),
    Text(CompactString, LogSpec),
}

/// Rebuilds a [`LogFmt`] from scratch, segment by segment.
pub struct LogFmtBuilder<'a> {
    fmt: &'a mut LogFmt,
}

impl<'a> LogFmtBuilder<'a> {

    #[inline(always)]
    pub fn new(fmt: &'a mut LogFmt) -> Self {
        fmt.clear();
        Self {
            fmt,
        }
    }

    #[inline(always)]
    pub fn message(&mut self, f: impl FnOnce(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Message(f(Default::default())));
        self
    }

    #[inline(always)]
    pub fn target(&mut self, f: impl FnOnce(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Target(f(Default::default())));
        self
    }

    #[inline(always)]
    pub fn text(&mut self, text: &str, f: impl FnOnce(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Text(CompactString::new(text), f(Default::default())));
        self
    }
}
