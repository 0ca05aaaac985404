use core::{
    error,
    fmt::{self, Debug, Display, Formatter},
};

use crate::{Location, Tracked};

enum Internal {
    JustContext(Box<dyn Display + Send + Sync>),
    WithSource {
        ctx: Box<dyn Display + Send + Sync>,
        err: Box<dyn error::Error + Send + Sync>,
    },
}

impl Internal {

    fn context(&self) -> &(dyn Display + Send + Sync) {
        match self {
            Self::JustContext(ctx) => &**ctx,
            Self::WithSource { ctx, .. } => &**ctx,
        }
    }

    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::JustContext(_) => None,
            Self::WithSource { err, .. } => Some(&**err),
        }
    }
}

impl Debug for Internal {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::JustContext(ctx) => write!(f, "Error(ctx: {}, err: None)", ctx),
            Self::WithSource { ctx, err } => write!(f, "Error(ctx: {}, err: {:?})", ctx, err),
        }
    }
}

/// Opaque error with a display context, an optional source and an optional location.
///
/// The displayed message is the context only; walk [`error::Error::source`] for the cause.
pub struct Error {
    internal: Internal,
    loc: Option<Location>,
}

impl Error {

    #[inline(always)]
    pub fn new<C>(ctx: C, err: impl error::Error + Send + Sync + 'static) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::new_internal(ctx, err, None)
    }

    #[track_caller]
    pub fn new_tracked<C>(ctx: C, err: impl error::Error + Send + Sync + 'static) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::new_internal(ctx, err, Some(caller!()))
    }

    #[inline(always)]
    pub fn just_context<C>(ctx: C) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::just_context_internal(ctx, None)
    }

    #[track_caller]
    pub fn just_context_tracked<C>(ctx: C) -> Self
        where C: Display + Send + Sync + 'static,
    {
        Self::just_context_internal(ctx, Some(caller!()))
    }

    #[inline(always)]
    pub fn with_location(mut self, loc: Location) -> Self {
        self.loc = Some(loc);
        self
    }

    fn new_internal(
        ctx: impl Display + Send + Sync + 'static,
        err: impl error::Error + Send + Sync + 'static,
        loc: Option<Location>,
    ) -> Self
    {
        Self {
            internal: Internal::WithSource {
                ctx: Box::new(ctx),
                err: Box::new(err),
            },
            loc,
        }
    }

    fn just_context_internal(
        ctx: impl Display + Send + Sync + 'static,
        loc: Option<Location>,
    ) -> Self
    {
        Self {
            internal: Internal::JustContext(Box::new(ctx)),
            loc,
        }
    }
}

impl Display for Error {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.internal.context())
    }
}

impl Debug for Error {

    #[inline(always)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        <Internal as Debug>::fmt(&self.internal, f)
    }
}

impl error::Error for Error {

    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.internal.source()
    }
}

impl Tracked for Error {

    fn location(&self) -> Option<Location> {
        self.loc
    }
}
