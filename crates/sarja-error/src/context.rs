use core::{
    error,
    fmt::Display,
};

use crate::Error;

/// Attaches a human readable context to any error, turning it into [`Error`].
pub trait Context<T, E: error::Error + Send + Sync + 'static> {

    fn ctx_err<C>(self, ctx: C) -> Result<T, Error>
        where C: Display + Send + Sync + 'static;

    fn ctx_err_with<C>(self, f: impl FnOnce() -> C) -> Result<T, Error>
        where C: Display + Send + Sync + 'static;
}

impl<T, E: error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {

    #[track_caller]
    fn ctx_err<C>(self, ctx: C) -> Result<T, Error>
        where C: Display + Send + Sync + 'static
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::new_tracked(ctx, err)),
        }
    }

    #[track_caller]
    fn ctx_err_with<C>(self, f: impl FnOnce() -> C) -> Result<T, Error>
        where C: Display + Send + Sync + 'static
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::new_tracked(f(), err)),
        }
    }
}
