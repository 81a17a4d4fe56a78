use std::{fmt::Display, panic::Location};

use anyhow::Context;

pub mod prelude {
    extern crate anyhow;
    pub use anyhow::{anyhow, bail, Context, Result};

    extern crate thiserror;
    pub use thiserror::Error;

    pub use super::{LocatedError, LocatedOption};
}

/// Format the location of the (tracked) caller as `[file:line:column]`
#[track_caller]
fn caller_location() -> String {
    let caller = Location::caller();
    format!("[{}:{}:{}]", caller.file(), caller.line(), caller.column())
}

pub trait LocatedError<T, E> {
    /// Wrap the error value with additional context + the location at which it was called.
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Wrap the error value with additional context that is evaluated lazily
    /// only once an error does occur + the location at which it was called.
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> LocatedError<T, E> for Result<T, E>
where
    E: Display + Send + Sync + 'static,
    Result<T, E>: Context<T, E>,
{
    #[track_caller]
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static
    {
        if self.is_ok() {
            return self.context("")
        }
        let loc = caller_location();
        self.context(format!("{loc} {context}"))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        if self.is_ok() {
            return self.context("")
        }
        let loc = caller_location();
        self.with_context(|| format!("{loc} {}", f()))
    }
}

pub trait LocatedOption<T> {
    /// Convert a `None` into an error carrying context + the location at which it was called.
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Convert a `None` into an error carrying lazily evaluated context + the
    /// location at which it was called.
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> LocatedOption<T> for Option<T> {
    #[track_caller]
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static
    {
        match self {
            Some(value) => Ok(value),
            None        => {
                let loc = caller_location();
                self.context(format!("{loc} {context}"))
            }
        }
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        match self {
            Some(value) => Ok(value),
            None        => {
                let loc = caller_location();
                self.with_context(|| format!("{loc} {}", f()))
            }
        }
    }
}
