//! Ordered fallback strategies.
//!
//! Every heuristic in this crate is a list of steps tried in priority order.
//! A step answers `Ok(Some(_))` for a hit, `Ok(None)` for a miss, or `Err(_)`
//! when a DOM query failed. [`first_hit`] treats failures as misses, logging
//! them, so one broken step never stops the ones after it.

use crate::error::Result;

/// A named strategy over a shared context.
pub struct Step<'a, C: ?Sized, T> {
    /// Short label used in logs.
    pub name: &'static str,
    /// The strategy itself.
    pub run: fn(&'a C) -> Result<Option<T>>,
}

impl<'a, C: ?Sized, T> Step<'a, C, T> {
    /// Pair a name with a strategy function.
    pub const fn new(name: &'static str, run: fn(&'a C) -> Result<Option<T>>) -> Self {
        Self { name, run }
    }
}

/// Run `steps` in order and return the first hit.
pub fn first_hit<'a, C: ?Sized, T>(ctx: &'a C, steps: &[Step<'a, C, T>]) -> Option<T> {
    for step in steps {
        match (step.run)(ctx) {
            Ok(Some(hit)) => {
                log::debug!("cascade: step `{}` hit", step.name);
                return Some(hit);
            }
            Ok(None) => log::trace!("cascade: step `{}` missed", step.name),
            Err(err) => log::debug!("cascade: step `{}` failed, continuing: {err}", step.name),
        }
    }
    None
}
