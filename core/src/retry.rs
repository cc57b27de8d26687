//! Bounded retry with fallback.
//!
//! Rejection samplers (order dates, unique identifiers) all share one
//! shape: try up to N times, keep the first success, otherwise either
//! apply a fallback or report exhaustion. The sampler's mutable state
//! (usually an rng) is threaded through explicitly so the attempt and the
//! fallback closures can both use it.

/// Try `attempt` up to `attempts` times; on exhaustion return `fallback(state)`.
pub fn retry_or_else<S, T>(
    state: &mut S,
    attempts: usize,
    mut attempt: impl FnMut(&mut S) -> Option<T>,
    fallback: impl FnOnce(&mut S) -> T,
) -> T {
    for _ in 0..attempts {
        if let Some(value) = attempt(state) {
            return value;
        }
    }
    fallback(state)
}

/// Try `attempt` up to `attempts` times; on exhaustion return `Err(exhausted())`.
pub fn retry_or_err<S, T, E>(
    state: &mut S,
    attempts: usize,
    mut attempt: impl FnMut(&mut S) -> Option<T>,
    exhausted: impl FnOnce() -> E,
) -> Result<T, E> {
    for _ in 0..attempts {
        if let Some(value) = attempt(state) {
            return Ok(value);
        }
    }
    Err(exhausted())
}
