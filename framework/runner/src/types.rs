/// Recommended error type for a scenario `main` function and any shared code written around the
/// runner. Compatible with `?` on every fallible call the framework exposes.
pub type ParleyResult<T> = anyhow::Result<T>;
