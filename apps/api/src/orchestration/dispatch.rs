//! Async Dispatch Shim — drive a future to completion from synchronous code.
//!
//! Two strategies, chosen by whether this thread is already inside a tokio
//! runtime:
//!
//! ```text
//! run_to_completion(fut)
//!   ├─ no runtime on this thread → fresh current-thread runtime, block_on
//!   └─ runtime already active    → isolated runtime on a scoped OS thread, block_on
//! ```
//!
//! `Runtime::block_on` panics when called from inside a runtime, so the second
//! strategy never touches the caller's scheduler. Either runtime is dropped
//! before this function returns, whatever the future's outcome.

use std::future::Future;
use std::io;
use std::thread;

use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to start runtime: {0}")]
    Io(#[from] io::Error),

    #[error("runtime context unavailable: {0}")]
    Context(String),

    #[error("dispatch thread panicked")]
    Panicked,
}

/// Runs `future` to completion and returns its output. Errors produced by the
/// future itself are part of `F::Output` and pass through untouched.
pub fn run_to_completion<F>(future: F) -> Result<F::Output, DispatchError>
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        Err(e) if e.is_missing_context() => block_on_fresh_runtime(future),
        // Thread-local runtime context is being torn down.
        Err(e) => Err(DispatchError::Context(e.to_string())),
        Ok(_) => block_on_isolated_thread(future),
    }
}

fn fresh_runtime() -> io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

fn block_on_fresh_runtime<F: Future>(future: F) -> Result<F::Output, DispatchError> {
    let runtime = fresh_runtime()?;
    Ok(runtime.block_on(future))
}

fn block_on_isolated_thread<F>(future: F) -> Result<F::Output, DispatchError>
where
    F: Future + Send,
    F::Output: Send,
{
    thread::scope(|scope| -> Result<F::Output, DispatchError> {
        let worker = thread::Builder::new()
            .name("orchestration-dispatch".to_string())
            .spawn_scoped(scope, || block_on_fresh_runtime(future))?;
        worker.join().map_err(|_| DispatchError::Panicked)?
    })
}
