//! Request description, transport, pacing, dispatch, and the worker pool.
mod dispatch;
mod pool;
mod rate;
mod request;
mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::{DispatchSignal, spawn_dispatcher};
pub use pool::{WorkerPool, WorkerShared, execute_once};
pub use rate::{RateLimiter, pacing_period};
pub use request::{FORM_CONTENT_TYPE, RequestSpec};
pub use transport::{Exchange, ReqwestTransport, Transport};
