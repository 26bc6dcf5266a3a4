pub mod batch;
pub mod pool;

pub use batch::{plan_batches, SampleBatch};
pub use pool::{WorkerPool, WORKERS_ENV};
