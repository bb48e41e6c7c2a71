//! Bucket fill passes over a skeleton
//!
//! The sequential pass walks buckets in ascending year, month, day order and
//! folds each computed value into its leaf. The parallel pass hands bucket
//! keys to a fixed pool of workers, each holding its own store handle, and
//! folds results back on the calling thread. Every leaf receives exactly one
//! value from each pass, so both produce identical skeletons.

use super::leaf_computations::LeafComputation;
use crate::database::DataSource;
use crate::errors::{AppError, AppResult};
use crate::types::{DateKey, FillStats, Skeleton};
use crossbeam::channel;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Fill every bucket of `skeleton` from one collection, in traversal order
///
/// # Errors
/// `DataSourceUnavailable` for a missing collection, or for the first bucket
/// whose queries fail (carrying that bucket's `YYYY/MM/DD` coordinates).
pub fn fill<C: LeafComputation>(
    mut skeleton: Skeleton<C::Value>,
    source: &dyn DataSource,
    collection: &str,
    computation: &C,
    stats: &mut FillStats,
) -> AppResult<Skeleton<C::Value>> {
    source.ensure_collection(collection)?;
    info!(
        "Filling {} buckets of {} from {}",
        skeleton.leaf_count(),
        computation.kind(),
        collection
    );

    let mut current_month = None;
    for key in skeleton.keys() {
        if current_month != Some((key.year, key.month)) {
            current_month = Some((key.year, key.month));
            info!("{}: {:04}/{:02}", collection, key.year, key.month);
        }

        let value = compute_bucket(source, collection, computation, &key)?;
        skeleton.absorb(&key, value)?;
        stats.record_bucket(computation.queries_per_bucket());
    }

    stats.collections_filled += 1;
    Ok(skeleton)
}

/// Fill every bucket of `skeleton` using `workers` threads
///
/// `open` is called once per worker; store handles are never shared between
/// threads. The first failing bucket stops the remaining workers and its
/// error is returned.
pub fn fill_parallel<C, S, F>(
    mut skeleton: Skeleton<C::Value>,
    open: F,
    collection: &str,
    computation: &C,
    workers: usize,
    stats: &mut FillStats,
) -> AppResult<Skeleton<C::Value>>
where
    C: LeafComputation,
    S: DataSource,
    F: Fn() -> AppResult<S> + Sync,
{
    let workers = workers.max(1);
    open()?.ensure_collection(collection)?;

    let keys = skeleton.keys();
    info!(
        "Filling {} buckets of {} from {} with {} workers",
        keys.len(),
        computation.kind(),
        collection,
        workers
    );

    let (key_tx, key_rx) = channel::unbounded::<DateKey>();
    let (result_tx, result_rx) = channel::unbounded::<WorkerMessage<C::Value>>();
    for key in &keys {
        // Receiver is alive until the scope below ends
        let _ = key_tx.send(*key);
    }
    drop(key_tx);

    let abort = AtomicBool::new(false);
    let mut first_error: Option<(Option<DateKey>, AppError)> = None;

    let scope_result = crossbeam::thread::scope(|scope| {
        for worker in 0..workers {
            let key_rx = key_rx.clone();
            let result_tx = result_tx.clone();
            let open = &open;
            let abort = &abort;

            scope.spawn(move |_| {
                let source = match open() {
                    Ok(source) => source,
                    Err(e) => {
                        abort.store(true, Ordering::SeqCst);
                        let _ = result_tx.send(WorkerMessage::OpenFailed(e));
                        return;
                    }
                };

                for key in key_rx.iter() {
                    if abort.load(Ordering::SeqCst) {
                        break;
                    }
                    let result = compute_bucket(&source, collection, computation, &key);
                    if result.is_err() {
                        abort.store(true, Ordering::SeqCst);
                    }
                    if result_tx.send(WorkerMessage::Bucket(key, result)).is_err() {
                        break;
                    }
                }
                debug!("Worker {} finished", worker);
            });
        }
        drop(result_tx);

        for message in result_rx.iter() {
            match message {
                WorkerMessage::Bucket(key, Ok(value)) => {
                    if let Err(e) = skeleton.absorb(&key, value) {
                        abort.store(true, Ordering::SeqCst);
                        keep_earliest(&mut first_error, Some(key), e);
                    } else {
                        stats.record_bucket(computation.queries_per_bucket());
                    }
                }
                WorkerMessage::Bucket(key, Err(e)) => keep_earliest(&mut first_error, Some(key), e),
                WorkerMessage::OpenFailed(e) => keep_earliest(&mut first_error, None, e),
            }
        }
    });

    if scope_result.is_err() {
        return Err(AppError::unavailable(
            collection,
            AppError::NO_BUCKET,
            "bucket worker panicked",
        ));
    }

    if let Some((key, error)) = first_error {
        match key {
            Some(key) => warn!("Parallel fill of {} failed at {}", collection, key),
            None => warn!("Parallel fill of {} could not open a worker store", collection),
        }
        return Err(error);
    }

    stats.collections_filled += 1;
    Ok(skeleton)
}

enum WorkerMessage<V> {
    Bucket(DateKey, AppResult<V>),
    OpenFailed(AppError),
}

fn compute_bucket<C: LeafComputation>(
    source: &dyn DataSource,
    collection: &str,
    computation: &C,
    key: &DateKey,
) -> AppResult<C::Value> {
    let bucket = key.to_string();
    debug!("{} {}", collection, bucket);
    computation
        .compute(source, collection, key)
        .map_err(|e| e.at_bucket(collection, &bucket))
}

/// Report the failure of the earliest bucket regardless of completion order;
/// failures outside any bucket (`None`) sort first
fn keep_earliest(
    slot: &mut Option<(Option<DateKey>, AppError)>,
    key: Option<DateKey>,
    error: AppError,
) {
    match slot {
        Some((existing, _)) if *existing <= key => {}
        _ => *slot = Some((key, error)),
    }
}
