//! Parallel frame scheduler.
//!
//! The agent index space is cut into one contiguous range per worker. Each
//! frame, one task per range runs on a fixed rayon pool, reading the whole
//! read snapshot and writing only its own slice of the write buffer. The end
//! of the rayon scope is the frame barrier.

use super::steering::SteeringParams;
use super::stepper::step_range;
use crate::core::{Agent, FlockError, Result};
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Split `[0, n)` into `parts` contiguous ranges of `n / parts` indices.
/// The last range absorbs the remainder, so every index is covered once.
pub fn partition(n: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    let chunk = n / parts;
    (0..parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == parts { n } else { start + chunk };
            start..end
        })
        .collect()
}

/// Carve the write buffer into disjoint mutable slices, one per range.
fn split_partitions<'a>(mut rest: &'a mut [Agent], ranges: &[Range<usize>]) -> Vec<&'a mut [Agent]> {
    let mut slices = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        slices.push(head);
        rest = tail;
    }
    slices
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// First partition whose task never reported done.
fn first_incomplete(done: &[AtomicBool]) -> Option<usize> {
    done.iter().position(|d| !d.load(Ordering::Acquire))
}

/// Outcome of one completed frame.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub frame: u64,
    pub partitions: usize,
    /// Tasks that reported completion before the barrier released
    pub completed: usize,
    pub elapsed: Duration,
}

/// Fixed worker pool plus the static partition of the population.
pub struct FrameScheduler {
    pool: ThreadPool,
    partitions: Vec<Range<usize>>,
    /// One neighbour buffer per partition, reused every frame
    scratch: Vec<Vec<usize>>,
    population: usize,
    frames: u64,
}

impl FrameScheduler {
    /// Start `workers` threads for a population of `population` agents.
    /// The threads live as long as the scheduler.
    pub fn new(workers: usize, population: usize) -> Result<Self> {
        if workers == 0 {
            return Err(FlockError::invalid("worker pool needs at least 1 thread"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("flock-worker-{}", i))
            .build()?;

        info!(
            "🧵 [Scheduler] Started {} workers for {} agents",
            workers, population
        );

        Ok(FrameScheduler {
            pool,
            partitions: partition(population, workers),
            scratch: (0..workers).map(|_| Vec::with_capacity(population)).collect(),
            population,
            frames: 0,
        })
    }

    pub fn workers(&self) -> usize {
        self.partitions.len()
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn partitions(&self) -> &[Range<usize>] {
        &self.partitions
    }

    /// Run `op` inside the worker pool, so nested rayon work uses these
    /// threads instead of the global pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Compute one frame: every agent of `read` is stepped into the same index
    /// of `write`. Returns once all partitions have finished.
    ///
    /// On `WorkerFailure` the contents of `write` are unspecified and must not
    /// be handed to a renderer.
    pub fn dispatch(
        &mut self,
        read: &[Agent],
        write: &mut [Agent],
        params: &SteeringParams,
    ) -> Result<FrameReport> {
        self.dispatch_with(read, write, |range, slice, scratch| {
            step_range(read, range, slice, params, scratch)
        })
    }

    /// Run `task` once per partition with that partition's range, write slice
    /// and scratch buffer, then wait for all of them.
    pub(crate) fn dispatch_with<F>(
        &mut self,
        read: &[Agent],
        write: &mut [Agent],
        task: F,
    ) -> Result<FrameReport>
    where
        F: Fn(Range<usize>, &mut [Agent], &mut Vec<usize>) + Sync,
    {
        for found in [read.len(), write.len()] {
            if found != self.population {
                return Err(FlockError::PopulationMismatch {
                    expected: self.population,
                    found,
                });
            }
        }

        let start = Instant::now();
        let frame = self.frames + 1;
        let pool = &self.pool;
        let partitions = &self.partitions;
        let scratch = &mut self.scratch;

        let slices = split_partitions(write, partitions);
        let completed = AtomicUsize::new(0);
        let done: Vec<AtomicBool> = partitions.iter().map(|_| AtomicBool::new(false)).collect();
        let failure: Mutex<Option<(usize, String)>> = Mutex::new(None);
        let task = &task;
        let completed_ref = &completed;
        let done_ref = &done;
        let failure_ref = &failure;

        pool.scope(|s| {
            let jobs = partitions.iter().cloned().zip(slices).zip(scratch.iter_mut());
            for (index, ((range, slice), buf)) in jobs.enumerate() {
                s.spawn(move |_| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(range, slice, buf)));
                    match outcome {
                        Ok(()) => {
                            done_ref[index].store(true, Ordering::Release);
                            completed_ref.fetch_add(1, Ordering::AcqRel);
                        }
                        Err(payload) => {
                            failure_ref
                                .lock()
                                .get_or_insert_with(|| (index, panic_message(&*payload)));
                        }
                    }
                });
            }
        });

        if let Some((partition, message)) = failure.into_inner() {
            error!(
                "💥 [Scheduler] Frame {} aborted: partition {} failed: {}",
                frame, partition, message
            );
            return Err(FlockError::WorkerFailure { partition, message });
        }

        let completed = completed.into_inner();
        if let Some(partition) = first_incomplete(&done) {
            return Err(FlockError::WorkerFailure {
                partition,
                message: format!(
                    "only {} of {} partitions reported completion",
                    completed,
                    partitions.len()
                ),
            });
        }

        self.frames = frame;
        let report = FrameReport {
            frame,
            partitions: partitions.len(),
            completed,
            elapsed: start.elapsed(),
        };
        debug!(
            "[Scheduler] Frame {}: {} agents over {} partitions in {:?}",
            frame, self.population, completed, report.elapsed
        );
        Ok(report)
    }
}
