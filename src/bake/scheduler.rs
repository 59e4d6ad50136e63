use rayon::prelude::*;

use crate::{
    bake::orchestrator::{BakeTask, StepOutcome},
    foundation::error::{VatError, VatResult},
    texture::sink::TextureSink,
};

struct Entry<S> {
    task: BakeTask,
    sink: S,
    outcome: Option<VatResult<StepOutcome>>,
}

/// Finished task together with the sink it wrote into.
pub struct BakeResult<S> {
    pub task: BakeTask,
    pub sink: S,
    pub outcome: VatResult<StepOutcome>,
}

/// Interleaves bake tasks one slice at a time on the calling thread.
///
/// Tasks own disjoint buffers, rig instances and sinks, so a failure in one task never stops the
/// others; its error is kept as that task's outcome.
pub struct BakeScheduler<S> {
    entries: Vec<Entry<S>>,
}

impl<S> Default for BakeScheduler<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S: TextureSink> BakeScheduler<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task`, writing into `sink`. Returns the task's slot.
    pub fn register(&mut self, task: BakeTask, sink: S) -> usize {
        self.entries.push(Entry {
            task,
            sink,
            outcome: None,
        });
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn task(&self, slot: usize) -> Option<&BakeTask> {
        self.entries.get(slot).map(|e| &e.task)
    }

    /// Step every unfinished task once, in registration order. Returns how many are still pending.
    pub fn tick(&mut self) -> usize {
        let mut pending = 0;
        for entry in self.entries.iter_mut().filter(|e| e.outcome.is_none()) {
            match entry.task.step(&mut entry.sink) {
                Ok(outcome) if outcome.is_pending() => pending += 1,
                Ok(outcome) => entry.outcome = Some(Ok(outcome)),
                Err(e) => {
                    tracing::warn!(task = %entry.task.name(), error = %e, "bake task failed");
                    entry.outcome = Some(Err(e));
                }
            }
        }
        pending
    }

    /// Tick until every task has finished. Returns the number of ticks taken.
    #[tracing::instrument(skip(self), fields(tasks = self.entries.len()))]
    pub fn run(&mut self) -> usize {
        let mut ticks = 0;
        while self.entries.iter().any(|e| e.outcome.is_none()) {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    pub fn into_results(self) -> Vec<BakeResult<S>> {
        self.entries
            .into_iter()
            .map(|e| BakeResult {
                outcome: e
                    .outcome
                    .unwrap_or_else(|| Err(VatError::validation("task was never run"))),
                task: e.task,
                sink: e.sink,
            })
            .collect()
    }
}

impl<S: TextureSink + Send> BakeScheduler<S> {
    /// Run every task to completion, one task per worker of a rayon pool.
    ///
    /// `threads` of `None` uses rayon's default worker count.
    #[tracing::instrument(skip(self), fields(tasks = self.entries.len()))]
    pub fn run_parallel(self, threads: Option<usize>) -> VatResult<Vec<BakeResult<S>>> {
        let pool = build_thread_pool(threads)?;
        Ok(pool.install(|| {
            self.entries
                .into_par_iter()
                .map(|mut e| {
                    let outcome = match e.outcome.take() {
                        Some(done) => done,
                        None => e.task.run_to_completion(&mut e.sink),
                    };
                    BakeResult {
                        task: e.task,
                        sink: e.sink,
                        outcome,
                    }
                })
                .collect()
        }))
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> VatResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(VatError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| VatError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/bake/scheduler.rs"]
mod tests;
