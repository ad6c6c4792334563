use std::sync::Arc;

use crate::{
    config::RunConfig,
    events::EventBus,
    exec::{ExecuteFile, SpawnPool},
    subscribers::Subscribe,
};

use super::scheduler::Scheduler;

/// Builder for constructing a [`Scheduler`] with subscribers attached.
pub struct SchedulerBuilder {
    cfg: RunConfig,
    spawner: Arc<dyn SpawnPool>,
    executor: Arc<dyn ExecuteFile>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the configuration and execution seams.
    pub fn new(
        cfg: RunConfig,
        spawner: Arc<dyn SpawnPool>,
        executor: Arc<dyn ExecuteFile>,
    ) -> Self {
        Self {
            cfg,
            spawner,
            executor,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for reporting.
    ///
    /// Subscribers receive every lifecycle event, in order, awaited one
    /// after another on the scheduler's emission path.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the scheduler.
    ///
    /// This consumes the builder, registers the subscribers on a fresh
    /// [`EventBus`], and wires the execution seams in. The result is ready
    /// for any number of [`run_tests`](Scheduler::run_tests) calls.
    pub fn build(self) -> Scheduler {
        let bus = EventBus::new();
        for sub in self.subscribers {
            bus.subscribe(sub);
        }
        Scheduler::with_bus(self.cfg, bus, self.spawner, self.executor)
    }
}
