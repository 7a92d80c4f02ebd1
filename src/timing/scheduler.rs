// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host timer primitive and per-binding timer bookkeeping
//!
//! - [`Scheduler`]: "run this task after `wait`", with cancellation
//! - [`VirtualScheduler`]: deterministic virtual clock, driven by `advance`
//! - [`TokioScheduler`]: real timers on a tokio `LocalSet`
//! - [`TimerScope`]: the timers armed by one binding, so they can all be
//!   cancelled when that binding is disposed
//!
//! Everything here is single-threaded (`Rc`/`Cell`/`RefCell`). Tasks never
//! run inside `schedule`; they run when the clock reaches their deadline.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A deferred unit of work
pub type Task = Box<dyn FnOnce()>;

/// Handle for a scheduled task, used to cancel it
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerId(u64);

/// The host's timer primitive
pub trait Scheduler {
    /// Runs `task` once, `wait` from now
    fn schedule(&self, wait: Duration, task: Task) -> TimerId;

    /// Cancels a task that has not run yet; unknown ids are ignored
    fn cancel(&self, id: TimerId);
}

/// Deterministic scheduler driven by an explicit virtual clock
///
/// Tasks due at the same instant run in the order they were scheduled.
/// Tasks scheduled by a running task are picked up by the same `advance`
/// call if they fall due before its target time.
///
/// # Example
/// ```
/// use on_keys::timing::{Scheduler, VirtualScheduler};
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let clock = VirtualScheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// clock.schedule(Duration::from_millis(50), Box::new(move || flag.set(true)));
///
/// clock.advance(Duration::from_millis(49));
/// assert!(!fired.get());
/// clock.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Default)]
pub struct VirtualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    queue: RefCell<BTreeMap<(Duration, TimerId), Task>>,
    deadlines: RefCell<HashMap<TimerId, Duration>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Deadline of the earliest pending task
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.borrow().keys().next().map(|(at, _)| *at)
    }

    /// Moves the clock forward by `by`, running every task that falls due
    pub fn advance(&self, by: Duration) {
        self.run_until(self.now.get() + by);
    }

    /// Moves the clock to `target`, running every task that falls due
    ///
    /// A target in the past runs nothing and leaves the clock unchanged.
    pub fn run_until(&self, target: Duration) {
        while let Some((at, task)) = self.pop_due(target) {
            self.now.set(at.max(self.now.get()));
            task();
        }
        self.now.set(target.max(self.now.get()));
    }

    /// Runs tasks until none are left, advancing the clock as needed
    pub fn run_until_idle(&self) {
        while let Some(at) = self.next_deadline() {
            self.run_until(at);
        }
    }

    fn pop_due(&self, target: Duration) -> Option<(Duration, Task)> {
        let mut queue = self.queue.borrow_mut();
        let (&(at, id), _) = queue.first_key_value()?;
        if at > target {
            return None;
        }
        let task = queue.remove(&(at, id))?;
        self.deadlines.borrow_mut().remove(&id);
        Some((at, task))
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&self, wait: Duration, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let at = self.now.get() + wait;
        self.queue.borrow_mut().insert((at, id), task);
        self.deadlines.borrow_mut().insert(id, at);
        id
    }

    fn cancel(&self, id: TimerId) {
        let deadline = self.deadlines.borrow_mut().remove(&id);
        if let Some(at) = deadline {
            self.queue.borrow_mut().remove(&(at, id));
        }
    }
}

/// Scheduler backed by tokio timers
///
/// Each task is a `spawn_local` future sleeping until its deadline, so the
/// scheduler must be used from inside a [`tokio::task::LocalSet`].
/// Cancelling aborts the future.
///
/// # Panics
/// `schedule` panics if called outside a `LocalSet`, as `spawn_local` does.
#[derive(Default)]
pub struct TokioScheduler {
    next_id: Cell<u64>,
    tasks: Rc<RefCell<HashMap<TimerId, JoinHandle<()>>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, wait: Duration, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let deadline = Instant::now() + wait;
        let tasks = Rc::clone(&self.tasks);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep_until(deadline).await;
            tasks.borrow_mut().remove(&id);
            task();
        });

        self.tasks.borrow_mut().insert(id, handle);
        id
    }

    fn cancel(&self, id: TimerId) {
        let handle = self.tasks.borrow_mut().remove(&id);
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

/// Key of a timer armed through a [`TimerScope`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TimerKey(u64);

/// The timers armed on behalf of one binding
///
/// Wrappers arm and clear timers through their scope instead of talking to
/// the scheduler directly. Timers remove themselves from the scope when
/// they fire; `cancel_all` cancels whatever is still pending.
pub struct TimerScope {
    scheduler: Rc<dyn Scheduler>,
    next_key: Cell<u64>,
    armed: Rc<RefCell<HashMap<TimerKey, TimerId>>>,
}

impl TimerScope {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            next_key: Cell::new(0),
            armed: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Schedules `task` to run after `wait`
    pub fn arm(&self, wait: Duration, task: impl FnOnce() + 'static) -> TimerKey {
        let key = TimerKey(self.next_key.get());
        self.next_key.set(key.0 + 1);

        let armed = Rc::clone(&self.armed);
        let id = self.scheduler.schedule(
            wait,
            Box::new(move || {
                armed.borrow_mut().remove(&key);
                task();
            }),
        );

        self.armed.borrow_mut().insert(key, id);
        key
    }

    /// Cancels one timer; a timer that already fired is ignored
    pub fn clear(&self, key: TimerKey) {
        let id = self.armed.borrow_mut().remove(&key);
        if let Some(id) = id {
            self.scheduler.cancel(id);
        }
    }

    /// Cancels every pending timer of this scope
    pub fn cancel_all(&self) {
        let ids: Vec<TimerId> = self.armed.borrow_mut().drain().map(|(_, id)| id).collect();
        for id in ids {
            self.scheduler.cancel(id);
        }
    }

    pub fn pending(&self) -> usize {
        self.armed.borrow().len()
    }
}
