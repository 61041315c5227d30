// Virtual-time task scheduler
//
// Single-threaded replacement for wall-clock timers: every deferred piece of
// work is a timer with a due time on the scheduler's own clock, and the clock
// only moves when the owner calls `advance`.

use std::time::Duration;

/// Smallest allowed repeat interval; a zero interval would fire forever
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    due: Duration,
    interval: Option<Duration>,
    task: T,
}

/// Owner of all pending timers
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Run `task` once, `delay` from now
    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TimerId {
        self.insert(delay, None, task)
    }

    /// Run `task` every `interval`, first firing one interval from now
    pub fn schedule_repeating(&mut self, interval: Duration, task: T) -> TimerId {
        let interval = interval.max(MIN_INTERVAL);
        self.insert(interval, Some(interval), task)
    }

    fn insert(&mut self, delay: Duration, interval: Option<Duration>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            interval,
            task,
        });
        id
    }

    /// Cancel a timer; returns `false` if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// Get the number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T: Clone> Scheduler<T> {
    /// Move the clock forward and collect every task that came due
    ///
    /// Tasks are returned ordered by due time, then by scheduling order.
    /// One-shot timers are consumed; repeating timers are re-armed and fire
    /// once per elapsed interval.
    pub fn advance(&mut self, dt: Duration) -> Vec<(TimerId, T)> {
        self.now += dt;

        let mut fired: Vec<(Duration, TimerId, T)> = Vec::new();
        let now = self.now;

        self.timers.retain_mut(|timer| {
            while timer.due <= now {
                fired.push((timer.due, timer.id, timer.task.clone()));
                match timer.interval {
                    Some(interval) => timer.due += interval,
                    None => return false,
                }
            }
            true
        });

        fired.sort_by_key(|(due, id, _)| (*due, *id));
        fired.into_iter().map(|(_, id, task)| (id, task)).collect()
    }
}
