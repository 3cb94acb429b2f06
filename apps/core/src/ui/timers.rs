use std::time::Duration;

use super::dom::Scheduler;

#[derive(Debug)]
struct Pending<E> {
    due: Duration,
    seq: u64,
    element: E,
}

/// Manually advanced timer queue for hosts without a browser event loop.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Moves the clock forward and returns the elements whose timers fired,
    /// earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<E> {
        self.now += by;
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|timer| timer.due <= now);
        self.pending = rest;

        due.sort_by_key(|timer| (timer.due, timer.seq));
        due.into_iter().map(|timer| timer.element).collect()
    }
}

impl<E> Scheduler<E> for TimerQueue<E> {
    fn schedule_dismissal(&mut self, delay: Duration, element: E) {
        self.pending.push(Pending {
            due: self.now + delay,
            seq: self.next_seq,
            element,
        });
        self.next_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_dismissal(Duration::from_millis(300), "late");
        queue.schedule_dismissal(Duration::from_millis(100), "early");
        queue.schedule_dismissal(Duration::from_millis(100), "early-second");

        assert!(queue.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(
            queue.advance(Duration::from_millis(1)),
            vec!["early", "early-second"]
        );
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.advance(Duration::from_secs(1)), vec!["late"]);
        assert_eq!(queue.now(), Duration::from_millis(1100));
    }
}
