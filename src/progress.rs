//! # Progress — Atomic Batch Progress Counters
//!
//! Thread-safe progress tracking shared between the Rayon workers evaluating
//! candidates and a background status reporter. Counters are atomics; the
//! current-batch label sits behind a Mutex and is only written once per batch.
//!
//! ## Background Reporter
//!
//! A dedicated thread logs tested count, mismatch count, rate and the current
//! batch at a fixed interval, and exits once `stop` is called.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

pub struct Progress {
    pub tested: AtomicU64,
    pub accepted: AtomicU64,
    pub mismatches: AtomicU64,
    pub current: Mutex<String>,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            mismatches: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Record one evaluated candidate.
    pub fn record(&self, accepted: bool, mismatch: bool) {
        self.tested.fetch_add(1, Ordering::Relaxed);
        if accepted {
            self.accepted.fetch_add(1, Ordering::Relaxed);
        }
        if mismatch {
            self.mismatches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn set_current(&self, label: impl Into<String>) {
        if let Ok(mut current) = self.current.lock() {
            *current = label.into();
        }
    }

    pub fn start_reporter(self: &Arc<Self>, interval: Duration) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        let tick = Duration::from_millis(100).min(interval);
        thread::spawn(move || {
            let mut last = Instant::now();
            while !progress.shutdown.load(Ordering::Relaxed) {
                thread::sleep(tick);
                if last.elapsed() >= interval {
                    progress.print_status();
                    last = Instant::now();
                }
            }
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let accepted = self.accepted.load(Ordering::Relaxed);
        let mismatches = self.mismatches.load(Ordering::Relaxed);
        let current = self
            .current
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default();
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            current = %current,
            tested,
            accepted,
            mismatches,
            rate = format_args!("{:.2}", rate),
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "batch progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let p = Progress::new();
        assert_eq!(p.tested.load(Ordering::Relaxed), 0);
        assert_eq!(p.accepted.load(Ordering::Relaxed), 0);
        assert_eq!(p.mismatches.load(Ordering::Relaxed), 0);
        assert_eq!(*p.current.lock().unwrap(), "");
    }

    #[test]
    fn record_updates_counters() {
        let p = Progress::new();
        p.record(true, false);
        p.record(false, true);
        p.record(false, false);
        assert_eq!(p.tested.load(Ordering::Relaxed), 3);
        assert_eq!(p.accepted.load(Ordering::Relaxed), 1);
        assert_eq!(p.mismatches.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn concurrent_records_are_accurate() {
        let p = Progress::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                thread::spawn(move || {
                    for i in 0..1000 {
                        p.record(i % 2 == 0, false);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(p.tested.load(Ordering::Relaxed), 8000);
        assert_eq!(p.accepted.load(Ordering::Relaxed), 4000);
    }

    #[test]
    fn current_label_updates() {
        let p = Progress::new();
        p.set_current("primes.txt");
        assert_eq!(*p.current.lock().unwrap(), "primes.txt");
    }

    #[test]
    fn reporter_stops_on_shutdown() {
        let p = Progress::new();
        let handle = p.start_reporter(Duration::from_millis(20));
        thread::sleep(Duration::from_millis(50));
        p.stop();
        handle.join().unwrap();
    }

    #[test]
    fn print_status_with_zero_elapsed() {
        let p = Progress::new();
        p.print_status();
    }
}
