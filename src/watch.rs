//! Recalculation on change of a watched inputs file.
//!
//! The file is polled on a fixed scan interval. A new record is only
//! recalculated once it has stayed unchanged for the debounce delay, and a
//! record is never recalculated twice in a row.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::orifice::{compute, Inputs, Outputs};
use crate::overlay::InputsPatch;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Emits a value once it has been observed unchanged for `delay`.
///
/// The very first observation is emitted immediately.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn observe(&mut self, value: T, now: Instant) -> Option<T> {
        if self.last_emitted.is_none() {
            self.pending = None;
            self.last_emitted = Some(value.clone());
            return Some(value);
        }

        match &self.pending {
            Some((pending, _)) if *pending == value => {}
            _ => self.pending = Some((value, now)),
        }

        let (candidate, since) = self.pending.as_ref()?;
        if now.saturating_duration_since(*since) < self.delay
            || self.last_emitted.as_ref() == Some(candidate)
        {
            return None;
        }
        self.last_emitted = Some(candidate.clone());
        Some(candidate.clone())
    }
}

/// Polls an inputs file and recalculates on debounced changes.
#[derive(Debug)]
pub struct Watcher {
    source: PathBuf,
    base: Inputs,
    debouncer: Debouncer<Inputs>,
    last_error: Option<String>,
}

impl Watcher {
    /// Fields missing from the watched file take their value from `base`.
    pub fn new(source: impl Into<PathBuf>, base: Inputs, debounce: Duration) -> Self {
        Watcher {
            source: source.into(),
            base,
            debouncer: Debouncer::new(debounce),
            last_error: None,
        }
    }

    fn read(&mut self) -> Option<Inputs> {
        let result = fs::read_to_string(&self.source)
            .map_err(|e| e.to_string())
            .and_then(|text| InputsPatch::from_json(&text).map_err(|e| e.to_string()));

        match result {
            Ok(patch) => {
                self.last_error = None;
                Some(patch.apply(self.base))
            }
            Err(e) => {
                if self.last_error.as_ref() != Some(&e) {
                    warn!("Cannot use {}: {}", self.source.display(), e);
                    self.last_error = Some(e);
                }
                None
            }
        }
    }

    /// One scan: returns the recalculated record when the debounced inputs
    /// changed.
    pub fn poll(&mut self, now: Instant) -> Option<(Inputs, Outputs)> {
        let inputs = self.read()?;
        let inputs = self.debouncer.observe(inputs, now)?;
        let outputs = compute(&inputs);
        debug!("Recalculated {:?} -> {:?}", inputs, outputs);
        Some((inputs, outputs))
    }

    /// Scans every `scan` until `cycles` scans have run, forever when `None`.
    pub fn run<F>(&mut self, scan: Duration, cycles: Option<u64>, mut on_change: F)
    where
        F: FnMut(&Inputs, &Outputs),
    {
        let mut done = 0;
        while cycles.map_or(true, |n| done < n) {
            if let Some((inputs, outputs)) = self.poll(Instant::now()) {
                on_change(&inputs, &outputs);
            }
            done += 1;
            thread::sleep(scan);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DELAY: Duration = Duration::from_millis(400);

    #[test]
    fn first_value_is_emitted_immediately() {
        let mut d = Debouncer::new(DELAY);
        assert_eq!(d.observe(1, Instant::now()), Some(1));
    }

    #[test]
    fn change_waits_for_the_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.observe(1, t0);

        assert_eq!(d.observe(2, t0 + Duration::from_millis(100)), None);
        assert_eq!(d.observe(2, t0 + Duration::from_millis(300)), None);
        assert_eq!(d.observe(2, t0 + Duration::from_millis(500)), Some(2));
    }

    #[test]
    fn every_change_restarts_the_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.observe(1, t0);

        assert_eq!(d.observe(2, t0 + Duration::from_millis(100)), None);
        assert_eq!(d.observe(3, t0 + Duration::from_millis(450)), None);
        assert_eq!(d.observe(3, t0 + Duration::from_millis(600)), None);
        assert_eq!(d.observe(3, t0 + Duration::from_millis(850)), Some(3));
    }

    #[test]
    fn unchanged_value_is_not_emitted_twice() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.observe(1, t0);

        assert_eq!(d.observe(1, t0 + Duration::from_secs(1)), None);
        assert_eq!(d.observe(1, t0 + Duration::from_secs(2)), None);
    }

    #[test]
    fn reverting_before_the_delay_emits_nothing() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.observe(1, t0);

        assert_eq!(d.observe(2, t0 + Duration::from_millis(100)), None);
        assert_eq!(d.observe(1, t0 + Duration::from_millis(200)), None);
        assert_eq!(d.observe(1, t0 + Duration::from_millis(900)), None);
    }

    #[test]
    fn watcher_recalculates_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inputs.json");
        fs::write(&path, r#"{"plumaAzul": 4, "plumaRoja": 9}"#).unwrap();

        let base = Inputs {
            diametro_placa: 2.0,
            diametro_puente: 4.0,
            medidor_rango_estatico: 50.0,
            medidor_rango_diferencial: 50.0,
            ..Inputs::default()
        };
        let mut watcher = Watcher::new(&path, base, DELAY);
        let t0 = Instant::now();

        let (inputs, outputs) = watcher.poll(t0).unwrap();
        assert_eq!(inputs.pluma_azul, 4.0);
        assert_eq!(inputs.diametro_puente, 4.0);
        assert_eq!(outputs, compute(&inputs));

        assert!(watcher.poll(t0 + Duration::from_secs(1)).is_none());

        fs::write(&path, r#"{"plumaAzul": 16, "plumaRoja": 9}"#).unwrap();
        assert!(watcher.poll(t0 + Duration::from_secs(2)).is_none());
        let (inputs, _) = watcher.poll(t0 + Duration::from_secs(3)).unwrap();
        assert_eq!(inputs.pluma_azul, 16.0);
    }

    #[test]
    fn unreadable_file_skips_the_scan() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inputs.json");
        let mut watcher = Watcher::new(&path, Inputs::default(), DELAY);
        assert!(watcher.poll(Instant::now()).is_none());

        fs::write(&path, "{ broken").unwrap();
        assert!(watcher.poll(Instant::now()).is_none());

        fs::write(&path, "{}").unwrap();
        let (inputs, _) = watcher.poll(Instant::now()).unwrap();
        assert_eq!(inputs, Inputs::default());
    }

    #[test]
    fn run_stops_after_the_requested_cycles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inputs.json");
        fs::write(&path, r#"{"gravgas": 0.6}"#).unwrap();

        let mut watcher = Watcher::new(&path, Inputs::default(), Duration::ZERO);
        let mut seen = Vec::new();
        watcher.run(Duration::ZERO, Some(3), |inputs, _| seen.push(inputs.gravgas));

        assert_eq!(seen, vec![0.6]);
    }
}
