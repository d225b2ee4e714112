//! Opportunistic cast timing.
//!
//! Each (target, slot) pair keeps a short rolling record of hit chances.
//! A cast is flagged when the hit chance has peaked near the caller's
//! threshold and is now in a sustained decline.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use skillshot_core::constants::*;
use skillshot_core::spell::SpellData;

/// Signals written back into a prediction result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpportunitySignals {
    /// Current hit chance relative to the recent peak.
    pub score: f64,
    pub adaptive_threshold: f64,
    pub is_peak: bool,
}

/// Rolling hit-chance history for one effect slot against one target.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityWindow {
    samples: VecDeque<(f64, f64)>,
    peak: f64,
    peak_time: f64,
    start_time: f64,
    last_hit_chance: f64,
}

impl OpportunityWindow {
    pub fn new(now: f64) -> Self {
        Self {
            samples: VecDeque::new(),
            peak: 0.0,
            peak_time: now,
            start_time: now,
            last_hit_chance: 0.0,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append a sample, prune the window, and maintain the peak.
    pub fn update(&mut self, now: f64, hit_chance: f64) {
        self.samples.push_back((now, hit_chance));
        while self.samples.len() > OPPORTUNITY_MAX_SAMPLES {
            self.samples.pop_front();
        }
        while self
            .samples
            .front()
            .is_some_and(|(t, _)| now - t > OPPORTUNITY_WINDOW_DURATION)
        {
            self.samples.pop_front();
        }

        if hit_chance > self.peak {
            self.peak = hit_chance;
            self.peak_time = now;
        }

        if now - self.peak_time > OPPORTUNITY_PEAK_STALE {
            self.peak = 0.0;
            for &(t, h) in &self.samples {
                if h > self.peak {
                    self.peak = h;
                    self.peak_time = t;
                }
            }
        }
    }

    /// True when `hit_chance` is a local peak worth casting on.
    ///
    /// Nothing is flagged before `patience` seconds have elapsed.
    pub fn is_peak_opportunity(
        &self,
        now: f64,
        hit_chance: f64,
        adaptive_threshold: f64,
        elapsed: f64,
        patience: f64,
    ) -> bool {
        if elapsed < patience {
            return false;
        }
        if self.samples.len() < OPPORTUNITY_MIN_SAMPLES {
            return false;
        }
        if hit_chance < adaptive_threshold * OPPORTUNITY_THRESHOLD_FRACTION {
            return false;
        }

        let recent: Vec<f64> = self
            .samples
            .iter()
            .rev()
            .take_while(|(t, _)| now - t < OPPORTUNITY_AVERAGE_WINDOW)
            .map(|(_, h)| *h)
            .collect();
        if recent.len() < OPPORTUNITY_MIN_AVERAGE_SAMPLES {
            return false;
        }
        let average = recent.iter().sum::<f64>() / recent.len() as f64;
        if hit_chance < average * OPPORTUNITY_AVERAGE_MARGIN {
            return false;
        }

        let tail: Vec<f64> = self
            .samples
            .iter()
            .rev()
            .take(OPPORTUNITY_DECLINE_SAMPLES + 1)
            .map(|(_, h)| *h)
            .collect();
        tail.len() == OPPORTUNITY_DECLINE_SAMPLES + 1 && tail.windows(2).all(|w| w[0] < w[1])
    }

    /// Threshold relaxed the longer the caller has waited.
    pub fn adaptive_threshold(base: f64, elapsed: f64) -> f64 {
        if elapsed < THRESHOLD_DECAY_START {
            return base;
        }
        if elapsed < THRESHOLD_DECAY_END {
            let progress = (elapsed - THRESHOLD_DECAY_START) / (THRESHOLD_DECAY_END - THRESHOLD_DECAY_START);
            return base * (1.0 - progress * (1.0 - THRESHOLD_FLOOR_FRACTION));
        }
        base * THRESHOLD_FLOOR_FRACTION
    }

    /// Record a fresh prediction and derive its opportunity signals.
    ///
    /// The window restarts when the hit chance collapses, which usually
    /// means the effect was cast or the target escaped.
    pub fn record(&mut self, now: f64, hit_chance: f64, spell: &SpellData) -> OpportunitySignals {
        self.update(now, hit_chance);
        let elapsed = now - self.start_time;

        let score = if self.peak > EPSILON {
            hit_chance / self.peak
        } else {
            1.0
        };
        let adaptive_threshold = Self::adaptive_threshold(spell.expected_hit_chance.opportunity_threshold(), elapsed);
        let is_peak =
            self.is_peak_opportunity(now, hit_chance, adaptive_threshold, elapsed, patience_window(spell.cooldown));

        if hit_chance < self.last_hit_chance * OPPORTUNITY_COLLAPSE_FRACTION && elapsed > OPPORTUNITY_COLLAPSE_MIN_ELAPSED {
            *self = Self::new(now);
        }
        self.last_hit_chance = hit_chance;

        OpportunitySignals {
            score,
            adaptive_threshold,
            is_peak,
        }
    }
}

/// Seconds to wait before any peak is trusted, scaled from the cooldown.
pub fn patience_window(cooldown: f64) -> f64 {
    let cooldown = if cooldown > 0.0 { cooldown } else { DEFAULT_COOLDOWN };
    (cooldown * PATIENCE_COOLDOWN_FRACTION).clamp(PATIENCE_MIN, PATIENCE_MAX)
}
