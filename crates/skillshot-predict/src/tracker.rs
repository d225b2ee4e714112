//! Per-target rolling motion history.
//!
//! `TargetBehaviorTracker` samples a unit at a fixed minimum interval,
//! derives velocity from consecutive samples, tracks how long the unit has
//! been standing still, periodically re-learns its `DodgePattern`, and
//! turns the history into a `BehaviorPdf` on demand.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::trace;

use skillshot_core::constants::*;
use skillshot_core::types::{UnitId, Vec2};
use skillshot_core::unit::Unit;

use crate::config::PredictionConfig;
use crate::opportunity::OpportunityWindow;
use crate::pattern::{heading, DodgePattern};
use crate::pdf::BehaviorPdf;

/// Post-attack movement delays kept for the reaction-delay estimate.
const MAX_REACTION_SAMPLES: usize = 20;

/// Delays longer than this are not attributed to the attack (seconds).
const MAX_REACTION_DELAY: f64 = 1.0;

/// Left/right frequency a target needs before its dodge side is hypothesized.
const DODGE_FREQUENCY_GATE: f64 = 0.3;

/// One sampled observation of a target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementSnapshot {
    pub position: Vec2,
    pub timestamp: f64,
    /// Δposition/Δtime against the previous sample; zero for the first.
    pub velocity: Vec2,
    pub is_auto_attacking: bool,
    pub is_casting: bool,
    pub is_dashing: bool,
    pub is_cced: bool,
    pub hp_percent: f64,
}

/// Last PDF built, reused within a tick for similar requests.
#[derive(Debug, Clone)]
struct PdfCache {
    now: f64,
    prediction_time: f64,
    move_speed: f64,
    pdf: BehaviorPdf,
}

/// Rolling motion model of one target.
#[derive(Debug, Clone)]
pub struct TargetBehaviorTracker {
    target: UnitId,
    sample_interval: f64,
    capacity: usize,
    history: VecDeque<MovementSnapshot>,
    pattern: DodgePattern,
    last_sample_time: Option<f64>,
    last_motion_time: Option<f64>,
    last_attack_start: Option<f64>,
    post_attack_delays: Vec<f64>,
    stationary_since: Option<f64>,
    samples_since_analysis: usize,
    windows: BTreeMap<i32, OpportunityWindow>,
    pdf_cache: Option<PdfCache>,
}

impl TargetBehaviorTracker {
    pub fn new(target: UnitId, config: &PredictionConfig) -> Self {
        Self {
            target,
            sample_interval: config.sample_interval,
            capacity: config.history_capacity,
            history: VecDeque::with_capacity(config.history_capacity),
            pattern: DodgePattern::default(),
            last_sample_time: None,
            last_motion_time: None,
            last_attack_start: None,
            post_attack_delays: Vec::new(),
            stationary_since: None,
            samples_since_analysis: 0,
            windows: BTreeMap::new(),
            pdf_cache: None,
        }
    }

    pub fn target(&self) -> UnitId {
        self.target
    }

    pub fn history(&self) -> &VecDeque<MovementSnapshot> {
        &self.history
    }

    pub fn latest(&self) -> Option<&MovementSnapshot> {
        self.history.back()
    }

    pub fn dodge_pattern(&self) -> &DodgePattern {
        &self.pattern
    }

    /// Timestamp of the newest sample.
    pub fn last_sample_time(&self) -> Option<f64> {
        self.last_sample_time
    }

    /// Velocity of the newest sample.
    pub fn current_velocity(&self) -> Vec2 {
        self.history.back().map(|s| s.velocity).unwrap_or(Vec2::ZERO)
    }

    /// Sample `unit` at `now`. Returns false when gated by the sampling interval.
    pub fn update(&mut self, unit: &Unit, now: f64) -> bool {
        if let Some(last) = self.last_sample_time {
            if now - last < self.sample_interval - SAMPLE_INTERVAL_TOLERANCE {
                return false;
            }
        }

        let mut snapshot = MovementSnapshot {
            position: unit.position,
            timestamp: now,
            velocity: Vec2::ZERO,
            is_auto_attacking: unit.status.is_auto_attacking,
            is_casting: unit.status.is_casting,
            is_dashing: unit.status.is_dashing(),
            is_cced: unit.status.is_hard_cced(),
            hp_percent: unit.health_percent(),
        };

        if let Some(prev) = self.history.back() {
            let dt = now - prev.timestamp;
            if dt > EPSILON {
                snapshot.velocity = (snapshot.position - prev.position) / dt;
            }

            if snapshot.is_auto_attacking && !prev.is_auto_attacking {
                self.last_attack_start = Some(now);
            }

            let started_moving = snapshot.velocity.length() > STATIONARY_SPEED_THRESHOLD
                && prev.velocity.length() < STATIONARY_SPEED_THRESHOLD;
            if let (true, Some(attack)) = (started_moving, self.last_attack_start) {
                let delay = now - attack;
                if delay < MAX_REACTION_DELAY {
                    if self.post_attack_delays.len() == MAX_REACTION_SAMPLES {
                        self.post_attack_delays.remove(0);
                    }
                    self.post_attack_delays.push(delay);
                }
            }
        }

        let speed = snapshot.velocity.length();
        if speed < STATIONARY_SPEED_THRESHOLD {
            self.stationary_since.get_or_insert(now);
        } else {
            self.stationary_since = None;
            self.last_motion_time = Some(now);
        }

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
        self.last_sample_time = Some(now);
        self.samples_since_analysis += 1;

        if self.history.len() >= MIN_SAMPLES_FOR_BEHAVIOR && self.samples_since_analysis >= PATTERN_ANALYSIS_INTERVAL {
            self.pattern = DodgePattern::analyze(&self.history, &self.post_attack_delays);
            self.samples_since_analysis = 0;
            trace!(
                target_id = self.target,
                has_pattern = self.pattern.has_pattern,
                confidence = self.pattern.pattern_confidence,
                "dodge pattern analyzed"
            );
        }

        let idle_since = self.last_motion_time.unwrap_or(self.history.front().map_or(now, |s| s.timestamp));
        if self.pattern.has_pattern && now - idle_since > PATTERN_EXPIRY {
            self.pattern.expire();
        }

        true
    }

    /// Latest sample shows attacking, casting, or hard crowd-control.
    pub fn is_animation_locked(&self) -> bool {
        self.history
            .back()
            .is_some_and(|s| s.is_auto_attacking || s.is_casting || s.is_cced)
    }

    /// Seconds the target has been standing still, 0 while moving.
    pub fn stationary_duration(&self, now: f64) -> f64 {
        self.stationary_since.map_or(0.0, |since| (now - since).max(0.0))
    }

    /// Minimum hit chance justified by how long the target has stood still.
    pub fn get_stationary_hitchance_boost(&self, now: f64) -> f64 {
        let duration = self.stationary_duration(now);
        if self.stationary_since.is_none() || duration < STATIONARY_BOOST_START {
            return 0.0;
        }
        if duration >= STATIONARY_BOOST_FULL {
            return STATIONARY_BOOST_MAX;
        }
        let t = (duration - STATIONARY_BOOST_START) / (STATIONARY_BOOST_FULL - STATIONARY_BOOST_START);
        STATIONARY_BOOST_MIN + t * (STATIONARY_BOOST_MAX - STATIONARY_BOOST_MIN)
    }

    /// Last `STRAIGHT_LINE_SAMPLES` samples all move along one heading.
    pub fn is_moving_straight(&self) -> bool {
        if self.history.len() < STRAIGHT_LINE_SAMPLES {
            return false;
        }
        let mut recent = self.history.iter().rev().take(STRAIGHT_LINE_SAMPLES);
        let Some(base) = recent.next().and_then(heading) else {
            return false;
        };
        recent.all(|s| {
            s.velocity.length() > STRAIGHT_LINE_MIN_SPEED
                && heading(s).is_some_and(|h| h.dot(base) >= STRAIGHT_LINE_MIN_DOT)
        })
    }

    /// Existing window for `slot`, or a fresh one starting at `now`.
    pub fn get_or_create_window(&mut self, slot: i32, now: f64) -> &mut OpportunityWindow {
        self.windows.entry(slot).or_insert_with(|| OpportunityWindow::new(now))
    }

    pub fn window(&self, slot: i32) -> Option<&OpportunityWindow> {
        self.windows.get(&slot)
    }

    /// Spatial distribution of where the target will be after `prediction_time`.
    ///
    /// Reuses the previous grid when called again at the same `now` with a
    /// similar horizon and move speed.
    pub fn build_behavior_pdf(&mut self, now: f64, prediction_time: f64, move_speed: f64) -> BehaviorPdf {
        if let Some(cache) = &self.pdf_cache {
            let same_tick = (cache.now - now).abs() < EPSILON;
            let similar_time = (cache.prediction_time - prediction_time).abs() < PDF_CACHE_TIME_TOLERANCE;
            let similar_speed = (cache.move_speed - move_speed).abs() < PDF_CACHE_SPEED_TOLERANCE;
            if same_tick && similar_time && similar_speed && !cache.pdf.is_empty() {
                return cache.pdf.clone();
            }
        }

        let pdf = self.compute_behavior_pdf(prediction_time, move_speed);
        self.pdf_cache = Some(PdfCache {
            now,
            prediction_time,
            move_speed,
            pdf: pdf.clone(),
        });
        pdf
    }

    fn compute_behavior_pdf(&self, prediction_time: f64, move_speed: f64) -> BehaviorPdf {
        let half_extent = (move_speed.max(0.0) * prediction_time.max(0.0) * PDF_EXTENT_MARGIN).max(PDF_MIN_HALF_EXTENT);
        let cell_size = 2.0 * half_extent / PDF_GRID_SIZE as f64;

        let Some(latest) = self.history.back() else {
            return BehaviorPdf::new(Vec2::ZERO, cell_size);
        };

        if self.is_animation_locked() {
            let mut pdf = BehaviorPdf::new(latest.position, cell_size);
            pdf.add_point_mass(latest.position, 1.0);
            pdf.normalize();
            return pdf;
        }

        let decay = adaptive_decay_rate(latest.velocity.length());
        let weighted: Vec<(Vec2, f64)> = self
            .history
            .iter()
            .rev()
            .take(PDF_MAX_SAMPLES)
            .enumerate()
            .map(|(i, s)| (s.position + s.velocity * prediction_time, decay.powi(i as i32)))
            .collect();

        let total_weight: f64 = weighted.iter().map(|(_, w)| w).sum();
        let center = if total_weight > EPSILON {
            weighted.iter().fold(Vec2::ZERO, |acc, (p, w)| acc + *p * *w) / total_weight
        } else {
            latest.position + latest.velocity * prediction_time
        };

        let mut pdf = BehaviorPdf::new(center, cell_size);
        for (pos, weight) in &weighted {
            pdf.add_weighted_sample(*pos, *weight);
        }

        self.add_dodge_hypotheses(&mut pdf, latest, prediction_time);
        pdf.normalize();
        pdf
    }

    fn add_dodge_hypotheses(&self, pdf: &mut BehaviorPdf, latest: &MovementSnapshot, prediction_time: f64) {
        if prediction_time < self.pattern.reaction_delay {
            return;
        }
        let Some(dir) = heading(latest) else {
            return;
        };

        let speed = latest.velocity.length();
        let forward = latest.position + latest.velocity * prediction_time;
        let lateral = dir.perp() * (speed * prediction_time * self.pattern.lateral_factor);
        let cadence = self.pattern.cadence_weight(prediction_time);

        if self.pattern.left_frequency > DODGE_FREQUENCY_GATE {
            pdf.add_weighted_sample(
                forward + lateral,
                self.pattern.left_frequency * DODGE_HYPOTHESIS_WEIGHT * cadence,
            );
        }
        if self.pattern.right_frequency > DODGE_FREQUENCY_GATE {
            pdf.add_weighted_sample(
                forward - lateral,
                self.pattern.right_frequency * DODGE_HYPOTHESIS_WEIGHT * cadence,
            );
        }

        if self.pattern.is_actionable() {
            let offset = self.pattern.predicted_next_direction * (speed * prediction_time * self.pattern.lateral_factor);
            pdf.add_weighted_sample(
                forward + offset,
                self.pattern.pattern_confidence * PATTERN_SAMPLE_WEIGHT,
            );
        }
    }
}

/// History decay per sample; faster targets forget sooner.
pub fn adaptive_decay_rate(speed: f64) -> f64 {
    (DECAY_RATE_MAX - speed / DECAY_SPEED_SCALE * DECAY_SPEED_SPAN).clamp(DECAY_RATE_MIN, DECAY_RATE_MAX)
}
