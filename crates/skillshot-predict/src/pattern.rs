//! Dodge and juke pattern analysis over a movement history.
//!
//! Directions are compared pairwise: the 2D cross product of consecutive
//! unit headings gives the turn side (positive = counter-clockwise), the dot
//! product gives forward/backward continuation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use skillshot_core::constants::*;
use skillshot_core::types::Vec2;

use crate::tracker::MovementSnapshot;

/// Learned evasion habits of one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DodgePattern {
    /// Share of moving sample pairs that turned counter-clockwise.
    pub left_frequency: f64,
    /// Share of moving sample pairs that turned clockwise.
    pub right_frequency: f64,
    pub forward_frequency: f64,
    pub backward_frequency: f64,
    /// Mean delay between an auto-attack starting and the next movement (seconds).
    pub reaction_delay: f64,
    pub juke_interval_mean: f64,
    pub juke_interval_variance: f64,
    /// Mean |sin| of observed direction changes; scales lateral dodge distance.
    pub lateral_factor: f64,
    /// Most recent turn signs, oldest first. +1 = counter-clockwise, -1 = clockwise.
    pub recent_signs: VecDeque<i8>,
    pub has_pattern: bool,
    pub pattern_confidence: f64,
    /// Unit vector of the expected next juke, zero when unknown.
    pub predicted_next_direction: Vec2,
}

impl Default for DodgePattern {
    fn default() -> Self {
        Self {
            left_frequency: 0.0,
            right_frequency: 0.0,
            forward_frequency: 0.0,
            backward_frequency: 0.0,
            reaction_delay: DEFAULT_REACTION_DELAY,
            juke_interval_mean: 0.0,
            juke_interval_variance: 0.0,
            lateral_factor: DEFAULT_LATERAL_FACTOR,
            recent_signs: VecDeque::with_capacity(MAX_SIGN_SEQUENCE),
            has_pattern: false,
            pattern_confidence: 0.0,
            predicted_next_direction: Vec2::ZERO,
        }
    }
}

/// Unit heading of a sample, or `None` when it is standing still.
pub(crate) fn heading(snapshot: &MovementSnapshot) -> Option<Vec2> {
    let speed = snapshot.velocity.length();
    (speed >= STATIONARY_SPEED_THRESHOLD).then(|| snapshot.velocity / speed)
}

impl DodgePattern {
    /// Recompute every statistic from scratch.
    pub fn analyze(history: &VecDeque<MovementSnapshot>, post_attack_delays: &[f64]) -> Self {
        let mut pattern = Self::default();
        if history.len() < 3 {
            return pattern;
        }

        pattern.update_turn_frequencies(history);

        if !post_attack_delays.is_empty() {
            pattern.reaction_delay = post_attack_delays.iter().sum::<f64>() / post_attack_delays.len() as f64;
        }

        pattern.update_sign_sequence(history);
        pattern.detect_sequence(history.back().and_then(heading));
        pattern.update_direction_changes(history);
        pattern
    }

    /// Drop the learned sequence after prolonged inactivity.
    pub fn expire(&mut self) {
        self.has_pattern = false;
        self.pattern_confidence = 0.0;
        self.predicted_next_direction = Vec2::ZERO;
        self.recent_signs.clear();
    }

    /// Gaussian weight of a juke happening `prediction_time` from now,
    /// peaked at the historical juke interval.
    pub fn cadence_weight(&self, prediction_time: f64) -> f64 {
        if self.juke_interval_variance <= EPSILON {
            return CADENCE_WEIGHT_MAX;
        }
        let diff = prediction_time - self.juke_interval_mean;
        (-0.5 * diff * diff / self.juke_interval_variance)
            .exp()
            .clamp(CADENCE_WEIGHT_MIN, CADENCE_WEIGHT_MAX)
    }

    /// Pattern is strong enough to place a dedicated behavior sample.
    pub fn is_actionable(&self) -> bool {
        self.has_pattern && self.pattern_confidence > PATTERN_CONFIDENCE_FLOOR
    }

    fn update_turn_frequencies(&mut self, history: &VecDeque<MovementSnapshot>) {
        let (mut left, mut right, mut forward, mut backward, mut total) = (0u32, 0u32, 0u32, 0u32, 0u32);

        for (prev, curr) in history.iter().zip(history.iter().skip(1)) {
            let (Some(a), Some(b)) = (heading(prev), heading(curr)) else {
                continue;
            };
            let cross = a.perp_dot(b);
            let dot = a.dot(b);

            if cross > LATERAL_TURN_THRESHOLD {
                left += 1;
            } else if cross < -LATERAL_TURN_THRESHOLD {
                right += 1;
            }
            if dot > LONGITUDINAL_DOT_THRESHOLD {
                forward += 1;
            } else if dot < -LONGITUDINAL_DOT_THRESHOLD {
                backward += 1;
            }
            total += 1;
        }

        if total > 0 {
            let total = total as f64;
            self.left_frequency = left as f64 / total;
            self.right_frequency = right as f64 / total;
            self.forward_frequency = forward as f64 / total;
            self.backward_frequency = backward as f64 / total;
        }
    }

    fn update_sign_sequence(&mut self, history: &VecDeque<MovementSnapshot>) {
        self.recent_signs.clear();
        for (prev, curr) in history.iter().zip(history.iter().skip(1)) {
            let (Some(a), Some(b)) = (heading(prev), heading(curr)) else {
                continue;
            };
            let cross = a.perp_dot(b);
            let sign = if cross > SIGN_THRESHOLD {
                1
            } else if cross < -SIGN_THRESHOLD {
                -1
            } else {
                continue;
            };
            if self.recent_signs.len() == MAX_SIGN_SEQUENCE {
                self.recent_signs.pop_front();
            }
            self.recent_signs.push_back(sign);
        }
    }

    fn detect_sequence(&mut self, latest_heading: Option<Vec2>) {
        if let Some((confidence, next_sign)) = detect_sign_pattern(self.recent_signs.make_contiguous()) {
            if confidence > PATTERN_CONFIDENCE_FLOOR {
                self.has_pattern = true;
                self.pattern_confidence = confidence;
                self.predicted_next_direction = latest_heading
                    .map(|h| h.perp() * f64::from(next_sign))
                    .unwrap_or(Vec2::ZERO);
                return;
            }
        }
        self.has_pattern = false;
        self.pattern_confidence = 0.0;
        self.predicted_next_direction = Vec2::ZERO;
    }

    fn update_direction_changes(&mut self, history: &VecDeque<MovementSnapshot>) {
        let mut changes: Vec<(f64, f64)> = Vec::new();
        let mut last_index: Option<usize> = None;

        for i in 2..history.len() {
            let (Some(a), Some(c)) = (heading(&history[i - 2]), heading(&history[i])) else {
                continue;
            };
            let angle = a.dot(c).clamp(-1.0, 1.0).acos();
            if angle <= DIRECTION_CHANGE_ANGLE {
                continue;
            }
            // A sharp turn spans two overlapping pairs; count it once.
            if last_index == Some(i - 1) {
                last_index = Some(i);
                continue;
            }
            changes.push((history[i].timestamp, angle));
            last_index = Some(i);
        }

        if changes.len() >= 3 {
            let mean_lateral = changes.iter().map(|(_, a)| a.sin().abs()).sum::<f64>() / changes.len() as f64;
            self.lateral_factor = mean_lateral.clamp(LATERAL_FACTOR_MIN, LATERAL_FACTOR_MAX);
        }

        if changes.len() >= 2 {
            let intervals: Vec<f64> = changes.windows(2).map(|w| w[1].0 - w[0].0).collect();
            let n = intervals.len() as f64;
            let mean = intervals.iter().sum::<f64>() / n;
            self.juke_interval_mean = mean;
            self.juke_interval_variance = intervals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        }
    }
}

/// Detect an alternating or repeating turn sequence.
///
/// Returns the pattern confidence and the sign expected next.
pub fn detect_sign_pattern(signs: &[i8]) -> Option<(f64, i8)> {
    if signs.len() < MIN_PATTERN_LENGTH {
        return None;
    }
    let last = *signs.last()?;

    let alternations = signs.windows(2).filter(|w| w[0] != 0 && w[0] == -w[1]).count();
    let alternating = alternations == signs.len() - 1;
    if alternating && alternations >= 2 {
        let confidence = (0.6 + 0.1 * alternations as f64).min(ALTERNATING_PATTERN_CONFIDENCE_MAX);
        return Some((confidence, -last));
    }

    let len = signs.len();
    if len >= 6 && signs.iter().any(|s| *s != 0) {
        // Shortest period that holds across the whole slice, at least twice over.
        for period in 2..=len / 2 {
            let repeating = (period..len).all(|i| signs[i] == signs[i - period]);
            let next = signs[len - period];
            if repeating && next != 0 {
                return Some((REPEATING_PATTERN_CONFIDENCE, next));
            }
        }
    }

    None
}
