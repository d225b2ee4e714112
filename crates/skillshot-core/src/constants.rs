//! Prediction constants and tuning parameters.

/// Host tick rate used by the headless harness (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Tolerance for degenerate geometry (zero lengths, coincident centers, empty areas).
pub const EPSILON: f64 = 1e-6;

/// Projectile speeds at or above this are treated as instant.
pub const INSTANT_SPEED_SENTINEL: f64 = f64::MAX / 2.0;

// --- Tracker sampling ---

/// Minimum time between two movement samples (seconds).
pub const SAMPLE_INTERVAL: f64 = 0.05;

/// Slack on the sampling gate so a sample exactly one interval later is accepted.
pub const SAMPLE_INTERVAL_TOLERANCE: f64 = 1e-9;

/// Movement samples retained per target.
pub const MAX_HISTORY: usize = 100;

/// Samples needed before behavior data is trusted at full weight.
pub const MIN_SAMPLES_FOR_BEHAVIOR: usize = 10;

/// Speeds below this count as standing still (units/s).
pub const STATIONARY_SPEED_THRESHOLD: f64 = 10.0;

/// Trackers of unreachable units with no sample for this long are dropped (seconds).
pub const TRACKER_TIMEOUT: f64 = 10.0;

// --- Stationary boost ---

/// Stationary time before the hit-chance floor kicks in (seconds).
pub const STATIONARY_BOOST_START: f64 = 0.5;

/// Stationary time at which the floor reaches its maximum (seconds).
pub const STATIONARY_BOOST_FULL: f64 = 1.0;

/// Floor value when the boost first applies.
pub const STATIONARY_BOOST_MIN: f64 = 0.5;

/// Floor value once the target has been still for `STATIONARY_BOOST_FULL`.
pub const STATIONARY_BOOST_MAX: f64 = 0.75;

// --- Dodge pattern analysis ---

/// Pattern is recomputed every this many new samples.
pub const PATTERN_ANALYSIS_INTERVAL: usize = 10;

/// A learned pattern is discarded after this long without motion (seconds).
pub const PATTERN_EXPIRY: f64 = 3.0;

/// |cross| above this counts as a left/right turn.
pub const LATERAL_TURN_THRESHOLD: f64 = 0.1;

/// dot above (below minus) this counts as forward (backward) motion.
pub const LONGITUDINAL_DOT_THRESHOLD: f64 = 0.5;

/// |cross| above this contributes a sign to the direction sequence.
pub const SIGN_THRESHOLD: f64 = 0.15;

/// Length of the rolling direction-sign sequence.
pub const MAX_SIGN_SEQUENCE: usize = 8;

/// Shortest sign sequence a pattern can be detected from.
pub const MIN_PATTERN_LENGTH: usize = 4;

/// Patterns at or below this confidence are not acted on.
pub const PATTERN_CONFIDENCE_FLOOR: f64 = 0.6;

/// Confidence assigned to a repeating (same-direction) sequence.
pub const REPEATING_PATTERN_CONFIDENCE: f64 = 0.85;

/// Upper bound on alternating-sequence confidence.
pub const ALTERNATING_PATTERN_CONFIDENCE_MAX: f64 = 0.9;

/// Heading change counted as a juke (radians).
pub const DIRECTION_CHANGE_ANGLE: f64 = 0.5;

/// Reaction delay assumed before any post-attack movement is observed (seconds).
pub const DEFAULT_REACTION_DELAY: f64 = 0.2;

/// Lateral dodge factor before any juke is observed.
pub const DEFAULT_LATERAL_FACTOR: f64 = 0.5;

pub const LATERAL_FACTOR_MIN: f64 = 0.2;
pub const LATERAL_FACTOR_MAX: f64 = 0.9;

// --- Behavior PDF ---

/// Cells per side of the behavior grid.
pub const PDF_GRID_SIZE: usize = 32;

/// Minimum half-extent of the grid window (world units).
pub const PDF_MIN_HALF_EXTENT: f64 = 400.0;

/// Grid window covers travel distance times this margin.
pub const PDF_EXTENT_MARGIN: f64 = 1.2;

/// Gaussian kernel standard deviation (cells).
pub const PDF_KERNEL_SIGMA_CELLS: f64 = 1.5;

/// Gaussian kernel radius (cells).
pub const PDF_KERNEL_RADIUS_CELLS: i32 = 2;

/// Most recent samples used when building a PDF.
pub const PDF_MAX_SAMPLES: usize = 30;

/// Cached PDF is reused when prediction time differs by less than this (seconds).
pub const PDF_CACHE_TIME_TOLERANCE: f64 = 0.05;

/// Cached PDF is reused when move speed differs by less than this (units/s).
pub const PDF_CACHE_SPEED_TOLERANCE: f64 = 20.0;

/// Recency decay bounds. Faster targets decay history faster.
pub const DECAY_RATE_MAX: f64 = 0.95;
pub const DECAY_RATE_MIN: f64 = 0.8;
pub const DECAY_SPEED_SCALE: f64 = 500.0;
pub const DECAY_SPEED_SPAN: f64 = 0.15;

/// Base weight of each lateral dodge hypothesis.
pub const DODGE_HYPOTHESIS_WEIGHT: f64 = 0.5;

/// Cadence weight bounds for dodge hypotheses.
pub const CADENCE_WEIGHT_MIN: f64 = 0.3;
pub const CADENCE_WEIGHT_MAX: f64 = 1.0;

/// Multiplier on pattern confidence for the pattern-predicted sample.
pub const PATTERN_SAMPLE_WEIGHT: f64 = 2.5;

/// Extra mass placed at the current position of an animation-locked target.
pub const ANIMATION_LOCK_BIAS_WEIGHT: f64 = 2.0;

// --- Last-hit bias ---

/// Minions further than this from the target are ignored.
pub const CS_SEARCH_RADIUS: f64 = 500.0;

/// Minions above this multiple of the target's attack damage are ignored.
pub const CS_HEALTH_AD_MULTIPLE: f64 = 3.0;

/// Last-hit candidates below this confidence add no mass.
pub const CS_MIN_CONFIDENCE: f64 = 0.3;

// --- Confidence ---

/// Confidence returned for obvious hits (locked, channeling, straight line).
pub const OBVIOUS_HIT_CONFIDENCE: f64 = 0.95;

/// Samples inspected by the straight-line check.
pub const STRAIGHT_LINE_SAMPLES: usize = 5;

/// Minimum speed for a sample to count toward a straight line (units/s).
pub const STRAIGHT_LINE_MIN_SPEED: f64 = 10.0;

/// Minimum cosine between sample headings on a straight line.
pub const STRAIGHT_LINE_MIN_DOT: f64 = 0.995;

/// Confidence decay per world unit of distance.
pub const CONFIDENCE_DISTANCE_DECAY: f64 = 0.0003;

/// Confidence decay per second of latency.
pub const CONFIDENCE_LATENCY_FACTOR: f64 = 2.0;

/// Projectile speed below which a projectile counts as slow (units/s).
pub const SLOW_PROJECTILE_SPEED: f64 = 1000.0;

pub const INSTANT_PROJECTILE_BONUS: f64 = 1.2;
pub const SLOW_PROJECTILE_PENALTY: f64 = 0.8;

/// Move speed at which the mobility penalty is neutral (units/s).
pub const MOBILITY_REFERENCE_SPEED: f64 = 500.0;
pub const MOBILITY_PENALTY_MIN: f64 = 0.5;
pub const MOBILITY_PENALTY_MAX: f64 = 1.5;

pub const CONFIDENCE_MIN: f64 = 0.1;
pub const CONFIDENCE_MAX: f64 = 1.0;

// --- Aim-point search ---

/// Cells per side of the coarse aim grid.
pub const AIM_GRID_SIZE: usize = 16;

/// Gradient refinement rounds after the coarse scan.
pub const AIM_REFINE_ITERATIONS: usize = 2;

/// Sampled directions per refinement round.
pub const AIM_REFINE_DIRECTIONS: usize = 8;

/// Step for finite differences (world units).
pub const AIM_REFINE_DELTA: f64 = 10.0;

/// Distance moved along the gradient per round (world units).
pub const AIM_REFINE_STEP: f64 = 5.0;

/// Reachable-disk samples for capsule and cone overlap.
pub const SPIRAL_SAMPLES: usize = 128;

/// Angular multiplier of the sampling spiral; coprime with `SPIRAL_SAMPLES`.
pub const SPIRAL_FACTOR: f64 = 7.0;

/// Orientations tried on either side of the direct line for capsules and cones.
pub const ORIENTATION_FAN_STEPS: i32 = 4;

/// Orientations tried for two-point vector effects.
pub const VECTOR_ORIENTATIONS: usize = 20;

/// Hit chance reported when no vector orientation clears the floor.
pub const VECTOR_FALLBACK_HIT_CHANCE: f64 = 0.1;

/// Casters closer than this to the aim line origin cannot orient a line or cone.
pub const MIN_SAFE_DISTANCE: f64 = 1.0;

// --- Edge cases ---

/// Window in which a stasis exit counts as exactly on time (seconds).
pub const STASIS_TIMING_TOLERANCE: f64 = 0.05;

/// Confidence multiplier when the projectile lands while the target is still dashing.
pub const MID_DASH_CONFIDENCE: f64 = 0.3;

pub const SLOWED_MULTIPLIER: f64 = 1.15;
pub const HIDDEN_SOURCE_MULTIPLIER: f64 = 1.35;

/// Floor on the fog-of-war confidence scale.
pub const FOG_CONFIDENCE_FLOOR: f64 = 0.3;

/// Slack on the range pre-check (world units).
pub const RANGE_CHECK_BUFFER: f64 = 50.0;

/// Extra radius when gathering target-selection candidates (world units).
pub const TARGET_SELECTION_BUFFER: f64 = 200.0;

// --- Opportunity window ---

/// Samples older than this are pruned (seconds).
pub const OPPORTUNITY_WINDOW_DURATION: f64 = 3.0;

/// Maximum stored samples per window.
pub const OPPORTUNITY_MAX_SAMPLES: usize = 200;

/// Peak older than this is recomputed from live samples (seconds).
pub const OPPORTUNITY_PEAK_STALE: f64 = 2.0;

/// Samples needed before a peak can be called.
pub const OPPORTUNITY_MIN_SAMPLES: usize = 5;

/// Trailing window for the running average (seconds).
pub const OPPORTUNITY_AVERAGE_WINDOW: f64 = 1.0;

/// Samples needed inside the trailing window.
pub const OPPORTUNITY_MIN_AVERAGE_SAMPLES: usize = 3;

/// Fraction of the adaptive threshold a peak must reach.
pub const OPPORTUNITY_THRESHOLD_FRACTION: f64 = 0.9;

/// Required margin over the trailing average.
pub const OPPORTUNITY_AVERAGE_MARGIN: f64 = 1.05;

/// Consecutive samples that must decline strictly after a peak.
pub const OPPORTUNITY_DECLINE_SAMPLES: usize = 3;

/// Threshold holds at full value until this elapsed time (seconds).
pub const THRESHOLD_DECAY_START: f64 = 3.0;

/// Threshold reaches its floor at this elapsed time (seconds).
pub const THRESHOLD_DECAY_END: f64 = 8.0;

/// Fraction of the base threshold kept after full decay.
pub const THRESHOLD_FLOOR_FRACTION: f64 = 0.7;

/// Patience = cooldown times this, clamped.
pub const PATIENCE_COOLDOWN_FRACTION: f64 = 0.3;
pub const PATIENCE_MIN: f64 = 1.5;
pub const PATIENCE_MAX: f64 = 3.0;

/// Cooldown assumed when the descriptor carries none (seconds).
pub const DEFAULT_COOLDOWN: f64 = 10.0;

/// A window resets when hit chance drops below this fraction of the last value.
pub const OPPORTUNITY_COLLAPSE_FRACTION: f64 = 0.5;

/// Minimum window age before a collapse resets it (seconds).
pub const OPPORTUNITY_COLLAPSE_MIN_ELAPSED: f64 = 1.0;
