//! Declarative transitions
//!
//! A transition is a list of timed keyframes. Players sample it against
//! wall-clock time; the host's render loop decides how a sampled
//! [`Transform`] is drawn. Players are fire-and-forget: nothing waits on
//! them and dropping one simply stops the effect.

use std::time::{Duration, Instant};
use tracing::trace;

/// Visual transform at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub opacity: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    fn lerp(a: Transform, b: Transform, t: f32) -> Transform {
        let mix = |x: f32, y: f32| x + (y - x) * t;
        Transform {
            opacity: mix(a.opacity, b.opacity),
            offset_x: mix(a.offset_x, b.offset_x),
            offset_y: mix(a.offset_y, b.offset_y),
            scale: mix(a.scale, b.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A transform reached at a given offset from the start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub at: Duration,
    pub transform: Transform,
}

impl Keyframe {
    pub fn new(at: Duration, transform: Transform) -> Self {
        Self { at, transform }
    }
}

/// Named, ordered keyframe list
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    name: &'static str,
    keyframes: Vec<Keyframe>,
}

impl Transition {
    /// Build a transition; keyframes are sorted by time
    pub fn new(name: &'static str, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by_key(|k| k.at);
        Self { name, keyframes }
    }

    /// Intro played when a screen mounts: fade in while sliding up
    pub fn fade_slide_in(duration: Duration) -> Self {
        Self::new(
            "fade_slide_in",
            vec![
                Keyframe::new(
                    Duration::ZERO,
                    Transform {
                        opacity: 0.0,
                        offset_y: 3.0,
                        ..Transform::IDENTITY
                    },
                ),
                Keyframe::new(duration, Transform::IDENTITY),
            ],
        )
    }

    /// Horizontal shake played after an invalid submit
    pub fn shake() -> Self {
        let step = Duration::from_millis(SHAKE_DURATION_MS / 5);
        let offsets = [0.0, -2.0, 2.0, -2.0, 2.0, 0.0];
        Self::new(
            "shake",
            offsets
                .iter()
                .enumerate()
                .map(|(i, &dx)| {
                    Keyframe::new(
                        step * i as u32,
                        Transform {
                            offset_x: dx,
                            ..Transform::IDENTITY
                        },
                    )
                })
                .collect(),
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn duration(&self) -> Duration {
        self.keyframes.last().map(|k| k.at).unwrap_or(Duration::ZERO)
    }

    /// Linearly interpolated transform at `elapsed`
    pub fn sample(&self, elapsed: Duration) -> Transform {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Transform::IDENTITY,
        };
        if elapsed <= first.at {
            return first.transform;
        }
        if elapsed >= last.at {
            return last.transform;
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if elapsed >= a.at && elapsed <= b.at {
                let span = (b.at - a.at).as_secs_f32();
                if span == 0.0 {
                    return b.transform;
                }
                let t = (elapsed - a.at).as_secs_f32() / span;
                return Transform::lerp(a.transform, b.transform, t);
            }
        }
        last.transform
    }
}

/// Length of the invalid-submit shake
pub const SHAKE_DURATION_MS: u64 = 500;

/// A transition started at a point in time
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    transition: Transition,
    started_at: Instant,
}

impl AnimationPlayer {
    pub fn start(transition: Transition) -> Self {
        Self::start_at(transition, Instant::now())
    }

    pub fn start_at(transition: Transition, started_at: Instant) -> Self {
        trace!(
            transition = transition.name(),
            duration = ?transition.duration(),
            "transition started"
        );
        Self {
            transition,
            started_at,
        }
    }

    pub fn sample_at(&self, now: Instant) -> Transform {
        self.transition
            .sample(now.saturating_duration_since(self.started_at))
    }

    pub fn is_finished_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.transition.duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_slide_endpoints() {
        let t = Transition::fade_slide_in(Duration::from_millis(400));
        assert_eq!(t.duration(), Duration::from_millis(400));
        assert_eq!(t.sample(Duration::ZERO).opacity, 0.0);
        assert_eq!(t.sample(Duration::from_millis(400)), Transform::IDENTITY);
        assert_eq!(t.sample(Duration::from_secs(5)), Transform::IDENTITY);
    }

    #[test]
    fn test_linear_midpoint() {
        let t = Transition::fade_slide_in(Duration::from_millis(400));
        let mid = t.sample(Duration::from_millis(200));
        assert!((mid.opacity - 0.5).abs() < 1e-4);
        assert!((mid.offset_y - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_shake_lasts_half_a_second() {
        let t = Transition::shake();
        assert_eq!(t.duration(), Duration::from_millis(SHAKE_DURATION_MS));
        assert_eq!(t.sample(Duration::from_millis(100)).offset_x, -2.0);
        assert_eq!(t.sample(Duration::from_millis(500)).offset_x, 0.0);
    }

    #[test]
    fn test_keyframes_sorted() {
        let t = Transition::new(
            "custom",
            vec![
                Keyframe::new(Duration::from_millis(100), Transform::IDENTITY),
                Keyframe::new(Duration::ZERO, Transform { opacity: 0.0, ..Transform::IDENTITY }),
            ],
        );
        assert_eq!(t.keyframes()[0].at, Duration::ZERO);
    }

    #[test]
    fn test_empty_transition_is_identity() {
        let t = Transition::new("empty", Vec::new());
        assert_eq!(t.sample(Duration::from_millis(10)), Transform::IDENTITY);
        assert_eq!(t.duration(), Duration::ZERO);
    }

    #[test]
    fn test_player_finishes() {
        let start = Instant::now();
        let player = AnimationPlayer::start_at(Transition::shake(), start);
        assert!(!player.is_finished_at(start));
        assert!(player.is_finished_at(start + Duration::from_millis(600)));
        assert_eq!(
            player.sample_at(start + Duration::from_millis(600)),
            Transform::IDENTITY
        );
    }
}
