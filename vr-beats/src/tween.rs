use std::sync::atomic::{AtomicU64, Ordering};

/// Easing curve applied to the normalised progress of a tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    /// Constant speed
    #[default]
    Linear,
    /// Quadratic deceleration
    EaseOutQuad,
    /// Exponential deceleration - fast start, long settle
    EaseOutExpo,
}

impl Ease {
    /// Map `t` in `[0, 1]` onto the curve. Values outside that range are clamped.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0., 1.);
        match self {
            Ease::Linear => t,
            Ease::EaseOutQuad => 1. - (1. - t) * (1. - t),
            Ease::EaseOutExpo => {
                if t >= 1. {
                    1.
                } else {
                    1. - 2f32.powf(-10. * t)
                }
            }
        }
    }
}

/// Opaque handle to an in-flight tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub(crate) u64);

/// Tag shared by a group of tweens so they can be cancelled together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenOwner(u64);

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

impl TweenOwner {
    /// Create an owner tag that no other caller will ever be handed
    pub fn unique() -> Self {
        TweenOwner(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

type OnUpdate = Box<dyn FnMut(f32)>;
type OnComplete = Box<dyn FnOnce(&mut dyn Tweener)>;

/// A request to animate a single `f32` from one value to another over time.
///
/// The tween itself holds no reference to what it animates: `on_update` is handed every
/// intermediate value and is responsible for writing it somewhere. Because the callback may
/// run frames after the tween was started, it should hold weak references to its target
/// and check they're still alive.
pub struct ValueTween {
    from: f32,
    to: f32,
    duration: f32,
    ease: Ease,
    owner: Option<TweenOwner>,
    on_update: Option<OnUpdate>,
    on_complete: Option<OnComplete>,
}

impl ValueTween {
    /// Animate from `from` to `to` over `duration` time units, linearly
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        ValueTween {
            from,
            to,
            duration,
            ease: Ease::Linear,
            owner: None,
            on_update: None,
            on_complete: None,
        }
    }

    /// Use a different easing curve
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Tag this tween so it can be cancelled with [`Tweener::cancel_all_for_owner`]
    pub fn with_owner(mut self, owner: TweenOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Called every tick with the current eased value
    pub fn on_update(mut self, on_update: impl FnMut(f32) + 'static) -> Self {
        self.on_update = Some(Box::new(on_update));
        self
    }

    /// Called once when the tween reaches its target. Never called for cancelled tweens.
    pub fn on_complete(mut self, on_complete: impl FnOnce(&mut dyn Tweener) + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Value of the tween once `elapsed` time units have passed
    pub fn sample(&self, elapsed: f32) -> f32 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let progress = self.ease.apply(elapsed / self.duration);
        self.from + (self.to - self.from) * progress
    }

    /// Has the tween reached its target after `elapsed` time units?
    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration
    }

    /// The owner tag, if any
    pub fn owner(&self) -> Option<TweenOwner> {
        self.owner
    }

    /// Hand `value` to the update callback
    pub fn publish(&mut self, value: f32) {
        if let Some(on_update) = self.on_update.as_mut() {
            on_update(value);
        }
    }

    /// Consume the tween, running its completion callback
    pub fn complete(self, tweener: &mut dyn Tweener) {
        if let Some(on_complete) = self.on_complete {
            on_complete(tweener);
        }
    }
}

impl std::fmt::Debug for ValueTween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueTween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("ease", &self.ease)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Something that can drive [`ValueTween`]s over time
pub trait Tweener {
    /// Begin animating. The returned id can be used to cancel the tween.
    fn start(&mut self, tween: ValueTween) -> TweenId;
    /// Stop a tween without running its completion. Unknown or finished ids are ignored.
    fn cancel(&mut self, id: TweenId);
    /// Stop every tween tagged with `owner`
    fn cancel_all_for_owner(&mut self, owner: TweenOwner);
}
