use crate::tween::{TweenId, TweenOwner, Tweener, ValueTween};

struct ActiveTween {
    id: TweenId,
    elapsed: f32,
    tween: ValueTween,
}

/// Frame driven scheduler for [`ValueTween`]s.
/// Call [`TweenContext::update`] once per frame with the frame's delta time.
#[derive(Default)]
pub struct TweenContext {
    active: Vec<ActiveTween>,
    next_id: u64,
}

impl TweenContext {
    /// Advance every active tween by `delta_time`.
    ///
    /// Update callbacks run first, in the order the tweens were started. Tweens that reached
    /// their target are then removed and their completion callbacks run, which may start new
    /// tweens. Those will first be advanced on the next call.
    pub fn update(&mut self, delta_time: f32) {
        let mut running = Vec::with_capacity(self.active.len());
        let mut finished = Vec::new();

        for mut active in self.active.drain(..) {
            active.elapsed += delta_time;
            let value = active.tween.sample(active.elapsed);
            active.tween.publish(value);

            if active.tween.is_finished(active.elapsed) {
                finished.push(active.tween);
            } else {
                running.push(active);
            }
        }

        self.active = running;
        for tween in finished {
            tween.complete(self);
        }
    }

    /// Is the tween with this id still running?
    pub fn is_active(&self, id: TweenId) -> bool {
        self.active.iter().any(|a| a.id == id)
    }

    /// How many tweens are running
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// How many running tweens are tagged with `owner`
    pub fn active_for_owner(&self, owner: TweenOwner) -> usize {
        self.active
            .iter()
            .filter(|a| a.tween.owner() == Some(owner))
            .count()
    }
}

impl Tweener for TweenContext {
    fn start(&mut self, tween: ValueTween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.active.push(ActiveTween {
            id,
            elapsed: 0.,
            tween,
        });
        id
    }

    fn cancel(&mut self, id: TweenId) {
        self.active.retain(|a| a.id != id);
    }

    fn cancel_all_for_owner(&mut self, owner: TweenOwner) {
        self.active.retain(|a| a.tween.owner() != Some(owner));
    }
}

impl std::fmt::Debug for TweenContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenContext")
            .field("active", &self.active.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
