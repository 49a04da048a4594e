use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::config::AnimationConfig;
use crate::events::AnimationFrame;
use crate::spring::Spring;

/// Restartable spring animation running on its own task.
///
/// Rules:
/// - `retarget` cancels the in-flight task and spawns a replacement that starts
///   from the last published value and velocity, not from the nominal start.
/// - Frames are published on a `watch` channel, newest generation only.
/// - The task exits after publishing a settled frame, or when cancelled.
pub struct Animator {
    params: AnimationConfig,
    frames: watch::Sender<AnimationFrame>,
    parent: CancellationToken,
    generation: u64,
    running: Option<Running>,
}

struct Running {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Animator {
    pub fn new(
        params: AnimationConfig,
        initial: f32,
        parent: CancellationToken,
    ) -> (Self, watch::Receiver<AnimationFrame>) {
        let (frames, rx) = watch::channel(AnimationFrame::resting(initial));
        let animator = Self {
            params,
            frames,
            parent,
            generation: 0,
            running: None,
        };
        (animator, rx)
    }

    pub fn frame(&self) -> AnimationFrame {
        *self.frames.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Cancel whatever is in flight and spring toward `target` from the current frame.
    pub fn retarget(&mut self, target: f32) {
        self.stop();

        let current = self.frame();
        let mut spring = Spring::at_rest(current.value, self.params);
        spring.retarget(target);
        spring.resume_from(current.value, current.velocity);

        self.generation += 1;
        let generation = self.generation;
        let first = AnimationFrame {
            generation,
            value: spring.value(),
            velocity: spring.velocity(),
            target,
            settled: spring.is_settled(),
        };
        self.frames.send_replace(first);
        if first.settled {
            return;
        }

        let token = self.parent.child_token();
        let handle = tokio::spawn(animate(
            spring,
            generation,
            self.params,
            self.frames.clone(),
            token.clone(),
        ));
        self.running = Some(Running { token, handle });
    }

    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn animate(
    mut spring: Spring,
    generation: u64,
    params: AnimationConfig,
    frames: watch::Sender<AnimationFrame>,
    cancel: CancellationToken,
) {
    let mut ticker = interval(params.frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;
    let mut last = Instant::now();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            now = ticker.tick() => {
                let settled = spring.step(now.duration_since(last));
                last = now;
                let frame = AnimationFrame {
                    generation,
                    value: spring.value(),
                    velocity: spring.velocity(),
                    target: spring.target(),
                    settled,
                };
                let published = frames.send_if_modified(|current| {
                    if current.generation > generation {
                        return false;
                    }
                    *current = frame;
                    true
                });
                if !published {
                    trace!(generation, "animation superseded");
                    break;
                }
                if settled {
                    trace!(generation, value = frame.value, "animation settled");
                    break;
                }
            }
        }
    }
}
