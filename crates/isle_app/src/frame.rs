//! Fixed-rate frame loop.
//!
//! Drives a [`Session`] at the configured tick rate. The loop also stands in
//! for the animation system: every animation an actor starts is reported
//! finished a fixed number of frames later, unless it is stopped first.
//! Scripted input cues are posted before the frame they are due in.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use isle_actor::{ActorId, AnimationCommand, AnimationId, Notification, Pizza, Session};
use tracing::{debug, info, warn};

use crate::config::AppConfig;

/// Input the loop feeds into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    Post(Notification),
    /// Start a pizza delivery run on the given pizza actor.
    StartPizza(ActorId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCue {
    pub frame: u64,
    pub cue: Cue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunningAnimation {
    actor: ActorId,
    animation: AnimationId,
    /// Frame before which the end notification is posted.
    due: u64,
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticked: usize,
    pub consumed: usize,
    pub dropped: usize,
}

#[derive(Debug)]
pub struct FrameLoop {
    config: AppConfig,
    cues: VecDeque<ScheduledCue>,
    running: Vec<RunningAnimation>,
}

impl FrameLoop {
    #[must_use]
    pub fn new(config: AppConfig, mut cues: Vec<ScheduledCue>) -> Self {
        cues.sort_by_key(|cue| cue.frame);
        Self {
            config,
            cues: cues.into(),
            running: Vec::new(),
        }
    }

    /// Run frames until `max_ticks` is reached, or forever if it is 0.
    pub fn run(&mut self, session: &mut Session) -> RunSummary {
        let frame_duration = Duration::from_secs_f64(self.config.frame_seconds());
        let dt = frame_duration.as_secs_f32();
        let mut summary = RunSummary::default();

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            realtime = self.config.realtime,
            "starting frame loop"
        );

        loop {
            let start = Instant::now();
            let frame = session.frame().tick + 1;

            self.apply_cues(session, frame);
            self.finish_animations(session, frame);

            let report = session.tick(dt);
            self.track_animations(session, report.frame);

            summary.frames += 1;
            summary.ticked += report.ticked;
            summary.consumed += report.dispatch.consumed;
            summary.dropped += report.dispatch.dropped;

            if self.config.max_ticks > 0 && summary.frames >= self.config.max_ticks {
                info!(frames = summary.frames, "frame loop complete");
                break;
            }

            if !self.config.realtime {
                continue;
            }
            let elapsed = start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    frame = report.frame,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }
        }
        summary
    }

    fn apply_cues(&mut self, session: &mut Session, frame: u64) {
        while self.cues.front().is_some_and(|cue| cue.frame <= frame) {
            let Some(ScheduledCue { cue, .. }) = self.cues.pop_front() else {
                break;
            };
            debug!(frame, ?cue, "cue");
            match cue {
                Cue::Post(notification) => session.post(notification),
                Cue::StartPizza(pizza) => {
                    let started = session
                        .invoke::<Pizza, _>(pizza, |pizza, ctx| pizza.start_mission(ctx))
                        .and_then(|result| result);
                    if let Err(err) = started {
                        warn!(%pizza, error = %err, "pizza mission not started");
                    }
                }
            }
        }
    }

    fn finish_animations(&mut self, session: &mut Session, frame: u64) {
        let (done, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.running)
            .into_iter()
            .partition(|anim| anim.due <= frame);
        self.running = running;
        for anim in done {
            debug!(actor = %anim.actor, animation = anim.animation.0, "animation finished");
            session.post(Notification::animation_end(anim.actor, anim.animation));
        }
    }

    fn track_animations(&mut self, session: &mut Session, frame: u64) {
        for command in session.animations_mut().drain() {
            match command {
                AnimationCommand::Play { actor, animation } => {
                    self.running.push(RunningAnimation {
                        actor,
                        animation,
                        due: frame + u64::from(self.config.animation_frames),
                    });
                }
                AnimationCommand::Stop { actor } => {
                    self.running.retain(|anim| anim.actor != actor);
                }
                AnimationCommand::Reset => self.running.clear(),
                AnimationCommand::CameraAnimations(enabled) => {
                    debug!(enabled, "camera animations");
                }
                AnimationCommand::AmbientAnimations(enabled) => {
                    debug!(enabled, "ambient animations");
                }
            }
        }
    }
}
