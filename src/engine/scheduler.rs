use tracing::info;

/// Whatever drives frames. The tick loop only ever asks it for one more.
pub trait FrameHost {
    fn request_frame(&self);
}

impl FrameHost for eframe::egui::Context {
    fn request_frame(&self) {
        self.request_repaint();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle(u64);

const MAX_TICK_SECONDS: f64 = 1.0 / 20.0;
const FIRST_TICK_SECONDS: f32 = 1.0 / 60.0;

/// A repeating tick that can be registered and cancelled.
///
/// The loop holds no callback itself: each frame the host calls [`TickLoop::drive`]
/// with the current time and the work to run. A cancelled loop runs nothing and
/// stops asking for frames, so a torn-down engine is never stepped again.
#[derive(Debug, Default)]
pub struct TickLoop {
    generation: u64,
    active: Option<TickHandle>,
    last_tick: Option<f64>,
}

impl TickLoop {
    pub fn start(&mut self) -> TickHandle {
        if let Some(handle) = self.active {
            return handle;
        }
        self.generation += 1;
        let handle = TickHandle(self.generation);
        self.active = Some(handle);
        self.last_tick = None;
        info!(tick = self.generation, "tick loop started");
        handle
    }

    /// Cancels `handle` if it is the live registration.
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        if self.active != Some(handle) {
            return false;
        }
        self.active = None;
        self.last_tick = None;
        info!(tick = handle.0, "tick loop cancelled");
        true
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.active {
            self.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Runs one tick if the loop is live and asks the host for the next frame.
    /// Returns whether `tick` ran. A call whose `now` has not advanced past the
    /// previous tick keeps the loop alive but runs nothing.
    pub fn drive<H, F>(&mut self, host: &H, now: f64, tick: F) -> bool
    where
        H: FrameHost + ?Sized,
        F: FnOnce(f32),
    {
        if self.active.is_none() {
            return false;
        }

        let delta_seconds = match self.last_tick {
            Some(last) if now > last => (now - last).min(MAX_TICK_SECONDS) as f32,
            // Repeat pass within the same frame time: nothing has elapsed.
            Some(_) => {
                host.request_frame();
                return false;
            }
            None => FIRST_TICK_SECONDS,
        };
        self.last_tick = Some(now);

        tick(delta_seconds);
        host.request_frame();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct CountingHost {
        frames: Cell<usize>,
    }

    impl FrameHost for CountingHost {
        fn request_frame(&self) {
            self.frames.set(self.frames.get() + 1);
        }
    }

    #[test]
    fn idle_loop_runs_nothing() {
        let host = CountingHost::default();
        let mut tick_loop = TickLoop::default();
        let ran = tick_loop.drive(&host, 0.0, |_| panic!("must not tick"));
        assert!(!ran);
        assert_eq!(host.frames.get(), 0);
    }

    #[test]
    fn running_loop_ticks_and_requests_frames() {
        let host = CountingHost::default();
        let mut tick_loop = TickLoop::default();
        tick_loop.start();

        let mut deltas = Vec::new();
        for now in [1.0, 1.01, 2.0] {
            tick_loop.drive(&host, now, |dt| deltas.push(dt));
        }

        assert_eq!(host.frames.get(), 3);
        assert_eq!(deltas[0], FIRST_TICK_SECONDS);
        assert!((deltas[1] - 0.01).abs() < 1e-6);
        assert!((deltas[2] - MAX_TICK_SECONDS as f32).abs() < 1e-6);
    }

    #[test]
    fn cancel_stops_ticks_and_stale_handles_are_ignored() {
        let host = CountingHost::default();
        let mut tick_loop = TickLoop::default();
        let first = tick_loop.start();
        assert!(tick_loop.cancel(first));
        assert!(!tick_loop.drive(&host, 0.5, |_| panic!("cancelled loop ticked")));

        let second = tick_loop.start();
        assert_ne!(first, second);
        assert!(!tick_loop.cancel(first));
        assert!(tick_loop.is_running());

        tick_loop.stop();
        assert!(!tick_loop.is_running());
    }

    #[test]
    fn repeated_timestamp_skips_the_tick() {
        let host = CountingHost::default();
        let mut tick_loop = TickLoop::default();
        tick_loop.start();

        let mut deltas = Vec::new();
        assert!(tick_loop.drive(&host, 1.0, |dt| deltas.push(dt)));
        assert!(!tick_loop.drive(&host, 1.0, |dt| deltas.push(dt)));
        assert!(!tick_loop.drive(&host, 0.9, |dt| deltas.push(dt)));
        assert!(tick_loop.drive(&host, 1.02, |dt| deltas.push(dt)));

        assert_eq!(deltas.len(), 2);
        assert!(deltas.iter().all(|dt| *dt > 0.0));
        assert!((deltas[1] - 0.02).abs() < 1e-6);
        assert_eq!(host.frames.get(), 4);
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let mut tick_loop = TickLoop::default();
        let first = tick_loop.start();
        assert_eq!(tick_loop.start(), first);
    }
}
