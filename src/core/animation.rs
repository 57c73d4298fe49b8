use std::time::Instant;

use anyhow::Result;

const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Work performed once per display refresh
pub trait FrameTask {
    fn run_frame(&mut self) -> Result<()>;
}

/// Frames-per-second average over a fixed reporting interval
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    frame_count: u32,
    elapsed: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame; returns the new average when an interval completes
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.elapsed += delta;

        if self.elapsed >= FPS_UPDATE_INTERVAL {
            let fps = self.frame_count as f32 / self.elapsed;
            self.frame_count = 0;
            self.elapsed = 0.0;
            Some(fps)
        } else {
            None
        }
    }
}

/// Repeating task driven by the host's refresh ticks
///
/// The loop owns its task. Each `tick` runs the task exactly once while the
/// loop is running; after `stop` ticks are no-ops.
pub struct AnimationLoop<T: FrameTask> {
    task: T,
    running: bool,
    frame_count: u64,
    last_tick: Instant,
    fps: FpsCounter,
}

impl<T: FrameTask> AnimationLoop<T> {
    pub fn new(task: T) -> Self {
        Self {
            task,
            running: true,
            frame_count: 0,
            last_tick: Instant::now(),
            fps: FpsCounter::new(),
        }
    }

    /// Run the task for one refresh tick; returns false if the loop is stopped
    pub fn tick(&mut self) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        if let Some(fps) = self.fps.record(delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        self.task.run_frame()?;
        self.frame_count += 1;
        Ok(true)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn task_mut(&mut self) -> &mut T {
        &mut self.task
    }

    pub fn into_task(self) -> T {
        self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingTask {
        runs: usize,
        fail_on: Option<usize>,
    }

    impl FrameTask for CountingTask {
        fn run_frame(&mut self) -> Result<()> {
            self.runs += 1;
            if self.fail_on == Some(self.runs) {
                anyhow::bail!("frame {} failed", self.runs);
            }
            Ok(())
        }
    }

    #[test]
    fn test_tick_runs_task_once() {
        let mut animation = AnimationLoop::new(CountingTask::default());
        assert!(animation.tick().unwrap());
        assert!(animation.tick().unwrap());
        assert_eq!(animation.task().runs, 2);
        assert_eq!(animation.frame_count(), 2);
    }

    #[test]
    fn test_stopped_loop_does_not_run() {
        let mut animation = AnimationLoop::new(CountingTask::default());
        animation.tick().unwrap();
        animation.stop();

        assert!(!animation.is_running());
        assert!(!animation.tick().unwrap());
        assert_eq!(animation.into_task().runs, 1);
    }

    #[test]
    fn test_task_error_propagates() {
        let mut animation = AnimationLoop::new(CountingTask {
            runs: 0,
            fail_on: Some(2),
        });
        assert!(animation.tick().is_ok());
        let err = animation.tick().unwrap_err();
        assert!(err.to_string().contains("frame 2"));
        assert_eq!(animation.frame_count(), 1);
    }

    #[test]
    fn test_fps_counter_reports_each_interval() {
        let mut fps = FpsCounter::new();
        for _ in 0..59 {
            assert!(fps.record(1.0 / 60.0).is_none());
        }
        let reported = fps.record(1.0 / 60.0 + 0.001).unwrap();
        assert!((reported - 60.0).abs() < 0.1);
        assert!(fps.record(1.0 / 60.0).is_none());
    }
}
