use crate::driver::{Activation, AnimationDriver, FrameTicket};
use crate::layout::RenderFrame;
use crate::photo::SourceRef;
use async_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Roughly one display refresh at 60 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub enum DriverEvent {
    Ready,
    Frame(RenderFrame),
}

/// Runs an [`AnimationDriver`] on a tokio timer for hosts without a display clock.
pub struct FrameLoop {
    driver: Arc<Mutex<AnimationDriver>>,
    events: Sender<DriverEvent>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl FrameLoop {
    pub fn new(driver: AnimationDriver, events: Sender<DriverEvent>) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
            events,
            interval: FRAME_INTERVAL,
            task: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Shared handle for feeding pointer input.
    pub fn driver(&self) -> Arc<Mutex<AnimationDriver>> {
        self.driver.clone()
    }

    /// Must be called from within a tokio runtime. Once this returns with
    /// `active == false`, no further frame reaches the channel.
    pub fn activate(&mut self, photos: &[SourceRef], active: bool) {
        let shared = self.driver.clone();
        let mut driver = shared.lock();

        match driver.activate(photos, active) {
            Activation::Started(ticket) => {
                self.cancel();
                // the task cannot emit a frame before Ready, it needs the lock we hold
                self.task = Some(tokio::spawn(run(
                    shared.clone(),
                    ticket,
                    self.events.clone(),
                    self.interval,
                )));
                if self.events.try_send(DriverEvent::Ready).is_err() {
                    log::warn!("Ready signal dropped");
                }
            }
            Activation::Stopped => self.cancel(),
            Activation::Running => {}
        }
    }

    /// Whether a tick task is scheduled and has not finished.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.driver.lock().stop();
        self.cancel();
    }
}

async fn run(
    driver: Arc<Mutex<AnimationDriver>>,
    ticket: FrameTicket,
    events: Sender<DriverEvent>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        // send while locked so a concurrent deactivation cannot slip in between
        let keep_going = {
            let mut driver = driver.lock();
            match driver.tick(ticket) {
                Some(frame) => match events.try_send(DriverEvent::Frame(frame)) {
                    Ok(()) => true,
                    Err(TrySendError::Full(_)) => {
                        log::trace!("Frame dropped, consumer is behind");
                        true
                    }
                    Err(TrySendError::Closed(_)) => false,
                },
                None => false,
            }
        };

        if !keep_going {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::photo::PhotoCount;

    fn photos() -> Vec<SourceRef> {
        ["a", "b", "c"].into_iter().map(SourceRef::from).collect()
    }

    fn frame_loop(tx: Sender<DriverEvent>) -> FrameLoop {
        let driver = AnimationDriver::new(Layout::default(), PhotoCount::Auto);
        FrameLoop::new(driver, tx).with_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_ready_then_frames() {
        let (tx, rx) = async_channel::unbounded();
        let mut frames = frame_loop(tx);
        frames.activate(&photos(), true);
        frames.activate(&photos(), true);

        assert!(matches!(rx.recv().await, Ok(DriverEvent::Ready)));
        for _ in 0..3 {
            match rx.recv().await {
                Ok(DriverEvent::Frame(frame)) => assert_eq!(frame.items.len(), 3),
                other => panic!("expected a frame, got {other:?}"),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_ready_arrives_with_tick_scheduled() {
        for _ in 0..20 {
            let (tx, rx) = async_channel::bounded(1);
            let mut frames = frame_loop(tx);
            frames.activate(&photos(), true);

            assert!(frames.is_running());
            assert!(matches!(rx.recv().await, Ok(DriverEvent::Ready)));
            assert!(matches!(rx.recv().await, Ok(DriverEvent::Frame(_))));

            frames.activate(&photos(), false);
            assert!(!frames.is_running());
        }
    }

    #[tokio::test]
    async fn test_no_frames_after_deactivation() {
        let (tx, rx) = async_channel::unbounded();
        let mut frames = frame_loop(tx);
        frames.activate(&photos(), true);

        assert!(matches!(rx.recv().await, Ok(DriverEvent::Ready)));
        assert!(matches!(rx.recv().await, Ok(DriverEvent::Frame(_))));

        frames.activate(&photos(), false);
        while rx.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
        assert!(!frames.driver().lock().is_active());
    }

    #[tokio::test]
    async fn test_drag_through_shared_driver() {
        let (tx, rx) = async_channel::unbounded();
        let mut frames = frame_loop(tx);
        frames.activate(&photos(), true);
        let _ = rx.recv().await;

        let driver = frames.driver();
        driver.lock().pointer_down(0.0);
        driver.lock().pointer_move(20.0);
        let frozen = driver.lock().state().primary;

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(driver.lock().state().primary, frozen);
        assert!((driver.lock().state().manual_offset - 0.1).abs() < 1e-12);
    }
}
