// src/orchestrator.rs
//! Runs one frame at a time: drain and dispatch pending platform events,
//! render the gradient, present it, advance the animation phase.
//!
//! All mutable loop state lives in `LoopState`, owned by the orchestrator.

use crate::config::AnimationConfig;
use crate::platform::backends::{Driver, PlatformEvent};
use crate::renderer::render_gradient;
use anyhow::{Context, Result};
use log::{debug, error, info, trace};
use std::time::{Duration, Instant};

/// Represents the status of the orchestrator after one event cycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OrchestratorStatus {
    /// The frame was drawn and the loop should continue.
    Running,
    /// A termination event was observed. The caller should clean up and exit.
    Shutdown,
}

/// Whether the designated key went down or up.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyTransition {
    Pressed,
    Released,
}

/// What dispatching a single event did.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventAction {
    /// The running flag was cleared.
    Shutdown,
    /// The offscreen buffer was reallocated at the new size.
    Resized { width: u32, height: u32 },
    /// A configure event kept the current size; nothing was reallocated.
    ResizeSkipped,
    /// The designated key changed state.
    KeyNotice(KeyTransition),
    Ignored,
}

/// Everything that changes from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    pub running: bool,
    pub xoffset: i32,
    pub yoffset: i32,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            running: true,
            xoffset: 0,
            yoffset: 0,
        }
    }
}

impl LoopState {
    /// Moves the gradient phase forward, wrapping on overflow.
    pub fn advance(&mut self, animation: &AnimationConfig) {
        self.xoffset = self.xoffset.wrapping_add(animation.xoffset_step);
        self.yoffset = self.yoffset.wrapping_add(animation.yoffset_step);
    }
}

pub struct AppOrchestrator<'a> {
    pub driver: &'a mut dyn Driver,
    state: LoopState,
    animation: AnimationConfig,
}

impl<'a> AppOrchestrator<'a> {
    pub fn new(driver: &'a mut dyn Driver, animation: AnimationConfig) -> Self {
        AppOrchestrator {
            driver,
            state: LoopState::default(),
            animation,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Handles a single platform event against the loop state.
    pub fn dispatch_event(&mut self, event: PlatformEvent) -> Result<EventAction> {
        match event {
            PlatformEvent::Destroyed { window } if window == self.driver.window_id() => {
                info!("Managed window {} destroyed. Stopping.", window);
                self.state.running = false;
                Ok(EventAction::Shutdown)
            }
            PlatformEvent::ClientMessage { window, data0 }
                if Some(data0) == self.driver.delete_window_atom() =>
            {
                info!("Close requested by window manager for window {}.", window);
                self.state.running = false;
                Ok(EventAction::Shutdown)
            }
            PlatformEvent::Configured {
                window,
                width,
                height,
            } => {
                let buffer = self.driver.buffer();
                if buffer.width() == width as usize && buffer.height() == height as usize {
                    trace!(
                        "ConfigureNotify on {} without size change ({}x{}). Keeping buffer.",
                        window,
                        width,
                        height
                    );
                    return Ok(EventAction::ResizeSkipped);
                }
                debug!(
                    "ConfigureNotify on {}: resizing buffer {}x{} -> {}x{}",
                    window,
                    buffer.width(),
                    buffer.height(),
                    width,
                    height
                );
                self.driver
                    .resize_buffer(width, height)
                    .with_context(|| format!("Failed to resize offscreen buffer to {}x{}", width, height))?;
                Ok(EventAction::Resized { width, height })
            }
            PlatformEvent::KeyPressed { keycode }
                if Some(keycode) == self.driver.designated_keycode() =>
            {
                info!("You pressed the space");
                Ok(EventAction::KeyNotice(KeyTransition::Pressed))
            }
            PlatformEvent::KeyReleased { keycode }
                if Some(keycode) == self.driver.designated_keycode() =>
            {
                info!("You released the space");
                Ok(EventAction::KeyNotice(KeyTransition::Released))
            }
            other => {
                trace!("Ignoring event {:?}", other);
                Ok(EventAction::Ignored)
            }
        }
    }

    /// Runs one iteration of the main loop.
    ///
    /// Every event drained this cycle is dispatched even if an earlier one
    /// cleared the running flag. Once the flag is cleared nothing further is
    /// drawn, since the window may already be gone.
    pub fn process_event_cycle(&mut self) -> Result<OrchestratorStatus> {
        let events = self
            .driver
            .process_events()
            .context("Failed to drain platform events")?;
        for event in events {
            self.dispatch_event(event)?;
        }

        if !self.state.running {
            return Ok(OrchestratorStatus::Shutdown);
        }

        render_gradient(
            self.driver.buffer_mut(),
            self.state.xoffset,
            self.state.yoffset,
        );
        self.driver.present().context("Failed to present frame")?;
        self.state.advance(&self.animation);
        Ok(OrchestratorStatus::Running)
    }

    /// Runs cycles until shutdown or an error, then tears the driver down.
    ///
    /// Cycles that finish faster than `frame_interval` sleep for the rest of
    /// it; a zero interval never sleeps. The driver is cleaned up on both the
    /// shutdown and the error path, and a loop error takes precedence over a
    /// cleanup error.
    pub fn run(&mut self, frame_interval: Duration) -> Result<()> {
        info!("Starting main event loop...");
        let result = loop {
            let frame_start = Instant::now();
            match self.process_event_cycle() {
                Ok(OrchestratorStatus::Running) => {
                    let elapsed = frame_start.elapsed();
                    if elapsed < frame_interval {
                        std::thread::sleep(frame_interval - elapsed);
                    }
                }
                Ok(OrchestratorStatus::Shutdown) => {
                    info!("Orchestrator requested shutdown. Exiting main loop.");
                    break Ok(());
                }
                Err(e) => {
                    error!("Error in event cycle: {:#}. Exiting.", e);
                    break Err(e);
                }
            }
        };

        info!("Shutting down platform...");
        let cleanup = self.driver.cleanup().context("Failed to shut down platform driver");
        result?;
        cleanup
    }
}
