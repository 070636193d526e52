// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Landmark sources: the pose-estimator boundary.
//!
//! The public interface is [`LandmarkFrame`]s delivered over an `mpsc`
//! channel from a worker thread. Consumers don't need to know whether the
//! frames came from a real hand detector or the scripted simulator; "no
//! hand" is an ordinary frame, not an error.
//!
//! Load shedding happens in two places: sources decimate their input (a
//! camera running at 60 Hz only forwards every second frame), and the
//! consumer processes only the newest pending frame, dropping stale ones
//! instead of queueing them, so drawing latency stays bounded.

pub mod scripted;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::models::hand::LandmarkFrame;

/// Forward every Nth frame, dropping the rest at the source.
#[derive(Debug)]
pub struct FrameThrottle {
    every: u32,
    counter: u32,
}

impl FrameThrottle {
    /// `every = 1` admits everything; `every = 2` forwards every second
    /// camera frame, the default load-shedding policy.
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            counter: 0,
        }
    }

    pub fn admit(&mut self) -> bool {
        self.counter = self.counter.wrapping_add(1);
        self.counter % self.every == 0
    }
}

/// Anything that can deliver [`LandmarkFrame`]s over a channel.
///
/// Implementations run on a dedicated thread, poll `stop` between frames,
/// and exit promptly once it is set (or once the receiver is gone).
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>, stop: Arc<AtomicBool>);
}

/// Spawn a landmark source on its own thread and return the consumer end.
pub fn spawn_source<S: LandmarkSource>(source: S) -> SourceHandle {
    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);
    let thread = thread::spawn(move || Box::new(source).run(tx, thread_stop));
    SourceHandle {
        rx,
        stop,
        thread: Some(thread),
    }
}

/// Consumer end of a running landmark source.
pub struct SourceHandle {
    rx: Receiver<LandmarkFrame>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SourceHandle {
    /// Drain the channel and return only the newest pending frame.
    /// Older frames are dropped, never queued.
    pub fn latest_frame(&self) -> Option<LandmarkFrame> {
        let mut latest = None;
        let mut dropped = 0usize;
        while let Ok(frame) = self.rx.try_recv() {
            if latest.is_some() {
                dropped += 1;
            }
            latest = Some(frame);
        }
        if dropped > 0 {
            log::trace!("Dropped {} stale landmark frames", dropped);
        }
        latest
    }

    /// Signal the source to stop and wait for its thread to exit.
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Landmark source thread panicked during shutdown");
            }
        }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
