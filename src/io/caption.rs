// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AI caption requests.
//!
//! Given a PNG snapshot of the drawing, a [`Captioner`] collaborator
//! returns a short title. The request runs on a worker thread; at most
//! one is outstanding at a time, enforced by a busy flag the UI can read.
//! The drawing loop is never blocked on a caption.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Collaborator that turns a drawing snapshot into a short title.
pub trait Captioner: Send + Sync {
    fn interpret(&self, png: &[u8]) -> Result<String>;
}

/// Runs at most one caption request at a time.
pub struct CaptionTask {
    pending: Option<Receiver<Result<String>>>,
}

impl Default for CaptionTask {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionTask {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a caption request. Returns false (and does nothing) if one
    /// is already in flight.
    pub fn request(&mut self, captioner: Arc<dyn Captioner>, png: Vec<u8>) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let (tx, rx) = channel();
        self.pending = Some(rx);
        thread::spawn(move || {
            let _ = tx.send(captioner.interpret(&png));
        });
        true
    }

    /// Poll for a finished caption; clears the busy flag when a result
    /// (or the worker's demise) arrives.
    pub fn poll(&mut self) -> Option<Result<String>> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                Some(Err(anyhow!("caption worker exited without a result")))
            }
        }
    }
}
