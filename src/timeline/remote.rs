//! Cross-thread visual change requests.
//!
//! Producers off the UI thread (control surfaces, transport follow) send
//! requests through a `VisualChangeSender`. The UI thread drains them and
//! feeds each one through the normal setters, so coalescing still applies.

use log::trace;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualRequest {
    TimeOrigin(Position),
    Zoom(f64),
    VerticalOrigin(f64),
}

/// Cloneable, `Send` handle for queueing visual changes from any thread.
#[derive(Debug, Clone)]
pub struct VisualChangeSender {
    tx: UnboundedSender<VisualRequest>,
}

impl VisualChangeSender {
    /// Returns false once the editor side has been dropped.
    pub fn send(&self, request: VisualRequest) -> bool {
        self.tx.send(request).is_ok()
    }

    pub fn time_origin(&self, pos: Position) -> bool {
        self.send(VisualRequest::TimeOrigin(pos))
    }

    pub fn zoom(&self, frames_per_pixel: f64) -> bool {
        self.send(VisualRequest::Zoom(frames_per_pixel))
    }

    pub fn vertical_origin(&self, y: f64) -> bool {
        self.send(VisualRequest::VerticalOrigin(y))
    }
}

/// UI-thread end of the request channel.
#[derive(Debug)]
pub struct VisualChangeReceiver {
    rx: UnboundedReceiver<VisualRequest>,
}

impl VisualChangeReceiver {
    /// Take every request queued so far without blocking.
    pub fn drain(&mut self) -> Vec<VisualRequest> {
        let mut requests = Vec::new();
        while let Ok(request) = self.rx.try_recv() {
            requests.push(request);
        }
        if !requests.is_empty() {
            trace!("drained {} remote visual requests", requests.len());
        }
        requests
    }
}

pub fn channel() -> (VisualChangeSender, VisualChangeReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (VisualChangeSender { tx }, VisualChangeReceiver { rx })
}
