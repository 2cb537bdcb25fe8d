//! Usage: Modal lifecycle with an explicit `Closing` phase.
//!
//! The payload stays readable while the close transition runs and is dropped
//! only when the display layer reports the transition finished.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Open,
    Closing,
}

#[derive(Debug, Clone)]
pub struct ModalController<T> {
    phase: ModalPhase,
    payload: Option<T>,
}

impl<T> Default for ModalController<T> {
    fn default() -> Self {
        Self {
            phase: ModalPhase::Closed,
            payload: None,
        }
    }
}

impl<T> ModalController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == ModalPhase::Open
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Opens with `payload`, also interrupting a close in progress.
    pub fn open(&mut self, payload: Option<T>) {
        self.payload = payload;
        self.phase = ModalPhase::Open;
    }

    /// `Open -> Closing`. Returns `false` when the modal was not open.
    pub fn request_close(&mut self) -> bool {
        if self.phase != ModalPhase::Open {
            return false;
        }
        self.phase = ModalPhase::Closing;
        true
    }

    /// `Closing -> Closed`, dropping the payload. Returns the dropped payload.
    pub fn finish_close(&mut self) -> Option<T> {
        if self.phase != ModalPhase::Closing {
            return None;
        }
        self.phase = ModalPhase::Closed;
        self.payload.take()
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.request_close();
        } else {
            self.open(None);
        }
    }
}
