//! Proximity tracking for the load-more sentinel.
//!
//! The observer is attached to one list identity at a time. A signal only
//! fires on an outside-to-inside transition for the attached identity, so
//! repeated "still in view" notifications and signals addressed to a list
//! that has since been replaced are ignored.

#[derive(Debug, Default)]
pub struct ProximityObserver {
    attached: Option<u64>,
    inside: bool,
}

impl ProximityObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches to `identity`, dropping any previous attachment.
    pub fn attach(&mut self, identity: u64) {
        self.attached = Some(identity);
        self.inside = false;
    }

    pub fn detach(&mut self) {
        self.attached = None;
        self.inside = false;
    }

    pub fn attached(&self) -> Option<u64> {
        self.attached
    }

    /// Records a proximity change and returns whether it entered proximity.
    pub fn signal(&mut self, identity: u64, in_view: bool) -> bool {
        if self.attached != Some(identity) {
            return false;
        }
        let entered = in_view && !self.inside;
        self.inside = in_view;
        entered
    }
}
