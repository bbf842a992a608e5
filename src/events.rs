//! Lifecycle events and the listener registry.
//!
//! Listeners run synchronously, in registration order, before the control
//! call that triggered them returns.

use std::fmt;

/// A lifecycle transition of the motion controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    Start,
    Pause,
    Reset,
    End,
    /// The controller advanced onto a new segment; `index` is the waypoint
    /// index the entity is now heading away from (or arrived at, for the
    /// final waypoint).
    Segment { index: usize },
}

impl MotionEvent {
    /// Wire name of the event, matching the `motion.*` naming the host UI
    /// subscribes with.
    pub fn name(&self) -> &'static str {
        match self {
            MotionEvent::Start => "motion.start",
            MotionEvent::Pause => "motion.pause",
            MotionEvent::Reset => "motion.reset",
            MotionEvent::End => "motion.end",
            MotionEvent::Segment { .. } => "motion.segment",
        }
    }
}

impl fmt::Display for MotionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionEvent::Segment { index } => write!(f, "motion.segment({index})"),
            other => f.write_str(other.name()),
        }
    }
}

type Listener = Box<dyn FnMut(&MotionEvent)>;

/// Observer registry owned by the controller.
#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<Listener>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, listener: F)
    where
        F: FnMut(&MotionEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: MotionEvent) {
        tracing::debug!(event = %event, "emit");
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_fire_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = EventListeners::new();
        for tag in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            listeners.register(move |event| {
                seen.borrow_mut().push(format!("{tag}:{event}"));
            });
        }
        listeners.emit(MotionEvent::Start);
        assert_eq!(
            *seen.borrow(),
            vec!["first:motion.start", "second:motion.start", "third:motion.start"]
        );
    }

    #[test]
    fn event_names_match_wire_format() {
        assert_eq!(MotionEvent::Start.name(), "motion.start");
        assert_eq!(MotionEvent::Segment { index: 3 }.name(), "motion.segment");
        assert_eq!(MotionEvent::Segment { index: 3 }.to_string(), "motion.segment(3)");
    }
}
