//! Gesture resolution for pinch-zoom and long-press-then-drag selection.
//!
//! A touch sequence is classified once, right after the first finger lands:
//! two fingers become a pinch, one finger waits for a long press, and
//! anything else falls through to the host's native scrolling. The state
//! machine is driven by discrete inputs through [`transition`]; a pending
//! long press is resolved by whichever input arrives first, a pointer event
//! or a timer [`GestureInput::Tick`]. Any input stamped at or after the
//! deadline sees the timer fire first.

use std::time::Duration;

use tracing::trace;

use crate::geom::{ScreenPoint, ScreenRect};

/// Identifier of one pointer (finger) within a touch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Pointer state change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Finger pressed.
    Down,
    /// Finger moved while pressed.
    Move,
    /// Finger lifted.
    Up,
    /// The platform took the pointer away.
    Cancel,
}

/// One pointer record from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer identity.
    pub id: PointerId,
    /// Position in canvas pixels.
    pub position: ScreenPoint,
    /// State change.
    pub phase: PointerPhase,
    /// Monotonic timestamp.
    pub at: Duration,
}

impl PointerEvent {
    /// Create a pointer event.
    pub fn new(id: u64, position: ScreenPoint, phase: PointerPhase, at: Duration) -> Self {
        Self {
            id: PointerId(id),
            position,
            phase,
            at,
        }
    }
}

/// Input to the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    /// A pointer record.
    Pointer(PointerEvent),
    /// Timer notification; the host schedules it for [`GestureResolver::deadline`].
    Tick(Duration),
    /// System-level cancellation of the whole gesture.
    Cancel(Duration),
}

impl GestureInput {
    /// Timestamp of the input.
    pub fn at(&self) -> Duration {
        match self {
            Self::Pointer(event) => event.at,
            Self::Tick(at) | Self::Cancel(at) => *at,
        }
    }
}

/// Output of the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Multiply the zoom factor by this amount.
    Zoom(f32),
    /// A long press was recognized at this position; selection starts.
    DragStart(ScreenPoint),
    /// The selecting finger moved.
    DragMove(ScreenPoint),
    /// Selection finished or was cancelled.
    DragEnd,
    /// A pending long press was abandoned before it fired.
    Abandoned,
}

/// Phase of a touch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No finger down.
    Idle,
    /// One finger down, waiting for the next input to sample the finger count.
    AwaitingClassification,
    /// Delegated to native scrolling until every finger lifts.
    Panning,
    /// Two-finger pinch.
    Zooming,
    /// One finger down, waiting for the long-press deadline.
    AwaitingLongPress,
    /// Long press recognized; tracking the finger.
    Dragging,
}

/// Gesture tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Allow two-finger pinch zoom.
    pub zoom_allowed: bool,
    /// Allow long-press-then-drag selection.
    pub drag_allowed: bool,
    /// Hold duration before a drag starts.
    pub long_press_timeout: Duration,
    /// Pinch motion in pixels before zoom events are emitted.
    pub touch_slop: f32,
    /// Touch bounds; leaving them abandons a pending long press.
    pub bounds: Option<ScreenRect>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            zoom_allowed: true,
            drag_allowed: true,
            long_press_timeout: Duration::from_millis(100),
            touch_slop: 8.0,
            bounds: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    id: PointerId,
    position: ScreenPoint,
}

/// State of the current touch sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    phase: GesturePhase,
    contacts: Vec<Contact>,
    accumulated_zoom: f32,
    past_touch_slop: bool,
    first_down_at: Duration,
    long_press_deadline: Option<Duration>,
    tracked: Option<PointerId>,
}

impl Default for GestureSession {
    fn default() -> Self {
        Self {
            phase: GesturePhase::Idle,
            contacts: Vec::new(),
            accumulated_zoom: 1.0,
            past_touch_slop: false,
            first_down_at: Duration::ZERO,
            long_press_deadline: None,
            tracked: None,
        }
    }
}

impl GestureSession {
    /// Current phase.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Number of fingers currently down.
    pub fn touch_count(&self) -> usize {
        self.contacts.len()
    }

    /// Zoom accumulated by the current pinch.
    pub fn accumulated_zoom(&self) -> f32 {
        self.accumulated_zoom
    }

    /// Deadline of a pending long press.
    ///
    /// Set from the first finger down while a single-finger sequence can
    /// still become a drag, so a finger held perfectly still is resolved by
    /// the timer alone.
    pub fn long_press_deadline(&self) -> Option<Duration> {
        match self.phase {
            GesturePhase::AwaitingClassification | GesturePhase::AwaitingLongPress => {
                self.long_press_deadline
            }
            _ => None,
        }
    }

    fn contact(&self, id: PointerId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    fn tracked_position(&self) -> Option<ScreenPoint> {
        self.tracked
            .and_then(|id| self.contact(id))
            .map(|contact| contact.position)
    }

    fn upsert(&mut self, id: PointerId, position: ScreenPoint) {
        match self.contacts.iter_mut().find(|contact| contact.id == id) {
            Some(contact) => contact.position = position,
            None => self.contacts.push(Contact { id, position }),
        }
    }

    fn remove(&mut self, id: PointerId) {
        self.contacts.retain(|contact| contact.id != id);
    }

    fn enter(&mut self, phase: GesturePhase) {
        self.phase = phase;
        match phase {
            GesturePhase::Idle => {
                self.contacts.clear();
                self.reset_gesture();
            }
            GesturePhase::Panning => self.reset_gesture(),
            GesturePhase::Zooming => {
                self.accumulated_zoom = 1.0;
                self.past_touch_slop = false;
                self.long_press_deadline = None;
                self.tracked = None;
            }
            GesturePhase::AwaitingClassification
            | GesturePhase::AwaitingLongPress
            | GesturePhase::Dragging => {}
        }
    }

    fn reset_gesture(&mut self) {
        self.accumulated_zoom = 1.0;
        self.past_touch_slop = false;
        self.long_press_deadline = None;
        self.tracked = None;
    }

    /// Leave an active gesture while fingers may still be down.
    fn release(&mut self) {
        if self.contacts.is_empty() {
            self.enter(GesturePhase::Idle);
        } else {
            self.enter(GesturePhase::Panning);
        }
    }

    fn classify(&mut self, input: &GestureInput, config: &GestureConfig) {
        let incoming = match input {
            GestureInput::Pointer(event)
                if event.phase == PointerPhase::Down && self.contact(event.id).is_none() =>
            {
                1
            }
            _ => 0,
        };
        let count = self.contacts.len() + incoming;
        if count == 2 && config.zoom_allowed {
            self.enter(GesturePhase::Zooming);
        } else if count == 1 && config.drag_allowed {
            self.tracked = self.contacts.first().map(|contact| contact.id);
            self.long_press_deadline = Some(self.first_down_at + config.long_press_timeout);
            self.enter(GesturePhase::AwaitingLongPress);
        } else {
            self.enter(GesturePhase::Panning);
        }
    }

    fn expire_long_press(&mut self, at: Duration, events: &mut Vec<GestureEvent>) {
        if self.phase != GesturePhase::AwaitingLongPress {
            return;
        }
        let Some(deadline) = self.long_press_deadline else {
            return;
        };
        if at < deadline {
            return;
        }
        match self.tracked_position() {
            Some(position) => {
                self.long_press_deadline = None;
                self.enter(GesturePhase::Dragging);
                events.push(GestureEvent::DragStart(position));
            }
            None => {
                events.push(GestureEvent::Abandoned);
                self.release();
            }
        }
    }

    fn cancel(&mut self, events: &mut Vec<GestureEvent>) {
        match self.phase {
            GesturePhase::Dragging => events.push(GestureEvent::DragEnd),
            GesturePhase::AwaitingLongPress => events.push(GestureEvent::Abandoned),
            _ => {}
        }
        self.enter(GesturePhase::Idle);
    }

    fn pointer(
        &mut self,
        event: &PointerEvent,
        config: &GestureConfig,
        events: &mut Vec<GestureEvent>,
    ) {
        if event.phase == PointerPhase::Cancel {
            self.cancel(events);
            return;
        }
        match self.phase {
            GesturePhase::Idle => self.on_idle(event, config),
            GesturePhase::AwaitingClassification | GesturePhase::Panning => {
                self.on_passive(event);
            }
            GesturePhase::Zooming => self.on_zooming(event, config, events),
            GesturePhase::AwaitingLongPress => self.on_awaiting_long_press(event, config, events),
            GesturePhase::Dragging => self.on_dragging(event, events),
        }
    }

    fn on_idle(&mut self, event: &PointerEvent, config: &GestureConfig) {
        if event.phase != PointerPhase::Down {
            return;
        }
        self.upsert(event.id, event.position);
        self.first_down_at = event.at;
        if config.drag_allowed {
            self.long_press_deadline = Some(event.at + config.long_press_timeout);
        }
        if config.zoom_allowed || config.drag_allowed {
            self.enter(GesturePhase::AwaitingClassification);
        } else {
            self.enter(GesturePhase::Panning);
        }
    }

    fn on_passive(&mut self, event: &PointerEvent) {
        match event.phase {
            PointerPhase::Down | PointerPhase::Move => self.upsert(event.id, event.position),
            PointerPhase::Up | PointerPhase::Cancel => {
                self.remove(event.id);
                if self.contacts.is_empty() {
                    self.enter(GesturePhase::Idle);
                }
            }
        }
    }

    fn on_zooming(
        &mut self,
        event: &PointerEvent,
        config: &GestureConfig,
        events: &mut Vec<GestureEvent>,
    ) {
        match event.phase {
            PointerPhase::Down => {
                self.upsert(event.id, event.position);
                if self.contacts.len() != 2 {
                    self.release();
                }
            }
            PointerPhase::Move => {
                let Some(previous) = pinch_span(&self.contacts) else {
                    self.upsert(event.id, event.position);
                    return;
                };
                self.upsert(event.id, event.position);
                let Some(current) = pinch_span(&self.contacts) else {
                    return;
                };
                if previous <= 0.0 || current <= 0.0 {
                    return;
                }
                let change = current / previous;
                self.accumulated_zoom *= change;
                if !self.past_touch_slop {
                    // centroid size of two contacts is half their distance
                    let motion = (1.0 - self.accumulated_zoom).abs() * previous * 0.5;
                    self.past_touch_slop = motion > config.touch_slop;
                }
                if self.past_touch_slop && change != 1.0 {
                    trace!(change, "pinch zoom");
                    events.push(GestureEvent::Zoom(change));
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                self.remove(event.id);
                self.release();
            }
        }
    }

    fn on_awaiting_long_press(
        &mut self,
        event: &PointerEvent,
        config: &GestureConfig,
        events: &mut Vec<GestureEvent>,
    ) {
        let is_tracked = self.tracked == Some(event.id);
        match event.phase {
            PointerPhase::Down if !is_tracked => {
                self.upsert(event.id, event.position);
                events.push(GestureEvent::Abandoned);
                self.release();
            }
            PointerPhase::Down | PointerPhase::Move => {
                self.upsert(event.id, event.position);
                let outside = config
                    .bounds
                    .is_some_and(|bounds| !bounds.contains(event.position));
                if is_tracked && outside {
                    events.push(GestureEvent::Abandoned);
                    self.release();
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                self.remove(event.id);
                if is_tracked {
                    events.push(GestureEvent::Abandoned);
                    self.release();
                }
            }
        }
    }

    fn on_dragging(&mut self, event: &PointerEvent, events: &mut Vec<GestureEvent>) {
        let is_tracked = self.tracked == Some(event.id);
        match event.phase {
            PointerPhase::Down | PointerPhase::Move => {
                self.upsert(event.id, event.position);
                if is_tracked && event.phase == PointerPhase::Move {
                    events.push(GestureEvent::DragMove(event.position));
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                self.remove(event.id);
                if is_tracked {
                    events.push(GestureEvent::DragEnd);
                    self.release();
                }
            }
        }
    }
}

fn pinch_span(contacts: &[Contact]) -> Option<f32> {
    match contacts {
        [a, b] => Some(a.position.distance(b.position)),
        _ => None,
    }
}

/// Apply one input to a session and return the next session and its events.
///
/// The function is total: every phase accepts every input.
pub fn transition(
    session: &GestureSession,
    input: &GestureInput,
    config: &GestureConfig,
) -> (GestureSession, Vec<GestureEvent>) {
    let mut next = session.clone();
    let mut events = Vec::new();

    if next.phase == GesturePhase::AwaitingClassification {
        next.classify(input, config);
    }
    next.expire_long_press(input.at(), &mut events);

    match input {
        GestureInput::Pointer(event) => next.pointer(event, config, &mut events),
        GestureInput::Tick(_) => {}
        GestureInput::Cancel(_) => next.cancel(&mut events),
    }

    if next.phase != session.phase {
        trace!(from = ?session.phase, to = ?next.phase, "gesture phase");
    }
    (next, events)
}

/// Owns the gesture session of one graph.
#[derive(Debug, Clone, Default)]
pub struct GestureResolver {
    config: GestureConfig,
    session: GestureSession,
}

impl GestureResolver {
    /// Create a resolver with the given configuration.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: GestureSession::default(),
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Access the configuration mutably.
    ///
    /// Changes apply from the next input on.
    pub fn config_mut(&mut self) -> &mut GestureConfig {
        &mut self.config
    }

    /// Access the current session.
    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// Current phase.
    pub fn phase(&self) -> GesturePhase {
        self.session.phase
    }

    /// Time at which the host should deliver a [`GestureInput::Tick`].
    pub fn deadline(&self) -> Option<Duration> {
        self.session.long_press_deadline()
    }

    /// Feed one input and return the resulting events.
    pub fn handle(&mut self, input: GestureInput) -> Vec<GestureEvent> {
        let (next, events) = transition(&self.session, &input, &self.config);
        self.session = next;
        events
    }

    /// End the current gesture at once, without evaluating a pending timer.
    ///
    /// Emits `DragEnd` for an active drag and `Abandoned` for a pending long
    /// press; fingers still down are ignored until the next sequence.
    pub fn reset(&mut self) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        let before = self.session.phase;
        self.session.cancel(&mut events);
        if before != self.session.phase {
            trace!(from = ?before, "gesture reset");
        }
        events
    }
}
