use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use touch_linegraph::{
    Axis, AxisScale, DataPoint, GestureConfig, GestureEvent, GestureInput, GesturePhase,
    GestureResolver, Insets, Line, LineGraph, PointerEvent, PointerPhase, ScreenPoint,
    SelectionListener, Size, Transform, ViewportState, XAxisConfig, compute_scale,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn pointer(id: u64, x: f32, y: f32, phase: PointerPhase, at: u64) -> PointerEvent {
    PointerEvent::new(id, ScreenPoint::new(x, y), phase, ms(at))
}

fn sample() -> Line {
    Line::new("sample", [(0.0, 0.0), (1.0, 0.0), (2.0, 25.0), (3.0, 75.0)])
}

fn resolver(timeout: u64) -> GestureResolver {
    GestureResolver::new(GestureConfig {
        long_press_timeout: ms(timeout),
        ..GestureConfig::default()
    })
}

#[derive(Default)]
struct Recorder {
    starts: usize,
    selections: Vec<(f32, Vec<DataPoint>)>,
    ends: usize,
}

#[derive(Clone, Default)]
struct SharedRecorder(Arc<Mutex<Recorder>>);

impl SelectionListener for SharedRecorder {
    fn on_selection_start(&mut self) {
        self.0.lock().unwrap().starts += 1;
    }

    fn on_selection(&mut self, x: f32, points: &[DataPoint]) {
        self.0.lock().unwrap().selections.push((x, points.to_vec()));
    }

    fn on_selection_end(&mut self) {
        self.0.lock().unwrap().ends += 1;
    }
}

#[test]
fn y_scale_for_four_steps() {
    init_tracing();
    let points: Vec<DataPoint> = sample().points().to_vec();
    let scale = compute_scale(&points, Axis::Y, 4, false).unwrap();
    assert_eq!(
        scale,
        AxisScale {
            min: 0.0,
            max: 75.0,
            step: 25.0,
            step_count: 4,
        }
    );
}

#[test]
fn max_scroll_is_content_past_the_canvas() {
    init_tracing();
    let line = Line::from_iter_y("ramp", (0..=20).map(f64::from));
    let x_scale = compute_scale(line.points(), Axis::X, 10, true).unwrap();
    let y_scale = compute_scale(line.points(), Axis::Y, 5, true).unwrap();
    let mut viewport = ViewportState::new();
    let canvas = Size::new(300.0, 200.0);

    let transform = Transform::new(
        &viewport,
        canvas,
        Insets::new(0.0, 0.0, 0.0, 20.0),
        x_scale,
        y_scale,
        &XAxisConfig::default(),
    )
    .unwrap();
    assert_eq!(transform.x_to_screen(x_scale.max), 400.0);

    viewport.update_scroll_bound(transform.content_width(x_scale.max), canvas.width);
    assert_eq!(viewport.max_scroll_offset(), 100.0);
}

#[test]
fn held_finger_starts_a_drag() {
    init_tracing();
    let mut gestures = resolver(50);
    let down = pointer(1, 40.0, 60.0, PointerPhase::Down, 0);
    assert!(gestures.handle(GestureInput::Pointer(down)).is_empty());

    let still = pointer(1, 40.0, 60.0, PointerPhase::Move, 10);
    assert!(gestures.handle(GestureInput::Pointer(still)).is_empty());
    assert_eq!(gestures.phase(), GesturePhase::AwaitingLongPress);
    assert_eq!(gestures.deadline(), Some(ms(50)));

    let events = gestures.handle(GestureInput::Tick(ms(60)));
    assert_eq!(
        events,
        vec![GestureEvent::DragStart(ScreenPoint::new(40.0, 60.0))]
    );
    assert_eq!(gestures.phase(), GesturePhase::Dragging);
}

#[test]
fn early_release_never_drags() {
    init_tracing();
    let mut gestures = resolver(50);
    gestures.handle(GestureInput::Pointer(pointer(1, 40.0, 60.0, PointerPhase::Down, 0)));
    let events = gestures.handle(GestureInput::Pointer(pointer(
        1,
        40.0,
        60.0,
        PointerPhase::Up,
        30,
    )));
    assert_eq!(events, vec![GestureEvent::Abandoned]);
    assert_eq!(gestures.phase(), GesturePhase::Idle);
    assert!(gestures.handle(GestureInput::Tick(ms(60))).is_empty());
}

#[test]
fn drag_locks_only_inside_the_half_pitch_window() {
    init_tracing();
    let recorder = SharedRecorder::default();
    let mut graph = LineGraph::builder()
        .line(sample())
        .canvas_size(Size::new(300.0, 200.0))
        .listener(recorder.clone())
        .build()
        .unwrap();
    let left = graph.frame().layout.insets.left;
    let on_point = left + 2.0 * 20.0;
    let between = left + 1.5 * 20.0;

    graph.handle_pointer(pointer(3, on_point, 80.0, PointerPhase::Down, 0));
    graph.tick(ms(150));
    assert_eq!(graph.gesture_phase(), GesturePhase::Dragging);

    let frame = graph.render();
    let selection = frame.selection.unwrap();
    assert_eq!(selection.points, vec![DataPoint::new(2.0, 25.0)]);

    graph.handle_pointer(pointer(3, between, 80.0, PointerPhase::Move, 160));
    assert_eq!(graph.drag_x(), Some(between));
    assert!(graph.render().selection.is_none());

    graph.handle_pointer(pointer(3, between, 80.0, PointerPhase::Up, 170));
    assert_eq!(graph.gesture_phase(), GesturePhase::Idle);
    assert_eq!(graph.drag_x(), None);

    let recorded = recorder.0.lock().unwrap();
    assert_eq!(recorded.starts, 1);
    assert_eq!(recorded.selections.len(), 1);
    assert_eq!(recorded.selections[0].0, on_point);
    assert_eq!(recorded.ends, 1);
}

#[test]
fn pinch_through_the_graph_zooms_the_viewport() {
    init_tracing();
    let mut graph = LineGraph::builder()
        .line(Line::from_iter_y("ramp", (0..40).map(f64::from)))
        .canvas_size(Size::new(300.0, 200.0))
        .build()
        .unwrap();
    let before = graph.viewport().max_scroll_offset();

    graph.handle_pointer(pointer(1, 100.0, 100.0, PointerPhase::Down, 0));
    graph.handle_pointer(pointer(2, 200.0, 100.0, PointerPhase::Down, 5));
    assert_eq!(graph.gesture_phase(), GesturePhase::Zooming);

    let events = graph.handle_pointer(pointer(2, 300.0, 100.0, PointerPhase::Move, 10));
    assert_eq!(events, vec![GestureEvent::Zoom(2.0)]);
    assert_eq!(graph.viewport().zoom(), 2.0);
    assert!(graph.viewport().max_scroll_offset() > before);

    graph.handle_pointer(pointer(2, 300.0, 100.0, PointerPhase::Up, 20));
    assert_eq!(graph.gesture_phase(), GesturePhase::Panning);
    graph.handle_pointer(pointer(1, 100.0, 100.0, PointerPhase::Up, 25));
    assert_eq!(graph.gesture_phase(), GesturePhase::Idle);
}
