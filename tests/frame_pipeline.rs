use std::time::Duration;

use tracing_subscriber::EnvFilter;

use touch_linegraph::{
    AreaStyle, ChartError, Frame, GesturePhase, GraphConfig, Line, LineGraph, Paint,
    PointerEvent, PointerPhase, RenderCommand, ScreenPoint, Size,
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

fn sample() -> Line {
    Line::new("sample", [(0.0, 0.0), (1.0, 0.0), (2.0, 25.0), (3.0, 75.0)])
}

fn graph_with(config: GraphConfig, line: Line) -> LineGraph {
    LineGraph::builder()
        .config(config)
        .line(line)
        .canvas_size(Size::new(300.0, 200.0))
        .build()
        .unwrap()
}

fn kinds(frame: &Frame) -> Vec<&'static str> {
    frame
        .commands
        .commands()
        .iter()
        .map(|command| match command {
            RenderCommand::Line { .. } => "line",
            RenderCommand::Circle { .. } => "circle",
            RenderCommand::Path { .. } => "path",
            RenderCommand::Rect { .. } => "rect",
        })
        .collect()
}

#[test]
fn idle_frame_draws_area_lines_points_then_mask() {
    init_tracing();
    let graph = graph_with(
        GraphConfig::default(),
        sample().with_area(Some(AreaStyle::default())),
    );
    let frame = graph.frame();
    assert_eq!(
        kinds(&frame),
        vec![
            "path", "line", "line", "line", "circle", "circle", "circle", "circle", "rect"
        ]
    );

    let RenderCommand::Path { points, closed, paint } = &frame.commands.commands()[0] else {
        panic!("area is drawn first");
    };
    assert!(*closed);
    assert_eq!(points.len(), 6);
    assert!(matches!(paint, Paint::Fill(color) if (color.a - 0.1).abs() < 1e-6));

    let RenderCommand::Rect { rect, .. } = frame.commands.commands().last().unwrap() else {
        panic!("label column is masked last");
    };
    assert_eq!(rect.min, ScreenPoint::new(0.0, 0.0));
    assert_eq!(rect.max, ScreenPoint::new(frame.layout.column_width, 200.0));
}

#[test]
fn dragging_frame_swaps_the_locked_marker_for_a_highlight() {
    init_tracing();
    let mut graph = graph_with(GraphConfig::default(), sample());
    let target = graph.frame().layout.insets.left + 3.0 * 20.0;
    graph.handle_pointer(PointerEvent::new(
        1,
        ScreenPoint::new(target, 40.0),
        PointerPhase::Down,
        ms(0),
    ));
    graph.tick(ms(100));
    assert_eq!(graph.gesture_phase(), GesturePhase::Dragging);

    let frame = graph.render();
    assert_eq!(
        kinds(&frame),
        vec!["line", "line", "line", "circle", "circle", "circle", "rect", "line", "circle"]
    );
    let RenderCommand::Line { start, end, stroke } = &frame.commands.commands()[7] else {
        panic!("guide follows the mask");
    };
    assert_eq!(start.x, target);
    assert_eq!(end, &ScreenPoint::new(target, 0.0));
    assert_eq!(stroke.dash, Some([40.0, 20.0]));
    assert_eq!(frame.selection.unwrap().x, target);
}

#[test]
fn scrolled_x_labels_stay_right_of_the_column() {
    init_tracing();
    let mut graph = graph_with(
        GraphConfig::default(),
        Line::from_iter_y("ramp", (0..40).map(f64::from)),
    );
    assert_eq!(graph.scroll_by(-200.0), -200.0);
    assert_eq!(graph.viewport().scroll_offset(), 200.0);

    let frame = graph.frame();
    assert!(!frame.x_labels.is_empty());
    assert!(frame.x_labels.iter().all(|label| label.text != "0"));
    for label in &frame.x_labels {
        let tick_x = label.origin.x + label.size.width * 0.5;
        assert!(tick_x >= frame.layout.column_width - 0.01);
        assert!(tick_x <= 300.0 + 0.01);
    }
}

#[test]
fn json_config_drives_layout_and_gestures() {
    init_tracing();
    let config = GraphConfig::from_json(
        r#"{
            "grid": {},
            "padding_right": 20.0,
            "zoom_allowed": false,
            "selection": { "detection_time_ms": 250 }
        }"#,
    )
    .unwrap();
    let mut graph = graph_with(config, sample());

    let frame = graph.frame();
    assert_eq!(frame.layout.insets.right, 20.0);
    let rects: Vec<_> = frame
        .commands
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::Rect { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 2);
    assert_eq!(rects[1].min.x, 280.0);
    let gridlines = frame
        .commands
        .commands()
        .iter()
        .filter(|command| {
            matches!(command, RenderCommand::Line { stroke, .. } if stroke.width == 1.0)
        })
        .count();
    assert_eq!(gridlines, 5);

    let at = |x: f32, id: u64, phase: PointerPhase, t: u64| {
        PointerEvent::new(id, ScreenPoint::new(x, 50.0), phase, ms(t))
    };
    graph.handle_pointer(at(100.0, 1, PointerPhase::Down, 0));
    graph.tick(ms(200));
    assert_eq!(graph.gesture_phase(), GesturePhase::AwaitingLongPress);
    assert_eq!(graph.next_deadline(), Some(ms(250)));
    graph.tick(ms(250));
    assert_eq!(graph.gesture_phase(), GesturePhase::Dragging);
    graph.handle_pointer(at(100.0, 1, PointerPhase::Up, 300));

    graph.handle_pointer(at(100.0, 1, PointerPhase::Down, 400));
    graph.handle_pointer(at(160.0, 2, PointerPhase::Down, 410));
    assert_eq!(graph.gesture_phase(), GesturePhase::Panning);
    graph.handle_pointer(at(160.0, 2, PointerPhase::Move, 420));
    assert_eq!(graph.viewport().zoom(), 1.0);
}

#[test]
fn config_survives_json_and_rejects_bad_types() {
    init_tracing();
    let config = GraphConfig {
        padding_top: 24.0,
        zoom_allowed: false,
        ..GraphConfig::default()
    };
    let restored = GraphConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(restored, config);

    let err = GraphConfig::from_json(r#"{ "touch_slop": "wide" }"#).unwrap_err();
    assert!(matches!(err, ChartError::Config(_)));
}
