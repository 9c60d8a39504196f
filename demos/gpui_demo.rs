use std::sync::Arc;
use std::time::Duration;

use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Timer, WindowBounds, WindowOptions, px,
    size,
};
use tracing_subscriber::EnvFilter;

use touch_linegraph::{
    AreaStyle, AxisFormatter, Color, ConnectionStyle, DataPoint, GpuiLineGraphView, GraphConfig,
    GridStyle, HighlightStyle, IntersectionStyle, Line, LineGraph,
};

fn temperature(offset: f64) -> Line {
    let color = Color::new(0.95, 0.45, 0.2, 1.0);
    Line::from_iter_y(
        "temperature",
        (0..48).map(move |hour| 18.0 + 6.0 * ((hour as f64 + offset) * 0.26).sin()),
    )
    .with_connection(Some(ConnectionStyle {
        color,
        ..ConnectionStyle::default()
    }))
    .with_intersection(Some(IntersectionStyle {
        color,
        radius: 4.0,
        ..IntersectionStyle::default()
    }))
    .with_highlight(Some(HighlightStyle {
        radius: 8.0,
        ..HighlightStyle::default()
    }))
    .with_area(Some(AreaStyle {
        color,
        ..AreaStyle::default()
    }))
}

fn humidity() -> Line {
    Line::from_iter_y(
        "humidity",
        (0..48).map(|hour| 12.0 + 4.0 * (hour as f64 * 0.11).cos()),
    )
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(720.0), px(420.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let config = GraphConfig {
                grid: Some(GridStyle::default()),
                ..GraphConfig::default()
            };
            let graph = LineGraph::builder()
                .config(config)
                .line(temperature(0.0))
                .line(humidity())
                .x_formatter(AxisFormatter::Custom(Arc::new(|hour| {
                    format!("{:02}h", hour as i64 % 24)
                })))
                .listener(|x: f32, points: &[DataPoint]| {
                    tracing::info!(x, ?points, "selection");
                })
                .build()
                .unwrap();

            let view = GpuiLineGraphView::new(graph);
            let graph_handle = view.graph_handle();
            let view_handle = cx.new(|_| view);

            let view_for_task = view_handle.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        let mut offset = 0.0_f64;
                        loop {
                            Timer::after(Duration::from_secs(2)).await;
                            offset += 1.0;
                            let updated = cx.update(|_, cx| {
                                view_for_task.update(cx, |_view, view_cx| {
                                    let lines = vec![temperature(offset), humidity()];
                                    if let Err(err) = graph_handle.set_lines(lines) {
                                        tracing::warn!(%err, "failed to replace lines");
                                    }
                                    view_cx.notify();
                                });
                            });
                            if updated.is_err() {
                                break;
                            }
                        }
                    }
                })
                .detach();

            view_handle
        })
        .unwrap();
    });
}
