use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use gpui::prelude::*;
use gpui::{
    MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point, ScrollWheelEvent,
    Window, canvas, div, px,
};

use crate::geom::{ScreenPoint, Size};
use crate::gesture::{GesturePhase, PointerEvent, PointerPhase};
use crate::graph::{LineGraph, LineGraphHandle};

use super::paint::{paint_frame, to_hsla};
use super::text::GpuiTextMeasurer;

/// Mouse input is reported as a single pointer.
const MOUSE_POINTER: u64 = 0;

#[derive(Debug, Clone, Copy, Default)]
struct PressState {
    start: ScreenPoint,
    last: ScreenPoint,
    /// The press was handed to native scrolling.
    scrolling: bool,
}

#[derive(Debug, Default)]
struct ViewState {
    origin: ScreenPoint,
    press: Option<PressState>,
}

/// A GPUI view that renders a [`LineGraph`].
///
/// Mouse presses go through the graph's gesture resolver: holding still
/// starts a selection drag, moving beyond the touch slop scrolls the graph
/// instead. The wheel scrolls; with control held it zooms.
#[derive(Clone)]
pub struct GpuiLineGraphView {
    graph: LineGraphHandle,
    state: Arc<RwLock<ViewState>>,
    epoch: Instant,
}

impl GpuiLineGraphView {
    /// Create a new GPUI view for the given graph.
    pub fn new(graph: LineGraph) -> Self {
        Self {
            graph: LineGraphHandle::new(graph),
            state: Arc::new(RwLock::new(ViewState::default())),
            epoch: Instant::now(),
        }
    }

    /// Get a handle for mutating the underlying graph.
    ///
    /// This is useful for replacing lines from async tasks.
    pub fn graph_handle(&self) -> LineGraphHandle {
        self.graph.clone()
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn local_point(&self, position: Point<Pixels>) -> ScreenPoint {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        ScreenPoint::new(
            f32::from(position.x) - state.origin.x,
            f32::from(position.y) - state.origin.y,
        )
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let pos = self.local_point(ev.position);
        let at = self.now();
        self.graph.write(|graph| {
            graph.handle_pointer(PointerEvent::new(MOUSE_POINTER, pos, PointerPhase::Down, at));
        });
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.press = Some(PressState {
            start: pos,
            last: pos,
            scrolling: false,
        });
        cx.notify();
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        if ev.pressed_button != Some(MouseButton::Left) {
            return;
        }
        let pos = self.local_point(ev.position);
        let at = self.now();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let Some(mut press) = state.press else {
            return;
        };

        self.graph.write(|graph| {
            let slop = graph.config().touch_slop;
            let pending = matches!(
                graph.gesture_phase(),
                GesturePhase::AwaitingClassification | GesturePhase::AwaitingLongPress
            );
            if pending && press.start.distance(pos) > slop {
                // scrolling consumed the press before the long press fired
                graph.cancel_gesture(at);
                press.scrolling = true;
            }
            if press.scrolling {
                graph.scroll_by(pos.x - press.last.x);
            } else {
                graph.handle_pointer(PointerEvent::new(MOUSE_POINTER, pos, PointerPhase::Move, at));
            }
        });

        press.last = pos;
        state.press = Some(press);
        cx.notify();
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let pos = self.local_point(ev.position);
        let at = self.now();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let press = state.press.take();
        if press.is_some_and(|press| !press.scrolling) {
            self.graph.write(|graph| {
                graph.handle_pointer(PointerEvent::new(MOUSE_POINTER, pos, PointerPhase::Up, at));
            });
        }
        cx.notify();
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let line_height = px(16.0);
        let delta = ev.delta.pixel_delta(line_height);
        let (dx, dy) = (f32::from(delta.x), f32::from(delta.y));

        self.graph.write(|graph| {
            if ev.modifiers.control || ev.modifiers.platform {
                if dy.abs() >= 0.01 {
                    graph.zoom_by((1.0 + dy * 0.002).clamp(0.1, 10.0));
                }
            } else {
                let amount = if dx.abs() > dy.abs() { dx } else { dy };
                graph.scroll_by(amount);
            }
        });
        cx.notify();
    }
}

impl Render for GpuiLineGraphView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let graph = self.graph.clone();
        let state = Arc::clone(&self.state);
        let epoch = self.epoch;
        let theme = graph.read(|graph| graph.config().theme.clone());
        let background = theme.background;

        div()
            .size_full()
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, window, _| {
                        let origin = ScreenPoint::new(
                            f32::from(bounds.origin.x),
                            f32::from(bounds.origin.y),
                        );
                        state.write().unwrap_or_else(PoisonError::into_inner).origin = origin;
                        let size =
                            Size::new(f32::from(bounds.size.width), f32::from(bounds.size.height));
                        let frame = graph.write(|graph| {
                            if graph.canvas_size() != size {
                                graph.set_canvas_size(size);
                            }
                            if let Some(deadline) = graph.next_deadline() {
                                let now = epoch.elapsed();
                                if now >= deadline {
                                    graph.tick(now);
                                }
                            }
                            if graph.next_deadline().is_some() {
                                window.request_animation_frame();
                            }
                            let measurer = GpuiTextMeasurer::new(window);
                            graph.render_with(&measurer)
                        });
                        (frame, origin)
                    },
                    move |_, (frame, origin), window, cx| {
                        paint_frame(&frame, origin, &theme, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
    }
}
