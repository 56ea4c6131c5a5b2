//! Pan/zoom state for the chart canvas.

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 2.0;
/// Zoom change applied by the +/- buttons.
pub const ZOOM_STEP: f64 = 0.1;
/// Scales wheel `deltaY`, in pixels, into a zoom delta.
const WHEEL_ZOOM_FACTOR: f64 = 0.001;
/// Pixels per line for wheels that report in lines.
const WHEEL_LINE_HEIGHT: f64 = 16.0;
// `WheelEvent.deltaMode` values.
const DOM_DELTA_LINE: u32 = 1;
const DOM_DELTA_PAGE: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Applied to the chart content as `translate(pan) scale(zoom)` with a
/// top-left transform origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
	pub zoom: f64,
	pub pan: Point,
}

impl Default for ViewportTransform {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan: Point::default(),
		}
	}
}

impl ViewportTransform {
	pub fn new(zoom: f64, pan: Point) -> Self {
		Self {
			zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
			pan,
		}
	}

	pub fn screen_to_content(&self, p: Point) -> Point {
		Point::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
	}

	/// Zooms by `delta`, keeping the content under `pointer` where it is.
	///
	/// `pointer` is in container-local coordinates.
	pub fn zoom_at(&self, pointer: Point, delta: f64) -> Self {
		let anchor = self.screen_to_content(pointer);
		let zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
		Self {
			zoom,
			pan: Point::new(pointer.x - anchor.x * zoom, pointer.y - anchor.y * zoom),
		}
	}

	pub fn pan_by(&self, dx: f64, dy: f64) -> Self {
		Self {
			zoom: self.zoom,
			pan: Point::new(self.pan.x + dx, self.pan.y + dy),
		}
	}

	pub fn css(&self) -> String {
		format!(
			"transform: translate({}px, {}px) scale({}); transform-origin: 0 0;",
			self.pan.x, self.pan.y, self.zoom
		)
	}

	pub fn zoom_percent(&self) -> u32 {
		(self.zoom * 100.0).round() as u32
	}

	pub fn can_zoom_in(&self) -> bool {
		self.zoom < MAX_ZOOM
	}

	pub fn can_zoom_out(&self) -> bool {
		self.zoom > MIN_ZOOM
	}
}

/// Zoom delta for one wheel event.
///
/// `delta_y` is converted to pixels according to `delta_mode` first, so a
/// notch on a line-based wheel zooms as far as the same scroll in pixels.
/// Page scrolls count as one `page_height`.
pub fn wheel_zoom_delta(delta_y: f64, delta_mode: u32, page_height: f64) -> f64 {
	let pixels = match delta_mode {
		DOM_DELTA_LINE => delta_y * WHEEL_LINE_HEIGHT,
		DOM_DELTA_PAGE => delta_y * page_height,
		_ => delta_y,
	};
	-pixels * WHEEL_ZOOM_FACTOR
}

/// An in-progress drag-to-pan gesture.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start: ViewportTransform,
}

impl PanState {
	pub fn begin(&mut self, x: f64, y: f64, transform: ViewportTransform) {
		self.active = true;
		self.start_x = x;
		self.start_y = y;
		self.transform_start = transform;
	}

	/// Transform for the current pointer position, or `None` when idle.
	pub fn update(&self, x: f64, y: f64) -> Option<ViewportTransform> {
		self.active.then(|| {
			self.transform_start
				.pan_by(x - self.start_x, y - self.start_y)
		})
	}

	pub fn end(&mut self) {
		self.active = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn assert_close(a: Point, b: Point) {
		assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS, "{a:?} != {b:?}");
	}

	fn content_to_screen(view: &ViewportTransform, p: Point) -> Point {
		Point::new(p.x * view.zoom + view.pan.x, p.y * view.zoom + view.pan.y)
	}

	#[test]
	fn zoom_keeps_point_under_cursor() {
		let view = ViewportTransform::default();
		let cursor = Point::new(100.0, 100.0);
		let before = view.screen_to_content(cursor);

		let zoomed = view.zoom_at(cursor, 0.5);
		assert!((zoomed.zoom - 1.5).abs() < EPS);
		assert_close(content_to_screen(&zoomed, before), cursor);
	}

	#[test]
	fn zoom_anchoring_holds_from_offset_transform() {
		let view = ViewportTransform::new(0.6, Point::new(-40.0, 25.0));
		let cursor = Point::new(320.0, 180.0);
		let before = view.screen_to_content(cursor);

		let zoomed = view.zoom_at(cursor, -0.3);
		assert_close(content_to_screen(&zoomed, before), cursor);
	}

	#[test]
	fn zoom_is_clamped_both_ways() {
		let center = Point::new(400.0, 300.0);
		let mut view = ViewportTransform::default();
		for _ in 0..50 {
			view = view.zoom_at(center, ZOOM_STEP);
			assert!(view.zoom <= MAX_ZOOM);
		}
		assert_eq!(view.zoom, MAX_ZOOM);

		for _ in 0..50 {
			view = view.zoom_at(center, -ZOOM_STEP);
			assert!(view.zoom >= MIN_ZOOM);
		}
		assert_eq!(view.zoom, MIN_ZOOM);
	}

	#[test]
	fn clamped_zoom_does_not_drift_pan() {
		let view = ViewportTransform::new(MAX_ZOOM, Point::new(10.0, 20.0));
		let same = view.zoom_at(Point::new(55.0, 80.0), 1.0);
		assert_close(same.pan, view.pan);
	}

	#[test]
	fn pan_gesture_applies_accumulated_delta() {
		let mut pan = PanState::default();
		assert!(pan.update(10.0, 10.0).is_none());

		pan.begin(100.0, 100.0, ViewportTransform::new(0.5, Point::new(5.0, 5.0)));
		let moved = pan.update(130.0, 90.0).unwrap();
		assert_close(moved.pan, Point::new(35.0, -5.0));
		assert_eq!(moved.zoom, 0.5);

		pan.end();
		assert!(pan.update(0.0, 0.0).is_none());
	}

	#[test]
	fn zoom_buttons_disable_at_limits() {
		let mut view = ViewportTransform::new(1.0, Point::default());
		assert!(view.can_zoom_in() && view.can_zoom_out());

		view = view.zoom_at(Point::default(), 5.0);
		assert!(!view.can_zoom_in());
		assert!(view.can_zoom_out());

		view = view.zoom_at(Point::default(), -5.0);
		assert!(view.can_zoom_in());
		assert!(!view.can_zoom_out());
	}

	#[test]
	fn line_mode_wheel_matches_pixel_mode() {
		// Firefox reports a mouse notch as 3 lines, Chrome as ~48 pixels.
		let lines = wheel_zoom_delta(3.0, DOM_DELTA_LINE, 600.0);
		let pixels = wheel_zoom_delta(48.0, 0, 600.0);
		assert!((lines - pixels).abs() < EPS);
		assert!(lines < 0.0);

		let view = ViewportTransform::new(0.6, Point::default());
		let zoomed = view.zoom_at(Point::default(), wheel_zoom_delta(-3.0, DOM_DELTA_LINE, 600.0));
		assert!(zoomed.zoom - view.zoom > 0.04, "one notch barely moved: {}", zoomed.zoom);
	}

	#[test]
	fn page_mode_wheel_scales_by_page_height() {
		let delta = wheel_zoom_delta(-1.0, DOM_DELTA_PAGE, 400.0);
		assert!((delta - 0.4).abs() < EPS);
	}
}
