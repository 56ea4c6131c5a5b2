//! Connector edges between manager and report cards.
//!
//! Geometry comes from the live layout, so it is sampled one animation frame
//! after whatever changed it.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use gloo_render::{AnimationFrame, request_animation_frame};
use web_sys::{DomRect, Element};

use super::types::FlattenedEmployee;

/// Minimum vertical distance from an anchor to its control point.
const MIN_CONTROL_OFFSET: f64 = 24.0;
const CONTROL_OFFSET_RATIO: f64 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeData {
	pub id: String,
	pub manager_id: String,
	pub child_id: String,
	/// Accessible name: the report's name and title.
	pub label: String,
	pub path: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self { left, top, width, height }
	}

	/// `None` for detached or `display: none` elements, which report an
	/// all-zero box.
	pub fn from_dom(rect: &DomRect) -> Option<Self> {
		let r = Self::new(rect.left(), rect.top(), rect.width(), rect.height());
		let finite = [r.left, r.top, r.width, r.height].iter().all(|v| v.is_finite());
		(finite && (r.width > 0.0 || r.height > 0.0)).then_some(r)
	}

	fn bottom_center(&self) -> (f64, f64) {
		(self.left + self.width / 2.0, self.top + self.height)
	}

	fn top_center(&self) -> (f64, f64) {
		(self.left + self.width / 2.0, self.top)
	}
}

/// Cubic S-curve from `(x1, y1)` down to `(x2, y2)`.
pub fn connector_path(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
	let offset = (CONTROL_OFFSET_RATIO * (y2 - y1).abs()).max(MIN_CONTROL_OFFSET);
	format!(
		"M {x1} {y1} C {x1} {c1}, {x2} {c2}, {x2} {y2}",
		c1 = y1 + offset,
		c2 = y2 - offset,
	)
}

fn edge_label(name: &str, title: &str) -> String {
	if title.is_empty() {
		name.to_owned()
	} else {
		format!("{name}, {title}")
	}
}

/// One edge per employee whose card and manager card are both mounted.
///
/// Screen boxes from `lookup` are mapped into the container's unscaled
/// space. Employees in `hidden`, or whose manager is hidden, get no edge.
pub fn compute_edges<F>(
	employees: &[FlattenedEmployee],
	hidden: &HashSet<String>,
	container: Rect,
	zoom: f64,
	lookup: F,
) -> Vec<EdgeData>
where
	F: Fn(&str) -> Option<Rect>,
{
	let to_local = |(x, y): (f64, f64)| ((x - container.left) / zoom, (y - container.top) / zoom);

	employees
		.iter()
		.filter_map(|employee| {
			let manager_id = employee.manager_id.as_deref()?;
			if hidden.contains(&employee.id) || hidden.contains(manager_id) {
				return None;
			}
			let (Some(manager), Some(child)) = (lookup(manager_id), lookup(&employee.id)) else {
				log::trace!("no geometry for edge {manager_id} -> {}", employee.id);
				return None;
			};
			let (x1, y1) = to_local(manager.bottom_center());
			let (x2, y2) = to_local(child.top_center());
			Some(EdgeData {
				id: format!("{manager_id}-{}", employee.id),
				manager_id: manager_id.to_owned(),
				child_id: employee.id.clone(),
				label: edge_label(&employee.name, &employee.title),
				path: connector_path(x1, y1, x2, y2),
			})
		})
		.collect()
}

/// Reads card geometry below `container`; cards carry `data-node-id`.
pub fn measure_edges(
	container: &Element,
	employees: &[FlattenedEmployee],
	hidden: &HashSet<String>,
	zoom: f64,
) -> Vec<EdgeData> {
	let Some(container_rect) = Rect::from_dom(&container.get_bounding_client_rect()) else {
		return Vec::new();
	};
	compute_edges(employees, hidden, container_rect, zoom, |id| {
		container
			.query_selector(&format!("[data-node-id=\"{id}\"]"))
			.ok()
			.flatten()
			.and_then(|el| Rect::from_dom(&el.get_bounding_client_rect()))
	})
}

/// Something that can run a callback on the next frame.
pub trait FrameSource {
	type Handle: 'static;

	fn request(&self, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

pub struct BrowserFrames;

impl FrameSource for BrowserFrames {
	type Handle = AnimationFrame;

	fn request(&self, callback: Box<dyn FnOnce()>) -> AnimationFrame {
		request_animation_frame(move |_| callback())
	}
}

struct SchedulerInner<S: FrameSource> {
	source: S,
	scheduled: Cell<bool>,
	frame: RefCell<Option<S::Handle>>,
	job: Box<dyn Fn()>,
}

/// Runs `job` at most once per frame no matter how often it is scheduled.
pub struct FrameScheduler<S: FrameSource = BrowserFrames> {
	inner: Rc<SchedulerInner<S>>,
}

impl<S: FrameSource> Clone for FrameScheduler<S> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl FrameScheduler<BrowserFrames> {
	pub fn new(job: impl Fn() + 'static) -> Self {
		Self::with_source(BrowserFrames, job)
	}
}

impl<S: FrameSource + 'static> FrameScheduler<S> {
	pub fn with_source(source: S, job: impl Fn() + 'static) -> Self {
		Self {
			inner: Rc::new(SchedulerInner {
				source,
				scheduled: Cell::new(false),
				frame: RefCell::new(None),
				job: Box::new(job),
			}),
		}
	}

	pub fn schedule(&self) {
		if self.inner.scheduled.replace(true) {
			return;
		}
		let weak: Weak<SchedulerInner<S>> = Rc::downgrade(&self.inner);
		let handle = self.inner.source.request(Box::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.scheduled.set(false);
				(inner.job)();
			}
		}));
		// The previous handle has already fired; replacing it is safe.
		*self.inner.frame.borrow_mut() = Some(handle);
	}
}
