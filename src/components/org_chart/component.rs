use std::collections::HashSet;

use leptos::prelude::*;
use leptos::tachys::view::any_view::{AnyView, IntoAny};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element, PointerEvent, WheelEvent};

use super::drag::{
	DRAG_MIME, DragController, DropRejection, DropTarget, ReassignIntent, decode_payload, encode_payload,
};
use super::expanded::ExpandedSet;
use super::render::{EdgeData, FrameScheduler, measure_edges};
use super::state::{PanState, Point, ViewportTransform, ZOOM_STEP, wheel_zoom_delta};
use super::types::{OrgChartNode, OrgChartResponse, count_descendants, flatten};
use crate::components::notifications::Notifications;

/// A pointer-down inside any of these drags or clicks it instead of panning.
const NO_PAN_SELECTOR: &str = "[data-node-id], [data-no-pan], button, select, input, a, [draggable=\"true\"]";

fn starts_on_interactive(ev: &PointerEvent) -> bool {
	ev.target()
		.and_then(|t| t.dyn_into::<Element>().ok())
		.and_then(|el| el.closest(NO_PAN_SELECTOR).ok().flatten())
		.is_some()
}

fn drag_payload(ev: &DragEvent) -> Option<OrgChartNode> {
	let raw = ev.data_transfer()?.get_data(DRAG_MIME).ok()?;
	decode_payload(&raw)
}

fn initials(name: &str) -> String {
	name.split_whitespace()
		.filter_map(|word| word.chars().next())
		.take(2)
		.flat_map(char::to_uppercase)
		.collect()
}

/// Routes a resolved drop to at most one reassignment or one rejection.
fn settle_drop(
	outcome: Result<Option<ReassignIntent>, DropRejection>,
	reassign: impl FnOnce(ReassignIntent),
	reject: impl FnOnce(DropRejection),
) {
	match outcome {
		Ok(Some(intent)) => reassign(intent),
		Ok(None) => log::debug!("drop ignored"),
		Err(rejection) => {
			log::info!("drop rejected: {rejection}");
			reject(rejection);
		}
	}
}

/// Everything a card needs, passed down the recursive tree by copy.
#[derive(Clone, Copy)]
struct TreeContext {
	expanded: Signal<ExpandedSet>,
	current_user: Signal<Option<String>>,
	drag: StoredValue<DragController>,
	dragging_id: RwSignal<Option<String>>,
	drop_hover: RwSignal<Option<String>>,
	on_toggle: Callback<String>,
	on_drop: Callback<(DropTarget, Option<OrgChartNode>)>,
}

/// Unassigned cards pass `accepts_drop = false` so drops fall through to the
/// unassigned zone around them.
fn node_card(node: &OrgChartNode, ctx: TreeContext, accepts_drop: bool) -> impl IntoView + use<> {
	let id = node.id.clone();
	let (dragging_id, hover_id, over_id, leave_id, drop_id) =
		(id.clone(), id.clone(), id.clone(), id.clone(), id.clone());
	let team_size = count_descendants(node);
	let is_me = ctx.current_user.with(|me| me.as_deref() == Some(id.as_str()));
	let dragged = node.clone();

	let avatar = match node.avatar_url.clone() {
		Some(url) => view! {
			<img class="org-node-avatar" src=url alt=node.name.clone() draggable="false" />
		}
		.into_any(),
		None => view! {
			<div class="org-node-avatar org-node-initials">{initials(&node.name)}</div>
		}
		.into_any(),
	};

	let on_dragstart = move |ev: DragEvent| {
		if let Some(dt) = ev.data_transfer() {
			dt.set_effect_allowed("move");
			if let Some(raw) = encode_payload(&dragged) {
				let _ = dt.set_data(DRAG_MIME, &raw);
			}
		}
		ctx.drag.update_value(|d| d.start(dragged.clone()));
		ctx.dragging_id.set(Some(dragged.id.clone()));
	};

	let on_dragover = move |ev: DragEvent| {
		if !accepts_drop {
			return;
		}
		ev.prevent_default();
		ev.stop_propagation();
		if let Some(dt) = ev.data_transfer() {
			dt.set_drop_effect("move");
		}
		if ctx.drop_hover.with_untracked(|h| h.as_deref() != Some(over_id.as_str())) {
			ctx.drop_hover.set(Some(over_id.clone()));
		}
	};

	let on_dragleave = move |_: DragEvent| {
		if ctx.drop_hover.with_untracked(|h| h.as_deref() == Some(leave_id.as_str())) {
			ctx.drop_hover.set(None);
		}
	};

	let on_drop = move |ev: DragEvent| {
		if !accepts_drop {
			return;
		}
		ev.prevent_default();
		ev.stop_propagation();
		let payload = if ctx.drag.with_value(DragController::is_dragging) {
			None
		} else {
			drag_payload(&ev)
		};
		ctx.on_drop.run((DropTarget::Node(drop_id.clone()), payload));
	};

	view! {
		<div
			class="org-node"
			class:org-node-self=is_me
			class:org-node-dragging=move || {
				ctx.dragging_id.with(|d| d.as_deref() == Some(dragging_id.as_str()))
			}
			class:org-node-drop-target=move || {
				ctx.drop_hover.with(|h| h.as_deref() == Some(hover_id.as_str()))
			}
			data-node-id=id
			draggable="true"
			on:dragstart=on_dragstart
			on:dragover=on_dragover
			on:dragleave=on_dragleave
			on:drop=on_drop
		>
			{avatar}
			<div class="org-node-body">
				<div class="org-node-name">{node.name.clone()}</div>
				<div class="org-node-title">{node.title.clone()}</div>
				{node
					.department
					.clone()
					.map(|d| view! { <div class="org-node-department">{d}</div> })}
			</div>
			{(team_size > 0)
				.then(|| {
					view! {
						<span class="org-node-team" title="Team size">
							{team_size}
						</span>
					}
				})}
		</div>
	}
}

fn node_branch(node: OrgChartNode, ctx: TreeContext) -> AnyView {
	let card = node_card(&node, ctx, true);
	let has_children = !node.children.is_empty();
	let expanded = ctx.expanded.with(|set| set.is_expanded(&node.id));
	let toggle_id = node.id.clone();

	let toggle = has_children.then(|| {
		view! {
			<button
				class="org-node-toggle"
				aria-expanded=expanded.to_string()
				on:click=move |_| ctx.on_toggle.run(toggle_id.clone())
			>
				{if expanded { "−" } else { "+" }}
			</button>
		}
	});

	let children = (has_children && expanded).then(|| {
		view! {
			<ul class="org-children">
				{node
					.children
					.into_iter()
					.map(|child| view! { <li>{node_branch(child, ctx)}</li> })
					.collect_view()}
			</ul>
		}
	});

	view! {
		<div class="org-branch">
			{card}
			{toggle}
			{children}
		</div>
	}
	.into_any()
}

/// Pannable, zoomable org chart with drag-and-drop reassignment.
///
/// The page owns the data, the viewport and the expanded set; this component
/// only reports intent through the callbacks. Bumping `layout_epoch` forces
/// the connector edges to be re-measured.
#[component]
pub fn OrgChartCanvas(
	#[prop(into)] data: Signal<OrgChartResponse>,
	#[prop(into)] viewport: Signal<ViewportTransform>,
	on_viewport_change: Callback<ViewportTransform>,
	default_viewport: ViewportTransform,
	#[prop(into)] expanded: Signal<ExpandedSet>,
	on_toggle: Callback<String>,
	on_reassign: Callback<ReassignIntent>,
	#[prop(into)] layout_epoch: Signal<u64>,
	#[prop(into, default = Signal::stored(None))] current_user: Signal<Option<String>>,
) -> impl IntoView {
	let notifications = expect_context::<Notifications>();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let content_ref = NodeRef::<leptos::html::Div>::new();

	let pan = StoredValue::new(PanState::default());
	let panning = RwSignal::new(false);
	let drag = StoredValue::new(DragController::default());
	let dragging_id = RwSignal::new(None::<String>);
	let drop_hover = RwSignal::new(None::<String>);
	let zone_hover = RwSignal::new(false);
	let edges = RwSignal::new(Vec::<EdgeData>::new());

	let employees = Memo::new(move |_| data.with(|d| flatten(&d.assigned)));
	let zoom = Memo::new(move |_| viewport.with(|v| v.zoom));

	// The job can outlive the component by one frame, hence the `try_` reads.
	let scheduler = FrameScheduler::new(move || {
		let Some(content) = content_ref.try_get_untracked().flatten() else {
			return;
		};
		let (Some(hidden), Some(scale)) = (
			dragging_id
				.try_get_untracked()
				.map(|id| id.into_iter().collect::<HashSet<_>>()),
			zoom.try_get_untracked(),
		) else {
			return;
		};
		let Some(next) =
			employees.try_with_untracked(|list| measure_edges(&content, list, &hidden, scale))
		else {
			return;
		};
		log::trace!("measured {} edges", next.len());
		edges.try_set(next);
	});

	let on_layout_change = scheduler.clone();
	Effect::new(move |_| {
		employees.track();
		zoom.track();
		expanded.track();
		dragging_id.track();
		layout_epoch.track();
		on_layout_change.schedule();
	});

	let on_resize = scheduler;
	let resize = window_event_listener(leptos::ev::resize, move |_| on_resize.schedule());
	on_cleanup(move || resize.remove());

	let on_drop = Callback::new(move |(target, payload): (DropTarget, Option<OrgChartNode>)| {
		drop_hover.set(None);
		zone_hover.set(false);
		let outcome = data.with_untracked(|d| {
			drag.try_update_value(|controller| controller.resolve_drop(&target, payload, &d.assigned))
		});
		dragging_id.set(None);
		match outcome {
			Some(outcome) => settle_drop(
				outcome,
				|intent| on_reassign.run(intent),
				|rejection| notifications.error(rejection.to_string()),
			),
			None => log::debug!("drop on {target:?} after unmount"),
		}
	});

	// Drag state is released at window level: a reload can replace the card
	// that started the drag, and `dragend` never reaches a detached card.
	// Pointer events are suppressed during a native drag, so a pointer move
	// means any drag still held was abandoned.
	let release_drag = move || {
		let released = drag.try_update_value(DragController::end).flatten();
		let marked = dragging_id.try_with_untracked(Option::is_some).unwrap_or(false);
		if released.is_none() && !marked {
			return;
		}
		if let Some(node) = released {
			log::debug!("drag of {} released", node.id);
		}
		dragging_id.try_set(None);
		drop_hover.try_set(None);
		zone_hover.try_set(false);
	};
	let dragend = window_event_listener(leptos::ev::dragend, move |_| release_drag());
	let stray_pointer = window_event_listener(leptos::ev::pointermove, move |_| release_drag());
	on_cleanup(move || {
		dragend.remove();
		stray_pointer.remove();
	});

	let ctx = TreeContext {
		expanded,
		current_user,
		drag,
		dragging_id,
		drop_hover,
		on_toggle,
		on_drop,
	};

	let on_pointerdown = move |ev: PointerEvent| {
		if ev.button() != 0 || starts_on_interactive(&ev) {
			return;
		}
		let start = viewport.get_untracked();
		pan.update_value(|p| p.begin(ev.client_x() as f64, ev.client_y() as f64, start));
		panning.set(true);
	};

	let on_pointermove = move |ev: PointerEvent| {
		if let Some(next) = pan.with_value(|p| p.update(ev.client_x() as f64, ev.client_y() as f64)) {
			on_viewport_change.run(next);
		}
	};

	let end_pan = move || {
		if panning.get_untracked() {
			pan.update_value(PanState::end);
			panning.set(false);
		}
	};

	let container_center = move || -> Point {
		container_ref
			.get_untracked()
			.map(|el| {
				let rect = el.get_bounding_client_rect();
				Point::new(rect.width() / 2.0, rect.height() / 2.0)
			})
			.unwrap_or_default()
	};

	let zoom_by = move |delta: f64| {
		on_viewport_change.run(viewport.get_untracked().zoom_at(container_center(), delta));
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(container) = container_ref.get_untracked() else {
			return;
		};
		let rect = container.get_bounding_client_rect();
		let pointer = Point::new(ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top());
		let delta = wheel_zoom_delta(ev.delta_y(), ev.delta_mode(), rect.height());
		on_viewport_change.run(viewport.get_untracked().zoom_at(pointer, delta));
	};

	let tree = move || {
		data.with(|d| {
			if d.assigned.is_empty() {
				view! { <p class="org-empty">"No employees to show."</p> }.into_any()
			} else {
				d.assigned
					.iter()
					.cloned()
					.map(|root| node_branch(root, ctx))
					.collect_view()
					.into_any()
			}
		})
	};

	let unassigned = move || {
		data.with(|d| {
			d.unassigned
				.iter()
				.map(|node| view! { <li>{node_card(node, ctx, false)}</li> })
				.collect_view()
		})
	};

	view! {
		<div class="org-chart-layout">
			<div
				node_ref=container_ref
				class="org-chart"
				class:org-chart-panning=move || panning.get()
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=move |_| end_pan()
				on:pointerleave=move |_| end_pan()
				on:wheel=on_wheel
				on:dragover=move |ev: DragEvent| ev.prevent_default()
				on:drop=move |ev: DragEvent| {
					ev.prevent_default();
					on_drop.run((DropTarget::None, None));
				}
			>
				<div
					node_ref=content_ref
					class="org-chart-content"
					style=move || viewport.with(ViewportTransform::css)
				>
					<svg class="org-edges" role="group" aria-label="Reporting lines">
						{move || {
							edges
								.get()
								.into_iter()
								.map(|edge| {
									view! {
										<path
											class="org-edge"
											role="img"
											aria-label=edge.label
											data-edge-id=edge.id
											data-manager-id=edge.manager_id
											data-child-id=edge.child_id
											d=edge.path
										/>
									}
								})
								.collect_view()
						}}
					</svg>
					<div class="org-forest">{tree}</div>
				</div>

				<div class="org-toolbar" data-no-pan="true">
					<button
						title="Zoom out"
						disabled=move || !viewport.with(ViewportTransform::can_zoom_out)
						on:click=move |_| zoom_by(-ZOOM_STEP)
					>
						"−"
					</button>
					<span class="org-zoom-level">
						{move || format!("{}%", viewport.with(ViewportTransform::zoom_percent))}
					</span>
					<button
						title="Zoom in"
						disabled=move || !viewport.with(ViewportTransform::can_zoom_in)
						on:click=move |_| zoom_by(ZOOM_STEP)
					>
						"+"
					</button>
					<button title="Reset view" on:click=move |_| on_viewport_change.run(default_viewport)>
						"Reset"
					</button>
				</div>
			</div>

			<aside
				class="org-unassigned"
				class:org-unassigned-active=move || zone_hover.get()
				data-no-pan="true"
				on:dragover=move |ev: DragEvent| {
					ev.prevent_default();
					if !zone_hover.get_untracked() {
						zone_hover.set(true);
					}
				}
				on:dragleave=move |_| zone_hover.set(false)
				on:drop=move |ev: DragEvent| {
					ev.prevent_default();
					ev.stop_propagation();
					let payload = if drag.with_value(DragController::is_dragging) {
						None
					} else {
						drag_payload(&ev)
					};
					on_drop.run((DropTarget::UnassignedZone, payload));
				}
			>
				<h2>
					"Unassigned "
					<span class="org-unassigned-count">{move || data.with(|d| d.unassigned.len())}</span>
				</h2>
				<p class="org-unassigned-hint">"Drop an employee here to remove their manager."</p>
				<ul>{unassigned}</ul>
			</aside>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;
	use crate::components::org_chart::types::find_by_id;
	use crate::components::org_chart::types::tests::sample_forest;

	fn drop_on(dragged: &str, target: DropTarget) -> (usize, Vec<String>) {
		let forest = sample_forest();
		let mut controller = DragController::default();
		controller.start(find_by_id(&forest, dragged).unwrap().clone());
		let outcome = controller.resolve_drop(&target, None, &forest);

		let sent = Cell::new(0);
		let toasts = RefCell::new(Vec::new());
		settle_drop(
			outcome,
			|_| sent.set(sent.get() + 1),
			|rejection| toasts.borrow_mut().push(rejection.to_string()),
		);
		(sent.get(), toasts.into_inner())
	}

	#[test]
	fn rejected_drop_sends_nothing() {
		let (sent, toasts) = drop_on("1", DropTarget::Node("3".into()));
		assert_eq!(sent, 0);
		assert_eq!(toasts, vec!["Cannot assign a manager to their own subordinate"]);

		let (sent, toasts) = drop_on("2", DropTarget::Node("2".into()));
		assert_eq!(sent, 0);
		assert_eq!(toasts, vec!["Cannot assign an employee as their own manager"]);
	}

	#[test]
	fn valid_drop_sends_exactly_one_reassignment() {
		assert_eq!(drop_on("4", DropTarget::Node("1".into())), (1, vec![]));
		assert_eq!(drop_on("3", DropTarget::UnassignedZone), (1, vec![]));
	}

	#[test]
	fn drop_on_empty_canvas_is_silent() {
		assert_eq!(drop_on("2", DropTarget::None), (0, vec![]));
	}

	#[test]
	fn initials_take_first_two_words() {
		assert_eq!(initials("ada lovelace byron"), "AL");
		assert_eq!(initials("Bob"), "B");
		assert_eq!(initials("  "), "");
	}
}
