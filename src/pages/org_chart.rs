//! The org chart route: data loading, filtering and reassignment.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::tachys::view::any_view::IntoAny;

use crate::api::{
	ApiClient, ApiError, Department, ReassignRequest, ReassignResponse, RequestSequence, auth,
};
use crate::components::notifications::Notifications;
use crate::components::org_chart::{
	ExpandedSet, OrgChartCanvas, OrgChartResponse, Point, ReassignIntent, ViewportTransform,
};
use crate::config::AppConfig;
use crate::theme::{Theme, use_theme};

/// How a reassignment request settled, and what the page does about it.
#[derive(Clone, Debug, PartialEq)]
enum ReassignOutcome {
	/// Toast `message`, then reload the chart.
	Reassigned(String),
	/// Toast `message` and keep the chart as it is.
	Failed(String),
}

impl ReassignOutcome {
	fn apply(self, success: impl FnOnce(String), failure: impl FnOnce(String), reload: impl FnOnce()) {
		match self {
			Self::Reassigned(message) => {
				success(message);
				reload();
			}
			Self::Failed(message) => failure(message),
		}
	}
}

/// Builds the request for `intent` and hands it to `send`.
///
/// Server `detail` messages are surfaced verbatim. Nothing is sent when the
/// ids cannot be turned into a request.
async fn submit_reassignment<F, Fut>(
	intent: &ReassignIntent,
	departments: &[Department],
	send: F,
) -> ReassignOutcome
where
	F: FnOnce(ReassignRequest) -> Fut,
	Fut: Future<Output = Result<ReassignResponse, ApiError>>,
{
	let request = match ReassignRequest::from_intent(intent, departments) {
		Ok(request) => request,
		Err(err) => {
			log::warn!("cannot build reassignment for {}: {err}", intent.user_id);
			return ReassignOutcome::Failed(err.to_string());
		}
	};
	match send(request).await {
		Ok(response) => {
			log::info!(
				"user {} now reports to {:?} (department {:?})",
				response.user_id,
				response.new_manager_id,
				response.new_department_id
			);
			if response.message.is_empty() {
				ReassignOutcome::Reassigned(format!("{} was reassigned", intent.user_name))
			} else {
				ReassignOutcome::Reassigned(response.message)
			}
		}
		Err(err) => {
			log::warn!("reassignment of {} failed: {err}", intent.user_id);
			ReassignOutcome::Failed(err.user_message("Failed to reassign employee"))
		}
	}
}

/// Org chart page: owns the tree, the viewport and the expanded set, and
/// reloads everything from the server after each reassignment.
#[component]
pub fn OrgChartPage() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let notifications = expect_context::<Notifications>();
	let theme = use_theme();
	let api = ApiClient::new(config.api_base_url);
	let expand_mode = config.expand_mode;
	let default_viewport = ViewportTransform::new(config.default_zoom, Point::default());

	let chart = RwSignal::new(None::<OrgChartResponse>);
	let departments = RwSignal::new(Vec::<Department>::new());
	let department_filter = RwSignal::new(None::<i64>);
	let viewport = RwSignal::new(default_viewport);
	let expanded = RwSignal::new(ExpandedSet::default());
	let seeded = StoredValue::new(false);
	let loading = RwSignal::new(false);
	let load_error = RwSignal::new(None::<String>);
	let sequence = StoredValue::new(RequestSequence::default());
	let layout_epoch = RwSignal::new(0u64);
	let current_user = Signal::stored(auth::current_user_id());

	let departments_api = api.clone();
	spawn_local(async move {
		match departments_api.fetch_departments().await {
			Ok(list) => {
				log::debug!("loaded {} departments", list.len());
				departments.try_set(list);
			}
			Err(err) => log::error!("failed to load departments: {err}"),
		}
	});

	let reload_api = api.clone();
	let reload = Callback::new(move |()| {
		let Some(tag) = sequence.try_update_value(RequestSequence::issue) else {
			return;
		};
		let department = department_filter.get_untracked();
		let api = reload_api.clone();
		loading.set(true);
		spawn_local(async move {
			let result = api.fetch_org_chart(department).await;
			if !sequence.try_with_value(|s| s.is_current(tag)).unwrap_or(false) {
				log::debug!("discarding stale org chart response #{tag}");
				return;
			}
			loading.try_set(false);
			match result {
				Ok(response) => {
					log::info!(
						"org chart #{tag}: {} roots, {} unassigned",
						response.assigned.len(),
						response.unassigned.len()
					);
					if seeded.get_value() {
						expanded.update(|set| set.merge(&response.assigned));
					} else {
						expanded.set(ExpandedSet::seeded(&response.assigned, expand_mode));
						seeded.set_value(true);
					}
					load_error.set(None);
					chart.set(Some(response));
				}
				Err(err) => {
					log::error!("failed to load org chart (status {:?}): {err}", err.status());
					let message = err.user_message("Failed to load the organization chart");
					if chart.with_untracked(Option::is_some) {
						notifications.error(message);
					} else {
						load_error.set(Some(message));
					}
				}
			}
		});
	});

	// Runs on mount and whenever the department filter changes.
	Effect::new(move |_| {
		department_filter.track();
		reload.run(());
	});

	let on_reassign = Callback::new(move |intent: ReassignIntent| {
		let list = departments.get_untracked();
		let api = api.clone();
		spawn_local(async move {
			submit_reassignment(&intent, &list, |request| async move { api.reassign(&request).await })
				.await
				.apply(
					|message| notifications.success(message),
					|message| notifications.error(message),
					|| {
						reload.run(());
						layout_epoch.try_update(|epoch| *epoch += 1);
					},
				);
		});
	});

	let on_toggle = Callback::new(move |id: String| expanded.update(|set| set.toggle(&id)));
	let on_viewport_change = Callback::new(move |next: ViewportTransform| viewport.set(next));

	let expand_all = move |_| {
		chart.with_untracked(|c| {
			if let Some(c) = c {
				expanded.update(|set| set.expand_all(&c.assigned));
			}
		})
	};
	let collapse = move |_| {
		chart.with_untracked(|c| {
			if let Some(c) = c {
				expanded.update(|set| set.collapse_to_first_level(&c.assigned));
			}
		})
	};

	let department_options = move || {
		departments
			.get()
			.into_iter()
			.map(|d| {
				view! {
					<option value=d.id.to_string()>
						{format!("{} ({})", d.name, d.employee_count)}
					</option>
				}
			})
			.collect_view()
	};

	view! {
		<div class="org-chart-page">
			<header class="org-chart-header">
				<h1>"Organization Chart"</h1>
				<div class="org-chart-actions">
					<select
						aria-label="Department"
						prop:value=move || {
							department_filter.get().map(|id| id.to_string()).unwrap_or_default()
						}
						on:change=move |ev| department_filter.set(event_target_value(&ev).parse().ok())
					>
						<option value="">"All departments"</option>
						{department_options}
					</select>
					<button on:click=expand_all>"Expand all"</button>
					<button on:click=collapse>"Collapse"</button>
					<button on:click=move |_| reload.run(()) disabled=move || loading.get()>
						"Refresh"
					</button>
					<button on:click=move |_| theme.toggle()>
						{move || match theme.theme().get() {
							Theme::Light => "Dark mode",
							Theme::Dark => "Light mode",
						}}
					</button>
				</div>
			</header>

			<Show when=move || loading.get()>
				<div class="org-chart-loading">"Loading…"</div>
			</Show>

			<Show
				when=move || chart.with(Option::is_some)
				fallback=move || {
					match load_error.get() {
						Some(message) => {
							view! {
								<div class="org-chart-error">
									<p>{message}</p>
									<button on:click=move |_| reload.run(())>"Try Again"</button>
								</div>
							}
								.into_any()
						}
						None => {
							view! { <div class="org-chart-loading">"Loading organization chart…"</div> }
								.into_any()
						}
					}
				}
			>
				<OrgChartCanvas
					data=Signal::derive(move || chart.get().unwrap_or_default())
					viewport=viewport
					on_viewport_change=on_viewport_change
					default_viewport=default_viewport
					expanded=expanded
					on_toggle=on_toggle
					on_reassign=on_reassign
					layout_epoch=layout_epoch
					current_user=current_user
				/>
			</Show>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::pin::pin;
	use std::task::{Context, Poll, Waker};

	use super::*;

	/// Polls a future whose dependencies are all ready.
	fn settle<F: Future>(future: F) -> F::Output {
		let mut future = pin!(future);
		match future.as_mut().poll(&mut Context::from_waker(Waker::noop())) {
			Poll::Ready(output) => output,
			Poll::Pending => panic!("future did not resolve"),
		}
	}

	fn intent(user: &str, manager: Option<&str>) -> ReassignIntent {
		ReassignIntent {
			user_id: user.into(),
			user_name: "Bob".into(),
			new_manager_id: manager.map(Into::into),
			manager_department: Some("Finance".into()),
		}
	}

	fn departments() -> Vec<Department> {
		vec![Department { id: 11, name: "Finance".into(), employee_count: 3 }]
	}

	fn response(message: &str) -> ReassignResponse {
		ReassignResponse {
			message: message.into(),
			user_id: 2,
			new_manager_id: Some(1),
			new_department_id: Some(11),
		}
	}

	/// Records what the page would do, in order.
	fn page_effects(outcome: ReassignOutcome) -> Vec<String> {
		let log = RefCell::new(Vec::new());
		outcome.apply(
			|m| log.borrow_mut().push(format!("success: {m}")),
			|m| log.borrow_mut().push(format!("error: {m}")),
			|| log.borrow_mut().push("reload".into()),
		);
		log.into_inner()
	}

	#[test]
	fn success_toasts_then_reloads() {
		let sent = RefCell::new(None);
		let outcome = settle(submit_reassignment(&intent("2", Some("1")), &departments(), |req| {
			*sent.borrow_mut() = Some(req);
			std::future::ready(Ok(response("User reassigned successfully")))
		}));

		assert_eq!(
			sent.into_inner(),
			Some(ReassignRequest { user_id: 2, new_manager_id: Some(1), new_department_id: Some(11) })
		);
		assert_eq!(
			page_effects(outcome),
			vec!["success: User reassigned successfully", "reload"]
		);
	}

	#[test]
	fn empty_server_message_names_the_employee() {
		let outcome = settle(submit_reassignment(&intent("2", None), &departments(), |_| {
			std::future::ready(Ok(response("")))
		}));
		assert_eq!(outcome, ReassignOutcome::Reassigned("Bob was reassigned".into()));
	}

	#[test]
	fn server_detail_is_shown_and_chart_not_reloaded() {
		let outcome = settle(submit_reassignment(&intent("2", Some("1")), &departments(), |_| {
			std::future::ready(Err(ApiError::from_response(
				400,
				r#"{"detail": "Cannot create circular reporting relationship"}"#,
			)))
		}));
		assert_eq!(
			page_effects(outcome),
			vec!["error: Cannot create circular reporting relationship"]
		);
	}

	#[test]
	fn transport_failure_uses_generic_message() {
		let outcome = settle(submit_reassignment(&intent("2", Some("1")), &departments(), |_| {
			std::future::ready(Err(ApiError::Network("offline".into())))
		}));
		assert_eq!(outcome, ReassignOutcome::Failed("Failed to reassign employee".into()));
	}

	#[test]
	fn unparseable_ids_send_nothing() {
		let mut called = false;
		let outcome = settle(submit_reassignment(&intent("abc", Some("1")), &departments(), |_| {
			called = true;
			std::future::ready(Ok(response("")))
		}));
		assert!(!called);
		assert_eq!(page_effects(outcome), vec!["error: Invalid employee id: abc"]);
	}
}
