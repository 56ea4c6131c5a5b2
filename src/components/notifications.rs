//! Toast messages for reassignment results and load failures.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
	Success,
	Error,
}

impl ToastKind {
	fn class(self) -> &'static str {
		match self {
			Self::Success => "toast toast-success",
			Self::Error => "toast toast-error",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
	pub id: u64,
	pub kind: ToastKind,
	pub message: String,
}

#[derive(Clone, Copy, Debug)]
pub struct Notifications {
	toasts: RwSignal<Vec<Toast>>,
	next_id: StoredValue<u64>,
	duration_ms: u32,
}

impl Notifications {
	pub fn provide(duration_ms: u32) -> Self {
		let notifications = Self {
			toasts: RwSignal::new(Vec::new()),
			next_id: StoredValue::new(0),
			duration_ms,
		};
		provide_context(notifications);
		notifications
	}

	pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
		let message = message.into();
		let Some(id) = self.next_id.try_update_value(|n| {
			*n += 1;
			*n
		}) else {
			return;
		};
		log::debug!("toast #{id} ({kind:?}): {message}");
		self.toasts.update(|t| t.push(Toast { id, kind, message }));

		let toasts = self.toasts;
		Timeout::new(self.duration_ms, move || {
			toasts.try_update(|t| t.retain(|toast| toast.id != id));
		})
		.forget();
	}

	pub fn success(&self, message: impl Into<String>) {
		self.push(ToastKind::Success, message);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.push(ToastKind::Error, message);
	}

	pub fn dismiss(&self, id: u64) {
		self.toasts.update(|t| t.retain(|toast| toast.id != id));
	}
}

#[component]
pub fn ToastHost() -> impl IntoView {
	let notifications = expect_context::<Notifications>();

	view! {
		<div class="toast-host" role="status" aria-live="polite">
			{move || {
				notifications
					.toasts
					.get()
					.into_iter()
					.map(|toast| {
						let id = toast.id;
						view! {
							<div class=toast.kind.class()>
								<span>{toast.message}</span>
								<button
									class="toast-dismiss"
									aria-label="Dismiss"
									on:click=move |_| notifications.dismiss(id)
								>
									"×"
								</button>
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}
