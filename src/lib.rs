//! Leptos client-side org chart editor for the HRMS front-end.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod config;
mod pages;
mod theme;

use crate::components::notifications::{Notifications, ToastHost};
use crate::config::AppConfig;
// Top-Level pages
use crate::pages::not_found::NotFound;
use crate::pages::org_chart::OrgChartPage;
use crate::theme::ThemeStore;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the org chart and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::from_env();
	info!("API base: {:?}", config.api_base_url);
	Notifications::provide(config.toast_duration_ms);
	provide_context(config);
	let theme = ThemeStore::provide().theme();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=move || theme.get().as_str() />

		// sets the document title
		<Title text="Organization Chart" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=OrgChartPage />
				<Route path=path!("/org-chart") view=OrgChartPage />
			</Routes>
		</Router>

		<ToastHost />
	}
}
