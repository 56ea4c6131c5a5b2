//! App-wide light/dark theme.
//!
//! One store is provided at the root; the `<Html>` element reflects it as
//! `data-theme`, and components read it from context.

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
	Light,
	Dark,
}

impl Theme {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Self::Light => Self::Dark,
			Self::Dark => Self::Light,
		}
	}
}

fn system_theme() -> Theme {
	let prefers_dark = web_sys::window()
		.and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
		.is_some_and(|query| query.matches());
	if prefers_dark { Theme::Dark } else { Theme::Light }
}

#[derive(Clone, Copy, Debug)]
pub struct ThemeStore {
	theme: RwSignal<Theme>,
}

impl ThemeStore {
	pub fn provide() -> Self {
		let store = Self {
			theme: RwSignal::new(system_theme()),
		};
		provide_context(store);
		store
	}

	pub fn theme(&self) -> Signal<Theme> {
		self.theme.into()
	}

	pub fn toggle(&self) {
		self.theme.update(|t| *t = t.toggled());
		log::debug!("theme set to {}", self.theme.get_untracked().as_str());
	}
}

pub fn use_theme() -> ThemeStore {
	expect_context::<ThemeStore>()
}
