//! Credentials the login flow leaves in `localStorage`.

use web_sys::Storage;

const TOKEN_KEY: &str = "access_token";
const USER_ID_KEY: &str = "user_id";

fn local_storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

fn read(key: &str) -> Option<String> {
	local_storage()?
		.get_item(key)
		.ok()
		.flatten()
		.filter(|v| !v.is_empty())
}

pub fn bearer_token() -> Option<String> {
	read(TOKEN_KEY)
}

pub fn current_user_id() -> Option<String> {
	read(USER_ID_KEY)
}
