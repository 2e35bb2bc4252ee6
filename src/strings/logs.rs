pub const STARTING: &str = "Starting Tessera...";

pub fn config_loaded(user: &str) -> String {
    format!("Loaded configuration for user: {user}")
}

pub const LOGIN_SUCCESS: &str = "Logged in successfully!";

pub fn login_failed(state: &str, err: &str) -> String {
    format!("Login failed while {state}: {err}")
}

pub fn state_transition(from: &str, to: &str) -> String {
    format!("Bot state: {from} -> {to}")
}

pub fn database_ready(name: &str) -> String {
    format!("Database '{name}' is ready")
}

pub const NO_DATABASE_BACKEND: &str = "a database is configured but no database backend is available";

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub fn command_failed(command: &str, err: &str) -> String {
    format!("Command {command} failed: {err}")
}

pub fn modules_loaded(count: usize, commands: usize) -> String {
    format!("Loaded {count} modules with {commands} commands")
}

pub const NO_MODULES: &str = "No modules loaded, the bot will not answer any command";

pub fn scripted_module_loaded(name: &str, path: &str) -> String {
    format!("Read scripted module '{name}' from {path}")
}

pub const MEMO_NO_DATABASE: &str = "memo: no database configured, remember/recall are disabled";

pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub const SHUTDOWN: &str = "Shutting down...";

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub fn report_failed(err: &str) -> String {
    format!("Failed to report error to developer channel: {err}")
}

pub fn events_lagged(skipped: u64) -> String {
    format!("Error reporter lagged behind, skipped {skipped} events")
}
