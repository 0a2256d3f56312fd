// Generates the Tauri ACL permissions for the plugin's commands.
const COMMANDS: &[&str] = &["invoke", "commands"];

fn main() {
    #[cfg(feature = "tauri-plugin")]
    tauri_plugin::Builder::new(COMMANDS).build();
    #[cfg(not(feature = "tauri-plugin"))]
    let _ = COMMANDS;
}
