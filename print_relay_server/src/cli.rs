use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // CPR_CLOVER_CLIENT_SECRET is deliberately left off this list
    const DISPLAY_ENVS: [&str; 12] = [
        "RUST_LOG",
        "CPR_HOST",
        "CPR_PORT",
        "CPR_CLOVER_API_URL",
        "CPR_CLOVER_CLIENT_ID",
        "CPR_CLOVER_REDIRECT_URI",
        "CPR_REQUEST_TIMEOUT_SECS",
        "CPR_TOKEN_FILE",
        "CPR_POLL_INTERVAL_MS",
        "CPR_FETCH_LIMIT",
        "CPR_TARGET_ORDER_TYPE_ID",
        "CPR_AUTOSTART",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
