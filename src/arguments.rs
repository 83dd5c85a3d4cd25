/// Command-line argument handling for skrybot
///
/// Arguments are captured once into a process-wide list so the logger, paths
/// and main entry point all read the same values. Tests override them with
/// `set_cmd_args`.
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
///
/// Accepts both `--flag value` and `--flag=value`.
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    let prefix = format!("{}=", flag);
    for (i, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
        if arg == flag && i + 1 < args.len() && !args[i + 1].starts_with("--") {
            return Some(args[i + 1].clone());
        }
    }
    None
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Start with the trader paused (admin API resumes it)
pub fn is_start_paused_enabled() -> bool {
    has_arg("--paused")
}

/// Explicit config file path (`--config <path>`)
pub fn get_config_path_override() -> Option<PathBuf> {
    get_arg_value("--config").map(PathBuf::from)
}

/// Explicit base data directory (`--data-dir <path>`)
pub fn get_data_dir_override() -> Option<PathBuf> {
    get_arg_value("--data-dir").map(PathBuf::from)
}

pub fn print_help() {
    println!("skrybot - autonomous Solana token trader");
    println!();
    println!("USAGE:");
    println!("    skrybot [FLAGS]");
    println!();
    println!("CORE FLAGS:");
    println!("    --config <path>           Config file (default: <data-dir>/data/config.toml)");
    println!("    --data-dir <path>         Base directory for data and logs");
    println!("    --paused                  Start with trading paused");
    println!("    --help, -h                Show this help message");
    println!();
    println!("LOGGING FLAGS:");
    println!("    --debug-<module>          Debug output for one module (trader, strategy,");
    println!("                              positions, discovery, security, swap, wallet,");
    println!("                              treasury, notifications, telegram, webserver)");
    println!("    --debug-all               Debug output for every module");
    println!("    --verbose                 Verbose output everywhere");
    println!("    --quiet                   Warnings and errors only");
    println!("    --no-log-file             Console output only");
    println!();
    println!("ENVIRONMENT (.env supported):");
    println!("    TREASURY_ADDRESS          Treasury wallet receiving the profit tax");
    println!("    DESIGNATED_ASSET          Mint held under the conviction policy");
    println!("    TELEGRAM_BOT_TOKEN        Telegram bot token");
    println!("    TELEGRAM_CHAT_ID          Telegram chat for notifications");
    println!("    JUPITER_API_KEY           Jupiter API key (optional, raises rate limits)");
}
