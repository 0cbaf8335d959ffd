//! Startup banner and URL display

use super::config::is_all_interfaces;
use super::constants::APP_NAME;

/// Label column width
const W: usize = 12;

/// Print the startup banner with URLs
pub fn print_banner(
    host: &str,
    port: u16,
    auth_enabled: bool,
    oauth_configured: bool,
    data_dir: &str,
) {
    // localhost reads better than 0.0.0.0
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}/api/v1\x1b[0m",
        "API:", display_host, port
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}/api/v1/docs\x1b[0m",
        "Docs:", display_host, port
    );

    if !auth_enabled {
        println!(
            "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m disabled \x1b[90m(single local user, reports return zeros)\x1b[0m",
            "Auth:"
        );
    } else if oauth_configured {
        println!(
            "  \x1b[35m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}/api/v1/auth/google/login\x1b[0m",
            "Sign in:", display_host, port
        );
    } else {
        println!(
            "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[90mset GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET, GOOGLE_REDIRECT_URL\x1b[0m",
            "Sign in:"
        );
    }

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    } else if is_all_interfaces(host) {
        if let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                println!(
                    "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}\x1b[0m",
                    "Network:", ip, port
                );
            }
        }
    } else {
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}\x1b[0m",
            "Network:", host, port
        );
    }
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Data:", data_dir);

    println!();
}
