//! CLI argument parsing

use clap::Parser;
use macshift_iface::GatewayConfig;

const EXAMPLES: &str = "\
Examples:
  macshift -i eth0 -m 00:11:22:33:44:55    Change MAC to specific address
  macshift -i wlan0 -r                     Change MAC to random address
  macshift -l                              List all network interfaces
  macshift -i eth0 -s                      Show current MAC address

Note: This tool requires sudo/root privileges to change MAC addresses.";

#[derive(Parser, Debug)]
#[command(name = "macshift")]
#[command(version, about = "Network interface MAC address changer", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Network interface name (e.g., eth0, en0, wlan0)
    #[arg(short, long, value_name = "NAME")]
    pub interface: Option<String>,

    /// New MAC address (format: XX:XX:XX:XX:XX:XX)
    #[arg(short, long, value_name = "ADDRESS", conflicts_with = "random")]
    pub mac: Option<String>,

    /// Generate and set a random MAC address
    #[arg(short, long)]
    pub random: bool,

    /// List all available network interfaces
    #[arg(short, long)]
    pub list: bool,

    /// Show current MAC address of interface
    #[arg(short, long)]
    pub show: bool,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable color output
    #[arg(long)]
    pub no_color: bool,

    /// Run commands directly instead of through sudo
    #[arg(long)]
    pub no_sudo: bool,

    /// Do not disassociate from the Wi-Fi network before the change (macOS)
    #[arg(long)]
    pub keep_association: bool,
}

impl Cli {
    /// Parse command-line arguments, leaving exit handling to the caller
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Gateway settings derived from the flags
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            use_sudo: !self.no_sudo,
            disassociate_wifi: !self.keep_association,
            ..GatewayConfig::default()
        }
    }

    /// Default log filter for the verbosity count
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
