//! Reading, setting and enumerating interface addresses through OS utilities

use lazy_static::lazy_static;
use macshift_core::{find_in_text, Error, MacAddr, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::command::{command_line, CommandOutput, CommandRunner, SystemRunner};
use crate::platform::Platform;

/// Location of Apple's `airport` utility, which is not on the default PATH
pub const AIRPORT_PATH: &str =
    "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport";

lazy_static! {
    static ref IP_LINK_NAME: Regex = Regex::new(r"(?m)^\d+: ([^:]+):").unwrap();
}

/// Operations the orchestrator needs from the operating system
pub trait InterfaceGateway {
    /// Raw output of the interface query command
    fn read_current_address(&self, interface: &str) -> Result<String>;

    /// Apply `mac` to `interface`
    fn set_address(&self, interface: &str, mac: &MacAddr) -> Result<()>;

    /// Interface names in the order the OS lists them
    fn enumerate_interfaces(&self) -> Result<Vec<String>>;

    /// Query the interface and extract its hardware address
    fn current_address(&self, interface: &str) -> Result<Option<MacAddr>> {
        let raw = self.read_current_address(interface)?;
        Ok(find_in_text(&raw))
    }
}

/// Gateway settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Prefix mutating commands with `sudo` (skipped when already root)
    pub use_sudo: bool,
    /// Disassociate from the Wi-Fi network before changing the address (macOS)
    pub disassociate_wifi: bool,
    /// Path of the `airport` utility (macOS)
    pub airport_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            use_sudo: true,
            disassociate_wifi: true,
            airport_path: AIRPORT_PATH.to_string(),
        }
    }
}

/// Gateway that shells out to `ip` or `ifconfig`
#[derive(Debug, Clone)]
pub struct OsGateway<R = SystemRunner> {
    platform: Platform,
    config: GatewayConfig,
    runner: R,
    /// Effective uid was 0 when the gateway was built
    as_root: bool,
}

impl OsGateway<SystemRunner> {
    /// Gateway for the running platform using real processes
    pub fn detect(config: GatewayConfig) -> Result<Self> {
        Ok(Self::with_runner(Platform::detect()?, config, SystemRunner))
    }
}

impl<R: CommandRunner> OsGateway<R> {
    /// Create a gateway with a custom command runner
    pub fn with_runner(platform: Platform, config: GatewayConfig, runner: R) -> Self {
        Self {
            platform,
            config,
            runner,
            as_root: running_as_root(),
        }
    }

    #[cfg(test)]
    fn with_root(mut self, as_root: bool) -> Self {
        self.as_root = as_root;
        self
    }

    fn needs_sudo(&self) -> bool {
        self.config.use_sudo && !self.as_root
    }

    /// Run a command that may require root, prefixed with `sudo` if configured
    fn run_privileged(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        if self.needs_sudo() {
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(program);
            full.extend_from_slice(args);
            self.runner.run("sudo", &full)
        } else {
            self.runner.run(program, args)
        }
    }

    /// Run a privileged command and fail on a non-zero exit status
    fn checked(&self, program: &str, args: &[&str]) -> Result<()> {
        let output = self.run_privileged(program, args)?;
        if output.success {
            Ok(())
        } else {
            Err(Error::command_failed(command_line(program, args), output.stderr))
        }
    }

    fn set_address_linux(&self, interface: &str, mac: &str) -> Result<()> {
        self.checked("ip", &["link", "set", interface, "down"])?;

        if let Err(e) = self.checked("ip", &["link", "set", interface, "address", mac]) {
            // Leave the link as we found it when the address is rejected.
            if let Err(up_err) = self.checked("ip", &["link", "set", interface, "up"]) {
                warn!(interface, error = %up_err, "Could not bring interface back up");
            }
            return Err(e);
        }

        self.checked("ip", &["link", "set", interface, "up"])
    }

    fn set_address_macos(&self, interface: &str, mac: &str) -> Result<()> {
        if self.config.disassociate_wifi {
            match self.run_privileged(&self.config.airport_path, &["-z"]) {
                Ok(output) if output.success => debug!("Disassociated from Wi-Fi network"),
                Ok(output) => debug!(stderr = %output.stderr.trim(), "Wi-Fi disassociation failed"),
                Err(e) => debug!(error = %e, "Wi-Fi disassociation skipped"),
            }
        }

        self.checked("ifconfig", &[interface, "ether", mac])
    }
}

impl<R: CommandRunner> InterfaceGateway for OsGateway<R> {
    fn read_current_address(&self, interface: &str) -> Result<String> {
        let output = match self.platform {
            Platform::Linux => self.runner.run("ip", &["link", "show", interface])?,
            Platform::MacOs => self.runner.run("ifconfig", &[interface])?,
        };

        if !output.success {
            debug!(interface, stderr = %output.stderr.trim(), "Interface query failed");
            return Err(Error::InterfaceQuery {
                interface: interface.to_string(),
            });
        }

        Ok(output.stdout)
    }

    fn set_address(&self, interface: &str, mac: &MacAddr) -> Result<()> {
        let mac = mac.to_string();
        info!(interface, mac = %mac, platform = %self.platform, "Changing MAC address");

        match self.platform {
            Platform::Linux => self.set_address_linux(interface, &mac),
            Platform::MacOs => self.set_address_macos(interface, &mac),
        }
    }

    fn enumerate_interfaces(&self) -> Result<Vec<String>> {
        let (program, args): (&str, &[&str]) = match self.platform {
            Platform::Linux => ("ip", &["link", "show"][..]),
            Platform::MacOs => ("ifconfig", &["-l"][..]),
        };

        let output = self.runner.run(program, args)?;
        if !output.success {
            return Err(Error::command_failed(command_line(program, args), output.stderr));
        }

        let names = match self.platform {
            Platform::Linux => parse_ip_link_names(&output.stdout),
            Platform::MacOs => output.stdout.split_whitespace().map(String::from).collect(),
        };

        debug!(count = names.len(), "Enumerated interfaces");
        Ok(names)
    }
}

/// Interface names from `ip link show`, without the `@peer` suffix
fn parse_ip_link_names(raw: &str) -> Vec<String> {
    IP_LINK_NAME
        .captures_iter(raw)
        .filter_map(|cap| cap.get(1))
        .map(|m| {
            let name = m.as_str().trim();
            name.split_once('@').map_or(name, |(base, _)| base).to_string()
        })
        .collect()
}

#[cfg(unix)]
pub(crate) fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub(crate) fn running_as_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    const IP_LINK_SHOW: &str = "\
1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN mode DEFAULT group default qlen 1000
    link/loopback 00:00:00:00:00:00 brd 00:00:00:00:00:00
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP mode DEFAULT group default qlen 1000
    link/ether 52:54:00:12:34:56 brd ff:ff:ff:ff:ff:ff
    altname enp0s3
3: wlan0: <NO-CARRIER,BROADCAST,MULTICAST,UP> mtu 1500 qdisc noqueue state DOWN mode DORMANT group default qlen 1000
    link/ether 3c:22:fb:aa:bb:cc brd ff:ff:ff:ff:ff:ff
7: veth1a2b@if6: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc noqueue master docker0 state UP mode DEFAULT group default
    link/ether 9a:0c:11:22:33:44 brd ff:ff:ff:ff:ff:ff link-netnsid 0
";

    /// Records every command and replays scripted outputs in order
    #[derive(Default)]
    struct FakeRunner {
        calls: RefCell<Vec<String>>,
        replies: RefCell<VecDeque<Result<CommandOutput>>>,
    }

    impl FakeRunner {
        fn replying(replies: Vec<Result<CommandOutput>>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                replies: RefCell::new(replies.into()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(command_line(program, args));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(CommandOutput::ok("")))
        }
    }

    fn no_sudo() -> GatewayConfig {
        GatewayConfig {
            use_sudo: false,
            ..GatewayConfig::default()
        }
    }

    fn mac() -> MacAddr {
        MacAddr::new([0x02, 0x1a, 0x3c, 0x4d, 0x5e, 0x6f])
    }

    #[test]
    fn test_parse_ip_link_names() {
        assert_eq!(
            parse_ip_link_names(IP_LINK_SHOW),
            vec!["lo", "eth0", "wlan0", "veth1a2b"]
        );
    }

    #[test]
    fn test_read_current_address_linux() {
        let runner = FakeRunner::replying(vec![Ok(CommandOutput::ok(
            "2: eth0: <UP>\n    link/ether 52:54:00:12:34:56 brd ff:ff:ff:ff:ff:ff\n",
        ))]);
        let gateway = OsGateway::with_runner(Platform::Linux, no_sudo(), runner);

        let current = gateway.current_address("eth0").unwrap();
        assert_eq!(current, Some("52:54:00:12:34:56".parse::<MacAddr>().unwrap()));
        assert_eq!(gateway.runner.calls(), vec!["ip link show eth0"]);
    }

    #[test]
    fn test_read_current_address_macos() {
        let runner = FakeRunner::replying(vec![Ok(CommandOutput::ok(
            "en0: flags=8863<UP> mtu 1500\n\tether a4:83:e7:12:34:56\n",
        ))]);
        let gateway = OsGateway::with_runner(Platform::MacOs, no_sudo(), runner);

        let raw = gateway.read_current_address("en0").unwrap();
        assert!(raw.contains("a4:83:e7:12:34:56"));
        assert_eq!(gateway.runner.calls(), vec!["ifconfig en0"]);
    }

    #[test]
    fn test_read_missing_interface() {
        let runner = FakeRunner::replying(vec![Ok(CommandOutput::failed(
            "Device \"nope0\" does not exist.",
        ))]);
        let gateway = OsGateway::with_runner(Platform::Linux, no_sudo(), runner);

        match gateway.read_current_address("nope0") {
            Err(Error::InterfaceQuery { interface }) => assert_eq!(interface, "nope0"),
            other => panic!("Expected InterfaceQuery error, got {other:?}"),
        }
    }

    #[test]
    fn test_set_address_linux_sequence() {
        let gateway = OsGateway::with_runner(Platform::Linux, no_sudo(), FakeRunner::default());
        gateway.set_address("eth0", &mac()).unwrap();

        assert_eq!(
            gateway.runner.calls(),
            vec![
                "ip link set eth0 down",
                "ip link set eth0 address 02:1a:3c:4d:5e:6f",
                "ip link set eth0 up",
            ]
        );
    }

    #[test]
    fn test_set_address_linux_rejected_brings_link_up() {
        let runner = FakeRunner::replying(vec![
            Ok(CommandOutput::ok("")),
            Ok(CommandOutput::failed("RTNETLINK answers: Cannot assign requested address\n")),
            Ok(CommandOutput::ok("")),
        ]);
        let gateway = OsGateway::with_runner(Platform::Linux, no_sudo(), runner);

        match gateway.set_address("eth0", &mac()) {
            Err(Error::CommandFailed { command, stderr }) => {
                assert_eq!(command, "ip link set eth0 address 02:1a:3c:4d:5e:6f");
                assert_eq!(stderr, "RTNETLINK answers: Cannot assign requested address");
            }
            other => panic!("Expected CommandFailed error, got {other:?}"),
        }
        assert_eq!(gateway.runner.calls().last().unwrap(), "ip link set eth0 up");
    }

    #[test]
    fn test_set_address_linux_down_fails_stops_early() {
        let runner = FakeRunner::replying(vec![Ok(CommandOutput::failed(
            "RTNETLINK answers: Operation not permitted",
        ))]);
        let gateway = OsGateway::with_runner(Platform::Linux, no_sudo(), runner);

        assert!(gateway.set_address("eth0", &mac()).is_err());
        assert_eq!(gateway.runner.calls(), vec!["ip link set eth0 down"]);
    }

    #[test]
    fn test_set_address_macos_sequence() {
        let config = GatewayConfig {
            airport_path: "airport".to_string(),
            ..no_sudo()
        };
        let runner = FakeRunner::replying(vec![
            Ok(CommandOutput::failed("not a wireless interface")),
            Ok(CommandOutput::ok("")),
        ]);
        let gateway = OsGateway::with_runner(Platform::MacOs, config, runner);

        gateway.set_address("en0", &mac()).unwrap();
        assert_eq!(
            gateway.runner.calls(),
            vec!["airport -z", "ifconfig en0 ether 02:1a:3c:4d:5e:6f"]
        );
    }

    #[test]
    fn test_set_address_macos_missing_airport_is_ignored() {
        let config = GatewayConfig {
            airport_path: "airport".to_string(),
            ..no_sudo()
        };
        let runner = FakeRunner::replying(vec![
            Err(Error::UtilityMissing("airport".to_string())),
            Ok(CommandOutput::ok("")),
        ]);
        let gateway = OsGateway::with_runner(Platform::MacOs, config, runner);

        assert!(gateway.set_address("en0", &mac()).is_ok());
    }

    #[test]
    fn test_set_address_macos_keep_association() {
        let config = GatewayConfig {
            disassociate_wifi: false,
            ..no_sudo()
        };
        let gateway = OsGateway::with_runner(Platform::MacOs, config, FakeRunner::default());

        gateway.set_address("en1", &mac()).unwrap();
        assert_eq!(
            gateway.runner.calls(),
            vec!["ifconfig en1 ether 02:1a:3c:4d:5e:6f"]
        );
    }

    #[test]
    fn test_sudo_prefix() {
        let gateway = OsGateway::with_runner(
            Platform::Linux,
            GatewayConfig::default(),
            FakeRunner::default(),
        )
        .with_root(false);
        gateway.set_address("eth0", &mac()).unwrap();

        assert_eq!(
            gateway.runner.calls(),
            vec![
                "sudo ip link set eth0 down",
                "sudo ip link set eth0 address 02:1a:3c:4d:5e:6f",
                "sudo ip link set eth0 up",
            ]
        );
    }

    #[test]
    fn test_sudo_prefix_macos() {
        let config = GatewayConfig {
            airport_path: "airport".to_string(),
            ..GatewayConfig::default()
        };
        let gateway = OsGateway::with_runner(Platform::MacOs, config, FakeRunner::default())
            .with_root(false);
        gateway.set_address("en0", &mac()).unwrap();

        assert_eq!(
            gateway.runner.calls(),
            vec!["sudo airport -z", "sudo ifconfig en0 ether 02:1a:3c:4d:5e:6f"]
        );
    }

    #[test]
    fn test_root_skips_sudo() {
        let gateway = OsGateway::with_runner(
            Platform::Linux,
            GatewayConfig::default(),
            FakeRunner::default(),
        )
        .with_root(true);
        gateway.set_address("eth0", &mac()).unwrap();

        assert!(gateway
            .runner
            .calls()
            .iter()
            .all(|c| c.starts_with("ip link set eth0 ")));
    }

    #[test]
    fn test_root_detected_at_construction() {
        let gateway =
            OsGateway::with_runner(Platform::Linux, GatewayConfig::default(), FakeRunner::default());
        assert_eq!(gateway.as_root, running_as_root());
    }

    #[test]
    fn test_queries_never_use_sudo() {
        let gateway = OsGateway::with_runner(
            Platform::Linux,
            GatewayConfig::default(),
            FakeRunner::replying(vec![Ok(CommandOutput::ok(IP_LINK_SHOW))]),
        )
        .with_root(false);
        gateway.enumerate_interfaces().unwrap();
        let _ = gateway.read_current_address("eth0");

        assert_eq!(gateway.runner.calls(), vec!["ip link show", "ip link show eth0"]);
    }

    #[test]
    fn test_enumerate_linux() {
        let gateway = OsGateway::with_runner(
            Platform::Linux,
            no_sudo(),
            FakeRunner::replying(vec![Ok(CommandOutput::ok(IP_LINK_SHOW))]),
        );
        assert_eq!(
            gateway.enumerate_interfaces().unwrap(),
            vec!["lo", "eth0", "wlan0", "veth1a2b"]
        );
    }

    #[test]
    fn test_enumerate_macos() {
        let gateway = OsGateway::with_runner(
            Platform::MacOs,
            no_sudo(),
            FakeRunner::replying(vec![Ok(CommandOutput::ok("lo0 gif0 stf0 en0 en1 bridge0\n"))]),
        );
        assert_eq!(
            gateway.enumerate_interfaces().unwrap(),
            vec!["lo0", "gif0", "stf0", "en0", "en1", "bridge0"]
        );
    }

    #[test]
    fn test_enumerate_failure() {
        let gateway = OsGateway::with_runner(
            Platform::Linux,
            no_sudo(),
            FakeRunner::replying(vec![Ok(CommandOutput::failed("boom"))]),
        );
        assert!(matches!(
            gateway.enumerate_interfaces(),
            Err(Error::CommandFailed { .. })
        ));
    }
}
