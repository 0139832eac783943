//! Orchestration of a single invocation
//!
//! `run` sequences the gateway calls for the parsed flags and reports
//! progress on the console. Informational modes (`--list`, `--show`) report
//! their own failures and still succeed; every other failure is returned to
//! the caller, which renders it with [`report_error`].

use clap::CommandFactory;
use macshift_core::{generate, Error, MacAddr, Result};
use macshift_iface::InterfaceGateway;
use std::io::{self, Write};
use tracing::{debug, warn};

use crate::args::Cli;
use crate::console::Console;

/// Run the tool for `cli` against `gateway`
pub fn run<G, W>(cli: &Cli, gateway: &G, console: &mut Console<W>) -> Result<()>
where
    G: InterfaceGateway,
    W: Write,
{
    console.banner()?;

    if cli.list {
        return list_interfaces(gateway, console);
    }

    let Some(interface) = cli.interface.as_deref() else {
        console.line(&Cli::command().render_help().to_string())?;
        return Err(Error::missing_argument(
            "Please specify a network interface with -i/--interface",
        ));
    };

    if cli.show {
        return show_address(gateway, console, interface);
    }

    let old_mac = gateway
        .current_address(interface)?
        .ok_or_else(|| Error::AddressNotFound(interface.to_string()))?;
    console.info(&format!("Current MAC address: {old_mac}"))?;

    let new_mac = if cli.random {
        let mac = generate();
        console.info(&format!("Generated random MAC: {mac}"))?;
        mac
    } else if let Some(text) = cli.mac.as_deref() {
        text.parse::<MacAddr>()?
    } else {
        return Err(Error::missing_argument(
            "Please specify either -m/--mac or -r/--random",
        ));
    };

    if new_mac == old_mac {
        console.warning(&format!("{interface} already uses {new_mac}"))?;
    }

    console.info(&format!("Changing MAC address for {interface} to {new_mac}"))?;
    gateway.set_address(interface, &new_mac)?;

    verify_change(gateway, console, interface, new_mac)
}

/// Print every interface with its current address
fn list_interfaces<G, W>(gateway: &G, console: &mut Console<W>) -> Result<()>
where
    G: InterfaceGateway,
    W: Write,
{
    console.info("Available network interfaces:")?;

    let names = match gateway.enumerate_interfaces() {
        Ok(names) => names,
        Err(e) => {
            console.error(&format!("Error listing interfaces: {e}"))?;
            return Ok(());
        }
    };

    for name in names {
        let mac = match gateway.current_address(&name) {
            Ok(Some(mac)) => mac.to_string(),
            Ok(None) => "N/A".to_string(),
            Err(e) => {
                debug!(interface = %name, error = %e, "Address query failed");
                "N/A".to_string()
            }
        };
        console.line(&format!("  • {name:<15} MAC: {mac}"))?;
    }

    Ok(())
}

fn show_address<G, W>(gateway: &G, console: &mut Console<W>, interface: &str) -> Result<()>
where
    G: InterfaceGateway,
    W: Write,
{
    match gateway.current_address(interface) {
        Ok(Some(mac)) => console.info(&format!("Current MAC address for {interface}: {mac}"))?,
        Ok(None) => console.error(&Error::AddressNotFound(interface.to_string()).to_string())?,
        Err(e) => console.error(&e.to_string())?,
    }
    Ok(())
}

/// Re-read the address and compare it by value with the requested one
fn verify_change<G, W>(
    gateway: &G,
    console: &mut Console<W>,
    interface: &str,
    expected: MacAddr,
) -> Result<()>
where
    G: InterfaceGateway,
    W: Write,
{
    let actual = match gateway.current_address(interface) {
        Ok(actual) => actual,
        Err(e) => {
            warn!(interface, error = %e, "Could not read address back");
            None
        }
    };

    match actual {
        Some(mac) if mac == expected => {
            console.success(&format!("MAC address successfully changed to {mac}"))?;
            Ok(())
        }
        other => Err(Error::VerificationFailed {
            expected: expected.to_string(),
            actual: other.map_or_else(|| "N/A".to_string(), |mac| mac.to_string()),
        }),
    }
}

/// Render a failure returned by [`run`]
pub fn report_error<W: Write>(console: &mut Console<W>, error: &Error) -> io::Result<()> {
    console.error(&error.to_string())?;
    if error.is_privilege_related() {
        console.warning("Make sure you have sudo privileges.")?;
    }
    Ok(())
}
