//! Interface gateway for macshift
//!
//! This crate talks to the operating system on behalf of the orchestrator. It
//! never touches sockets or kernel APIs directly: every read and write goes
//! through the platform utilities (`ip` on Linux, `ifconfig` on macOS).
//!
//! ## Example
//!
//! ```no_run
//! use macshift_iface::{GatewayConfig, InterfaceGateway, OsGateway};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = OsGateway::detect(GatewayConfig::default())?;
//!
//! for name in gateway.enumerate_interfaces()? {
//!     println!("{name}: {:?}", gateway.current_address(&name));
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod gateway;
pub mod platform;

// Re-export main types
pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use gateway::{GatewayConfig, InterfaceGateway, OsGateway, AIRPORT_PATH};
pub use platform::Platform;
