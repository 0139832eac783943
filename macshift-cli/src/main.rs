use crossterm::tty::IsTty;
use macshift_cli::{format_status, parse_error_exit_code, report_error, run, Cli, Console, Status};
use macshift_cli::{EXIT_FAILURE, INTERRUPT_EXIT_CODE};
use macshift_iface::OsGateway;
use std::io;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            if let Err(print_err) = e.print() {
                eprintln!("macshift: could not print usage: {print_err}");
            }
            return ExitCode::from(parse_error_exit_code(&e));
        }
    };

    init_tracing(&cli);

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_tty();

    if let Err(e) = ctrlc::set_handler(move || {
        println!(
            "\n{}",
            format_status(Status::Warning, "Operation cancelled by user.", color)
        );
        std::process::exit(INTERRUPT_EXIT_CODE);
    }) {
        warn!(error = %e, "Could not install Ctrl-C handler");
    }

    let mut console = Console::new(io::stdout(), color);
    let result = OsGateway::detect(cli.gateway_config())
        .and_then(|gateway| run(&cli, &gateway, &mut console));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Err(write_err) = report_error(&mut console, &e) {
                warn!(error = %write_err, "Could not write error report");
            }
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
