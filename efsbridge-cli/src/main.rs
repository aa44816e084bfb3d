//! EFS Bridge CLI - development peer for the bridge.
//!
//! Stands in for the external flight-strip client on the loopback channels:
//! `listen` prints outbound events as they arrive, `send` injects one inbound
//! command, and `simulate` drives a fake host session end to end.

use std::net::{SocketAddr, UdpSocket};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use efsbridge::bridge::Bridge;
use efsbridge::config::BridgeSettings;
use efsbridge::host::fake::FakeHost;
use efsbridge::host::{ConnectionType, ControllerSnapshot, FlightPlanSnapshot, HostText};
use efsbridge::protocol::InboundCommand;

#[derive(Parser)]
#[command(name = "efsbridge")]
#[command(about = "Development peer for the EFS bridge", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for outbound events and print them, one JSON object per line
    Listen {
        /// Address to listen on
        #[arg(long, default_value = efsbridge::config::DEFAULT_OUTBOUND_ADDR)]
        addr: SocketAddr,
    },
    /// Send one inbound command datagram to a running bridge
    Send {
        /// Destination address
        #[arg(long, default_value = efsbridge::config::DEFAULT_INBOUND_ADDR)]
        addr: SocketAddr,
        /// The command as a JSON object, e.g. '{"type":"assume","callsign":"SAS123"}'
        json: String,
    },
    /// Run a bridge over a fake host session for a few timer ticks
    Simulate {
        /// Number of timer ticks to run
        #[arg(long, default_value = "20")]
        ticks: u64,
        /// Seconds between ticks
        #[arg(long, default_value = "1")]
        interval: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Listen { addr } => listen(addr),
        Command::Send { addr, json } => send(addr, &json),
        Command::Simulate { ticks, interval } => simulate(ticks, interval),
    }
}

fn listen(addr: SocketAddr) {
    let socket = match UdpSocket::bind(addr) {
        Ok(socket) => socket,
        Err(e) => {
            eprintln!("Error binding {addr}: {e}");
            process::exit(1);
        }
    };
    eprintln!("Listening on {addr}");

    let mut buf = [0u8; 4096];
    loop {
        match socket.recv_from(&mut buf) {
            Ok((len, _)) => {
                let payload = String::from_utf8_lossy(&buf[..len]);
                print!("{}", payload);
                if !payload.ends_with('\n') {
                    println!();
                }
            }
            Err(e) => {
                eprintln!("Receive error: {e}");
                process::exit(1);
            }
        }
    }
}

fn send(addr: SocketAddr, json: &str) {
    // Validate before sending so typos are caught here, not dropped by the
    // bridge's parse error path.
    if let Err(e) = InboundCommand::parse(json.as_bytes()) {
        eprintln!("Error: not a valid command: {e}");
        process::exit(1);
    }

    let socket = match UdpSocket::bind("127.0.0.1:0") {
        Ok(socket) => socket,
        Err(e) => {
            eprintln!("Error binding send socket: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = socket.send_to(json.as_bytes(), addr) {
        eprintln!("Error sending to {addr}: {e}");
        process::exit(1);
    }
    println!("Sent to {addr}");
}

fn simulate(ticks: u64, interval: u64) {
    let settings = match BridgeSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {e}");
            process::exit(1);
        }
    };

    let mut host = FakeHost::with_connection(ConnectionType::Direct);
    host.myself = Some(ControllerSnapshot {
        callsign: HostText::from("ESSA_TWR"),
        full_name: HostText::from("Development Session"),
        primary_frequency: 118.5,
        is_controller: true,
        ..Default::default()
    });
    host.insert_plan(FlightPlanSnapshot {
        callsign: HostText::from("SAS123"),
        is_valid: true,
        data_received: true,
        origin: HostText::from("ESSA"),
        destination: HostText::from("EKCH"),
        route: HostText::from("N0450F350 DCT ARS"),
        ..Default::default()
    });

    let mut bridge = Bridge::new(host, settings);
    eprintln!("Simulating {ticks} ticks, {interval}s apart (Ctrl-C to stop)");
    for counter in 1..=ticks {
        bridge.on_timer(counter);
        if counter == 1 {
            bridge.refresh();
        }
        std::thread::sleep(Duration::from_secs(interval));
    }
}
