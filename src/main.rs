use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use cometblue::{BluestTransport, Mode, ThermostatSession};

/// Talk to a Eurotronic Comet Blue (Sygonix, Xavax) BLE thermostat.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Advertised name of the thermostat
    #[arg(long, default_value = BluestTransport::DEVICE_NAME)]
    name: String,

    /// PIN configured on the device (factory default is 0)
    #[arg(long, default_value_t = 0)]
    pin: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print readings, status flags and identification (the default)
    Status,
    /// Set the target temperature in °C
    SetTarget { degrees: f32 },
    /// Set the calibration offset in °C
    SetOffset {
        #[arg(allow_negative_numbers = true)]
        degrees: f32,
    },
    /// Set the operating mode
    SetMode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Lock or unlock the buttons on the device
    SetChildlock {
        #[arg(value_parser = clap::builder::BoolishValueParser::new())]
        locked: bool,
    },
    /// Set the device clock to the current local time
    SyncClock,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Auto,
    Manual,
    Off,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => Mode::Auto,
            ModeArg::Manual => Mode::Manual,
            ModeArg::Off => Mode::Off,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut session = ThermostatSession::connect(&args.name, args.pin).await?;
    let result = run(&mut session, args.command.unwrap_or(Command::Status)).await;
    session.close().await;
    result
}

async fn run(
    session: &mut ThermostatSession<BluestTransport>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Status => {
            let identification = session.get_identification().await?;
            let temperatures = session.get_temperatures().await?;
            let status = session.get_device_status().await?;
            let battery = session.get_battery_level().await?;
            let mode = session.get_mode().await?;
            let clock = session.get_datetime().await?;

            println!(
                "{} {} (firmware {}, software {})",
                identification.manufacturer,
                identification.model,
                identification.firmware_revision,
                identification.software_revision
            );
            println!("mode:     {mode:?}");
            println!(
                "ambient:  {:.1}°C (offset {:+.1}°C)",
                temperatures.ambient_temperature(),
                temperatures.offset_temperature
            );
            println!("target:   {:.1}°C", temperatures.target_temperature);
            println!(
                "schedule: {:.1}°C / {:.1}°C",
                temperatures.target_temperature_low, temperatures.target_temperature_high
            );
            println!("battery:  {battery}%");
            println!("clock:    {clock}");
            println!(
                "flags:    childlock={} low_battery={} window_open={} satisfied={}",
                status.childlock, status.low_battery, status.window_open, status.satisfied
            );
        }
        Command::SetTarget { degrees } => {
            session.set_target_temperature(degrees).await?;
            println!("target temperature set to {degrees:.1}°C");
        }
        Command::SetOffset { degrees } => {
            session.set_offset_temperature(degrees).await?;
            println!("offset temperature set to {degrees:+.1}°C");
        }
        Command::SetMode { mode } => {
            session.set_mode(mode.into()).await?;
            println!("mode set to {mode:?}");
        }
        Command::SetChildlock { locked } => {
            session.set_childlock(locked).await?;
            println!("childlock {}", if locked { "enabled" } else { "disabled" });
        }
        Command::SyncClock => {
            let now = chrono::Local::now().naive_local();
            session.set_datetime(now).await?;
            println!("device clock set to {now}");
        }
    }
    Ok(())
}
