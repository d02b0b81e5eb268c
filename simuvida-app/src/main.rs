use anyhow::Result;
use clap::{Parser, Subcommand};
use simuvida_schemas::decision::{EndOfLifeAction, UsagePeriod};
use simuvida_schemas::device::DeviceKind;

mod config;
mod plotting;
mod report;
mod workflow;

#[derive(Parser)]
#[command(
    name = "simuvida",
    about = "Educational lifecycle simulator for consumer electronics",
    version
)]
struct Cli {
    /// Data directory holding the catalog, the registries, and run outputs.
    #[arg(long, default_value = "./data")]
    data_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Grants the admin role when it matches the configured code.
        #[arg(long)]
        admin_code: Option<String>,
    },
    /// Sign in with an existing account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out.
    Logout,
    /// Register a device for the signed-in account.
    AddDevice {
        /// Device kind: telefono | laptop.
        #[arg(long)]
        kind: DeviceKind,
        #[arg(long)]
        model: String,
        /// Manufacture year; omit when unknown.
        #[arg(long)]
        year: Option<i32>,
        /// Free-text materials description, informational only.
        #[arg(long)]
        materials: Option<String>,
    },
    /// List devices (yours, or everyone's with --all as admin).
    Devices {
        #[arg(long)]
        kind: Option<DeviceKind>,
        #[arg(long)]
        all: bool,
    },
    /// Delete one of your devices and its recorded decisions.
    RemoveDevice { id: String },
    /// Walk a registered device through the five lifecycle stages.
    Simulate {
        id: String,
        /// Planned usage: "1 año" | "2 años" | "3+ años", or a year count.
        #[arg(long)]
        years: Option<UsagePeriod>,
        /// Disposition: desechar | donar | reparar | reciclar.
        #[arg(long)]
        end_of_life: Option<EndOfLifeAction>,
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// Run the walkthrough over a predefined demo device.
    Demo {
        /// Device kind: telefono | laptop.
        kind: DeviceKind,
        #[arg(long)]
        years: Option<UsagePeriod>,
        #[arg(long)]
        end_of_life: Option<EndOfLifeAction>,
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// Admin dashboard: aggregate counts and their charts.
    Stats {
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// Re-export the certificate for a device from its recorded decisions.
    Report {
        id: String,
        #[arg(long)]
        output_dir: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    println!("--- SimuVida ---");

    let mut store = config::DataStore::open(&cli.data_dir)?;
    let user = config::resolve_current_user(&store.root, &store.accounts);

    match cli.command {
        Command::Register {
            name,
            email,
            password,
            admin_code,
        } => workflow::run_register(&mut store, &name, &email, &password, admin_code.as_deref()),
        Command::Login { email, password } => workflow::run_login(&store, &email, &password),
        Command::Logout => workflow::run_logout(&store),
        Command::AddDevice {
            kind,
            model,
            year,
            materials,
        } => workflow::run_add_device(&mut store, &user, kind, &model, year, materials),
        Command::Devices { kind, all } => workflow::run_list_devices(&store, &user, kind, all),
        Command::RemoveDevice { id } => workflow::run_remove_device(&mut store, &user, &id),
        Command::Simulate {
            id,
            years,
            end_of_life,
            output_dir,
        } => workflow::run_simulation(&mut store, &user, &id, years, end_of_life, output_dir),
        Command::Demo {
            kind,
            years,
            end_of_life,
            output_dir,
        } => workflow::run_demo(&store, &user, kind, years, end_of_life, output_dir),
        Command::Stats { output_dir } => workflow::run_stats(&store, &user, output_dir),
        Command::Report { id, output_dir } => {
            workflow::run_report(&store, &user, &id, output_dir)
        }
    }
}
