mod api;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod models;
mod resources;
mod session;
mod tax;
mod ui;

use crate::api::{ApiClient, auth};
use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::models::TipoTributario;
use crate::resources::ModuleKey;
use crate::session::{download_report, list_module, resumen_table, run_tui_mode, setup_session};
use clap::{ArgAction, Parser, Subcommand};
use comfy_table::{Attribute, Cell, Table};
use rust_decimal::Decimal;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal client for the ContaDesk tax and bookkeeping backend
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long, short, value_name = "USERNAME", required_unless_present = "token")]
        username: Option<String>,

        #[arg(long, short, value_name = "PASSWORD", requires = "username")]
        password: Option<String>,

        /// Store an existing bearer token instead of signing in
        #[arg(long, value_name = "TOKEN", conflicts_with = "username")]
        token: Option<String>,

        /// Backend to use: local, production or a base URL
        #[arg(long, value_name = "ENV", value_parser = parse_environment)]
        env: Option<Environment>,
    },
    /// Clear the stored session
    Logout,
    /// Show who the stored session belongs to
    Whoami,
    /// Open the interactive shell
    Start {
        /// Paint the dashboard background
        #[arg(long = "with-background", action = ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Print one page of a module's list
    List {
        /// Module key, e.g. ingresos, mis-clientes, alertas
        #[arg(value_parser = parse_module)]
        module: ModuleKey,

        #[arg(long, short, default_value = "")]
        search: String,

        /// 1-based page of five rows
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },
    /// Print the monthly tax summary and save its PDF
    Report {
        #[arg(long)]
        anio: Option<i32>,

        #[arg(long)]
        mes: Option<u32>,

        /// Where to write the PDF; defaults to ~/contadesk-reportes/reporte-AAAA-MM.pdf
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Compute the IGV of an amount
    Igv {
        #[arg(long)]
        monto: String,

        #[arg(long, default_value = "GRAVADA", value_parser = parse_tipo)]
        tipo: TipoTributario,
    },
}

fn parse_environment(s: &str) -> Result<Environment, String> {
    s.parse()
        .map_err(|_| format!("entorno desconocido: {} (local, production o una URL)", s))
}

fn parse_module(s: &str) -> Result<ModuleKey, String> {
    s.parse().map_err(|_| format!("módulo desconocido: {}", s))
}

fn parse_tipo(s: &str) -> Result<TipoTributario, String> {
    s.to_uppercase()
        .parse()
        .map_err(|_| format!("tipo tributario desconocido: {}", s))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args.command).await {
        print_cmd_error!("No se pudo completar la orden", e.to_string().as_str());
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    match command {
        Command::Login {
            username,
            password,
            token,
            env,
        } => {
            logging::init_console_logger();
            let environment = env.unwrap_or_else(Environment::from_env);
            let token = match (token, username) {
                (Some(token), _) => token,
                (None, Some(username)) => {
                    let password = match password {
                        Some(password) => password,
                        None => std::env::var("CONTADESK_PASSWORD")
                            .map_err(|_| "Falta --password o CONTADESK_PASSWORD")?,
                    };
                    let client = ApiClient::new(environment.clone())?;
                    auth::login(&client, &username, &password)
                        .await
                        .map_err(|e| e.user_message())?
                }
                (None, None) => return Err("Indique --username o --token".into()),
            };
            let client = ApiClient::with_token(environment.clone(), token.clone())?;
            let profile = auth::me(&client).await.map_err(|e| e.user_message())?;
            let username = profile.username.clone();
            let rol = profile.rol;
            Config::new(token, environment, Some(profile))
                .save(&config_path)
                .map_err(|e| format!("No se pudo guardar la sesión: {}", e))?;
            print_cmd_success!("Sesión iniciada", "{} ({})", username, rol);
            Ok(())
        }
        Command::Logout => {
            print_cmd_info!("Cerrando sesión", "{}", config_path.display());
            Config::clear_session(&config_path).map_err(Into::into)
        }
        Command::Whoami => {
            let config = load_config(&config_path)?;
            match &config.profile {
                Some(profile) => print_cmd_info!(
                    "Sesión",
                    "{} · {} · {}",
                    profile.username,
                    profile.rol,
                    config.environment
                ),
                None => print_cmd_warn!(
                    "Sesión sin perfil",
                    "se consultará al iniciar ({})",
                    config.environment
                ),
            }
            Ok(())
        }
        Command::Start { with_background } => {
            let config = load_config(&config_path)?;
            let data = setup_session(config).await?;
            run_tui_mode(data, with_background).await
        }
        Command::List {
            module,
            search,
            page,
        } => {
            logging::init_console_logger();
            let config = load_config(&config_path)?;
            let data = setup_session(config).await?;
            let listing = list_module(&data.session, module, &search, page).await?;
            println!("{}", listing.to_table());
            println!("{}", listing.footer());
            Ok(())
        }
        Command::Report { anio, mes, output } => {
            logging::init_console_logger();
            let config = load_config(&config_path)?;
            let data = setup_session(config).await?;
            let ctx = &data.session.ctx;
            let (anio, mes) = (anio.unwrap_or(ctx.anio()), mes.unwrap_or(ctx.mes()));
            if !(1..=12).contains(&mes) {
                return Err(format!("Mes fuera de rango: {}", mes).into());
            }
            let (resumen, path) = download_report(&data.session, anio, mes, output).await?;
            println!("{}", resumen_table(&resumen));
            print_cmd_success!("Reporte guardado", "{}", path.display());
            Ok(())
        }
        Command::Igv { monto, tipo } => {
            let base: Decimal = monto
                .trim()
                .parse()
                .map_err(|_| format!("Monto inválido: {}", monto))?;
            println!("{}", igv_table(base, tipo));
            Ok(())
        }
    }
}

fn load_config(path: &std::path::Path) -> Result<Config, Box<dyn Error>> {
    if !path.exists() {
        return Err("No hay sesión guardada. Ejecute `contadesk login` primero.".into());
    }
    Config::load_from_file(path)
        .map_err(|e| format!("No se pudo leer {}: {}", path.display(), e).into())
}

fn igv_table(base: Decimal, tipo: TipoTributario) -> Table {
    let igv = tax::derive_igv(base, Some(tipo));
    let base = tax::round_money(base);
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Tipo").add_attribute(Attribute::Bold),
        Cell::new("Base").add_attribute(Attribute::Bold),
        Cell::new("IGV").add_attribute(Attribute::Bold),
        Cell::new("Total").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(tipo),
        Cell::new(base),
        Cell::new(igv),
        Cell::new(base + igv),
    ]);
    table
}
