// src/main.rs

use bevy::{
    log::LogPlugin,
    prelude::*,
    window::WindowPlugin,
    winit::{UpdateMode, WinitSettings},
};
use bevy_egui::EguiPlugin;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;

use hunch_admin::api::{ApiClient, PlatformStore, TipsStore};
use hunch_admin::cli::{self, Cli, CliError, Commands};
use hunch_admin::settings::{io::load_settings, AdminConfig};
use hunch_admin::ui::{ApiHandle, ConsoleUiPlugin};

fn main() -> ExitCode {
    let args = Cli::parse();

    let result = match &args.command {
        Some(Commands::RenderSchema { path }) => cli::render_schema::run(path, args.debug),
        Some(Commands::Ping) => load_config(&args).and_then(|config| cli::ping::run(&config)),
        None => load_config(&args).and_then(run_console),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Cli) -> Result<AdminConfig, CliError> {
    Ok(AdminConfig::from_env(args.server.as_deref(), args.token.as_deref(), args.debug)?)
}

fn run_console(config: AdminConfig) -> Result<(), CliError> {
    let client = ApiClient::new(&config.server_address, &config.token)?;
    let settings = load_settings().unwrap_or_else(|e| {
        eprintln!("Console settings unreadable ({}); using defaults.", e);
        Default::default()
    });

    App::new()
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::Continuous,
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_secs_f32(1.0 / 5.0)),
        })
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Hunch Club Admin".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: if config.debug {
                        bevy::log::Level::DEBUG
                    } else {
                        bevy::log::Level::INFO
                    },
                    filter: "wgpu=error,naga=warn,reqwest=warn,hyper=warn".to_string(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        })
        .insert_resource(PlatformStore::new(config.debug))
        .insert_resource(TipsStore::new(config.debug))
        .insert_resource(ApiHandle(Box::new(client)))
        .insert_resource(settings)
        .insert_resource(config)
        .add_plugins(ConsoleUiPlugin)
        .run();
    Ok(())
}
