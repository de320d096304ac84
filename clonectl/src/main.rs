//! `clonectl`: inspect, generate and save app-clone profiles.

#[macro_use]
extern crate log;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use crate::{
    config::{CONFIG_FILE, CliConfig},
    ctx::{AppContext, SaveOptions},
};

mod config;
mod ctx;

#[derive(Parser)]
#[command(name = "clonectl")]
#[command(about = "Edit Android app-clone profiles from the command line")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories and settings of a profile
    Show {
        /// Profile to read (defaults to the built-in sample)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },

    /// Print the flat configuration map as JSON
    Export {
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },

    /// Print a generated value for a setting key
    #[command(after_help = "\
Examples:
  clonectl generate changeImei
  clonectl generate changeWifiMacAddress --seed 7")]
    Generate {
        /// Setting key, e.g. changeAndroidId
        key: String,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a random on-land location
    Location {
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List device profiles, or show the details of one
    Profiles {
        name: Option<String>,
    },

    /// Print the effective configuration
    Config,

    /// Load a profile, apply changes and save it
    #[command(after_help = "\
Examples:
  clonectl save -i profile.json --package com.example.app --out out
  clonectl save --randomize changeImei --randomize changeAndroidId --random-location
  clonectl save --profile \"Google Pixel 7a\"")]
    Save {
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Package name the saved file is named after
        #[arg(long, short = 'p')]
        package: Option<String>,

        /// Output directory
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Setting keys to give new random values. Repeatable.
        #[arg(long, value_name = "KEY")]
        randomize: Vec<String>,

        /// Device profile to write into the build properties
        #[arg(long)]
        profile: Option<String>,

        /// Pick a new spoofed location
        #[arg(long)]
        random_location: bool,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = CliConfig::load(&cli.config)?;
    let ctx = AppContext::new(config);

    match cli.command {
        Commands::Show { input } => ctx.show(input.as_deref()),
        Commands::Export { input } => ctx.export(input.as_deref())?,
        Commands::Generate { key, seed } => ctx.generate(&key, seed),
        Commands::Location { seed } => ctx.location(seed),
        Commands::Profiles { name } => ctx.list_profiles(name.as_deref())?,
        Commands::Config => ctx.show_config()?,
        Commands::Save {
            input,
            package,
            out,
            randomize,
            profile,
            random_location,
            seed,
        } => {
            let saved = ctx.save(SaveOptions {
                input,
                package,
                out,
                randomize,
                profile,
                random_location,
                seed,
            })?;
            if !saved {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:?}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
