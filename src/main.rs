use clap::{Parser, Subcommand};
use color_eyre::Result;
use env_logger::Env;
use log::{info, LevelFilter};
use std::path::PathBuf;

use netsim::analysis::{generate_json_report, generate_text_report, render_text_report};
use netsim::config_loader::{self, CliOverrides};
use netsim::orchestrator::{self, NO_TOPOLOGY};
use netsim::validation::validate_topology;

/// Build, validate, analyze and simulate a network from its config dumps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding device config dumps
    #[arg(long = "configs")]
    config_dir: Option<PathBuf>,

    /// Explicit link file (defaults to <configs>/links.txt)
    #[arg(long)]
    links: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the topology and list its devices and links
    Build,
    /// Run the structural checks
    Validate,
    /// Bandwidth and resiliency analysis
    Analyze {
        /// Demand per ordered device pair in Mbps
        #[arg(long)]
        demand: Option<f64>,
        /// Write a JSON report here
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write a text report here
        #[arg(long)]
        text: Option<PathBuf>,
    },
    /// Run the Day-1 bring-up simulation
    Simulate {
        /// Run length, e.g. "5s" or "500ms"
        #[arg(long)]
        duration: Option<String>,
        /// Also exchange ARP requests
        #[arg(long)]
        arp_requests: bool,
    },
    /// Take a link down and check for partitions
    FailLink {
        /// Link key in the form NODE1-NODE2
        link: String,
    },
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            config_dir: self.config_dir.clone(),
            links_file: self.links.clone(),
            log_level: self.log_level.clone(),
            ..CliOverrides::default()
        };
        match &self.command {
            Command::Analyze { demand, .. } => overrides.demand_per_pair_mbps = *demand,
            Command::Simulate { duration, arp_requests } => {
                overrides.duration = duration.clone();
                overrides.arp_requests = *arp_requests;
            }
            _ => {}
        }
        overrides
    }
}

/// Unknown level names fall back to info
fn level_filter(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // The logger is live before the config file is read; RUST_LOG, when
    // set, fixes the level for the whole run.
    let level_from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
    if !level_from_env {
        log::set_max_level(level_filter(args.log_level.as_deref().unwrap_or("info")));
    }

    let mut config = config_loader::load_or_default(args.config.as_deref())?;
    config_loader::apply_overrides(&mut config, &args.overrides())?;
    if !level_from_env {
        log::set_max_level(level_filter(&config.general.log_level));
    }

    info!("Starting netsim");
    info!("Config directory: {:?}", config.inputs.config_dir);

    let mut graph = orchestrator::build_from_config(&config);
    if graph.node_count() == 0 {
        println!("{}", NO_TOPOLOGY);
        return Ok(());
    }

    match &args.command {
        Command::Build => {
            println!("Devices ({}):", graph.node_count());
            for device in graph.devices() {
                println!("  {} ({} interfaces)", device.hostname, device.interface_count());
            }
            println!("Links ({}):", graph.link_count());
            for link in graph.links() {
                println!(
                    "  {:<24} {:<9} mtu={} bw={}Mbps [{}]",
                    link.key(),
                    link.source().to_string(),
                    link.mtu(),
                    link.bandwidth_mbps(),
                    link.ifaces().join(", ")
                );
            }
        }
        Command::Validate => {
            let issues = validate_topology(&graph);
            if issues.is_empty() {
                println!("No issues found");
            }
            for issue in &issues {
                println!("{}", issue);
            }
        }
        Command::Analyze { json, text, .. } => {
            let report = orchestrator::analyze_topology(&graph, &config);
            println!("{}", render_text_report(&report));
            if let Some(path) = json {
                generate_json_report(&report, path)?;
            }
            if let Some(path) = text {
                generate_text_report(&report, path)?;
            }
        }
        Command::Simulate { .. } => {
            let run = orchestrator::simulate(&graph, &config)?;
            println!("{}", run.text());
        }
        Command::FailLink { link } => {
            let outcome = orchestrator::fail_link_in(&mut graph, link);
            println!("{}", outcome.text());
        }
    }

    info!("Done");
    Ok(())
}
