//! # Agora Binary
//!
//! Assembles engine, HTTP server, simulator and client from configuration.

use ag_api::AppState;
use ag_client::CommunityClient;
use ag_core::CommunityService;
use ag_engine::CommunityEngine;
use ag_sim::Simulator;
use anyhow::Context;
use clap::{Parser, Subcommand};
use configs::{AppConfig, LogConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Agora community engine
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file. Defaults to ./agora.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve HTTP and run the configured simulation against the same engine (default)
    Run,
    /// Serve HTTP only
    Serve,
    /// Drive a running server through a short scripted scenario
    Client {
        #[arg(long, default_value = "http://localhost:8080")]
        base_url: String,
    },
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl-C");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = configs::load(args.config.as_deref())?;
    init_tracing(&config.log);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(config, true).await,
        Command::Serve => run(config, false).await,
        Command::Client { base_url } => client_scenario(&base_url).await,
    }
}

async fn run(config: AppConfig, simulate: bool) -> anyhow::Result<()> {
    let (engine, engine_task) = CommunityEngine::spawn(&config.engine);
    let service: Arc<dyn CommunityService> = Arc::new(engine.clone());

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(ag_api::serve(
        listener,
        AppState::new(service.clone()),
        async move {
            let _ = stop_rx.await;
        },
    ));

    if simulate {
        let sim = config.simulation.clone();
        let mut simulator = Simulator::new(service.clone(), sim.clone());
        info!(
            members = sim.members,
            communities = sim.communities,
            threads = sim.threads,
            duration_secs = sim.duration_secs,
            seed = ?sim.seed,
            "starting community simulation"
        );
        let finished = tokio::select! {
            _ = simulator.run_simulation(sim.members, sim.communities, sim.threads, sim.duration()) => true,
            _ = shutdown_signal() => {
                info!("interrupt received, stopping simulation");
                false
            }
        };
        println!("\n{}", simulator.report());
        if finished {
            info!("simulation finished; still serving HTTP until Ctrl-C");
            shutdown_signal().await;
        }
    } else {
        shutdown_signal().await;
    }

    info!("shutting down HTTP server");
    let _ = stop_tx.send(());
    server.await.context("HTTP server task panicked")??;

    info!("shutting down the community engine");
    engine.shutdown().await;
    drop(service);
    drop(engine);
    let store = engine_task.await.context("engine task panicked")?;
    info!(stats = ?store.stats(), "community engine shut down");
    Ok(())
}

async fn client_scenario(base_url: &str) -> anyhow::Result<()> {
    let client = CommunityClient::new(base_url);

    let member = client.register_member("test_user", "password123").await?;
    let community = client
        .create_community("test_community", "A test community description.", Some(member))
        .await?;
    let thread = client
        .create_thread(
            "Welcome Thread",
            "Welcome to the community!",
            member,
            &community,
        )
        .await?;
    let reply = client
        .create_reply("Thanks for the welcome!", member, thread, None)
        .await?;
    let tally = client.cast_vote(member, thread, true).await?;

    info!(%member, %community, %thread, %reply, upvotes = tally.upvotes, "client scenario completed");
    Ok(())
}
