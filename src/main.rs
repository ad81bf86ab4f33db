//! `bfd-load` binary: runs the V1 regression scenario.
//!
//! Requests go through [`DryRunClient`], which logs each request instead of
//! sending it, so a run exercises task selection, data pools and pagination
//! end to end.

mod cli;

use std::{error::Error, process::ExitCode};

use bfd_load::{
    DryRunClient,
    LoadDriver,
    RegressionSuiteV1,
    RunConfig,
    RunSummary,
    ScenarioSettings,
    TaskId,
    TestData,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    if cli.list_tasks {
        for task in TaskId::ALL {
            println!("{task}\t{}", task.description());
        }
        return ExitCode::SUCCESS;
    }
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "load run failed");
            eprintln!("bfd-load: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<(), Box<dyn Error>> {
    install_metrics(cli.metrics_addr)?;

    let mut builder = ScenarioSettings::builder();
    if let Some(date) = cli.last_updated {
        builder = builder.last_updated(date);
    }
    let scenario = RegressionSuiteV1::load_with(builder)?;
    let data_dir = cli.data_dir.ok_or("--data-dir is required")?;
    let pools = scenario.pools(TestData::from_dir(&data_dir)?);
    let driver = LoadDriver::new(RunConfig {
        users: cli.users,
        iterations: cli.iterations,
        seed: cli.seed,
        rate: cli.rate,
    })?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, stopping users");
            }
            shutdown.cancel();
        }
    });

    let client = DryRunClient::new(cli.host);
    let summary = driver
        .run(scenario.tasks(), |_| scenario.user(client.clone(), &pools), shutdown)
        .await
        .with_scenario(&scenario);
    report(&summary, cli.json)
}

fn report(summary: &RunSummary, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    if let Some(info) = &summary.scenario {
        println!("scenario {} (goal {})", info.name, info.settings.validation_goal());
    }
    println!("{:<58} {:>9} {:>9} {:>9}", "task", "success", "failure", "no data");
    for (task, stats) in &summary.tasks {
        println!(
            "{:<58} {:>9} {:>9} {:>9}",
            task.name(),
            stats.successes,
            stats.failures,
            stats.no_data
        );
    }
    let totals = summary.totals();
    println!(
        "{:<58} {:>9} {:>9} {:>9}",
        "total", totals.successes, totals.failures, totals.no_data
    );
    if summary.panicked > 0 {
        println!("{} user(s) panicked", summary.panicked);
    }
    Ok(())
}

#[cfg(feature = "metrics")]
fn install_metrics(addr: Option<std::net::SocketAddr>) -> Result<(), Box<dyn Error>> {
    if let Some(addr) = addr {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        tracing::info!(%addr, "serving metrics");
    }
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn install_metrics(addr: Option<std::net::SocketAddr>) -> Result<(), Box<dyn Error>> {
    if addr.is_some() {
        tracing::warn!("built without the metrics feature; --metrics-addr ignored");
    }
    Ok(())
}
