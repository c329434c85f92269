// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use gateway_graph::{
    config::GraphConfig,
    graph::build_graph,
    metrics::gather_metrics,
    report::GraphReport,
    snapshot::load_snapshot_files,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// Build the Gateway API resource graph for a snapshot of cluster manifests.
#[derive(Debug, Parser)]
#[command(name = "gateway-graph", version, about)]
struct Args {
    /// YAML manifest files making up the snapshot; later files override earlier ones
    #[arg(long = "snapshot", short = 's', required = true, num_args = 1..)]
    snapshots: Vec<PathBuf>,

    /// Optional YAML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Yaml)]
    output: OutputFormat,

    /// Print Prometheus metrics for the build after the report
    #[arg(long)]
    metrics: bool,

    /// Exit with a non-zero status when any resource is invalid
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = load_config(&args)?;
    debug!(
        "Using controller name {} with {} protected ports",
        config.controller_name,
        config.protected_ports.len()
    );

    let state = load_snapshot_files(args.snapshots.as_slice()).context("failed to load snapshot")?;
    let graph = build_graph(&state, &config);
    let report = GraphReport::from_graph(&graph, Utc::now());

    println!("{}", render(&report, args.output)?);

    if args.metrics {
        println!("{}", gather_metrics().context("failed to gather metrics")?);
    }

    let invalid = count_invalid(&report);
    info!("Graph built with {} invalid resources", invalid);
    if args.strict && invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging() {
    // stdout carries the report, logs go to stderr.
    // RUST_LOG sets the level (default info), RUST_LOG_FORMAT=json switches to JSON.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

fn load_config(args: &Args) -> Result<GraphConfig> {
    let mut config = match &args.config {
        Some(path) => GraphConfig::from_file(path)?,
        None => GraphConfig::default(),
    };
    config
        .apply_env()
        .context("invalid configuration in environment")?;
    Ok(config)
}

fn render(report: &GraphReport, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(report)?,
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    };
    Ok(rendered)
}

fn count_invalid(report: &GraphReport) -> usize {
    let listeners = report
        .gateway
        .iter()
        .flat_map(|gw| &gw.listeners)
        .filter(|l| !l.valid)
        .count();
    let policies = report
        .backend_tls_policies
        .iter()
        .filter(|p| !p.valid && !p.ignored)
        .count();
    let filters = report.snippets_filters.iter().filter(|f| !f.valid).count();
    listeners + policies + filters
}
