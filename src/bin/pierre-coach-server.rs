// ABOUTME: HTTP server binary for the Pierre Coach API
// ABOUTME: Loads config, database, fitness model, and LLM, then serves until ctrl-c
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pierre Coach Server Binary
//!
//! Startup fails closed: the server exits non-zero before binding when the
//! fitness-model artifacts are missing or incompatible.

use anyhow::{Context, Result};
use clap::Parser;
use pierre_coach::{
    config::environment::ServerConfig,
    database::Database,
    intelligence::FitnessModel,
    llm::{GeminiProvider, LlmProvider},
    logging::LoggingConfig,
    resources::ServerResourcesBuilder,
    routes::build_router,
};
use std::future::pending;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "pierre-coach-server")]
#[command(about = "Pierre Coach - conversational fitness coaching API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    LoggingConfig::from_env().init()?;

    info!("Starting Pierre Coach ({})", config.environment);
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;

    let model = match FitnessModel::load(&config.model.scaler_path, &config.model.classifier_path)
    {
        Ok(model) => model,
        Err(e) => {
            error!(error = %e, "Fitness model failed to load; refusing to start");
            return Err(e)
                .context("fitness model artifacts are unusable; run train-fitness-model first");
        }
    };
    info!(
        fingerprint = %model.metadata().fingerprint,
        trained_at = %model.metadata().trained_at,
        "Fitness model loaded"
    );

    let mut builder = ServerResourcesBuilder::new()
        .with_model(Arc::new(model))
        .with_database(database);

    if config.llm.api_key.is_some() {
        let provider = GeminiProvider::from_config(&config.llm)?;
        if !provider.available_models().contains(&provider.default_model()) {
            warn!(model = provider.default_model(), "LLM_MODEL is not a known Gemini model");
        }
        match provider.health_check().await {
            Ok(true) => info!(
                provider = provider.display_name(),
                model = provider.default_model(),
                "LLM provider configured"
            ),
            Ok(false) => warn!("Gemini rejected the configured API key; LLM calls will fail"),
            Err(e) => warn!(error = %e, "Gemini is unreachable; continuing without a health check"),
        }
        builder = builder.with_llm(Arc::new(provider));
    } else if config.environment.is_production() {
        warn!(
            "GEMINI_API_KEY is not set in production; onboarding, journal, and schedule \
             endpoints will return 503"
        );
    } else {
        warn!("GEMINI_API_KEY is not set; LLM-backed endpoints are disabled");
    }

    let port = config.http_port;
    let resources = builder.with_config(Arc::new(config)).build_arc()?;
    let app = build_router(resources);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Pierre Coach stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for ctrl-c; graceful shutdown disabled");
        pending::<()>().await;
    }
    info!("Shutdown signal received");
}
