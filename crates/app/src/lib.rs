//! Attention monitor application
//!
//! Wires a frame source, landmark extractor, scoring session, and score
//! transport into a frame loop that runs until Ctrl-C.

pub mod config;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use camera_capture::{select_preferred_camera, BlankFrameSource, FrameSlot};
use metrics_exporter_prometheus::PrometheusBuilder;
use pipeline::{
    AttentionSession, FrameLoop, LandmarkExtractor, RecordedExtractor, ScriptedExtractor,
    TracingSink,
};
use score_emitter::{ChannelTransport, MqttTransport, Transport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, LogFormat, TransportKind};

/// Label used when no camera device is configured
pub const FALLBACK_CAMERA_LABEL: &str = "synthetic camera";

/// Initialize logging. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Install the Prometheus exporter if a listen address is configured
pub fn init_metrics(listen: Option<&str>) -> Result<()> {
    let Some(listen) = listen else {
        return Ok(());
    };

    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("Invalid metrics listen address: {}", listen))?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Pick the camera to open from the configured device list
pub fn camera_label(config: &AppConfig) -> String {
    let devices = config.camera.devices();
    match select_preferred_camera(&devices, &config.camera.selection) {
        Some(device) if !device.label.is_empty() => device.label.clone(),
        Some(device) => format!("camera {}", device.index),
        None => FALLBACK_CAMERA_LABEL.to_string(),
    }
}

/// Build the configured score transport
pub fn build_transport(config: &AppConfig, subject_id: &str) -> Box<dyn Transport> {
    match config.transport.kind {
        TransportKind::Mqtt => {
            info!(
                "Publishing scores to {}:{}",
                config.transport.mqtt.broker_host, config.transport.mqtt.broker_port
            );
            Box::new(MqttTransport::start(&config.transport.mqtt, subject_id))
        }
        TransportKind::Log => {
            let (transport, mut rx) = ChannelTransport::channel(64);
            let subject = subject_id.to_string();
            tokio::spawn(async move {
                while let Some(payload) = rx.recv().await {
                    info!(subject = %subject, "score {}", payload);
                }
            });
            Box::new(transport)
        }
    }
}

/// Run the monitor until Ctrl-C
pub async fn run(config: AppConfig) -> Result<()> {
    init_metrics(config.metrics.listen.as_deref())?;

    let subject_id = config
        .subject_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!("Monitoring subject {}", subject_id);

    let transport = build_transport(&config, &subject_id);
    let session = AttentionSession::new(&config.session(), transport)
        .context("Failed to create attention session")?;

    let slot = FrameSlot::new();
    let label = camera_label(&config);
    info!("Opening camera: {}", label);
    let source = BlankFrameSource::new(label, &config.camera.capture)
        .context("Failed to open camera")?;
    slot.install(Box::new(source)).await;

    match &config.input.recording {
        Some(path) => {
            let extractor = RecordedExtractor::from_path(path)
                .with_context(|| format!("Failed to load recording {}", path.display()))?;
            drive(slot, extractor, session, &config).await;
        }
        None => {
            let latency = Duration::from_millis(config.input.extract_latency_ms);
            drive(slot, ScriptedExtractor::demo(latency), session, &config).await;
        }
    }

    Ok(())
}

async fn drive<E: LandmarkExtractor>(
    slot: FrameSlot,
    extractor: E,
    session: AttentionSession<Box<dyn Transport>>,
    config: &AppConfig,
) {
    let mut frame_loop = FrameLoop::new(
        slot,
        extractor,
        session,
        TracingSink::new(),
        &config.frame_loop,
    );
    frame_loop.run_until(shutdown_signal()).await;
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C ({}); running until killed", e);
            std::future::pending::<()>().await;
        }
    }
}
