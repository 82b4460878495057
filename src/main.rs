mod audio;
mod config;
mod error;
mod pipeline;
mod serial;

use std::process::ExitCode;

use anyhow::Context;
use tokio::signal;

use crate::audio::{CancelToken, WavSink};
use crate::config::Config;
use crate::error::CaptureError;
use crate::pipeline::Pipeline;
use crate::serial::{SerialSource, SourceGuard};

#[tokio::main]
async fn main() -> ExitCode {
    // 初始化日志, RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<CaptureError>()
                .map_or(1, CaptureError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // 加载配置
    let config = Config::load()?;
    config.validate()?;
    log::info!(
        "Capture config: port={}, baud={}, rate={}Hz, max_samples={}, output={}",
        config.port,
        config.baud_rate,
        config.sample_rate,
        config.max_samples,
        config.output_path.display()
    );

    // Nothing to release if this fails
    let source = SerialSource::open(&config.port, config.baud_rate)?;
    println!("Serial port opened.");
    let guard = SourceGuard::new(source, config.port.clone());

    // Ctrl+C only requests a stop; the loop notices it between sample words
    let cancel = CancelToken::new();
    let signal_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                log::warn!("Received Ctrl+C, stopping acquisition");
                cancel.cancel();
            }
        })
    };

    // The acquisition loop blocks on the serial port, keep it off the async workers
    let (outcome, interrupted) = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || {
            let mut sink = WavSink;
            let mut pipeline = Pipeline::new(&config);
            let result = pipeline.run(guard, &mut sink, &cancel, |progress| {
                println!("{}", progress);
            });
            log::debug!("Pipeline finished in state {:?}", pipeline.state());
            (result, pipeline.acquisition_interrupted())
        })
        .await
        .context("Capture task panicked")?
    };
    signal_task.abort();

    // Only when acquisition itself was cut short, not for a late Ctrl+C
    if interrupted {
        println!("\nInterrupted. Serial port closed.");
    }

    let report = outcome?;
    println!(
        "\nSaved {} samples to '{}' at {} Hz",
        report.samples,
        report.output_path.display(),
        report.sample_rate
    );
    if report.interrupted {
        log::warn!(
            "Recording is partial: {} of {} samples",
            report.samples,
            config.max_samples
        );
    }
    Ok(())
}
