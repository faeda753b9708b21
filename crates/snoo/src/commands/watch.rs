//! `watch`: replay a recording with pacing, printing every sensor
//! re-render as the hub reports it.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use snoo_core::{DeviceHub, Sensor, SensorBinding};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::reading::{self, ReadingValue, SensorReading};
use crate::replay::{self, Replay};

/// How each re-render is printed.
#[derive(Debug, Clone, Copy)]
struct Render {
    format: OutputFormat,
    color: bool,
    quiet: bool,
}

impl Render {
    fn text(self, reading: &SensorReading) -> Result<String, CliError> {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(reading, true),
            OutputFormat::Yaml => Ok(format!("---\n{}", output::render_yaml(reading)?)),
            OutputFormat::Plain => Ok(format!(
                "{}\t{}",
                reading.unique_id,
                reading.value_text().unwrap_or_default()
            )),
            OutputFormat::Table => Ok(reading.line(self.color)),
        }
    }
}

/// Bind a re-render trigger that prints `sensor`'s current reading.
fn bind<S>(hub: &DeviceHub, sensor: &S, render: Render) -> Result<SensorBinding, CliError>
where
    S: Sensor + Clone + 'static,
    S::Value: ReadingValue,
    S::Attributes: Serialize,
{
    let view = sensor.clone();
    let binding = hub.bind(sensor, move || {
        let reading = reading::read(&view, &view.synchronizer().snapshot())?;
        let text = render.text(&reading)?;
        if !render.quiet {
            writeln!(io::stdout().lock(), "{}", text.trim_end())?;
        }
        Ok(())
    })?;
    Ok(binding)
}

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let runtime = config::resolve_device(global, &cfg, &args.replay)?;
    let messages = replay::load_recording(&args.replay.file)?;

    let mut replay = Replay::new(
        messages,
        args.replay.preload,
        !args.replay.disconnected,
        runtime,
    );
    let render = Render {
        format: global.output,
        color: output::should_color(global.color),
        quiet: global.quiet,
    };

    let hub = &replay.hub;
    let bindings = [
        bind(hub, hub.status_sensor(), render)?,
        bind(hub, hub.level_sensor(), render)?,
        bind(hub, hub.session_start_sensor(), render)?,
    ];

    replay.start().await?;

    let interval: Duration = args.interval.into();
    let live = std::mem::take(&mut replay.live);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    for message in live {
        tokio::select! {
            () = tokio::time::sleep(interval) => replay.deliver(message),
            _ = &mut ctrl_c => {
                info!("interrupted; stopping replay");
                break;
            }
        }
    }

    for binding in &bindings {
        binding.release();
    }
    replay.hub.shutdown();
    Ok(())
}
