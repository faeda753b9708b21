//! `show`: replay a recording to the end and print the final readings.

use crate::cli::{GlobalOpts, OutputFormat, ReplayArgs};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::reading::{self, ReadingRow};
use crate::replay::{self, Replay};

pub async fn handle(args: ReplayArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let runtime = config::resolve_device(global, &cfg, &args)?;
    let messages = replay::load_recording(&args.file)?;

    let mut replay = Replay::new(messages, args.preload, !args.disconnected, runtime);
    replay.start().await?;

    let live = std::mem::take(&mut replay.live);
    let delivered = live.len();
    for message in live {
        replay.deliver(message);
    }
    tracing::debug!(delivered, "recording replayed");

    let snapshot = replay.hub.synchronizer().snapshot();
    replay.hub.shutdown();

    let readings = reading::read_all(&replay.hub, &snapshot)?;
    let color = output::should_color(global.color);

    let out = if global.output == OutputFormat::Table {
        let rows: Vec<ReadingRow> = readings.iter().map(|r| ReadingRow::new(r, color)).collect();
        let mut text = output::render_table(&rows);
        let attributes = reading::attribute_rows(&readings, color);
        if !attributes.is_empty() {
            text.push('\n');
            text.push_str(&output::render_table(&attributes));
        }
        text
    } else {
        output::render_list(
            global.output,
            &readings,
            |r| ReadingRow::new(r, color),
            |r| format!("{}\t{}", r.unique_id, r.value_text().unwrap_or_default()),
        )?
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
