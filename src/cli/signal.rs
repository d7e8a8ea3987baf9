//! Signal command implementation.

use std::io::Write;

use anyhow::Result;

use reloader_client::{ReloadSignal, config::ReloaderConfig, debug, protocol::EventFrame};

use super::SignalArgs;

/// Print one signal frame to stdout.
pub fn emit_signal(args: &SignalArgs, config: &ReloaderConfig) -> Result<()> {
    let frame = build_frame(args, config);
    let encoded = frame.encode()?;
    debug!("signal"; "{} frame with id {:?}", ReloadSignal::from(args.kind).as_str(), args.id);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(encoded.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// `--retry` overrides `[signal] retry`; zero leaves the field out.
fn build_frame(args: &SignalArgs, config: &ReloaderConfig) -> EventFrame {
    let frame = ReloadSignal::from(args.kind).frame(args.id.as_str());
    let retry = match args.retry {
        Some(0) => None,
        Some(ms) => Some(ms),
        None => config.signal.retry(),
    };
    match retry {
        Some(ms) => frame.with_retry(ms),
        None => frame,
    }
}
