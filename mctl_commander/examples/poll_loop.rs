//! Foreground polling loop with a concurrent step context.
//!
//! The "host" lines are fed into an in-memory transport; a background thread
//! plays the role of the step timer interrupt, draining `steps` and raising
//! `interrupt` once an axis reaches its target.
//!
//! ```bash
//! cargo run -p mctl_commander --example poll_loop
//! RUST_LOG=trace cargo run -p mctl_commander --example poll_loop
//! ```

use mctl_common::prelude::*;
use mctl_commander::{Command, CommandReader, MemoryTransport, ReaderConfig};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
[shared]
log_level = "debug"
service_name = "mctl-demo"

[reader]
read_timeout_ms = 50
malformed_token = "zero"
"#;

const HOST_LINES: &[&str] = &[
    "enable 0\n",
    "enable 1\n",
    "move 0 40\n",
    "move 1 -25\n",
    "move 1 x\n",
    "status 1\n",
    "move 9 1\n",
];

#[derive(Debug, Deserialize)]
struct DemoConfig {
    shared: SharedConfig,
    #[serde(default)]
    reader: ReaderConfig,
}

fn dispatch(cmd: &Command, bank: &AxisRegisterBank) -> String {
    let Some(axis) = cmd.param(0).and_then(|a| usize::try_from(a).ok()) else {
        return "ERR missing axis".to_string();
    };
    let result = match cmd.action.as_str() {
        "ENABLE" => bank.set_enable(axis, true).map(|_| "OK".to_string()),
        "DISABLE" => bank.set_enable(axis, false).map(|_| "OK".to_string()),
        "MOVE" => bank
            .add_steps(axis, cmd.param(1).unwrap_or(0))
            .map(|_| "OK".to_string()),
        "STATUS" => bank.axis(axis).map(|slot| {
            let s = slot.snapshot();
            format!("STATUS {} {} {}", u8::from(s.enable), u8::from(s.interrupt), s.steps)
        }),
        other => return format!("ERR unknown action {other}"),
    };
    result.unwrap_or_else(|e| format!("ERR {e}"))
}

/// Background step context: one pulse per enabled axis per tick.
fn spawn_stepper(bank: Arc<AxisRegisterBank>, running: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            for (_, slot) in bank.iter() {
                if !slot.enable() {
                    continue;
                }
                if matches!(slot.step_towards_zero(), Some(1 | -1)) {
                    slot.set_interrupt(true);
                }
            }
            thread::sleep(Duration::from_micros(200));
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DemoConfig::from_toml_str(CONFIG)?;
    config.shared.validate()?;

    let level: tracing::Level = config.shared.log_level.into();
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("{} starting", config.shared.service_name);

    let bank = Arc::new(AxisRegisterBank::new());
    let running = Arc::new(AtomicBool::new(true));
    let stepper = spawn_stepper(Arc::clone(&bank), Arc::clone(&running));

    let mut reader = CommandReader::with_config(MemoryTransport::new(), config.reader);
    reader.begin();

    for line in HOST_LINES {
        reader.transport_mut().feed_str(line);
        while let Some(cmd) = reader.poll() {
            let reply = dispatch(&cmd, &bank);
            reader.write_response(&reply);
        }
    }

    // Wait for both axes to reach their targets.
    for axis in 0..2 {
        let slot = bank.axis(axis)?;
        while !slot.take_interrupt() {
            thread::sleep(Duration::from_millis(1));
        }
        info!("Axis {} reached target", axis);
    }

    running.store(false, Ordering::Relaxed);
    if stepper.join().is_err() {
        warn!("Stepper thread panicked");
    }

    print!("{}", reader.transport().output_str());
    for (axis, snapshot) in bank.snapshot_all().iter().enumerate() {
        info!("Axis {}: {:?}", axis, snapshot);
    }
    Ok(())
}
