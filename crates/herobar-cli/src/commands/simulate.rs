//! Deterministic replay of a scripted input sequence
//!
//! The controller runs on a virtual clock: timers and refresh completions
//! fire at their exact deadlines, so a script produces the same output on
//! every run regardless of machine speed.

use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use herobar_core::controller::Effect;
use herobar_core::refresh::{RefreshHandle, RefreshOutcome};
use herobar_core::{HeaderConfig, HeaderController, HeaderEvent, HeaderInput, HeaderSnapshot};

/// Input script read from JSON
#[derive(Debug, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
    /// Keep the clock running until this time; defaults to long enough for
    /// a refresh started by the last step to finish
    #[serde(default)]
    pub until_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    pub input: HeaderInput,
}

/// How the stand-in refresh behaves during a replay
#[derive(Debug, Clone)]
pub struct RefreshBehavior {
    pub duration: Duration,
    pub failure: Option<String>,
}

/// One JSON line of output
#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record<'a> {
    Event { at_ms: u64, event: &'a HeaderEvent },
    Snapshot { at_ms: u64, snapshot: &'a HeaderSnapshot },
}

pub fn run(
    config: &HeaderConfig,
    script_path: &Path,
    refresh_ms: u64,
    fail_refresh: Option<String>,
) -> Result<()> {
    let content = if script_path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(script_path)
            .with_context(|| format!("Failed to read script {}", script_path.display()))?
    };
    let script: Script = serde_json::from_str(&content).context("Invalid simulation script")?;

    let behavior = RefreshBehavior {
        duration: Duration::from_millis(refresh_ms),
        failure: fail_refresh,
    };
    let stdout = io::stdout();
    simulate(config, &script, &behavior, &mut stdout.lock())
}

/// Replay `script` against a fresh controller, writing JSON lines to `out`
pub fn simulate<W: Write>(
    config: &HeaderConfig,
    script: &Script,
    behavior: &RefreshBehavior,
    out: &mut W,
) -> Result<()> {
    let start = Instant::now();
    let mut sim = Simulation {
        controller: HeaderController::new(config, start)?,
        start,
        pending: Vec::new(),
        behavior: behavior.clone(),
        out,
    };

    let mut steps: Vec<&Step> = script.steps.iter().collect();
    steps.sort_by_key(|step| step.at_ms);

    for step in &steps {
        let at = start + Duration::from_millis(step.at_ms);
        sim.advance_to(at)?;
        debug!(at_ms = step.at_ms, input = ?step.input, "Replaying input");
        let effects = sim.controller.handle(step.input.clone(), at);
        sim.apply(effects, at)?;
        sim.write_snapshot(at)?;
    }

    let settle = config.refresh.minimum_visible() + behavior.duration;
    let last = steps.last().map_or(0, |step| step.at_ms);
    let until = script
        .until_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(last) + settle);
    let end = start + until;
    sim.advance_to(end)?;
    sim.write_snapshot(end)?;

    sim.controller.shutdown();
    Ok(())
}

struct Simulation<'w, W: Write> {
    controller: HeaderController,
    start: Instant,
    /// Dispatched refreshes and the virtual time they complete at
    pending: Vec<(Instant, RefreshHandle)>,
    behavior: RefreshBehavior,
    out: &'w mut W,
}

impl<W: Write> Simulation<'_, W> {
    fn at_ms(&self, at: Instant) -> u64 {
        at.duration_since(self.start).as_millis() as u64
    }

    /// Fire every timer and completion due at or before `until`, in order
    fn advance_to(&mut self, until: Instant) -> Result<()> {
        loop {
            let timer = self.controller.next_deadline().filter(|at| *at <= until);
            let completion = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, (at, _))| *at <= until)
                .min_by_key(|(_, (at, _))| *at)
                .map(|(i, (at, _))| (i, *at));

            match (timer, completion) {
                (_, Some((index, at))) if timer.map_or(true, |t| at <= t) => {
                    let (_, handle) = self.pending.remove(index);
                    let outcome = match &self.behavior.failure {
                        Some(message) => RefreshOutcome::Failed(message.clone()),
                        None => RefreshOutcome::Succeeded,
                    };
                    let effects = self.controller.refresh_completed(handle, outcome, at);
                    self.apply(effects, at)?;
                }
                (Some(at), _) => {
                    let effects = self.controller.poll(at);
                    self.apply(effects, at)?;
                    if self.controller.next_deadline() == Some(at) {
                        warn!(at_ms = self.at_ms(at), "Timer did not advance; stopping replay");
                        return Ok(());
                    }
                }
                (None, _) => return Ok(()),
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, at: Instant) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Dispatch(handle) => {
                    self.pending.push((at + self.behavior.duration, handle));
                }
                Effect::Emit(event) => {
                    let record = Record::Event {
                        at_ms: self.at_ms(at),
                        event: &event,
                    };
                    serde_json::to_writer(&mut *self.out, &record)?;
                    writeln!(self.out)?;
                }
            }
        }
        Ok(())
    }

    fn write_snapshot(&mut self, at: Instant) -> Result<()> {
        let snapshot = self.controller.snapshot();
        let record = Record::Snapshot {
            at_ms: self.at_ms(at),
            snapshot: &snapshot,
        };
        serde_json::to_writer(&mut *self.out, &record)?;
        writeln!(self.out)?;
        Ok(())
    }
}
