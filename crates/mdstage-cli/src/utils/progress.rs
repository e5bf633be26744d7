use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use mdstage::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress on stderr and echoes workflow messages on stdout.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
    echo_messages: bool,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr(), true)
    }

    /// Draws nothing and swallows messages. Used for `--quiet`.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden(), false)
    }

    fn with_target(target: ProgressDrawTarget, echo_messages: bool) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(Self::spinner_style());
        pb.finish_and_clear();
        Self { pb, echo_messages }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        let echo_messages = self.echo_messages;

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                pb.reset();
                pb.set_length(0);
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                pb.set_message(name);
            }
            Progress::PhaseFinish => {
                pb.disable_steady_tick();
                pb.finish_and_clear();
            }
            Progress::TaskStart { total_steps } => {
                pb.disable_steady_tick();
                pb.reset();
                pb.set_length(total_steps);
                pb.set_position(0);
                pb.set_style(Self::bar_style());
            }
            Progress::TaskIncrement => pb.inc(1),
            Progress::TaskFinish => {
                let total = pb.length().unwrap_or(0);
                if pb.position() < total {
                    pb.set_position(total);
                }
                pb.finish();
            }
            Progress::Message(msg) => {
                if echo_messages {
                    pb.suspend(|| println!("{}", msg));
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
