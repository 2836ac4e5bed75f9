use catalog_synth::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};

/// Detect if we're running in a CI environment
fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Create a spinner with a message
/// Returns a hidden spinner in CI environments or when `visible` is false
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    let pb = if visible && !is_ci() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };

    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .expect("Failed to set progress style"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Shows synthesis progress messages on a spinner.
pub struct SpinnerReporter {
    spinner: ProgressBar,
}

impl SpinnerReporter {
    pub fn new(spinner: ProgressBar) -> Self {
        Self { spinner }
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for SpinnerReporter {
    fn report(&self, message: &str) {
        tracing::trace!(message, "Progress");
        self.spinner.set_message(message.to_string());
    }
}
