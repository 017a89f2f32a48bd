use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over completed conversations. Shared with the scheduler, which bumps it as each
/// conversation finishes.
pub(crate) fn conversation_progress(clients: u64) -> ProgressBar {
    let progress = ProgressBar::new(clients);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} conversations",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    progress
}
