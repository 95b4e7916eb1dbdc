//! Progress bar display for the removal loop

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for sequential uninstall invocations
pub struct RemovalProgress {
    pb: ProgressBar,
}

impl RemovalProgress {
    /// Create a new progress display with total record count
    pub fn new(total: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total);
        pb.set_style(style);
        Self { pb }
    }

    /// Show the record currently being uninstalled
    pub fn update(&self, display_name: &str) {
        // Truncate long names for display
        let msg = if display_name.chars().count() > 50 {
            let head: String = display_name.chars().take(47).collect();
            format!("{head}...")
        } else {
            display_name.to_string()
        };
        self.pb.set_message(msg);
    }

    pub fn inc(&self) {
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        self.pb.finish_with_message("done");
    }
}
