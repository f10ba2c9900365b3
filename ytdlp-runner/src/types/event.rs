use super::progress::Progress;

/// Output pipe a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Stdout,
    Stderr
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Stdout => "stdout",
            Source::Stderr => "stderr"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    Line { source: Source, text: String },
    Exited { exit_code: i32, elapsed_ms: u64 }
}

impl OutputEvent {
    pub fn progress(&self) -> Option<Progress> {
        match self {
            OutputEvent::Line { text, .. } => Progress::parse(text),
            OutputEvent::Exited { .. } => None
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, OutputEvent::Exited { .. })
    }
}
