/// How the yt-dlp executable is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Executor {
    /// Run the binary directly.
    #[default]
    Native,
    /// Run the binary as a script through the configured Python interpreter.
    Python
}

impl Executor {
    pub fn is_python(self) -> bool {
        matches!(self, Executor::Python)
    }
}

impl From<bool> for Executor {
    fn from(use_python: bool) -> Self {
        if use_python {
            Executor::Python
        } else {
            Executor::Native
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_python_flag() {
        assert_eq!(Executor::from(true), Executor::Python);
        assert_eq!(Executor::from(false), Executor::Native);
        assert!(Executor::Python.is_python());
        assert!(!Executor::default().is_python());
    }
}
