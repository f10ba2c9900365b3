use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Option flags in insertion order. An empty value is a bare flag.
pub type Options = Vec<(String, String)>;

/// A single yt-dlp invocation: target URL, options and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: String,
    directory: Option<PathBuf>,
    options: Options
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            directory: None,
            options: Vec::new()
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn set_directory(&mut self, directory: Option<PathBuf>) {
        self.directory = directory;
    }

    /// Adds a bare flag such as `--no-playlist`.
    pub fn set_option(&mut self, name: impl Into<String>) -> &mut Self {
        self.set_option_value(name, String::new())
    }

    /// Sets `name` to `value`. Re-setting a flag keeps its original position.
    pub fn set_option_value(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();

        match self.options.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.options.push((name, value))
        }

        self
    }

    pub fn remove_option(&mut self, name: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|(key, _)| key != name);
        self.options.len() != before
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|(key, _)| key == name)
    }

    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Flattened `--flag value` tokens followed by the URL.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.options.len() * 2 + 1);

        for (name, value) in &self.options {
            args.push(name.clone());
            if !value.is_empty() {
                args.push(value.clone());
            }
        }

        args.push(self.url.clone());
        args
    }

    pub fn build_options(&self) -> String {
        self.args().join(" ")
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::InvalidRequest("url is empty".to_string()));
        }

        for (name, _) in &self.options {
            if !name.starts_with('-') || name.chars().any(char::is_whitespace) {
                return Err(Error::InvalidRequest(format!("malformed option name: {name:?}")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_preserve_insertion_order() {
        let mut request = Request::new("https://example.com/v");
        request
            .set_option("--dump-json")
            .set_option_value("-f", "best")
            .set_option("--no-playlist");

        assert_eq!(request.args(), &[
            "--dump-json",
            "-f", "best",
            "--no-playlist",
            "https://example.com/v"
        ]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut request = Request::new("url");
        request
            .set_option_value("-f", "worst")
            .set_option("--no-warnings")
            .set_option_value("-f", "best");

        assert_eq!(request.options().len(), 2);
        assert_eq!(request.option_value("-f"), Some("best"));
        assert_eq!(request.build_options(), "-f best --no-warnings url");
    }

    #[test]
    fn test_remove_option() {
        let mut request = Request::new("url");
        request.set_option("--no-playlist");
        assert!(request.has_option("--no-playlist"));
        assert!(request.remove_option("--no-playlist"));
        assert!(!request.remove_option("--no-playlist"));
        assert_eq!(request.args(), &["url"]);
    }

    #[test]
    fn test_with_directory() {
        let request = Request::new("url").with_directory("/tmp/out");
        assert_eq!(request.directory(), Some(Path::new("/tmp/out")));
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let request = Request::new("  ");
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_rejects_malformed_option_names() {
        let mut request = Request::new("url");
        request.set_option("dump-json");
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));

        let mut request = Request::new("url");
        request.set_option("--dump json");
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));

        let mut request = Request::new("url");
        request.set_option_value("-o", "%(title)s [%(id)s].%(ext)s");
        assert!(request.validate().is_ok());
    }
}
