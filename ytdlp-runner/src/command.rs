use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::types::Executor;

pub struct CommandBuilder {
    program: PathBuf,
    args: Vec<String>
}

impl CommandBuilder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            program: binary.into(),
            args: Vec::new()
        }
    }

    /// Starts from `binary`, or from `interpreter binary` for the Python executor.
    pub fn for_executor(binary: &Path, interpreter: &Path, executor: Executor) -> Self {
        match executor {
            Executor::Native => Self::new(binary),
            Executor::Python => Self::new(interpreter).arg(binary.to_string_lossy())
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn self_update(self) -> Self {
        self.arg("-U")
    }

    pub fn version(self) -> Self {
        self.arg("--version")
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Program and arguments joined by single spaces.
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Builds the command with stdout and stderr piped and stdin closed.
    pub fn build_with_env(&self, env_vars: &HashMap<String, String>, directory: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = directory {
            cmd.current_dir(dir);
        }

        if let Some(path_prepend) = env_vars.get("PATH_PREPEND") {
            let current_path = std::env::var("PATH").unwrap_or_default();
            cmd.env("PATH", format!("{path_prepend}:{current_path}"));
        }

        for (key, value) in env_vars {
            if key != "PATH_PREPEND" {
                cmd.env(key, value);
            }
        }

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_basic() {
        let builder = CommandBuilder::new("yt-dlp").version();
        assert_eq!(builder.get_args(), &["--version"]);
        assert_eq!(builder.command_line(), "yt-dlp --version");
    }

    #[test]
    fn test_native_executor_runs_binary() {
        let builder = CommandBuilder::for_executor(Path::new("yt-dlp"), Path::new("python3"), Executor::Native)
            .self_update();
        assert_eq!(builder.program(), Path::new("yt-dlp"));
        assert_eq!(builder.command_line(), "yt-dlp -U");
    }

    #[test]
    fn test_python_executor_prefixes_interpreter() {
        let builder = CommandBuilder::for_executor(Path::new("yt-dlp"), Path::new("python3"), Executor::Python)
            .args(["--dump-json", "https://example.com/v"]);
        assert_eq!(builder.program(), Path::new("python3"));
        assert_eq!(builder.get_args(), &["yt-dlp", "--dump-json", "https://example.com/v"]);
        assert_eq!(builder.command_line(), "python3 yt-dlp --dump-json https://example.com/v");
    }

    #[test]
    fn test_build_sets_working_directory() {
        let builder = CommandBuilder::new("yt-dlp").arg("--version");
        let cmd = builder.build_with_env(&HashMap::new(), Some(Path::new("/tmp/out")));
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp/out")));
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), &["--version"]);
    }

    #[test]
    fn test_build_with_env_path_prepend() {
        let mut env_vars = HashMap::new();
        env_vars.insert("PATH_PREPEND".to_string(), "/opt/bin".to_string());
        env_vars.insert("LC_ALL".to_string(), "C".to_string());
        let builder = CommandBuilder::new("echo").arg("test");
        let cmd = builder.build_with_env(&env_vars, None);
        let envs: HashMap<_, _> = cmd.get_envs()
            .filter_map(|(k, v)| Some((k.to_string_lossy().to_string(), v?.to_string_lossy().to_string())))
            .collect();
        assert!(envs.get("PATH").unwrap().starts_with("/opt/bin:"));
        assert_eq!(envs.get("LC_ALL").map(String::as_str), Some("C"));
        assert!(!envs.contains_key("PATH_PREPEND"));
    }
}
