pub mod inspect;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

pub use inspect::{ContainerInfo, parse_inspect};

/// Captured result of one runtime invocation.
#[derive(Debug, Clone)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CmdOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Synthetic success output for steps that do local work only.
    #[must_use]
    pub fn local(note: impl Into<String>) -> Self {
        Self {
            stdout: note.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }
}

/// Arguments for `run`, built as a structured list rather than an
/// interpolated shell string.
#[derive(Debug, Clone, Default)]
pub struct RunSpec {
    pub image: String,
    pub name: Option<String>,
    pub detach: bool,
    pub remove: bool,
    pub env: Vec<(String, String)>,
    pub volume: Option<(PathBuf, String)>,
    pub workdir: Option<String>,
    pub entrypoint: Option<String>,
    pub command: Vec<String>,
}

impl RunSpec {
    #[must_use]
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn detach(mut self) -> Self {
        self.detach = true;
        self
    }

    #[must_use]
    pub const fn remove(mut self) -> Self {
        self.remove = true;
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn volume(mut self, host: impl Into<PathBuf>, guest: impl Into<String>) -> Self {
        self.volume = Some((host.into(), guest.into()));
        self
    }

    #[must_use]
    pub fn workdir(mut self, dir: impl Into<String>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn entrypoint(mut self, program: impl Into<String>) -> Self {
        self.entrypoint = Some(program.into());
        self
    }

    #[must_use]
    pub fn command<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = args.into_iter().map(Into::into).collect();
        self
    }

    fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["run".into()];
        if let Some(name) = &self.name {
            args.push("--name".into());
            args.push(name.into());
        }
        if self.detach {
            args.push("--detach".into());
        }
        if self.remove {
            args.push("--rm".into());
        }
        for (key, value) in &self.env {
            args.push("--env".into());
            args.push(format!("{key}={value}").into());
        }
        if let Some((host, guest)) = &self.volume {
            args.push("--volume".into());
            let mut mapping = host.clone().into_os_string();
            mapping.push(":");
            mapping.push(guest);
            args.push(mapping);
        }
        if let Some(dir) = &self.workdir {
            args.push("--workdir".into());
            args.push(dir.into());
        }
        if let Some(program) = &self.entrypoint {
            args.push("--entrypoint".into());
            args.push(program.into());
        }
        args.push(self.image.as_str().into());
        for arg in &self.command {
            args.push(arg.into());
        }
        args
    }
}

/// Thin driver for the external container runtime CLI. Every operation
/// shells out, captures stdout/stderr and the exit status, and leaves
/// interpretation to the caller.
#[derive(Debug, Clone)]
pub struct RuntimeCli {
    program: String,
}

impl RuntimeCli {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn capture<I, S>(&self, args: I) -> Result<CmdOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        debug!("invoking {} {:?}", self.program, args);

        let out = Command::new(&self.program)
            .args(&args)
            .output()
            .with_context(|| format!("failed to launch `{}`", self.program))?;

        Ok(CmdOutput {
            stdout: String::from_utf8_lossy(&out.stdout).trim_end().to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim_end().to_string(),
            exit_code: out.status.code().unwrap_or(-1),
        })
    }

    /// `images list` — raw listing of locally available images.
    pub fn images(&self) -> Result<CmdOutput> {
        self.capture(["images", "list"])
    }

    /// Whether an image matching `reference` (tag ignored) appears in the
    /// local image listing.
    pub fn image_present(&self, reference: &str) -> Result<bool> {
        let repo = reference.split(':').next().unwrap_or(reference);
        let out = self.images()?;
        Ok(out.success() && out.stdout.lines().any(|line| line.contains(repo)))
    }

    /// `run` with structured arguments.
    pub fn run(&self, spec: &RunSpec) -> Result<CmdOutput> {
        self.capture(spec.to_args())
    }

    /// `exec <name> <command...>`.
    pub fn exec<I, S>(&self, name: &str, command: I) -> Result<CmdOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args: Vec<OsString> = vec!["exec".into(), name.into()];
        args.extend(command.into_iter().map(Into::into));
        self.capture(args)
    }

    /// `inspect <name>` — the only operation whose output is parsed.
    pub fn inspect(&self, name: &str) -> Result<CmdOutput> {
        self.capture(["inspect", name])
    }

    pub fn stop(&self, name: &str) -> Result<CmdOutput> {
        self.capture(["stop", name])
    }

    pub fn delete(&self, name: &str) -> Result<CmdOutput> {
        self.capture(["delete", name])
    }
}
