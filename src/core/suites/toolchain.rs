use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::TempDir;

use super::{default_name, verify_image};
use crate::config::SmokeConfig;
use crate::core::harness::{Step, SuiteReport, run_suite};
use crate::core::runtime::{CmdOutput, RunSpec, RuntimeCli};

const DEFAULT_IMAGE: &str = "chainguard/rust:latest";

/// Test program compiled inside the container. Exercises a few language
/// basics so a broken toolchain fails loudly.
const HELLO_RS: &str = r#"fn main() {
    println!("hello from the toolchain smoke test");

    let numbers = vec![1, 2, 3, 4, 5];
    let sum: i32 = numbers.iter().sum();
    println!("sum of {numbers:?} = {sum}");

    let message = "container smoke";
    println!("message: {message} ({} bytes)", message.len());

    let grade = match sum {
        0 => "zero",
        1..=10 => "small",
        11..=100 => "medium",
        _ => "large",
    };
    println!("sum is {grade}");
}
"#;

const MANIFEST: &str = "[package]
name = \"toolchain-smoke\"
version = \"0.1.0\"
edition = \"2021\"

[dependencies]
";

/// One toolchain smoke-test session. Containers are run with `--rm`, so
/// the owned resource here is the staged workspace on the host.
pub struct Workspace {
    runtime: RuntimeCli,
    image: String,
    container: String,
    staging: Option<TempDir>,
}

impl Workspace {
    fn new(cfg: &SmokeConfig, image: Option<&str>, name: Option<&str>) -> Self {
        Self {
            runtime: RuntimeCli::new(&cfg.runtime_program),
            image: image.unwrap_or(DEFAULT_IMAGE).to_string(),
            container: name.map_or_else(|| default_name("smoke-rust"), ToString::to_string),
            staging: None,
        }
    }

    fn staging_path(&mut self) -> Result<PathBuf> {
        if let Some(dir) = &self.staging {
            return Ok(dir.path().to_path_buf());
        }
        let dir = TempDir::new().context("failed to create staging directory")?;
        let path = dir.path().to_path_buf();
        self.staging = Some(dir);
        Ok(path)
    }

    /// One-shot `--rm` run with a fixed shell command (no interpolated
    /// parameters reach the shell).
    fn shell(&self, script: &'static str) -> Result<CmdOutput> {
        let spec = RunSpec::new(&self.image)
            .name(&self.container)
            .remove()
            .entrypoint("sh")
            .command(["-c", script]);
        self.runtime.run(&spec)
    }

    /// Same as [`Self::shell`], with the staging directory mounted at
    /// `/workspace`.
    fn shell_in_workspace(&mut self, script: &'static str) -> Result<CmdOutput> {
        let staging = self.staging_path()?;
        let spec = RunSpec::new(&self.image)
            .name(&self.container)
            .remove()
            .volume(staging, "/workspace")
            .workdir("/workspace")
            .entrypoint("sh")
            .command(["-c", script]);
        self.runtime.run(&spec)
    }
}

/// Run the Rust toolchain smoke-test suite: stage a program, compile and
/// execute it inside the image, then remove the staged files.
pub fn run(cfg: &SmokeConfig, image: Option<&str>, name: Option<&str>) -> SuiteReport {
    let mut workspace = Workspace::new(cfg, image, name);

    let steps: Vec<Step<'_, Workspace>> = vec![
        Step::mandatory("verify toolchain image", |w: &mut Workspace| {
            verify_image(&w.runtime, &w.image)
        }),
        Step::mandatory("stage test program", stage_program),
        Step::mandatory("check rustc version", |w: &mut Workspace| {
            let out = w.shell("rustc --version")?;
            if out.success() {
                println!("rustc: {}", out.stdout);
            }
            Ok(out)
        }),
        Step::mandatory("compile test program", |w: &mut Workspace| {
            w.shell_in_workspace("rustc hello.rs -o hello")
        }),
        Step::mandatory("run compiled program", |w: &mut Workspace| {
            let out = w.shell_in_workspace("./hello")?;
            if out.success() {
                println!("program output:\n{}", out.stdout);
            }
            Ok(out)
        }),
        Step::best_effort("check cargo version", |w: &mut Workspace| {
            let out = w.shell("cargo --version")?;
            if out.success() {
                println!("cargo: {}", out.stdout);
            }
            Ok(out)
        }),
        Step::best_effort("optimized compile and run", optimized_build),
        Step::best_effort("report system information", |w: &mut Workspace| {
            let out = w.shell("uname -a")?;
            if out.success() {
                println!("system: {}", out.stdout);
            }
            Ok(out)
        }),
        Step::best_effort("report toolchain details", |w: &mut Workspace| {
            let out =
                w.shell("rustc --version && echo 'targets:' && rustc --print target-list | head -5")?;
            if out.success() {
                println!("{}", out.stdout);
            }
            Ok(out)
        }),
    ];

    run_suite("Rust toolchain image smoke test", &mut workspace, steps, cleanup)
}

fn stage_program(w: &mut Workspace) -> Result<CmdOutput> {
    let staging = w.staging_path()?;
    let source = staging.join("hello.rs");
    fs::write(&source, HELLO_RS)
        .with_context(|| format!("failed to write {}", source.display()))?;
    println!("staged {}", source.display());
    Ok(CmdOutput::local(""))
}

/// Move the staged source into a package layout and build it with `-O`,
/// then run the optimized binary.
fn optimized_build(w: &mut Workspace) -> Result<CmdOutput> {
    let staging = w.staging_path()?;

    let src_dir = staging.join("src");
    fs::create_dir_all(&src_dir)
        .with_context(|| format!("failed to create {}", src_dir.display()))?;
    fs::rename(staging.join("hello.rs"), src_dir.join("main.rs"))
        .context("failed to move staged source into src/")?;
    fs::write(staging.join("Cargo.toml"), MANIFEST).context("failed to write package manifest")?;

    let compile = w.shell_in_workspace("rustc src/main.rs -O -o hello-optimized")?;
    if !compile.success() {
        return Ok(compile);
    }
    println!("optimized compile succeeded");

    let out = w.shell_in_workspace("./hello-optimized")?;
    if out.success() {
        println!("optimized output:\n{}", out.stdout);
    }
    Ok(out)
}

/// Remove the staged source, manifest, and any produced binaries by
/// dropping the staging directory.
fn cleanup(w: &mut Workspace) -> Result<()> {
    if let Some(dir) = w.staging.take() {
        let path = dir.path().to_path_buf();
        dir.close()
            .with_context(|| format!("failed to remove {}", path.display()))?;
        println!("removed staged files");
    }
    Ok(())
}
