use anyhow::Result;
use tracing::{debug, warn};

use super::{default_name, verify_image};
use crate::config::SmokeConfig;
use crate::core::harness::poll::{self, PollPolicy, Readiness};
use crate::core::harness::{Step, SuiteReport, report, run_suite};
use crate::core::runtime::{CmdOutput, RunSpec, RuntimeCli, parse_inspect};

const DEFAULT_IMAGE: &str = "chainguard/postgres:latest";

/// One PostgreSQL smoke-test session: owns exactly one container from
/// launch to guaranteed teardown.
pub struct Session {
    runtime: RuntimeCli,
    poll: PollPolicy,
    image: String,
    container: String,
    user: String,
    password: String,
    db: String,
    started: bool,
}

impl Session {
    fn new(cfg: &SmokeConfig, image: Option<&str>, name: Option<&str>) -> Self {
        Self {
            runtime: RuntimeCli::new(&cfg.runtime_program),
            poll: cfg.poll,
            image: image.unwrap_or(DEFAULT_IMAGE).to_string(),
            container: name.map_or_else(|| default_name("smoke-postgres"), ToString::to_string),
            user: "testuser".to_string(),
            password: "testpassword".to_string(),
            db: "testdb".to_string(),
            started: false,
        }
    }

    fn psql(&self, sql: &str) -> Result<CmdOutput> {
        self.runtime.exec(
            &self.container,
            [
                "psql",
                "-U",
                self.user.as_str(),
                "-d",
                self.db.as_str(),
                "-c",
                sql,
            ],
        )
    }
}

/// Run the PostgreSQL smoke-test suite against one container session.
pub fn run(cfg: &SmokeConfig, image: Option<&str>, name: Option<&str>) -> SuiteReport {
    let mut session = Session::new(cfg, image, name);

    let steps: Vec<Step<'_, Session>> = vec![
        Step::mandatory("verify postgres image", |s: &mut Session| {
            verify_image(&s.runtime, &s.image)
        }),
        Step::mandatory("start postgres container", start_container),
        Step::mandatory("wait for postgres readiness", wait_for_readiness),
        Step::mandatory("check database connectivity", |s: &mut Session| {
            let out = s.psql("SELECT version();")?;
            if out.success() {
                println!("server version: {}", out.stdout.lines().next().unwrap_or(""));
            }
            Ok(out)
        }),
        Step::mandatory("round-trip a test record", round_trip),
        Step::best_effort("inspect container", inspect_container),
    ];

    run_suite("PostgreSQL image smoke test", &mut session, steps, cleanup)
}

fn start_container(s: &mut Session) -> Result<CmdOutput> {
    // Clear any stale container holding the session name
    s.runtime.stop(&s.container).ok();
    s.runtime.delete(&s.container).ok();

    let spec = RunSpec::new(&s.image)
        .name(&s.container)
        .detach()
        .env("POSTGRES_PASSWORD", &s.password)
        .env("POSTGRES_USER", &s.user)
        .env("POSTGRES_DB", &s.db);

    let out = s.runtime.run(&spec)?;
    if out.success() {
        s.started = true;
        println!("container id: {}", out.stdout);
    }
    Ok(out)
}

fn wait_for_readiness(s: &mut Session) -> Result<CmdOutput> {
    let policy = s.poll;
    let runtime = &s.runtime;
    let container = s.container.as_str();
    let user = s.user.as_str();
    let db = s.db.as_str();

    let readiness = poll::wait_ready(policy, |attempt| {
        let probe = runtime.exec(container, ["pg_isready", "-U", user, "-d", db])?;
        if !probe.success() {
            report::waiting("postgres", attempt, policy.budget());
        }
        Ok(probe.success())
    })?;

    match readiness {
        Readiness::Ready { attempt } => {
            println!("postgres ready after {attempt} attempt(s)");
            Ok(CmdOutput::local(""))
        }
        Readiness::TimedOut { attempts } => Ok(CmdOutput {
            stdout: String::new(),
            stderr: format!("postgres not ready after {attempts} probes"),
            exit_code: 1,
        }),
    }
}

fn round_trip(s: &mut Session) -> Result<CmdOutput> {
    let create = s.psql(
        "CREATE TABLE smoke_records (id SERIAL PRIMARY KEY, name VARCHAR(50), \
         created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP);",
    )?;
    if !create.success() {
        return Ok(create);
    }
    println!("created table smoke_records");

    let insert = s.psql("INSERT INTO smoke_records (name) VALUES ('smoke_record');")?;
    if !insert.success() {
        return Ok(insert);
    }
    println!("inserted test record");

    let select = s.psql("SELECT * FROM smoke_records;")?;
    if !select.success() {
        return Ok(select);
    }

    // The inserted row must come back with the value we wrote
    if select.stdout.contains("smoke_record") {
        println!("query result:\n{}", select.stdout);
        Ok(select)
    } else {
        Ok(CmdOutput {
            stdout: select.stdout,
            stderr: "inserted record missing from query result".to_string(),
            exit_code: 1,
        })
    }
}

fn inspect_container(s: &mut Session) -> Result<CmdOutput> {
    let out = s.runtime.inspect(&s.container)?;
    if !out.success() {
        return Ok(out);
    }

    let infos = parse_inspect(&out.stdout)?;
    if let Some(info) = infos.first() {
        println!(
            "container id: {}",
            info.configuration.id.as_deref().unwrap_or("N/A")
        );
        println!("status:       {}", info.status.as_deref().unwrap_or("N/A"));
        println!(
            "architecture: {}",
            info.configuration.architecture.as_deref().unwrap_or("N/A")
        );
        println!("ip address:   {}", info.address().unwrap_or("N/A"));
    }
    Ok(out)
}

/// Stop and delete the session container. Each failure is logged but never
/// raised; `delete` is attempted even when `stop` fails.
fn cleanup(s: &mut Session) -> Result<()> {
    if !s.started {
        debug!("container `{}` was never started", s.container);
    }

    match s.runtime.stop(&s.container) {
        Ok(out) if out.success() => println!("container stopped"),
        Ok(out) => warn!("failed to stop `{}`: {}", s.container, out.stderr),
        Err(e) => warn!("failed to stop `{}`: {e:#}", s.container),
    }

    match s.runtime.delete(&s.container) {
        Ok(out) if out.success() => println!("container deleted"),
        Ok(out) => warn!("failed to delete `{}`: {}", s.container, out.stderr),
        Err(e) => warn!("failed to delete `{}`: {e:#}", s.container),
    }

    Ok(())
}
