use clap::{ArgAction, Parser, Subcommand};

/// container-smoke command-line interface
#[derive(Parser, Debug, Clone)]
#[command(name = "container-smoke", version, about = "Smoke-test prebuilt container images via an external container runtime", long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Container runtime program to drive (defaults to `container`)
    #[arg(long, value_name = "PROGRAM", global = true)]
    pub runtime: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Smoke-test a PostgreSQL image: start, wait for readiness, run SQL, inspect, tear down
    Postgres {
        /// Image reference to test
        #[arg(long, value_name = "REF")]
        image: Option<String>,

        /// Container name for this session (defaults to a pid-suffixed name)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },

    /// Smoke-test a Rust toolchain image: compile and run a staged program
    Toolchain {
        /// Image reference to test
        #[arg(long, value_name = "REF")]
        image: Option<String>,

        /// Container name for this session (defaults to a pid-suffixed name)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },
}
