// Helpers for generating a stub container-runtime executable. Each test
// writes a small shell script standing in for the real runtime and points
// the binary at it with `--runtime`.

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable stub runtime script into `dir`. `__STATE__` in the
/// body is replaced with the state directory path so the script can record
/// what it was asked to do.
pub fn install(dir: &Path, body: &str) -> PathBuf {
    let state = dir.join("state");
    fs::create_dir_all(&state).unwrap();

    let path = dir.join("container-stub");
    fs::write(&path, body.replace("__STATE__", &state.to_string_lossy())).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    path
}

/// Lines of a state file recorded by the stub, empty when absent.
pub fn recorded(dir: &Path, name: &str) -> Vec<String> {
    fs::read_to_string(dir.join("state").join(name))
        .map(|s| s.lines().map(ToString::to_string).collect())
        .unwrap_or_default()
}

/// Seed a state file before the run (e.g. a readiness threshold).
pub fn seed(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join("state").join(name), contents).unwrap();
}

/// Stub driving the PostgreSQL suite. Readiness succeeds once the probe
/// count reaches the seeded `ready_after` threshold (default 1); inserted
/// rows are echoed back by `SELECT *`; stop/delete append to `teardown`.
pub const POSTGRES_STUB: &str = r#"#!/bin/sh
state="__STATE__"
cmd="$1"; shift
case "$cmd" in
  images)
    echo "chainguard/postgres  latest  sha256:stub  linux/arm64"
    ;;
  run)
    echo "stub-container-id"
    ;;
  exec)
    name="$1"; shift
    tool="$1"; shift
    case "$tool" in
      pg_isready)
        n=$(cat "$state/attempts" 2>/dev/null || echo 0)
        n=$((n + 1))
        echo "$n" > "$state/attempts"
        ready_after=$(cat "$state/ready_after" 2>/dev/null || echo 1)
        [ "$n" -ge "$ready_after" ] || exit 1
        echo "accepting connections"
        ;;
      psql)
        sql=""
        for a in "$@"; do sql="$a"; done
        case "$sql" in
          "SELECT version();")
            echo "PostgreSQL 16.2 (stub build)"
            ;;
          "CREATE TABLE"*)
            echo "CREATE TABLE"
            ;;
          "INSERT INTO"*)
            echo "smoke_record" >> "$state/rows"
            echo "INSERT 0 1"
            ;;
          "SELECT * FROM"*)
            cat "$state/rows" 2>/dev/null
            ;;
          *)
            echo "unexpected sql: $sql" >&2
            exit 1
            ;;
        esac
        ;;
      *)
        echo "unexpected exec tool: $tool" >&2
        exit 1
        ;;
    esac
    ;;
  inspect)
    echo '[{"configuration":{"id":"stub-id","architecture":"arm64"},"status":"running","networks":[{"address":"192.168.64.9/24"}]}]'
    ;;
  stop)
    echo stop >> "$state/teardown"
    if [ -f "$state/teardown_fails" ]; then exit 1; fi
    ;;
  delete)
    echo delete >> "$state/teardown"
    if [ -f "$state/teardown_fails" ]; then exit 1; fi
    ;;
  *)
    echo "unexpected command: $cmd" >&2
    exit 2
    ;;
esac
exit 0
"#;

/// Stub driving the toolchain suite. `run` invocations dispatch on the
/// final argument, the fixed shell script text.
pub const TOOLCHAIN_STUB: &str = r#"#!/bin/sh
state="__STATE__"
cmd="$1"; shift
case "$cmd" in
  images)
    echo "chainguard/rust  latest  sha256:stub  linux/arm64"
    ;;
  run)
    script=""
    for a in "$@"; do script="$a"; done
    case "$script" in
      "rustc --version")
        echo "rustc 1.89.0 (stub)"
        ;;
      "rustc hello.rs -o hello")
        ;;
      "./hello")
        echo "hello from the toolchain smoke test"
        ;;
      "cargo --version")
        if [ -f "$state/no_cargo" ]; then
          echo "sh: cargo: not found" >&2
          exit 127
        fi
        echo "cargo 1.89.0 (stub)"
        ;;
      "rustc src/main.rs -O -o hello-optimized")
        ;;
      "./hello-optimized")
        echo "hello from the toolchain smoke test"
        ;;
      "uname -a")
        echo "Linux stub 6.8.0 aarch64"
        ;;
      "rustc --version && echo 'targets:' && rustc --print target-list | head -5")
        echo "rustc 1.89.0 (stub)"
        echo "targets:"
        echo "aarch64-unknown-linux-gnu"
        ;;
      *)
        echo "unexpected run script: $script" >&2
        exit 1
        ;;
    esac
    ;;
  stop|delete)
    echo "$cmd" >> "$state/teardown"
    ;;
  *)
    echo "unexpected command: $cmd" >&2
    exit 2
    ;;
esac
exit 0
"#;
