//! External command gateway.
//!
//! Every snapper interaction goes through one typed builder
//! ([`SnapperCommand`]) and one runner ([`CommandRunner`]):
//! - `snapper --no-dbus list-configs` for the configuration probe
//! - `snapper --no-dbus -c <config> list` for listings
//! - `installation-helper --step <n> --snapshot-type ...` for creation
//!
//! Arguments are passed as an argv vector, no shell is involved.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::snapshot::{CreateOptions, SnapshotType};

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn envs(&self) -> &[(String, String)] {
        &self.env
    }

    /// True if `flag` is present and immediately followed by `value`.
    pub fn has_option(&self, flag: &str, value: &str) -> bool {
        self.args
            .windows(2)
            .any(|pair| pair[0] == flag && pair[1] == value)
    }
}

/// Shell-like rendering, only used for log messages.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={value} ")?;
        }
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn exited(code: i32, stdout: impl Into<String>) -> Self {
        CommandOutput {
            status: Some(code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("exit code {code}"),
            None => "a signal".to_string(),
        }
    }
}

/// Runs external commands and captures their output.
///
/// Blocks until the command finishes; there is no timeout.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        (**self).run(invocation)
    }
}

/// Runs commands on the local system with `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        let output = Command::new(invocation.program())
            .args(invocation.args())
            .envs(invocation.envs().iter().map(|(k, v)| (k, v)))
            .output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// The snapper operations this crate needs.
#[derive(Debug, Clone, Copy)]
pub enum SnapperCommand<'a> {
    ListConfigs,
    List,
    Create {
        kind: SnapshotType,
        description: &'a str,
        pre_number: Option<u32>,
        options: &'a CreateOptions,
    },
}

impl SnapperCommand<'_> {
    pub fn invocation(&self, config: &Config) -> Invocation {
        match self {
            SnapperCommand::ListConfigs => Invocation::new(&config.snapper)
                .arg("--no-dbus")
                .arg("list-configs"),
            SnapperCommand::List => Invocation::new(&config.snapper)
                .env("LANG", &config.locale)
                .arg("--no-dbus")
                .arg("-c")
                .arg(&config.config_name)
                .arg("list"),
            SnapperCommand::Create {
                kind,
                description,
                pre_number,
                options,
            } => {
                let mut invocation = Invocation::new(&config.installation_helper)
                    .arg("--step")
                    .arg(config.step.to_string())
                    .arg("--snapshot-type")
                    .arg(kind.as_str())
                    .arg("--description")
                    .arg(*description);

                if let Some(pre) = pre_number {
                    invocation = invocation.arg("--pre-num").arg(pre.to_string());
                }
                if let Some(cleanup) = &options.cleanup {
                    invocation = invocation.arg("--cleanup").arg(cleanup.as_str());
                }
                if options.important {
                    invocation = invocation.arg("--userdata").arg("important=yes");
                }

                invocation
            }
        }
    }
}

/// True if `list-configs` output has a row whose first column is `name`.
pub fn lists_config(output: &str, name: &str) -> bool {
    output.lines().any(|line| {
        line.split(['|', '│'])
            .next()
            .map(str::trim)
            .is_some_and(|first| first == name)
    })
}
