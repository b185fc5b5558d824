use std::fmt;
use std::io;
use std::process::{Command, Stdio};

use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Container tool every action shells out to.
pub const CONTAINER_TOOL: &str = "docker";
pub const DEFAULT_IMAGE: &str = "project3-app";
pub const DEFAULT_TAG: &str = "latest";

/// Command-line surface: `devopsctl build|push [--image NAME] [--tag TAG]`.
#[derive(Debug, Clone, Parser)]
#[command(name = "devopsctl")]
#[command(about = "Build or push the project3 container image", long_about = None)]
pub struct Cli {
    /// What to do with the image
    #[arg(value_enum)]
    pub action: Action,
    /// Image name
    #[arg(long, env = "IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,
    /// Image tag
    #[arg(long, env = "TAG", default_value = DEFAULT_TAG)]
    pub tag: String,
}

impl Cli {
    pub fn image_ref(&self) -> ImageRef {
        ImageRef::new(&self.image, &self.tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Build the image from the current directory
    Build,
    /// Push the image to its registry
    Push,
}

/// `<image>:<tag>` reference handed to the container tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub image: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new(image: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.image, self.tag)
    }
}

/// A single external program call: program name plus argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Maps an action onto the container tool's argument vector.
    pub fn for_action(action: Action, image: &ImageRef) -> Self {
        let args = match action {
            Action::Build => vec![
                "build".to_owned(),
                "-t".to_owned(),
                image.to_string(),
                ".".to_owned(),
            ],
            Action::Push => vec!["push".to_owned(), image.to_string()],
        };

        Self {
            program: CONTAINER_TOOL.to_owned(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    /// Renders as `> program arg1 arg2`, the line echoed before execution.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "> {}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Errors surfaced when the external tool cannot run or reports failure.
#[derive(Debug, Error)]
pub enum DevopsError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {}", describe_code(.code))]
    ToolFailed { program: String, code: Option<i32> },
}

impl DevopsError {
    /// Process exit code to report: the tool's own code when it has one, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            DevopsError::ToolFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_owned(),
    }
}

/// Runs an [`Invocation`] to completion.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), DevopsError>;
}

/// Spawns the program with inherited stdio and blocks until it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), DevopsError> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DevopsError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DevopsError::ToolFailed {
                program: invocation.program.clone(),
                code: status.code(),
            })
        }
    }
}

/// Echoes the command line for the parsed arguments and runs it exactly once.
pub fn execute<R: CommandRunner>(cli: &Cli, runner: &R) -> Result<(), DevopsError> {
    let image = cli.image_ref();
    tracing::debug!(action = ?cli.action, %image, "resolved image reference");

    let invocation = Invocation::for_action(cli.action, &image);
    println!("{invocation}");

    runner.run(&invocation)
}
