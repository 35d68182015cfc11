use crate::engine::Resolution;
use crate::CoreError;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use tracing::{debug, info, warn};

pub const ENV_VERSION: &str = "BUILDVER_VERSION";
pub const ENV_BUILD_ROOT: &str = "BUILDVER_BUILD_ROOT";
pub const ENV_FINGERPRINT: &str = "BUILDVER_FINGERPRINT";

/// Everything an external build, install, or provisioning command receives
/// from a resolution.
#[derive(Debug, Clone)]
pub struct Handoff {
    pub version: String,
    pub build_root: PathBuf,
    pub fingerprint: String,
    pub exports: Vec<(String, String)>,
}

impl Handoff {
    /// Fails if the resolution yields no version; nothing is spawned then.
    pub fn from_resolution(resolution: &Resolution) -> Result<Self, CoreError> {
        let version = resolution.version()?.to_owned();
        let exports = resolution
            .configuration
            .entries()
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect();
        Ok(Self {
            version,
            build_root: resolution.build_root.clone(),
            fingerprint: resolution.identity.fingerprint.to_string(),
            exports,
        })
    }

    /// Build the collaborator command. Resolved entries are exported first so
    /// the `BUILDVER_*` variables always win.
    pub fn command(&self, argv: &[String]) -> Result<Command, CoreError> {
        let (program, args) = argv.split_first().ok_or(CoreError::EmptyCommand)?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.build_root);
        for (k, v) in &self.exports {
            cmd.env(k, v);
        }
        cmd.env(ENV_VERSION, &self.version)
            .env(ENV_BUILD_ROOT, &self.build_root)
            .env(ENV_FINGERPRINT, &self.fingerprint);
        Ok(cmd)
    }

    /// Run the collaborator to completion and return its exit code.
    pub fn run(&self, argv: &[String]) -> Result<u8, CoreError> {
        let mut cmd = self.command(argv)?;
        info!(
            "running '{}' with version {} in {}",
            argv.join(" "),
            self.version,
            self.build_root.display()
        );
        let status = cmd.status().map_err(|source| CoreError::Spawn {
            program: argv[0].clone(),
            source,
        })?;
        let code = exit_code(status);
        if code == 0 {
            debug!("collaborator exited successfully");
        } else {
            warn!("collaborator exited with status {code}");
        }
        Ok(code)
    }
}

fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return u8::try_from(128 + sig).unwrap_or(1);
        }
    }
    1
}
