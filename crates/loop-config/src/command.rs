//! Launch descriptions for LOOP executables.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Describes how to start a LOOP executable.
///
/// The environment list is appended on top of the inherited parent
/// environment when converted with [`LoopCommand::to_command`]. Each
/// descriptor owns its list, so clones never observe each other's changes.
/// Values are OS strings so forwarded host variables survive unchanged even
/// when they are not valid Unicode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopCommand {
    program: PathBuf,
    env: Vec<(String, OsString)>,
}

impl LoopCommand {
    /// Creates a descriptor for `program` with an empty environment list.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            env: Vec::new(),
        }
    }

    /// Executable path or name resolved through `PATH`.
    #[must_use]
    pub fn program(&self) -> &Path {
        self.program.as_path()
    }

    /// Appends an assignment to the environment list.
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<OsString>) -> &mut Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Assignments in the order they were appended.
    #[must_use]
    pub fn env_vars(&self) -> &[(String, OsString)] {
        &self.env
    }

    /// Returns the effective value for `key`; later assignments win.
    #[must_use]
    pub fn get_env_os(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_os_str())
    }

    /// Like [`LoopCommand::get_env_os`], but `None` also covers values that
    /// are not valid Unicode.
    #[must_use]
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.get_env_os(key).and_then(OsStr::to_str)
    }

    /// Builds a [`Command`] that inherits the parent environment plus the
    /// assignments held by this descriptor.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.envs(self.env.iter().map(|(key, value)| (key, value)));
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_assignments_override_earlier_ones() {
        let mut command = LoopCommand::new("/bin/true");
        command.env("CL_DEV", "false").env("CL_DEV", "true");
        assert_eq!(command.get_env("CL_DEV"), Some("true"));
        assert_eq!(command.env_vars().len(), 2);
    }

    #[test]
    fn to_command_carries_program_and_environment() {
        let mut command = LoopCommand::new("/bin/true");
        command.env("CL_LOG_LEVEL", "warn");
        let std_command = command.to_command();
        assert_eq!(std_command.get_program(), "/bin/true");
        let envs: Vec<_> = std_command.get_envs().collect();
        assert_eq!(envs.len(), 1);
        let (key, value) = envs.first().copied().expect("one assignment");
        assert_eq!(key, "CL_LOG_LEVEL");
        assert_eq!(value.and_then(|v| v.to_str()), Some("warn"));
    }

    #[test]
    fn clones_do_not_share_environment() {
        let original = LoopCommand::new("/bin/true");
        let mut copy = original.clone();
        copy.env("CL_LOG_COLOR", "true");
        assert!(original.env_vars().is_empty());
        assert_eq!(copy.get_env("CL_LOG_COLOR"), Some("true"));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_values_are_kept_verbatim() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![0x66, 0xff, 0x6f]);
        let mut command = LoopCommand::new("/bin/true");
        command.env("CL_LOG_COLOR", raw.clone());
        assert_eq!(command.get_env_os("CL_LOG_COLOR"), Some(raw.as_os_str()));
        assert_eq!(command.get_env("CL_LOG_COLOR"), None);
        let std_command = command.to_command();
        let forwarded = std_command.get_envs().find_map(|(key, value)| {
            (key == "CL_LOG_COLOR").then_some(value).flatten()
        });
        assert_eq!(forwarded, Some(raw.as_os_str()));
    }
}
