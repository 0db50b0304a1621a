//! SiLabs `commander` wrapper
//!
//! Implements the core's [`PackagingTool`] trait by shelling out to the
//! Simplicity Commander executable:
//!
//! ```text
//! commander nvm3 initfile --address <hex> --size 0x6000 --device <part> --outfile <path>
//! commander nvm3 set <initfile> --nvm3file <path> --outfile <path>
//! ```
//!
//! Both calls are synchronous with no timeout; a stuck tool blocks the
//! run, which is an accepted operational risk for a batch CLI.
//! Commander reports some failures on stdout with a zero exit code, so
//! output is also scanned for the substring "error" (case-insensitive).

use sidpage_core::error::{Error, Result};
use sidpage_core::output::s37::PackagingTool;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Locator for the commander executable
pub struct Commander {
    program: PathBuf,
}

impl Commander {
    /// Use `commander` from PATH
    pub fn from_path() -> Commander {
        Commander {
            program: PathBuf::from("commander"),
        }
    }

    /// Use a commander installation directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Commander {
        Commander {
            program: dir.as_ref().join("commander"),
        }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let cmd_line = format!("{} {}", self.program.display(), args.join(" "));
        log::debug!("running: {cmd_line}");

        let output = Command::new(&self.program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ToolNotFound(self.program.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        for line in stdout.lines().chain(stderr.lines()) {
            log::debug!("commander: {line}");
        }

        if !output.status.success() || contains_error(&stdout) || contains_error(&stderr) {
            return Err(Error::ToolFailed {
                cmd: cmd_line,
                stdout,
                stderr,
            });
        }
        Ok(())
    }
}

/// Commander can exit zero while printing an error line
fn contains_error(text: &str) -> bool {
    text.to_lowercase().contains("error")
}

impl PackagingTool for Commander {
    fn make_initfile(&self, part: &str, address: u32, size: u32, outfile: &Path) -> Result<()> {
        let address = format!("0x{address:08X}");
        let size = format!("0x{size:X}");
        let outfile = outfile.display().to_string();
        self.run(&[
            "nvm3", "initfile", "--address", &address, "--size", &size, "--device", part,
            "--outfile", &outfile,
        ])
    }

    fn merge_nvm3(&self, initfile: &Path, nvm3_file: &Path, outfile: &Path) -> Result<()> {
        let initfile = initfile.display().to_string();
        let nvm3_file = nvm3_file.display().to_string();
        let outfile = outfile.display().to_string();
        self.run(&[
            "nvm3", "set", &initfile, "--nvm3file", &nvm3_file, "--outfile", &outfile,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_substring_scan() {
        assert!(contains_error("ERROR: flash locked"));
        assert!(contains_error("Parsing error near line 3"));
        assert!(!contains_error("Writing 24576 bytes"));
    }

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let commander = Commander::from_dir("/nonexistent/tools");
        let dir = tempfile::tempdir().unwrap();
        let err = commander
            .make_initfile("EFR32MG21B020F1024IM32", 0xF2000, 0x6000, &dir.path().join("i.s37"))
            .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }
}
