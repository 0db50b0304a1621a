//! S37 firmware image backend (SiLabs)
//!
//! Two-phase external-tool flow: create an empty NVM3 init container for
//! the chip's base address, then merge the object stream into it. The
//! tool itself is behind the [`PackagingTool`] trait so the sequencing
//! and cleanup logic is testable without the vendor binary installed.

use crate::chip::ChipDescriptor;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Fixed NVM3 region size passed to the init-container step
pub const NVM3_REGION_SIZE: u32 = 0x6000;

/// Narrow capability interface over the vendor packaging executable
pub trait PackagingTool {
    /// Create an empty NVM3 container for `part` at `address`
    fn make_initfile(&self, part: &str, address: u32, size: u32, outfile: &Path) -> Result<()>;

    /// Merge an NVM3 object stream into a container, producing the image
    fn merge_nvm3(&self, initfile: &Path, nvm3_file: &Path, outfile: &Path) -> Result<()>;
}

/// Produce a flashable `.s37` image from an NVM3 object stream.
///
/// The intermediate init container is removed on every exit path.
pub fn write_s37(
    tool: &dyn PackagingTool,
    chip: &ChipDescriptor,
    nvm3_file: &Path,
    outfile: &Path,
) -> Result<()> {
    let initfile = outfile.with_extension("init.s37");

    let result = (|| {
        tool.make_initfile(chip.full_part_name, chip.base_address, NVM3_REGION_SIZE, &initfile)?;
        tool.merge_nvm3(&initfile, nvm3_file, outfile)
    })();

    if initfile.exists() {
        if let Err(e) = fs::remove_file(&initfile) {
            log::warn!("failed to remove init container {}: {e}", initfile.display());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{resolve, Platform};
    use crate::error::Error;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTool {
        calls: RefCell<Vec<String>>,
        fail_merge: bool,
    }

    impl PackagingTool for RecordingTool {
        fn make_initfile(&self, part: &str, address: u32, size: u32, outfile: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("init {part} 0x{address:08x} 0x{size:x}"));
            fs::write(outfile, b"init")?;
            Ok(())
        }

        fn merge_nvm3(&self, initfile: &Path, nvm3_file: &Path, outfile: &Path) -> Result<()> {
            assert!(initfile.exists());
            self.calls.borrow_mut().push(format!(
                "merge {} {}",
                nvm3_file.display(),
                outfile.display()
            ));
            if self.fail_merge {
                return Err(Error::ToolFailed {
                    cmd: "merge".into(),
                    stdout: "ERROR: no bootloader".into(),
                    stderr: String::new(),
                });
            }
            fs::write(outfile, b"image")?;
            Ok(())
        }
    }

    #[test]
    fn test_two_phase_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let nvm3 = dir.path().join("mfg.nvm3");
        let out = dir.path().join("mfg.s37");
        fs::write(&nvm3, "0x0026:OBJ:41423132").unwrap();

        let chip = resolve(Platform::SiLabs, Some("mg21"), None).unwrap();
        let tool = RecordingTool::default();
        write_s37(&tool, chip, &nvm3, &out).unwrap();

        let calls = tool.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], "init EFR32MG21B020F1024IM32 0x000f2000 0x6000");
        assert!(calls[1].starts_with("merge"));

        assert!(out.exists());
        // Init container is cleaned up after a successful run
        assert!(!out.with_extension("init.s37").exists());
    }

    #[test]
    fn test_cleanup_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let nvm3 = dir.path().join("mfg.nvm3");
        let out = dir.path().join("mfg.s37");
        fs::write(&nvm3, "").unwrap();

        let chip = resolve(Platform::SiLabs, Some("mg24"), None).unwrap();
        let tool = RecordingTool {
            fail_merge: true,
            ..Default::default()
        };
        let err = write_s37(&tool, chip, &nvm3, &out).unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));

        // Init container removed even though the merge failed
        assert!(!out.with_extension("init.s37").exists());
    }
}
