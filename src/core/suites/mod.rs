pub mod postgres;
pub mod toolchain;

use anyhow::Result;

use crate::core::runtime::{CmdOutput, RuntimeCli};

/// Session names carry the process id so concurrent runs on one host do
/// not fight over a container name.
pub(crate) fn default_name(prefix: &str) -> String {
    format!("{prefix}-{}", std::process::id())
}

/// Check the local image listing for `image`, producing a per-step output.
pub(crate) fn verify_image(runtime: &RuntimeCli, image: &str) -> Result<CmdOutput> {
    if runtime.image_present(image)? {
        println!("found {image}");
        Ok(CmdOutput::local(""))
    } else {
        Ok(CmdOutput {
            stdout: String::new(),
            stderr: format!("image {image} not found in local listing"),
            exit_code: 1,
        })
    }
}
