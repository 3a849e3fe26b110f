pub mod cli;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use brainelf::compiler;
use brainelf::compiler::sink;

/// Reads `input_path`, compiles it, and writes the resulting ELF32
/// executable to `output_path` with the executable bit set.
///
/// Returns the process exit code to use on failure: 2 if the input
/// can't be read, 3 if it fails to compile, 4 if the output can't be
/// written.
pub fn build(output_path: &Path, input_path: &Path) -> Result<(), i32> {
    let src = fs::read(input_path).map_err(|err| {
        eprintln!("error: cannot read '{}': {err}", input_path.display());
        2
    })?;

    let image = compiler::compile(&src).map_err(|err| {
        eprintln!("{err}");
        3
    })?;

    write_executable(output_path, &image).map_err(|err| {
        eprintln!("error: cannot write '{}': {err}", output_path.display());
        4
    })?;

    Ok(())
}

fn write_executable(output_path: &Path, image: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(output_path)?;
    sink::write_all_retrying(&mut file, image)?;
    file.set_permissions(fs::Permissions::from_mode(0o755))
}
