//! The compilation core: Brainfuck source bytes in, ELF32 executable
//! bytes out.
//!
//! ```text
//! src bytes --ops::parse--> OpList --codegen::emit--> code bytes --elf::assemble--> file bytes
//! ```
//!
//! Everything here is synchronous and single-pass; there is no
//! suspension point between stages, and no state outlives a single
//! [`compile`] call (see [`addrstack::AddrStack`], which is
//! constructed fresh inside [`codegen::emit`] rather than shared
//! across compilations).

pub mod addrstack;
pub mod codegen;
pub mod elf;
pub mod error;
pub mod ops;
pub mod sink;

pub use error::{Error, Result};
pub use ops::OpList;

/// Compiles a Brainfuck source buffer into a complete ELF32 i386
/// executable image.
///
/// # Errors
///
/// Returns [`Error::UnmatchedClose`] / [`Error::UnmatchedOpen`] on
/// unbalanced brackets, or [`Error::TooManyLoops`] if more than 100
/// `[` are ever open at once.
pub fn compile(src: &[u8]) -> Result<Vec<u8>> {
    let ops = OpList::parse(src)?;
    let code = codegen::emit(&ops)?;
    Ok(elf::assemble(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_compiles_to_the_documented_108_byte_file() {
        let file = compile(b"").unwrap();
        assert_eq!(file.len(), 108);
    }

    #[test]
    fn unmatched_close_propagates_as_an_error() {
        assert_eq!(compile(b"]").unwrap_err(), Error::UnmatchedClose(0));
    }

    #[test]
    fn unmatched_open_propagates_as_an_error() {
        assert_eq!(compile(b"[").unwrap_err(), Error::UnmatchedOpen(1));
    }

    #[test]
    fn too_many_loops_propagates_as_an_error() {
        let src = "[".repeat(101) + &"]".repeat(101);
        assert_eq!(compile(src.as_bytes()).unwrap_err(), Error::TooManyLoops);
    }

    #[test]
    fn output_is_a_valid_elf32_header_regardless_of_program_content() {
        let file = compile(b"++>,[-].<").unwrap();
        assert_eq!(&file[0..4], [0x7f, b'E', b'L', b'F']);
        let e_phnum = u16::from_le_bytes(file[44..46].try_into().unwrap());
        assert_eq!(e_phnum, 1);
    }
}
