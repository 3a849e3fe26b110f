//! Assembles the final ELF32 image: file header, one `PT_LOAD` program
//! header, then the code segment.
//!
//! # File layout
//!
//! ```text
//! offset 0    Elf32_Ehdr   (52 bytes)
//! offset 52   Elf32_Phdr   (32 bytes)
//! offset 84   code segment (code_len bytes, from `codegen::emit`)
//! ```
//!
//! The load address is fixed at `0x08048000`; the entry point and the
//! segment's virtual address both land right after the headers, at
//! `0x08048054`. There is exactly one segment, so the file itself
//! *is* the process image from `p_offset` onward — no relocation, no
//! section headers, no symbol table.

const EHDR_SIZE: u32 = 52;
const PHDR_SIZE: u32 = 32;
const LOAD_BASE: u32 = 0x0804_8000;
const ENTRY: u32 = LOAD_BASE + EHDR_SIZE + PHDR_SIZE;

const ELFCLASS32: u8 = 1;
const ELFDATA2LSB: u8 = 1;
const EV_CURRENT: u8 = 1;
const ELFOSABI_SYSV: u8 = 0;
/// Size of `e_ident`. The reference compiler writes this constant
/// into the array's own last padding byte instead of a zero; kept
/// for byte-exact compatibility with its output.
const EI_NIDENT: u8 = 16;

const ET_EXEC: u16 = 2;
const EM_386: u16 = 3;

const PT_LOAD: u32 = 1;
const PF_R: u32 = 4;
const PF_X: u32 = 1;

/// Assembles `code` (the output of [`crate::compiler::codegen::emit`])
/// into a complete ELF32 executable image.
#[must_use]
pub fn assemble(code: &[u8]) -> Vec<u8> {
    let code_len = u32::try_from(code.len()).expect("code segment fits in 32 bits");

    let mut file = Vec::with_capacity((EHDR_SIZE + PHDR_SIZE) as usize + code.len());
    write_ehdr(&mut file);
    write_phdr(&mut file, code_len);
    file.extend_from_slice(code);
    file
}

fn write_ehdr(out: &mut Vec<u8>) {
    out.extend_from_slice(&[
        0x7f, b'E', b'L', b'F', // e_ident magic
        ELFCLASS32,
        ELFDATA2LSB,
        EV_CURRENT,
        ELFOSABI_SYSV,
        0, 0, 0, 0, 0, 0, 0, EI_NIDENT, // e_ident padding
    ]);
    out.extend_from_slice(&ET_EXEC.to_le_bytes()); // e_type
    out.extend_from_slice(&EM_386.to_le_bytes()); // e_machine
    out.extend_from_slice(&1u32.to_le_bytes()); // e_version
    out.extend_from_slice(&ENTRY.to_le_bytes()); // e_entry
    out.extend_from_slice(&EHDR_SIZE.to_le_bytes()); // e_phoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_shoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    out.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes()); // e_ehsize
    out.extend_from_slice(&(PHDR_SIZE as u16).to_le_bytes()); // e_phentsize
    out.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
    out.extend_from_slice(&40u16.to_le_bytes()); // e_shentsize
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx

    debug_assert_eq!(out.len() as u32, EHDR_SIZE);
}

fn write_phdr(out: &mut Vec<u8>, code_len: u32) {
    let start = out.len();

    out.extend_from_slice(&PT_LOAD.to_le_bytes()); // p_type
    out.extend_from_slice(&(EHDR_SIZE + PHDR_SIZE).to_le_bytes()); // p_offset
    out.extend_from_slice(&ENTRY.to_le_bytes()); // p_vaddr
    out.extend_from_slice(&0u32.to_le_bytes()); // p_paddr
    out.extend_from_slice(&code_len.to_le_bytes()); // p_filesz
    out.extend_from_slice(&code_len.to_le_bytes()); // p_memsz
    out.extend_from_slice(&(PF_R | PF_X).to_le_bytes()); // p_flags
    out.extend_from_slice(&0x1000u32.to_le_bytes()); // p_align

    debug_assert_eq!((out.len() - start) as u32, PHDR_SIZE);
}
