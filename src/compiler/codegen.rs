//! Translates a folded [`OpList`] into i386 machine code.
//!
//! # Runtime convention
//!
//! `ECX` is the data pointer into the cell array; `EAX`, `EBX`, `EDX`
//! are syscall scratch. The cell array lives on the stack as 32 768
//! 16-bit slots (only the low byte of each slot is ever touched), so
//! `CellAdd`/`CellSub` scale their operand by 2 while `AsciiAdd`/
//! `AsciiSub`/`Out`/`In` address `[ecx]` as a plain byte.
//!
//! # Byte layout
//!
//! ```text
//! [ 18-byte prologue: zero the cell array, ecx = &cells[0], edx = 1 ]
//! [ one sequence per op, see `emit_op` ]
//! [ 6-byte epilogue: exit(0) ]
//! ```
//!
//! Loop fixups: `LoopBegin` emits a `cmp`+`jz` whose `rel32` is
//! unknown until the matching `LoopEnd` is reached, so it is written
//! as zero and patched in place once the loop body's length is known.
//! The reverse branch at `LoopEnd` is always fully known at emit time,
//! so it picks the narrowest (`rel8`) encoding that fits.

use crate::compiler::addrstack::AddrStack;
use crate::compiler::error::{Error, Result};
use crate::compiler::ops::{OpKind, OpList};

/// Zeroes the cell array (32 768 16-bit slots) and sets up `ecx`/`edx`.
const PROLOGUE: [u8; 18] = [
    0x66, 0x6a, 0x00, // push word 0
    0x89, 0xe1, // mov ecx, esp
    0xb2, 0x01, // mov dl, 1
    0x66, 0xb8, 0xff, 0x7f, // mov ax, 0x7fff
    0x66, 0x6a, 0x00, // push word 0
    0x66, 0x48, // dec ax
    0x75, 0xf9, // jnz -7
];

/// `exit(0)`.
const EPILOGUE: [u8; 6] = [0xb0, 0x01, 0xb3, 0x00, 0xcd, 0x80];

const OUT: [u8; 6] = [0xb0, 0x04, 0xb3, 0x01, 0xcd, 0x80];
const IN: [u8; 6] = [0xb0, 0x03, 0xb3, 0x00, 0xcd, 0x80];

/// Emit the full code segment for `list`: prologue, one sequence per
/// op, epilogue.
///
/// # Errors
///
/// Errors if more than 100 `[` are open at once during emission.
pub fn emit(list: &OpList) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(9 * list.len() + PROLOGUE.len() + EPILOGUE.len());
    buf.extend_from_slice(&PROLOGUE);

    let mut loops = AddrStack::new();
    for node in list.nodes() {
        match node.kind {
            OpKind::CellAdd => emit_cell_move(&mut buf, node.arg, [0x83, 0xe9], [0x81, 0xe9]),
            OpKind::CellSub => emit_cell_move(&mut buf, node.arg, [0x83, 0xc1], [0x81, 0xc1]),
            OpKind::AsciiAdd => emit_ascii_op(&mut buf, node.arg, 0xfe, 0x01, 0x80, 0x01),
            OpKind::AsciiSub => emit_ascii_op(&mut buf, node.arg, 0xfe, 0x09, 0x80, 0x29),
            OpKind::Out => buf.extend_from_slice(&OUT),
            OpKind::In => buf.extend_from_slice(&IN),
            OpKind::LoopBegin => emit_loop_begin(&mut buf, &mut loops)?,
            OpKind::LoopEnd => emit_loop_end(&mut buf, &mut loops),
        }
    }

    buf.extend_from_slice(&EPILOGUE);
    Ok(buf)
}

/// `sub ecx, 2*arg` / `add ecx, 2*arg`, picking an 8- or 32-bit
/// immediate depending on magnitude.
fn emit_cell_move(buf: &mut Vec<u8>, arg: u32, imm8_opcode: [u8; 2], imm32_opcode: [u8; 2]) {
    let operand = 2u32.saturating_mul(arg);
    if operand < 0x80 {
        buf.extend_from_slice(&imm8_opcode);
        buf.push(operand as u8);
    } else {
        buf.extend_from_slice(&imm32_opcode);
        buf.extend_from_slice(&operand.to_le_bytes());
    }
}

/// `inc`/`dec byte [ecx]` for `arg == 1`, `add`/`sub byte [ecx], arg`
/// otherwise.
fn emit_ascii_op(
    buf: &mut Vec<u8>,
    arg: u32,
    inc_dec_opcode: u8,
    inc_dec_modrm: u8,
    add_sub_opcode: u8,
    add_sub_modrm: u8,
) {
    debug_assert!(arg > 0 && arg < 256, "zero/wrapped nodes are pruned by OpList");
    if arg == 1 {
        buf.push(inc_dec_opcode);
        buf.push(inc_dec_modrm);
    } else {
        buf.push(add_sub_opcode);
        buf.push(add_sub_modrm);
        buf.push(arg as u8);
    }
}

/// `cmp byte [ecx], 0; jz rel32` with the `rel32` left as a zeroed
/// placeholder, patched once the matching `LoopEnd` is emitted.
fn emit_loop_begin(buf: &mut Vec<u8>, loops: &mut AddrStack) -> Result<()> {
    buf.extend_from_slice(&[0x80, 0x39, 0x00, 0x0f, 0x84, 0x00, 0x00, 0x00, 0x00]);
    let after = u32::try_from(buf.len()).expect("code segment fits in 32 bits");
    if !loops.push(after) {
        return Err(Error::TooManyLoops);
    }
    Ok(())
}

/// `cmp byte [ecx], 0; jnz rel8|rel32` back to the loop body, then
/// patches the forward `rel32` left by the matching `LoopBegin`.
fn emit_loop_end(buf: &mut Vec<u8>, loops: &mut AddrStack) {
    let loop_begin_end = i64::from(loops.pop());
    let curaddr = i64::try_from(buf.len()).expect("code segment fits in 64 bits");

    buf.extend_from_slice(&[0x80, 0x39, 0x00]);

    let mut rel_dis = loop_begin_end - curaddr - 5;
    if let Ok(disp8) = i8::try_from(rel_dis) {
        buf.push(0x75);
        buf.push(disp8 as u8);
    } else {
        rel_dis -= 4;
        let disp32 = i32::try_from(rel_dis).expect("loop body shorter than 2^31 bytes");
        buf.extend_from_slice(&[0x0f, 0x85]);
        buf.extend_from_slice(&disp32.to_le_bytes());
    }

    let new_curaddr = u32::try_from(buf.len()).expect("code segment fits in 32 bits");
    let loop_begin_end = u32::try_from(loop_begin_end).expect("computed from a valid offset");
    let forward = new_curaddr - loop_begin_end;
    let patch_at = (loop_begin_end - 4) as usize;
    buf[patch_at..patch_at + 4].copy_from_slice(&forward.to_le_bytes());
}
