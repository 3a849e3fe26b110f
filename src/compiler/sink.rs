//! Short-write-tolerant output.
//!
//! [`std::io::Write::write_all`] already loops internally on most
//! platforms, but the core's contract is stricter than the standard
//! library's: a sink that only accepts part of a buffer on one call
//! (a pipe, a slow device, a mock in a test) must still see the whole
//! image written, by retrying with the unwritten suffix. This is the
//! only retry anywhere in the compiler.

use std::io::{self, Write};

/// Writes the whole of `buf` to `sink`, retrying after every short
/// write. Interrupted writes ([`io::ErrorKind::Interrupted`]) are
/// retried too; any other error is returned immediately.
pub fn write_all_retrying<W: Write>(sink: &mut W, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match sink.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole buffer",
                ));
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
