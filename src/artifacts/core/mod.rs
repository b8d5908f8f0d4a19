//! Shared plumbing: error kinds and the pager writer

pub mod error;

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// `std::io::Write` adapter over a minus [`Pager`]
///
/// Commands write to a boxed writer owned by the repository; handing them
/// one of these routes long output (log, mainly) through the pager
/// instead of stdout. `minus` only accepts UTF-8 text, so non-UTF-8 bytes
/// fail the write.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(text).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
