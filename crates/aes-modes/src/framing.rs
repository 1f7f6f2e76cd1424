//! Block framing and PKCS#7 padding.
//!
//! A [`BlockSource`] hands out one 16-byte block at a time as a mutable view.
//! Whatever the caller leaves in that view is committed to the destination
//! before the next block is produced, or when the source is finished.

use std::io::{self, Read, Write};

use aes_core::{Block, BLOCK_LEN};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Padding policy applied by a block source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Padding {
    /// Input must already be block aligned.
    #[default]
    None,
    /// Append PKCS#7 padding after the input (encryption side).
    Pad,
    /// Strip PKCS#7 padding from the final block (decryption side).
    Depad,
}

/// Number of padding bytes appended to `len` bytes of input, always `1..=16`.
#[inline]
pub fn pad_len(len: usize) -> usize {
    BLOCK_LEN - len % BLOCK_LEN
}

/// Validates a padding count byte and returns it as a length.
///
/// Only the range is checked; the other padding bytes are not inspected.
pub fn check_padding(count: u8) -> Result<usize> {
    if count == 0 || usize::from(count) > BLOCK_LEN {
        return Err(Error::Padding { count });
    }
    Ok(usize::from(count))
}

/// A sequence of blocks that can be transformed in place.
pub trait BlockSource {
    /// Commits the previously pulled block and yields the next one.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    fn pull(&mut self) -> Result<Option<&mut Block>>;

    /// Commits the last block and applies any trailing padding policy.
    fn finish(&mut self) -> Result<()>;
}

/// Block source over an in-memory buffer, transformed in place.
#[derive(Debug)]
pub struct MemoryBlocks<'a> {
    data: &'a mut Vec<u8>,
    padding: Padding,
    offset: usize,
    finished: bool,
}

impl<'a> MemoryBlocks<'a> {
    /// Frames `data`, padding it up front when `padding` is [`Padding::Pad`].
    pub fn new(data: &'a mut Vec<u8>, padding: Padding) -> Result<Self> {
        if padding == Padding::Pad {
            let n = pad_len(data.len());
            trace!(len = data.len(), pad = n, "padding buffer");
            data.resize(data.len() + n, n as u8);
        } else if data.len() % BLOCK_LEN != 0 {
            return Err(Error::Alignment { len: data.len() });
        }
        Ok(Self {
            data,
            padding,
            offset: 0,
            finished: false,
        })
    }
}

impl BlockSource for MemoryBlocks<'_> {
    fn pull(&mut self) -> Result<Option<&mut Block>> {
        let start = self.offset;
        if start >= self.data.len() {
            return Ok(None);
        }
        self.offset += BLOCK_LEN;
        Ok(self.data[start..].first_chunk_mut::<BLOCK_LEN>())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        if self.padding == Padding::Depad {
            // An empty buffer has no count byte at all.
            let count = self.data.last().copied().unwrap_or(0);
            let n = check_padding(count)?;
            let len = self.data.len() - n;
            self.data.truncate(len);
        }
        debug!(
            blocks = self.offset / BLOCK_LEN,
            len = self.data.len(),
            padding = ?self.padding,
            "memory blocks finished"
        );
        Ok(())
    }
}

/// Block source reading from `src` and committing to `dst`, one block at a time.
///
/// One block of lookahead is kept so the final block is known before it is
/// handed out.
#[derive(Debug)]
pub struct StreamBlocks<R, W> {
    src: R,
    dst: W,
    padding: Padding,
    current: Block,
    lookahead: Option<(Block, usize)>,
    pending: bool,
    last: bool,
    done: bool,
    blocks: usize,
    written: u64,
}

impl<R: Read, W: Write> StreamBlocks<R, W> {
    /// Creates a stream framer. Nothing is read until the first pull.
    pub fn new(src: R, dst: W, padding: Padding) -> Self {
        Self {
            src,
            dst,
            padding,
            current: [0u8; BLOCK_LEN],
            lookahead: None,
            pending: false,
            last: false,
            done: false,
            blocks: 0,
            written: 0,
        }
    }

    /// Number of bytes committed to the destination so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Releases the underlying source and destination.
    pub fn into_inner(self) -> (R, W) {
        (self.src, self.dst)
    }

    fn commit(&mut self) -> Result<()> {
        if !self.pending {
            return Ok(());
        }
        self.pending = false;

        let mut len = BLOCK_LEN;
        if self.last && self.padding == Padding::Depad {
            len -= check_padding(self.current[BLOCK_LEN - 1])?;
        }
        self.dst.write_all(&self.current[..len])?;
        self.written += len as u64;
        Ok(())
    }
}

impl<R: Read, W: Write> BlockSource for StreamBlocks<R, W> {
    fn pull(&mut self) -> Result<Option<&mut Block>> {
        self.commit()?;
        if self.done {
            return Ok(None);
        }

        let (mut block, len) = match self.lookahead.take() {
            Some(read) => read,
            None => read_block(&mut self.src)?,
        };
        let next = read_block(&mut self.src)?;
        let at_end = next.1 == 0;
        self.lookahead = Some(next);

        if len < BLOCK_LEN {
            self.done = true;
            match self.padding {
                Padding::Pad => {
                    let n = BLOCK_LEN - len;
                    trace!(tail = len, pad = n, "padding final block");
                    block[len..].fill(n as u8);
                }
                Padding::Depad if len == 0 && self.blocks == 0 => {
                    return Err(Error::Padding { count: 0 });
                }
                _ if len == 0 => return Ok(None),
                _ => {
                    return Err(Error::Alignment {
                        len: self.blocks * BLOCK_LEN + len,
                    })
                }
            }
        } else if at_end && self.padding != Padding::Pad {
            // A full final block; under Pad a padding-only block still follows.
            self.done = true;
        }

        self.last = self.done;
        self.current = block;
        self.pending = true;
        self.blocks += 1;
        Ok(Some(&mut self.current))
    }

    fn finish(&mut self) -> Result<()> {
        self.commit()?;
        self.dst.flush()?;
        debug!(
            blocks = self.blocks,
            written = self.written,
            padding = ?self.padding,
            "stream blocks finished"
        );
        Ok(())
    }
}

// Fills a block from `src`, tolerating short reads. Returns the byte count,
// which is below BLOCK_LEN only at end of stream.
fn read_block<R: Read>(src: &mut R) -> io::Result<(Block, usize)> {
    let mut block = [0u8; BLOCK_LEN];
    let mut filled = 0;
    while filled < BLOCK_LEN {
        match src.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok((block, filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reader that hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    // Pulls every block without touching it, then finishes.
    fn drain(blocks: &mut dyn BlockSource) -> Result<usize> {
        let mut count = 0;
        while blocks.pull()?.is_some() {
            count += 1;
        }
        blocks.finish()?;
        Ok(count)
    }

    fn frame_stream(input: &[u8], padding: Padding, step: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut blocks = StreamBlocks::new(Trickle { data: input, step }, &mut out, padding);
        drain(&mut blocks)?;
        Ok(out)
    }

    #[test]
    fn pad_len_is_between_one_and_sixteen() {
        assert_eq!(pad_len(0), 16);
        assert_eq!(pad_len(1), 15);
        assert_eq!(pad_len(15), 1);
        assert_eq!(pad_len(16), 16);
        assert_eq!(pad_len(33), 15);
    }

    #[test]
    fn memory_pad_appends_count_bytes() {
        for len in 0..=40usize {
            let mut data = vec![0xaau8; len];
            let mut blocks = MemoryBlocks::new(&mut data, Padding::Pad).unwrap();
            let count = drain(&mut blocks).unwrap();
            let n = 16 - len % 16;
            assert_eq!(data.len(), len + n);
            assert_eq!(data.len() % 16, 0);
            assert_eq!(count, data.len() / 16);
            assert!(data[len..].iter().all(|&b| usize::from(b) == n));
        }
    }

    #[test]
    fn memory_none_rejects_misaligned_input() {
        let mut data = vec![0u8; 17];
        let err = MemoryBlocks::new(&mut data, Padding::None).unwrap_err();
        assert!(matches!(err, Error::Alignment { len: 17 }));

        let mut data = vec![0u8; 5];
        let err = MemoryBlocks::new(&mut data, Padding::Depad).unwrap_err();
        assert!(matches!(err, Error::Alignment { len: 5 }));
    }

    #[test]
    fn memory_depad_strips_count() {
        let mut data = b"YELLOW SUBMARINE".to_vec();
        data.extend_from_slice(&[4u8; 16][..]);
        data[16..28].copy_from_slice(b"twelve bytes");
        let mut blocks = MemoryBlocks::new(&mut data, Padding::Depad).unwrap();
        drain(&mut blocks).unwrap();
        assert_eq!(data, b"YELLOW SUBMARINEtwelve bytes");
    }

    #[test]
    fn memory_depad_rejects_out_of_range_counts() {
        for count in [0u8, 17, 0xff] {
            let mut data = vec![count; 32];
            let mut blocks = MemoryBlocks::new(&mut data, Padding::Depad).unwrap();
            let err = drain(&mut blocks).unwrap_err();
            assert!(matches!(err, Error::Padding { count: c } if c == count));
        }
    }

    #[test]
    fn memory_depad_of_empty_input_fails() {
        let mut data = Vec::new();
        let mut blocks = MemoryBlocks::new(&mut data, Padding::Depad).unwrap();
        assert!(matches!(
            drain(&mut blocks),
            Err(Error::Padding { count: 0 })
        ));
    }

    #[test]
    fn depad_checks_only_the_count_byte() {
        let mut data = vec![0u8; 16];
        data[15] = 3;
        let mut blocks = MemoryBlocks::new(&mut data, Padding::Depad).unwrap();
        drain(&mut blocks).unwrap();
        assert_eq!(data.len(), 13);
    }

    #[test]
    fn memory_blocks_are_in_place_views() {
        let mut data = vec![0u8; 48];
        let mut blocks = MemoryBlocks::new(&mut data, Padding::None).unwrap();
        let mut index = 0u8;
        while let Some(block) = blocks.pull().unwrap() {
            block.fill(index);
            index += 1;
        }
        blocks.finish().unwrap();
        assert_eq!(&data[..16], &[0u8; 16]);
        assert_eq!(&data[16..32], &[1u8; 16]);
        assert_eq!(&data[32..], &[2u8; 16]);
    }

    #[test]
    fn stream_matches_memory_for_every_policy() {
        let input: Vec<u8> = (0..=200u8).collect();
        for len in [0usize, 1, 15, 16, 17, 31, 32, 100, 160] {
            for step in [1usize, 5, 16, 64] {
                let mut expected = input[..len].to_vec();
                let mut blocks = MemoryBlocks::new(&mut expected, Padding::Pad).unwrap();
                drain(&mut blocks).unwrap();

                let padded = frame_stream(&input[..len], Padding::Pad, step).unwrap();
                assert_eq!(padded, expected, "pad len={len} step={step}");

                let stripped = frame_stream(&padded, Padding::Depad, step).unwrap();
                assert_eq!(stripped, &input[..len], "depad len={len} step={step}");
            }
        }
    }

    #[test]
    fn stream_none_passes_aligned_input_through() {
        let input = [9u8; 64];
        assert_eq!(frame_stream(&input, Padding::None, 7).unwrap(), input);
        assert!(frame_stream(&[], Padding::None, 7).unwrap().is_empty());
    }

    #[test]
    fn stream_none_rejects_trailing_partial_block() {
        let err = frame_stream(&[1u8; 40], Padding::None, 16).unwrap_err();
        assert!(matches!(err, Error::Alignment { len: 40 }));
    }

    #[test]
    fn stream_depad_rejects_bad_counts_and_empty_input() {
        let mut bad = vec![1u8; 32];
        bad[31] = 17;
        assert!(matches!(
            frame_stream(&bad, Padding::Depad, 16),
            Err(Error::Padding { count: 17 })
        ));
        bad[31] = 0;
        assert!(matches!(
            frame_stream(&bad, Padding::Depad, 3),
            Err(Error::Padding { count: 0 })
        ));
        assert!(matches!(
            frame_stream(&[], Padding::Depad, 3),
            Err(Error::Padding { count: 0 })
        ));
    }

    #[test]
    fn stream_commits_transformed_blocks() {
        let input = [0u8; 32];
        let mut out = Vec::new();
        let mut blocks = StreamBlocks::new(&input[..], &mut out, Padding::Pad);
        while let Some(block) = blocks.pull().unwrap() {
            for byte in block.iter_mut() {
                *byte ^= 0xff;
            }
        }
        blocks.finish().unwrap();
        assert_eq!(blocks.bytes_written(), 48);
        drop(blocks);
        assert_eq!(&out[..32], &[0xffu8; 32]);
        assert_eq!(&out[32..], &[0xffu8 ^ 16; 16]);
    }
}
