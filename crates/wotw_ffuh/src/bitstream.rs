//! Walks an FFUH bit stream against a [`HuffmanTree`].

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::{Error, Result};
use crate::tree::{HuffmanTree, Node};

/// Decode up to `expected` bytes from `payload`.
///
/// Bits are read least significant first. Decoding stops as soon as `expected` bytes were emitted;
/// if the payload runs out first the shorter buffer is returned as is.
pub fn decode(tree: &HuffmanTree, payload: &[u8], expected: usize) -> Result<Vec<u8>> {
    decode_cancellable(tree, payload, expected, &AtomicBool::new(false))
}

/// Same as [`decode`], checking `cancel` before every payload byte.
pub fn decode_cancellable(
    tree: &HuffmanTree,
    payload: &[u8],
    expected: usize,
    cancel: &AtomicBool,
) -> Result<Vec<u8>> {
    // Every symbol takes at least one bit
    let mut output = Vec::with_capacity(expected.min(payload.len().saturating_mul(8)));
    if expected == 0 {
        return Ok(output);
    }

    let root = tree.root();
    let mut current = root;

    'payload: for (byte_index, &byte) in payload.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            return Err(Error::Cancelled {
                emitted: output.len(),
            });
        }

        for bit_index in 0..8u8 {
            let bit = byte & (1 << bit_index) != 0;

            current = match current.child(bit) {
                Some(Node::Vacant) | None => {
                    return Err(Error::InvalidHuffmanCode {
                        byte: byte_index,
                        bit: bit_index,
                    })
                }
                Some(node) => node,
            };

            if let Node::Leaf(symbol) = current {
                output.push(*symbol);
                if output.len() == expected {
                    break 'payload;
                }
                current = root;
            }
        }
    }

    if output.len() < expected {
        debug!(
            emitted = output.len(),
            expected, "payload exhausted before the expected length"
        );
    }

    Ok(output)
}
