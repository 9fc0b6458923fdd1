//! DRIFTWIRE Bitstream - bit-granular serialization for network protocols.
//!
//! State payloads for real-time replication are dominated by fields whose
//! domains need far fewer bits than their in-memory types: entity ids under
//! a known cap, clamped floats, unit quaternions, booleans. This crate
//! packs such fields back-to-back with no byte alignment between them,
//! reading and writing through a 64-bit scratch register that drains to
//! big-endian 32-bit words so the wire image is identical on every host.
//!
//! The pieces:
//!
//! - [`writer::BitWriter`] / [`reader::BitReader`] - the cursor engine.
//! - [`codec`] - field kinds (bounded integers, quantized floats,
//!   smallest-three quaternions, strings) dispatched statically through
//!   [`codec::FieldCodec`].
//! - [`subset`] - tiered-delta encoding for sparse slices, for the
//!   common "few entities changed this tick" payload.
//! - [`checksum`] - CRC32 tagging that folds a protocol version into the
//!   packet checksum, rejecting both corruption and version skew.
//!
//! ```
//! use driftwire_bitstream::codec::{BoundedInt, Flag, IntRange};
//! use driftwire_bitstream::reader::BitReader;
//! use driftwire_bitstream::writer::FixedBitWriter;
//!
//! let mut backing = [0u32; 2];
//! let mut writer = FixedBitWriter::from_words(&mut backing);
//! writer.serialize::<Flag>(&true, &())?;
//! writer.serialize::<BoundedInt<u32>>(&131, &IntRange::new(0, 400))?;
//! let num_bits = writer.position_bits();
//! writer.flush();
//! drop(writer);
//!
//! let mut reader = BitReader::new(&backing, num_bits);
//! assert!(reader.deserialize::<Flag>(&())?);
//! assert_eq!(reader.deserialize::<BoundedInt<u32>>(&IntRange::new(0, 400))?, 131);
//! # Ok::<(), driftwire_bitstream::error::SerializeError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod reader;
pub mod subset;
pub mod writer;

pub use buffer::{bits_in_range, bits_to_represent, FixedWordBuffer, GrowableWordBuffer, WordStorage};
pub use codec::FieldCodec;
pub use error::{Result, SerializeError};
pub use reader::BitReader;
pub use subset::{read_subset, write_subset};
pub use writer::{BitWriter, FixedBitWriter, GrowingBitWriter};

pub use driftwire_quant::{BoundedRange, QuantizedQuaternion, Quaternion, SmallestThree};
