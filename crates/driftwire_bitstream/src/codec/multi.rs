//! Multi-field combinator.
//!
//! A tuple of field kinds is itself a field kind: members are serialized
//! back-to-back in tuple order, with per-member values and params carried
//! in matching tuples. Pure sequencing - no new wire format.

use crate::buffer::WordStorage;
use crate::codec::FieldCodec;
use crate::error::Result;
use crate::reader::BitReader;
use crate::writer::BitWriter;

macro_rules! multi_tuple {
    ($($kind:ident : $idx:tt),+) => {
        impl<$($kind: FieldCodec),+> FieldCodec for ($($kind,)+) {
            type Value = ($($kind::Value,)+);
            type Params = ($($kind::Params,)+);

            fn encode<S: WordStorage>(
                writer: &mut BitWriter<S>,
                value: &Self::Value,
                params: &Self::Params,
            ) -> Result<()> {
                $( $kind::encode(writer, &value.$idx, &params.$idx)?; )+
                Ok(())
            }

            fn decode(reader: &mut BitReader<'_>, params: &Self::Params) -> Result<Self::Value> {
                Ok(($( $kind::decode(reader, &params.$idx)?, )+))
            }
        }
    };
}

multi_tuple!(A: 0);
multi_tuple!(A: 0, B: 1);
multi_tuple!(A: 0, B: 1, C: 2);
multi_tuple!(A: 0, B: 1, C: 2, D: 3);
