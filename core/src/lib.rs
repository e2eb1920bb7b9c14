/*!
Lays out a Teslerpoint slide show on an Apple Lisa hard drive image.

The drive image must already hold the hard drive bootloader and the
Teslerpoint boot program. Slides are 720x364 1bpp bitmaps, each spread over 62
consecutive blocks right after the last boot block. Once every slide is in
place the boot program's header block is told how many slides there are and
where the first one starts.

```
# use teslerpoint_core::{block::{BlockStore, TAG_SIZE}, checksum::WordSum, deck, protocol::Protocol, slide};
# fn main() -> Result<(), teslerpoint_core::error::BuildError> {
let mut store = BlockStore::new(3 + slide::BLOCKS_PER_SLIDE);
# let header = store.block_mut(2).unwrap();
# header.data[2..7].copy_from_slice(&[0xA5, 0xA5, 0x5A, 0x5A, 0x5A]);
# header.tag[TAG_SIZE - 1] = 0xEE;
let protocol = Protocol::new(&[0xEE])?;
let slides = [vec![0u8; slide::SLIDE_SIZE]];
let summary = deck::build_deck(&mut store, &protocol, &WordSum, &slides)?;
assert_eq!(summary.first_block, 3);
# Ok(())
# }
```
*/

#![no_std]

pub mod block;
pub mod checksum;
pub mod container;
pub mod deck;
pub mod error;
pub mod header;
pub mod layout;
pub mod protocol;
pub mod slide;

extern crate alloc;
