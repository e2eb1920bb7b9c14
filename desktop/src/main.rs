use std::{
    io,
    path::{Path, PathBuf},
};

use argh::FromArgs;
use log::{error, info};
use teslerpoint_core::{
    block::BlockStore,
    checksum::{Checksum, WordSum},
    container::{Format, dc42, raw},
    deck,
    header::read_header,
    protocol::{DEFAULT_HEADER_BLOCK, Protocol},
};

use crate::{error::AppError, std_fs::StdIo};

mod error;
mod slide;
mod std_fs;

#[derive(FromArgs)]
/// Build a Teslerpoint hard disk image from slide image files
struct Args {
    /// images to assemble into a slide show, in order; each must be 720x364
    /// and gets Floyd-Steinberg dithered to black and white
    #[argh(positional)]
    images: Vec<PathBuf>,

    /// drive image that already holds the hard drive bootloader and the
    /// Teslerpoint program
    #[argh(option, short = 'b')]
    base: PathBuf,

    /// hex bytes the bootloader leaves at the end of its last block's tag
    #[argh(option, short = 'm')]
    marker: String,

    /// format of the base drive image: dc42 or raw
    #[argh(option, short = 'i', default = "Format::Dc42")]
    input_format: Format,

    /// format of the resulting drive image: dc42 (LisaEm) or raw (Cameo/Aphid, IDLE)
    #[argh(option, short = 'f', default = "Format::Dc42")]
    format: Format,

    /// where to write the resulting drive image; standard out if unspecified
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// block holding the head of the Teslerpoint program
    #[argh(option, default = "DEFAULT_HEADER_BLOCK")]
    header_block: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    if let Err(err) = run(args) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let marker = parse_hex(&args.marker).ok_or_else(|| AppError::Marker(args.marker.clone()))?;
    let protocol = Protocol::new(&marker)?.with_header_block(args.header_block);

    let (mut store, dc42_info) = load_base(&args.base, args.input_format)?;

    let slides = args
        .images
        .iter()
        .map(|path| slide::load_slide(path))
        .collect::<Result<Vec<_>, _>>()?;
    info!("Loaded {} slides", slides.len());

    check_checksum(&store, &protocol, &WordSum)?;
    let summary = deck::build_deck(&mut store, &protocol, &WordSum, &slides)?;
    if let Some(header) = read_header(&store, &protocol) {
        info!(
            "Boot program will show {} slides from block {}",
            header.num_slides, header.first_block
        );
    }
    info!(
        "{} of {} blocks in use",
        summary.end_block,
        store.len()
    );

    match &args.output {
        Some(path) => {
            let mut out = std_fs::create_new(path)?;
            save(&mut out, &store, args.format, dc42_info)?;
            info!("Wrote {}", path.display());
        }
        None => save(&mut StdIo::new(io::stdout().lock()), &store, args.format, dc42_info)?,
    }
    Ok(())
}

/// Refuse to patch a header whose existing tag the checksum can't reproduce;
/// the bootloader would reject the recomputed one.
fn check_checksum(
    store: &BlockStore,
    protocol: &Protocol,
    checksum: &impl Checksum,
) -> Result<(), AppError> {
    match store.block(protocol.header_block) {
        Some(header) if !checksum.matches(&header.tag, &header.data) => {
            Err(AppError::ChecksumAlgorithm(protocol.header_block))
        }
        _ => Ok(()),
    }
}

fn load_base(path: &Path, format: Format) -> Result<(BlockStore, dc42::Dc42Info), AppError> {
    let (mut file, size) = std_fs::open_read(path)?;
    let loaded = match format {
        Format::Dc42 => dc42::read(&mut file)?,
        Format::Raw => (raw::read(&mut file, size)?, dc42::Dc42Info::default()),
    };
    Ok(loaded)
}

fn save<W: embedded_io::Write>(
    out: &mut W,
    store: &BlockStore,
    format: Format,
    dc42_info: dc42::Dc42Info,
) -> Result<(), AppError> {
    match format {
        Format::Dc42 => dc42::write(out, store, &dc42_info)?,
        Format::Raw => raw::write(out, store)?,
    }
    Ok(())
}

/// Parse a string of hex digit pairs, ignoring whitespace and an optional
/// `0x` prefix.
fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = text
        .trim()
        .trim_start_matches("0x")
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }
    digits
        .chunks_exact(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use teslerpoint_core::{
        block::TAG_SIZE,
        error::BuildError,
        header::HeaderFields,
        slide::{BLOCKS_PER_SLIDE, SLIDE_HEIGHT, SLIDE_SIZE, SLIDE_WIDTH, read_slide},
    };

    const MARKER: [u8; 2] = [0xC0, 0xDE];
    const BOOT_BLOCKS: usize = 6;

    fn base_store() -> BlockStore {
        let mut store = BlockStore::new(BOOT_BLOCKS + 2 * BLOCKS_PER_SLIDE + 3);
        let header = store.block_mut(DEFAULT_HEADER_BLOCK).unwrap();
        header.data[..7].copy_from_slice(&[0x60, 0x0A, 0xA5, 0xA5, 0x5A, 0x5A, 0x5A]);
        header.data[100] = 0x4E;
        header.tag[..2].copy_from_slice(&WordSum.checksum(&header.data));
        store.block_mut(BOOT_BLOCKS - 1).unwrap().tag[TAG_SIZE - 2..].copy_from_slice(&MARKER);
        store
    }

    fn write_base(dir: &Path, store: &BlockStore, format: Format) -> PathBuf {
        let path = dir.join("base.img");
        let mut out = std_fs::create_new(&path).unwrap();
        save(&mut out, store, format, dc42::Dc42Info::default()).unwrap();
        path
    }

    fn write_slide(dir: &Path, name: &str, luma: u8) -> PathBuf {
        let path = dir.join(name);
        GrayImage::from_pixel(SLIDE_WIDTH as u32, SLIDE_HEIGHT as u32, Luma([luma]))
            .save(&path)
            .unwrap();
        path
    }

    fn args(base: PathBuf, images: Vec<PathBuf>, output: Option<PathBuf>) -> Args {
        Args {
            images,
            base,
            marker: "c0de".into(),
            input_format: Format::Dc42,
            format: Format::Raw,
            output,
            header_block: DEFAULT_HEADER_BLOCK,
        }
    }

    #[test]
    fn parses_hex_markers() {
        assert_eq!(parse_hex("AF1e"), Some(vec![0xAF, 0x1E]));
        assert_eq!(parse_hex("0x00 ff"), Some(vec![0x00, 0xFF]));
        assert_eq!(parse_hex("abc"), None);
        assert_eq!(parse_hex("zz"), None);
        assert_eq!(parse_hex(""), None);
    }

    #[test]
    fn dc42_base_becomes_raw_slide_show() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_base(dir.path(), &base_store(), Format::Dc42);
        let images = vec![
            write_slide(dir.path(), "white.png", 255),
            write_slide(dir.path(), "black.png", 0),
        ];
        let output = dir.path().join("slides.img");

        run(args(base, images, Some(output.clone()))).unwrap();

        let (store, _) = load_base(&output, Format::Raw).unwrap();
        let protocol = Protocol::new(&MARKER).unwrap();
        assert_eq!(
            read_header(&store, &protocol),
            Some(HeaderFields {
                num_slides: 2,
                first_block: BOOT_BLOCKS as u32
            })
        );
        let header = store.block(DEFAULT_HEADER_BLOCK).unwrap();
        assert!(WordSum.matches(&header.tag, &header.data));
        assert_eq!(read_slide(&store, &protocol, 0).unwrap(), vec![0x00; SLIDE_SIZE]);
        assert_eq!(read_slide(&store, &protocol, 1).unwrap(), vec![0xFF; SLIDE_SIZE]);
    }

    #[test]
    fn foreign_checksum_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = base_store();
        store.block_mut(DEFAULT_HEADER_BLOCK).unwrap().tag[..2].copy_from_slice(&[0xDE, 0xAD]);
        let base = write_base(dir.path(), &store, Format::Raw);
        let images = vec![write_slide(dir.path(), "white.png", 255)];
        let output = dir.path().join("slides.img");

        let mut options = args(base, images, Some(output.clone()));
        options.input_format = Format::Raw;
        let err = run(options).unwrap_err();
        assert!(matches!(err, AppError::ChecksumAlgorithm(DEFAULT_HEADER_BLOCK)));
        assert!(!output.exists());
    }

    #[test]
    fn existing_output_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_base(dir.path(), &base_store(), Format::Dc42);
        let images = vec![write_slide(dir.path(), "white.png", 255)];
        let output = dir.path().join("slides.img");
        std::fs::write(&output, b"keep").unwrap();

        let err = run(args(base, images, Some(output.clone()))).unwrap_err();
        assert!(matches!(err, AppError::Io(ref e) if e.kind() == io::ErrorKind::AlreadyExists));
        assert_eq!(std::fs::read(&output).unwrap(), b"keep");
    }

    #[test]
    fn no_images_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_base(dir.path(), &base_store(), Format::Dc42);
        let output = dir.path().join("slides.img");

        let err = run(args(base, Vec::new(), Some(output.clone()))).unwrap_err();
        assert!(matches!(err, AppError::Build(BuildError::NoSlides)));
        assert!(!output.exists());
    }

    #[test]
    fn save_streams_either_format() {
        let store = base_store();
        let blocks = store.len();

        let mut raw_out = Vec::new();
        save(&mut StdIo::new(&mut raw_out), &store, Format::Raw, dc42::Dc42Info::default()).unwrap();
        assert_eq!(raw_out.len(), blocks * (TAG_SIZE + 512));

        let mut dc42_out = Vec::new();
        save(&mut StdIo::new(&mut dc42_out), &store, Format::Dc42, dc42::Dc42Info::default()).unwrap();
        assert_eq!(dc42_out.len(), 84 + blocks * (TAG_SIZE + 512));
        assert_eq!(dc42::read(&mut &dc42_out[..]).unwrap().0, store);
    }
}
