use std::io::Cursor;

use super::builder::{chunk_nbt, region_file, SectionFixture};
use crate::{
    Chunk, CompressionScheme, Dimension, Error, LocationTable, RCoord, Region, SECTOR_SIZE,
};

fn simple_chunk() -> Vec<u8> {
    chunk_nbt(
        &[SectionFixture {
            y: 0,
            palette: vec!["minecraft:stone"],
            data: None,
        }],
        None,
    )
}

fn open(file: Vec<u8>, rx: isize, rz: isize) -> Region<Cursor<Vec<u8>>> {
    Region::from_stream(RCoord(rx), RCoord(rz), Dimension::Overworld, Cursor::new(file)).unwrap()
}

#[test]
fn location_table_round_trips() {
    let file = region_file(&[
        (0, 0, simple_chunk(), CompressionScheme::Zlib),
        (31, 17, simple_chunk(), CompressionScheme::Gzip),
    ]);

    let table = LocationTable::from_bytes(&file[..SECTOR_SIZE]).unwrap();
    assert_eq!(table.to_bytes(), &file[..SECTOR_SIZE]);

    assert!(!table.get(0, 0).is_absent());
    assert!(!table.get(31, 17).is_absent());
    assert!(table.get(1, 0).is_absent());
}

#[test]
fn empty_region_has_no_chunks() {
    let mut region = open(vec![0u8; 2 * SECTOR_SIZE], 0, 0);

    for x in 0..32 {
        for z in 0..32 {
            assert!(region.read_chunk(x, z).unwrap().is_none());
        }
    }

    let mut diagnostics = Vec::new();
    let chunks = region.raw_chunks(&mut diagnostics);
    assert_eq!(chunks.len(), 1024);
    assert!(chunks.iter().all(|c| !c.exists()));
    assert!(diagnostics.is_empty());

    // An absent slot decodes to no chunk at all.
    assert!(Chunk::from_raw(&chunks[0]).unwrap().is_none());
}

#[test]
fn chunk_coords_are_absolute() {
    let file = region_file(&[(5, 7, simple_chunk(), CompressionScheme::Zlib)]);
    let mut region = open(file, -1, 2);

    let mut diagnostics = Vec::new();
    let chunks = region.raw_chunks(&mut diagnostics);
    let present: Vec<_> = chunks.iter().filter(|c| c.exists()).collect();
    assert_eq!(present.len(), 1);
    assert_eq!(present[0].x.0, -32 + 5);
    assert_eq!(present[0].z.0, 64 + 7);
}

#[test]
fn gzip_and_zlib_decode_identically() {
    let nbt = simple_chunk();
    let gz = region_file(&[(3, 4, nbt.clone(), CompressionScheme::Gzip)]);
    let zl = region_file(&[(3, 4, nbt.clone(), CompressionScheme::Zlib)]);

    let from_gz = open(gz, 0, 0).read_chunk(3, 4).unwrap().unwrap();
    let from_zl = open(zl, 0, 0).read_chunk(3, 4).unwrap().unwrap();
    assert_eq!(from_gz, from_zl);
    assert_eq!(from_gz, nbt);
}

#[test]
fn uncompressed_frames_decode() {
    let nbt = simple_chunk();
    let file = region_file(&[(0, 0, nbt.clone(), CompressionScheme::Uncompressed)]);
    assert_eq!(open(file, 0, 0).read_chunk(0, 0).unwrap().unwrap(), nbt);
}

#[test]
fn unknown_scheme_is_unsupported() {
    let mut file = region_file(&[(2, 0, simple_chunk(), CompressionScheme::Uncompressed)]);
    // Patch the frame's scheme byte (offset 4, after the length).
    file[2 * SECTOR_SIZE + 4] = 7;

    let err = open(file, 0, 0).read_chunk(2, 0).unwrap_err();
    match err {
        Error::UnsupportedCompression(2, 0, 7) => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn oversized_frame_length_is_corrupt() {
    let mut file = region_file(&[(0, 0, simple_chunk(), CompressionScheme::Zlib)]);
    // Declare a length far past the frame's sectors.
    file[2 * SECTOR_SIZE..2 * SECTOR_SIZE + 4]
        .copy_from_slice(&(10 * SECTOR_SIZE as u32).to_be_bytes());

    let err = open(file, 0, 0).read_chunk(0, 0).unwrap_err();
    assert!(matches!(err, Error::CorruptChunk(0, 0, _)));
}

#[test]
fn corrupt_chunk_does_not_poison_the_region() {
    let mut file = region_file(&[
        (0, 0, simple_chunk(), CompressionScheme::Zlib),
        (1, 0, simple_chunk(), CompressionScheme::Zlib),
    ]);
    // Corrupt the first chunk's compressed payload.
    for b in &mut file[2 * SECTOR_SIZE + 5..2 * SECTOR_SIZE + 40] {
        *b = 0xAA;
    }

    let mut diagnostics = Vec::new();
    let chunks = open(file, 0, 0).raw_chunks(&mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(diagnostics[0], Error::CorruptChunk(0, 0, _)));

    let ok: Vec<_> = chunks.iter().filter(|c| c.exists()).collect();
    assert_eq!(ok.len(), 1);
    assert_eq!((ok[0].x.0, ok[0].z.0), (1, 0));
}

#[test]
fn short_file_is_a_corrupt_region() {
    let result =
        Region::from_stream(RCoord(4), RCoord(-2), Dimension::Nether, Cursor::new(vec![0u8; 100]));
    match result {
        Err(Error::CorruptRegion(4, -2, _)) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an error"),
    }
}
