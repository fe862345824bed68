//! Skipping must advance the cursor by exactly the encoded size of the
//! skipped value, for every tag kind.

use super::Builder;
use crate::input::Slice;
use crate::{Error, Tag};

/// Skip the single named tag at the start of `doc`, returning the leftover
/// byte count.
fn skip_one(doc: &[u8]) -> usize {
    let mut input = Slice::new(doc);
    let tag = input.consume_tag().unwrap();
    input.skip_str().unwrap();
    input.skip_value(tag).unwrap();
    input.remaining()
}

#[test]
fn skip_scalars() {
    for doc in [
        Builder::new().byte("v", 7).build(),
        Builder::new().short("v", 7).build(),
        Builder::new().int("v", 7).build(),
        Builder::new().long("v", 7).build(),
        Builder::new().float("v", 7.0).build(),
        Builder::new().double("v", 7.0).build(),
    ] {
        assert_eq!(skip_one(&doc), 0);
    }
}

#[test]
fn skip_string_and_arrays() {
    for doc in [
        Builder::new().string("v", "some text").build(),
        Builder::new().byte_array("v", &[1, 2, 3, 4, 5]).build(),
        Builder::new().int_array("v", &[1, 2, 3]).build(),
        Builder::new().long_array("v", &[1, 2, 3]).build(),
    ] {
        assert_eq!(skip_one(&doc), 0);
    }
}

#[test]
fn skip_list_of_scalars() {
    let doc = Builder::new()
        .start_list("v", Tag::Int, 3)
        .int_payload(1)
        .int_payload(2)
        .int_payload(3)
        .build();
    assert_eq!(skip_one(&doc), 0);
}

#[test]
fn skip_list_of_compounds() {
    let doc = Builder::new()
        .start_list("v", Tag::Compound, 2)
        .int("a", 1)
        .end_compound()
        .string("b", "x")
        .end_compound()
        .build();
    assert_eq!(skip_one(&doc), 0);
}

#[test]
fn skip_list_of_lists() {
    let doc = Builder::new()
        .start_list("v", Tag::List, 2)
        .tag(Tag::Int)
        .int_payload(2)
        .int_payload(10)
        .int_payload(20)
        .tag(Tag::Long)
        .int_payload(1)
        .long_payload(30)
        .build();
    assert_eq!(skip_one(&doc), 0);
}

#[test]
fn skip_nested_compound() {
    let doc = Builder::new()
        .start_compound("v")
        .start_compound("inner")
        .long_array("data", &[1; 16])
        .end_compound()
        .int("trailing", 9)
        .end_compound()
        .build();
    assert_eq!(skip_one(&doc), 0);
}

#[test]
fn skip_stops_exactly_at_value_end() {
    // Bytes past the skipped value must remain untouched.
    let doc = Builder::new()
        .int_array("v", &[5, 6, 7])
        .raw_bytes(&[0xAA, 0xBB])
        .build();
    assert_eq!(skip_one(&doc), 2);
}

#[test]
fn skip_truncated_payload() {
    let doc = Builder::new()
        .tag(Tag::LongArray)
        .name("v")
        .int_payload(10) // claims 10 longs, provides none
        .build();

    let mut input = Slice::new(&doc);
    let tag = input.consume_tag().unwrap();
    input.skip_str().unwrap();
    assert_eq!(input.skip_value(tag).unwrap_err(), Error::Truncated);
}
