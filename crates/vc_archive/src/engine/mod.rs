//! The archive state machine.
//!
//! An archive is the header `(tag, version)` of the root object followed by
//! its fields, base chain first. Nested members recurse without a header,
//! polymorphic members carry their own. Every object level is counted
//! against the depth limit of the [`ArchiveSession`].

// -----------------------------------------------------------------------------
// Modules

mod header;
mod pass;
mod session;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use header::{TaggedSeed, TaggedSerializer};
pub(crate) use session::ArchiveSession;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::codec::MAX_BINARY_LEN;
    use crate::error::{ArchiveError, UnregisteredRef};
    use crate::object::{BaseObject, Object};
    use crate::serializer::{Format, ObjectSerializer};
    use crate::tag::TypeTag;
    use crate::testing::{Cat, Dog, Owner, Person, registry};

    #[track_caller]
    fn codec_error(err: ArchiveError) -> (String, String) {
        match err {
            ArchiveError::Codec { field, message } => (field, message),
            other => panic!("expected a codec error, found {other:?}"),
        }
    }

    fn read_text(text: &str) -> ArchiveError {
        let registry = registry();
        ObjectSerializer::new(&registry)
            .deserialize_text::<dyn BaseObject>(text)
            .unwrap_err()
    }

    fn read_binary(bytes: &[u8]) -> ArchiveError {
        let registry = registry();
        ObjectSerializer::new(&registry)
            .deserialize::<dyn BaseObject>(bytes, Format::Binary)
            .unwrap_err()
    }

    fn person_bytes() -> Vec<u8> {
        let registry = registry();
        ObjectSerializer::new(&registry)
            .serialize(&Person::jack(), Format::Binary)
            .unwrap()
    }

    fn dog_with_cat_bytes() -> Vec<u8> {
        let registry = registry();
        let mut dog = Dog::rex();
        dog.friend = Some(Box::new(Cat::tom()));
        ObjectSerializer::new(&registry)
            .serialize(&dog, Format::Binary)
            .unwrap()
    }

    #[test]
    fn truncated_binary() {
        let bytes = person_bytes();

        let (field, _) = codec_error(read_binary(&bytes[..bytes.len() - 2]));
        assert_eq!(field, "age");

        let (field, _) = codec_error(read_binary(&bytes[..3]));
        assert_eq!(field, "<header>");

        let (field, _) = codec_error(read_binary(&[]));
        assert_eq!(field, "<header>");
    }

    #[test]
    fn truncated_member() {
        let bytes = dog_with_cat_bytes();
        let (field, _) = codec_error(read_binary(&bytes[..bytes.len() - 1]));
        assert_eq!(field, "friend.lives");
    }

    #[test]
    fn trailing_input() {
        let mut bytes = person_bytes();
        bytes.push(0);
        let (field, message) = codec_error(read_binary(&bytes));
        assert_eq!(field, "<root>");
        assert!(message.contains("1 trailing bytes"));

        let (field, _) = codec_error(read_text(r#"("test::Person",0,(name:"jack",age:23)) 5"#));
        assert_eq!(field, "<root>");
    }

    #[test]
    fn invalid_utf8() {
        let registry = registry();
        let err = ObjectSerializer::new(&registry)
            .deserialize::<dyn BaseObject>(&[0xff, 0xfe, 0x28], Format::Text)
            .unwrap_err();

        let (field, message) = codec_error(err);
        assert_eq!(field, "<root>");
        assert!(message.starts_with("invalid UTF-8"));
    }

    #[test]
    fn text_field_names() {
        let (field, message) = codec_error(read_text(r#"("test::Person",0,(nom:"jack",age:23))"#));
        assert_eq!(field, "name");
        assert!(message.contains("expected field `name`, found `nom`"));

        let (field, message) = codec_error(read_text(r#"("test::Person",0,(age:23,name:"jack"))"#));
        assert_eq!(field, "name");
        assert!(message.contains("found `age`"));

        let (field, message) = codec_error(read_text(r#"("test::Person",0,(name:"jack"))"#));
        assert_eq!(field, "age");
        assert!(message.contains("age"));

        let (_, message) =
            codec_error(read_text(r#"("test::Person",0,(name:"jack",age:23,email:"x"))"#));
        assert!(message.contains("unexpected field `email`"));
    }

    #[test]
    fn malformed_values() {
        let (field, _) = codec_error(read_text(r#"("test::Person",0,(name:"jack",age:"old"))"#));
        assert_eq!(field, "age");

        let (field, _) = codec_error(read_text(
            r#"("test::Owner",0,(name:"ann",address:(street:"main",number:"seven"),pet:None))"#,
        ));
        assert_eq!(field, "address.number");

        let (field, _) = codec_error(read_text(
            r#"("test::Owner",0,(name:"ann",address:(street:"main",number:7),pet:Some((true,0,()))))"#,
        ));
        assert_eq!(field, "pet.<header>");

        let (field, _) = codec_error(read_text(r#"(5,0,(name:"jack",age:23))"#));
        assert_eq!(field, "<header>");

        assert!(matches!(read_text(""), ArchiveError::Codec { .. }));
        assert!(matches!(read_text("not an archive"), ArchiveError::Codec { .. }));
    }

    #[test]
    fn version_mismatch() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let expected = ArchiveError::VersionMismatch {
            type_path: "test::Cat",
            expected: 2,
            found: 1,
        };

        let text = serializer.serialize_text(&Cat::tom()).unwrap();
        let text = text.replacen(",2,", ",1,", 1);
        assert_eq!(read_text(&text), expected);

        let mut bytes = serializer.serialize(&Cat::tom(), Format::Binary).unwrap();
        bytes[8..12].copy_from_slice(&1u32.to_le_bytes());
        assert_eq!(read_binary(&bytes), expected);
    }

    #[test]
    fn failed_read_keeps_nothing() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);

        let owner = Owner {
            pet: Some(Box::new(Dog::rex())),
            ..Owner::default()
        };
        let bytes = serializer.serialize(&owner, Format::Binary).unwrap();

        for len in 0..bytes.len() {
            assert!(
                serializer
                    .deserialize::<Owner>(&bytes[..len], Format::Binary)
                    .is_err()
            );
        }
        assert!(serializer.deserialize::<Owner>(&bytes, Format::Binary).is_ok());
    }

    #[test]
    fn oversized_length_prefix() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&Person::type_tag().to_bits().to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(b"jack");

        let (field, _) = codec_error(read_binary(&bytes));
        assert_eq!(field, "name");

        // Within the limit, but longer than the input.
        bytes[12..20].copy_from_slice(&(MAX_BINARY_LEN as u64 / 2).to_le_bytes());
        let (field, _) = codec_error(read_binary(&bytes));
        assert_eq!(field, "name");
    }

    #[test]
    fn garbage_header() {
        let mut bytes = person_bytes();
        bytes[8..12].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        assert_eq!(
            read_binary(&bytes),
            ArchiveError::VersionMismatch {
                type_path: "test::Person",
                expected: 0,
                found: 0xDEAD_BEEF,
            }
        );

        let mut bytes = person_bytes();
        bytes[..8].copy_from_slice(&u64::MAX.to_le_bytes());
        assert_eq!(
            read_binary(&bytes),
            ArchiveError::UnregisteredType(UnregisteredRef::Tag(TypeTag::new(u64::MAX)))
        );
    }

    #[test]
    fn corrupted_member_header() {
        let bytes = dog_with_cat_bytes();
        let cat_tag = Cat::type_tag().to_bits().to_le_bytes();
        let at = bytes.windows(8).position(|w| w == cat_tag).unwrap();

        let mut tagged = bytes.clone();
        tagged[at..at + 8].copy_from_slice(&u64::MAX.to_le_bytes());
        assert_eq!(
            read_binary(&tagged),
            ArchiveError::UnregisteredType(UnregisteredRef::Tag(TypeTag::new(u64::MAX)))
        );

        // The byte before the member header is its `Option` discriminant.
        let mut present = bytes;
        present[at - 1] = 7;
        let (field, _) = codec_error(read_binary(&present));
        assert_eq!(field, "friend");
    }

    #[test]
    fn corrupted_bytes_never_panic() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let bytes = dog_with_cat_bytes();

        for at in 0..bytes.len() {
            for value in [0x00, 0x7f, 0xff] {
                let mut corrupted = bytes.clone();
                corrupted[at] = value;
                match serializer.deserialize::<dyn BaseObject>(&corrupted, Format::Binary) {
                    Ok(_)
                    | Err(ArchiveError::Codec { .. })
                    | Err(ArchiveError::UnregisteredType(_))
                    | Err(ArchiveError::VersionMismatch { .. }) => {}
                    Err(other) => panic!("byte {at} set to {value:#x}: {other:?}"),
                }
            }
        }
    }
}
