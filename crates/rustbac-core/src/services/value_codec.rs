use crate::types::{AppTag, BitString, DataValue, PropertyValue};
use crate::EncodeError;
use alloc::vec;
use alloc::vec::Vec;

/// Highest bit position a bit-string member may name.
pub const MAX_BIT_POSITION: u32 = 1023;

/// Converts a property value into the tagged items a wire stack serialises.
///
/// A bit-string property is packed into exactly one item. Every other tag is
/// encoded element by element, a scalar being a one-element sequence.
pub fn encode_property_value(
    tag: AppTag,
    value: &PropertyValue,
) -> Result<Vec<DataValue>, EncodeError> {
    if tag == AppTag::BitString {
        return Ok(vec![DataValue::BitString(pack_bit_string(value.elements())?)]);
    }
    value
        .elements()
        .iter()
        .map(|element| encode_element(tag, element))
        .collect()
}

/// Encodes one element under a non-bit-string tag.
pub fn encode_element(tag: AppTag, element: &DataValue) -> Result<DataValue, EncodeError> {
    match tag {
        AppTag::Null
        | AppTag::Boolean
        | AppTag::UnsignedInt
        | AppTag::SignedInt
        | AppTag::Real
        | AppTag::Double
        | AppTag::CharacterString
        | AppTag::Enumerated
        | AppTag::ObjectId => {
            if element.tag() == tag {
                Ok(element.clone())
            } else {
                Err(EncodeError::TypeMismatch { tag })
            }
        }
        AppTag::BitString => Ok(DataValue::BitString(pack_bit_string(
            core::slice::from_ref(element),
        )?)),
        AppTag::OctetString | AppTag::Date | AppTag::Time => Err(EncodeError::NotImplemented(tag)),
    }
}

/// Packs positional flags or set members into one bit string.
fn pack_bit_string(elements: &[DataValue]) -> Result<BitString, EncodeError> {
    let mismatch = EncodeError::TypeMismatch {
        tag: AppTag::BitString,
    };
    match elements {
        [DataValue::BitString(bits)] => Ok(bits.clone()),
        [] => Ok(BitString::default()),
        [DataValue::Boolean(_), ..] => {
            let flags = elements
                .iter()
                .map(|element| match element {
                    DataValue::Boolean(flag) => Ok(*flag),
                    _ => Err(mismatch),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BitString::from_flags(&flags))
        }
        [DataValue::Enumerated(_), ..] => {
            let members = elements
                .iter()
                .map(|element| match element {
                    DataValue::Enumerated(bit) if *bit <= MAX_BIT_POSITION => Ok(*bit),
                    DataValue::Enumerated(_) => Err(EncodeError::ValueOutOfRange),
                    _ => Err(mismatch),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BitString::from_members(&members))
        }
        _ => Err(mismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectId, ObjectType};
    use proptest::prelude::*;

    #[test]
    fn scalar_becomes_one_item() {
        let out = encode_property_value(AppTag::Real, &PropertyValue::from(1.0f32)).unwrap();
        assert_eq!(out, vec![DataValue::Real(1.0)]);
    }

    #[test]
    fn list_is_encoded_per_element() {
        let ids = vec![
            DataValue::ObjectId(ObjectId::new(ObjectType::Device, 123)),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
        ];
        let out = encode_property_value(AppTag::ObjectId, &PropertyValue::List(ids.clone())).unwrap();
        assert_eq!(out, ids);
    }

    #[test]
    fn bit_string_is_never_split() {
        let flags = PropertyValue::List(vec![
            DataValue::Boolean(false),
            DataValue::Boolean(true),
            DataValue::Boolean(false),
            DataValue::Boolean(false),
        ]);
        let out = encode_property_value(AppTag::BitString, &flags).unwrap();
        assert_eq!(
            out,
            vec![DataValue::BitString(BitString::new(4, vec![0b0100_0000]))]
        );

        let members = PropertyValue::List(vec![DataValue::Enumerated(0), DataValue::Enumerated(8)]);
        let out = encode_property_value(AppTag::BitString, &members).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn prepacked_bit_string_passes_through() {
        let bits = BitString::from_flags(&[true, true]);
        let out =
            encode_property_value(AppTag::BitString, &PropertyValue::from(bits.clone())).unwrap();
        assert_eq!(out, vec![DataValue::BitString(bits)]);
    }

    #[test]
    fn unset_list_encodes_to_nothing() {
        let out = encode_property_value(AppTag::OctetString, &PropertyValue::List(vec![])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn tags_without_a_rule_fail_loudly() {
        let err = encode_property_value(AppTag::OctetString, &PropertyValue::List(vec![
            DataValue::OctetString(vec![1, 2]),
        ]))
        .unwrap_err();
        assert_eq!(err, EncodeError::NotImplemented(AppTag::OctetString));
    }

    #[test]
    fn mismatched_element_is_rejected() {
        let err = encode_property_value(AppTag::UnsignedInt, &PropertyValue::from("nope")).unwrap_err();
        assert_eq!(
            err,
            EncodeError::TypeMismatch {
                tag: AppTag::UnsignedInt
            }
        );
    }

    #[test]
    fn member_beyond_range_is_rejected() {
        let members = PropertyValue::List(vec![DataValue::Enumerated(MAX_BIT_POSITION + 1)]);
        assert_eq!(
            encode_property_value(AppTag::BitString, &members).unwrap_err(),
            EncodeError::ValueOutOfRange
        );
    }

    proptest! {
        #[test]
        fn any_member_set_packs_to_one_item(members in proptest::collection::vec(0u32..=MAX_BIT_POSITION, 0..30)) {
            let value = PropertyValue::List(members.iter().map(|m| DataValue::Enumerated(*m)).collect());
            let out = encode_property_value(AppTag::BitString, &value).unwrap();
            prop_assert_eq!(out.len(), 1);
            match &out[0] {
                DataValue::BitString(bits) => {
                    for m in &members {
                        prop_assert!(bits.get(*m as usize));
                    }
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
