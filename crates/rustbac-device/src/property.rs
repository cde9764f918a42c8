use crate::error::{ModelError, ReadError, ServiceError};
use crate::subscription::SubscriptionList;
use rustbac_core::services::read_property::is_whole_value;
use rustbac_core::services::value_codec::{encode_element, encode_property_value};
use rustbac_core::types::{AppTag, DataValue, ObjectId, PropertyId, PropertyValue};
use rustbac_core::EncodeError;
use std::fmt;

/// Observer run after a property changes. It may schedule follow-up writes.
pub type ChangeCallback = Box<dyn FnMut(&Property, &mut Cascade) + Send>;

/// A write scheduled by a change callback.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub value: PropertyValue,
}

/// Follow-up writes collected while change callbacks run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cascade {
    writes: Vec<PendingWrite>,
}

impl Cascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(
        &mut self,
        object_id: ObjectId,
        property_id: PropertyId,
        value: impl Into<PropertyValue>,
    ) {
        self.writes.push(PendingWrite {
            object_id,
            property_id,
            value: value.into(),
        });
    }

    pub fn writes(&self) -> &[PendingWrite] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<PendingWrite> {
        self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// A typed value cell attached to an object.
///
/// Values change only through [`Device::set_value`](crate::Device::set_value),
/// which notifies subscribers before the change callbacks run:
///
/// ```compile_fail
/// use rustbac_core::types::{AppTag, PropertyId};
/// use rustbac_device::Property;
///
/// let mut p = Property::new(PropertyId::PresentValue, AppTag::Real);
/// p.set_value(1.0f32);
/// ```
pub struct Property {
    id: PropertyId,
    tag: AppTag,
    value: Option<PropertyValue>,
    read_only: bool,
    callbacks: Vec<(String, ChangeCallback)>,
    subscriptions: SubscriptionList,
}

impl Property {
    pub fn new(id: PropertyId, tag: AppTag) -> Self {
        Self {
            id,
            tag,
            value: None,
            read_only: false,
            callbacks: Vec::new(),
            subscriptions: SubscriptionList::new(),
        }
    }

    /// A read-only snapshot of a value derived from tree state.
    pub(crate) fn computed(id: PropertyId, tag: AppTag, value: PropertyValue) -> Self {
        Self {
            value: Some(value),
            read_only: true,
            ..Self::new(id, tag)
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn tag(&self) -> AppTag {
        self.tag
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub(crate) fn store(&mut self, value: PropertyValue) -> Result<(), ModelError> {
        if self.read_only {
            return Err(ModelError::ReadOnly(self.id));
        }
        self.value = Some(value);
        Ok(())
    }

    pub(crate) fn run_callbacks(&mut self, cascade: &mut Cascade) {
        let mut callbacks = std::mem::take(&mut self.callbacks);
        for (_, callback) in callbacks.iter_mut() {
            callback(self, cascade);
        }
        self.callbacks = callbacks;
    }

    /// Registers `callback` under `key`, replacing any callback with that key.
    pub fn add_callback<F>(&mut self, key: impl Into<String>, callback: F)
    where
        F: FnMut(&Property, &mut Cascade) + Send + 'static,
    {
        let key = key.into();
        self.callbacks.retain(|(k, _)| *k != key);
        self.callbacks.push((key, Box::new(callback)));
    }

    pub fn remove_callback(&mut self, key: &str) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(k, _)| k != key);
        self.callbacks.len() != before
    }

    /// The whole value as tagged items. An unset value is empty.
    pub fn encode(&self) -> Result<Vec<DataValue>, EncodeError> {
        match &self.value {
            Some(value) => encode_property_value(self.tag, value),
            None => Ok(Vec::new()),
        }
    }

    /// Reads the whole value or one array element.
    ///
    /// Arrays are 1-based; index 0 yields the element count. Scalars and bit
    /// strings have no elements to index.
    pub fn read(&self, array_index: Option<u32>) -> Result<Vec<DataValue>, ReadError> {
        let index = match array_index {
            Some(index) if !is_whole_value(array_index) => index,
            _ => return Ok(self.encode()?),
        };
        let elements = match &self.value {
            Some(PropertyValue::List(elements)) if self.tag != AppTag::BitString => elements,
            _ => return Err(ServiceError::invalid_array_index().into()),
        };
        if index == 0 {
            let count = u32::try_from(elements.len()).map_err(|_| EncodeError::ValueOutOfRange)?;
            return Ok(vec![DataValue::Unsigned(count)]);
        }
        let element = elements
            .get(index as usize - 1)
            .ok_or(ServiceError::invalid_array_index())?;
        Ok(vec![encode_element(self.tag, element)?])
    }

    pub fn subscriptions(&self) -> &SubscriptionList {
        &self.subscriptions
    }

    pub(crate) fn subscriptions_mut(&mut self) -> &mut SubscriptionList {
        &mut self.subscriptions
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("value", &self.value)
            .field("read_only", &self.read_only)
            .field("callbacks", &self.callbacks.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("<unset>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustbac_core::types::{ErrorCode, ObjectType};
    use std::sync::{Arc, Mutex};

    fn set(p: &mut Property, value: impl Into<PropertyValue>) -> Result<Cascade, ModelError> {
        p.store(value.into())?;
        let mut cascade = Cascade::new();
        p.run_callbacks(&mut cascade);
        Ok(cascade)
    }

    fn list_property() -> Property {
        let mut p = Property::new(PropertyId::StateText, AppTag::CharacterString);
        set(&mut p, vec![
            DataValue::from("off"),
            DataValue::from("on"),
            DataValue::from("auto"),
        ])
        .unwrap();
        p
    }

    fn code(err: ReadError) -> ErrorCode {
        match err {
            ReadError::Service(e) => e.error_code,
            ReadError::Encode(e) => panic!("unexpected encode error {e}"),
        }
    }

    #[test]
    fn read_only_rejects_writes_and_keeps_value() {
        let mut p = Property::new(PropertyId::PresentValue, AppTag::Real);
        set(&mut p, 1.0f32).unwrap();
        p.set_read_only(true);
        assert_eq!(
            set(&mut p, 2.0f32).unwrap_err(),
            ModelError::ReadOnly(PropertyId::PresentValue)
        );
        assert_eq!(p.value(), Some(&PropertyValue::from(1.0f32)));
    }

    #[test]
    fn callbacks_run_after_store_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut p = Property::new(PropertyId::PresentValue, AppTag::Real);
        for key in ["first", "second"] {
            let seen = seen.clone();
            p.add_callback(key, move |prop, _| {
                seen.lock().unwrap().push((key, prop.value().cloned()));
            });
        }
        set(&mut p, 3.5f32).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].1, Some(PropertyValue::from(3.5f32)));
    }

    #[test]
    fn removed_callback_is_silent() {
        let hits = Arc::new(Mutex::new(0));
        let mut p = Property::new(PropertyId::PresentValue, AppTag::Real);
        let h = hits.clone();
        p.add_callback("cb", move |_, _| *h.lock().unwrap() += 1);
        assert!(p.remove_callback("cb"));
        assert!(!p.remove_callback("cb"));
        set(&mut p, 1.0f32).unwrap();
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn callbacks_can_schedule_writes() {
        let target = ObjectId::new(ObjectType::AnalogValue, 2);
        let mut p = Property::new(PropertyId::PresentValue, AppTag::Real);
        p.add_callback("mirror", move |prop, cascade| {
            if let Some(value) = prop.value() {
                cascade.write(target, PropertyId::PresentValue, value.clone());
            }
        });
        let cascade = set(&mut p, 4.0f32).unwrap();
        assert_eq!(cascade.writes().len(), 1);
        assert_eq!(cascade.writes()[0].object_id, target);
    }

    #[test]
    fn whole_value_and_elements() {
        let p = list_property();
        assert_eq!(p.read(None).unwrap().len(), 3);
        assert_eq!(p.read(Some(u32::MAX)).unwrap().len(), 3);
        assert_eq!(p.read(Some(0)).unwrap(), vec![DataValue::Unsigned(3)]);
        assert_eq!(p.read(Some(2)).unwrap(), vec![DataValue::from("on")]);
        assert_eq!(code(p.read(Some(4)).unwrap_err()), ErrorCode::InvalidArrayIndex);
    }

    #[test]
    fn scalars_are_not_arrays() {
        let mut p = Property::new(PropertyId::PresentValue, AppTag::Real);
        set(&mut p, 1.0f32).unwrap();
        assert_eq!(code(p.read(Some(1)).unwrap_err()), ErrorCode::InvalidArrayIndex);
    }

    #[test]
    fn unset_value_encodes_empty() {
        let p = Property::new(PropertyId::Description, AppTag::CharacterString);
        assert!(p.encode().unwrap().is_empty());
        assert_eq!(p.to_string(), "<unset>");
    }
}
