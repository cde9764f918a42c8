use crate::error::ModelError;
use crate::mandatory::mandatory_properties;
use crate::property::Property;
use crate::subscription::SubscriptionList;
use crate::type_map::PropertyTypeMap;
use rustbac_core::types::{AppTag, DataValue, ObjectId, ObjectType, PropertyId, PropertyValue};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

/// Properties computed from tree state instead of being stored.
pub const DYNAMIC_PROPERTIES: [PropertyId; 4] = [
    PropertyId::ObjectIdentifier,
    PropertyId::PropertyList,
    PropertyId::ObjectList,
    PropertyId::ProtocolObjectTypesSupported,
];

/// Never listed in `PROPERTY_LIST`.
const PROPERTY_LIST_EXCLUDED: [PropertyId; 4] = [
    PropertyId::ObjectName,
    PropertyId::ObjectType,
    PropertyId::ObjectIdentifier,
    PropertyId::PropertyList,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComputedProperty {
    ObjectIdentifier,
    PropertyList,
    ObjectList,
    ProtocolObjectTypesSupported,
}

impl ComputedProperty {
    fn for_id(id: PropertyId) -> Option<Self> {
        match id {
            PropertyId::ObjectIdentifier => Some(Self::ObjectIdentifier),
            PropertyId::PropertyList => Some(Self::PropertyList),
            PropertyId::ObjectList => Some(Self::ObjectList),
            PropertyId::ProtocolObjectTypesSupported => Some(Self::ProtocolObjectTypesSupported),
            _ => None,
        }
    }

    fn tag(self) -> AppTag {
        match self {
            Self::ObjectIdentifier | Self::ObjectList => AppTag::ObjectId,
            Self::PropertyList => AppTag::Enumerated,
            Self::ProtocolObjectTypesSupported => AppTag::BitString,
        }
    }

    fn evaluate(self, object: &Object) -> PropertyValue {
        match self {
            Self::ObjectIdentifier => PropertyValue::from(object.id),
            Self::PropertyList => PropertyValue::List(
                object
                    .property_list()
                    .into_iter()
                    .map(|id| DataValue::Enumerated(id.to_u32()))
                    .collect(),
            ),
            Self::ObjectList => PropertyValue::List(
                object
                    .object_ids()
                    .into_iter()
                    .map(DataValue::ObjectId)
                    .collect(),
            ),
            Self::ProtocolObjectTypesSupported => PropertyValue::List(
                object
                    .object_types()
                    .into_iter()
                    .map(|t| DataValue::Enumerated(u32::from(t.to_u16())))
                    .collect(),
            ),
        }
    }
}

/// A child-map slot. `Own` marks the root's entry for itself.
#[derive(Debug)]
pub enum ObjectEntry {
    Own,
    Child(Object),
}

/// A property as returned by [`Object::get_property`].
#[derive(Debug)]
pub enum PropertyRef<'a> {
    Stored(&'a Property),
    Computed(Property),
}

impl Deref for PropertyRef<'_> {
    type Target = Property;

    fn deref(&self) -> &Property {
        match self {
            Self::Stored(p) => p,
            Self::Computed(p) => p,
        }
    }
}

/// A named, typed node holding properties and child objects.
#[derive(Debug)]
pub struct Object {
    id: ObjectId,
    types: Arc<PropertyTypeMap>,
    properties: BTreeMap<PropertyId, Property>,
    objects: BTreeMap<ObjectType, BTreeMap<u32, ObjectEntry>>,
    dynamic: Vec<PropertyId>,
    subscriptions: SubscriptionList,
}

impl Object {
    pub fn new(id: ObjectId, name: &str, types: Arc<PropertyTypeMap>) -> Result<Self, ModelError> {
        if id.instance() > ObjectId::MAX_INSTANCE {
            return Err(ModelError::InvalidInstance(id.instance()));
        }
        if !id.object_type().is_recognized() {
            return Err(ModelError::UnsupportedObjectType(id.object_type()));
        }
        let mut object = Self {
            id,
            types,
            properties: BTreeMap::new(),
            objects: BTreeMap::new(),
            dynamic: DYNAMIC_PROPERTIES.to_vec(),
            subscriptions: SubscriptionList::new(),
        };
        object
            .add_property(PropertyId::ObjectType, Some(AppTag::Enumerated))?
            .store(PropertyValue::from(DataValue::Enumerated(u32::from(
                id.object_type().to_u16(),
            ))))?;
        object
            .add_property(PropertyId::ObjectName, Some(AppTag::CharacterString))?
            .store(PropertyValue::from(name))?;
        Ok(object)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn object_type(&self) -> ObjectType {
        self.id.object_type()
    }

    pub fn instance(&self) -> u32 {
        self.id.instance()
    }

    pub fn name(&self) -> Option<&str> {
        match self.properties.get(&PropertyId::ObjectName)?.value()? {
            PropertyValue::Single(DataValue::CharacterString(name)) => Some(name),
            _ => None,
        }
    }

    pub fn types(&self) -> &Arc<PropertyTypeMap> {
        &self.types
    }

    /// Returns the stored property `id`, creating it first if needed.
    ///
    /// The tag falls back to the type table. Computed ids cannot be stored.
    pub fn add_property(
        &mut self,
        id: PropertyId,
        tag: Option<AppTag>,
    ) -> Result<&mut Property, ModelError> {
        if self.is_dynamic(id) {
            return Err(ModelError::DynamicProperty(id));
        }
        if !self.properties.contains_key(&id) {
            let tag = tag
                .or_else(|| self.types.get(id))
                .ok_or(ModelError::NoDefaultType(id))?;
            self.properties.insert(id, Property::new(id, tag));
        }
        self.properties
            .get_mut(&id)
            .ok_or(ModelError::NoDefaultType(id))
    }

    pub fn delete_property(&mut self, id: PropertyId) -> Option<Property> {
        self.properties.remove(&id)
    }

    /// Resolves `id`, computing it from current state when it is dynamic.
    pub fn get_property(&self, id: PropertyId) -> Option<PropertyRef<'_>> {
        if let Some(computed) = ComputedProperty::for_id(id) {
            return Some(PropertyRef::Computed(Property::computed(
                id,
                computed.tag(),
                computed.evaluate(self),
            )));
        }
        self.properties.get(&id).map(PropertyRef::Stored)
    }

    pub fn property_mut(&mut self, id: PropertyId) -> Option<&mut Property> {
        self.properties.get_mut(&id)
    }

    pub fn stored_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn is_dynamic(&self, id: PropertyId) -> bool {
        self.dynamic.contains(&id)
    }

    /// Marks `id` as supplied by an owner rather than stored here.
    pub(crate) fn add_dynamic(&mut self, id: PropertyId) {
        if !self.dynamic.contains(&id) {
            self.dynamic.push(id);
        }
    }

    /// Stored ids together with the dynamic ones, in ascending order.
    pub fn all_property_ids(&self) -> Vec<PropertyId> {
        self.properties
            .keys()
            .chain(self.dynamic.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn property_list(&self) -> Vec<PropertyId> {
        let list: Vec<PropertyId> = self
            .all_property_ids()
            .into_iter()
            .filter(|id| !PROPERTY_LIST_EXCLUDED.contains(id))
            .collect();
        match mandatory_properties(self.object_type()) {
            Some(mandatory) => {
                let missing: Vec<_> = mandatory.iter().filter(|p| !list.contains(p)).collect();
                if !missing.is_empty() {
                    log::warn!(
                        "object {} ({:?}) is missing mandatory properties: {missing:?}",
                        self.id,
                        self.name().unwrap_or_default()
                    );
                }
            }
            None => log::warn!(
                "no mandatory properties are defined for object type {}",
                self.object_type()
            ),
        }
        list
    }

    /// Mandatory properties for this object's type that it does not expose.
    pub fn missing_mandatory_properties(&self) -> Vec<PropertyId> {
        let ids = self.all_property_ids();
        mandatory_properties(self.object_type())
            .unwrap_or_default()
            .iter()
            .filter(|p| !ids.contains(p))
            .copied()
            .collect()
    }

    /// Creates a child object. The identity must be new under this parent.
    ///
    /// Only this object's direct children are checked. Lookups walk the tree
    /// depth-first and return the first match, so an identity repeated in
    /// another branch is shadowed. [`Device::add_object_under`] checks the
    /// whole device.
    ///
    /// [`Device::add_object_under`]: crate::Device::add_object_under
    pub fn add_object(
        &mut self,
        instance: u32,
        object_type: ObjectType,
        name: &str,
    ) -> Result<&mut Object, ModelError> {
        if instance > ObjectId::MAX_INSTANCE {
            return Err(ModelError::InvalidInstance(instance));
        }
        let id = ObjectId::new(object_type, instance);
        if self.get_object(instance, object_type).is_some() {
            return Err(ModelError::DuplicateObject(id));
        }
        let child = Object::new(id, name, self.types.clone())?;
        let slot = self
            .objects
            .entry(object_type)
            .or_default()
            .entry(instance)
            .or_insert(ObjectEntry::Child(child));
        match slot {
            ObjectEntry::Child(child) => Ok(child),
            ObjectEntry::Own => Err(ModelError::DuplicateObject(id)),
        }
    }

    pub(crate) fn insert_own_entry(&mut self) {
        let (object_type, instance) = (self.object_type(), self.instance());
        self.objects
            .entry(object_type)
            .or_default()
            .insert(instance, ObjectEntry::Own);
    }

    /// Direct child lookup; the root's own entry resolves to itself.
    pub fn get_object(&self, instance: u32, object_type: ObjectType) -> Option<&Object> {
        match self.objects.get(&object_type)?.get(&instance)? {
            ObjectEntry::Own => Some(self),
            ObjectEntry::Child(child) => Some(child),
        }
    }

    pub fn get_object_mut(&mut self, instance: u32, object_type: ObjectType) -> Option<&mut Object> {
        let entry = self.objects.get(&object_type).and_then(|m| m.get(&instance));
        if matches!(entry, Some(ObjectEntry::Own)) {
            return Some(self);
        }
        match self.objects.get_mut(&object_type)?.get_mut(&instance)? {
            ObjectEntry::Child(child) => Some(child),
            ObjectEntry::Own => None,
        }
    }

    /// Finds `id` anywhere in this subtree, this object included.
    pub fn find_object(&self, id: ObjectId) -> Option<&Object> {
        if self.id == id {
            return Some(self);
        }
        self.children().find_map(|child| child.find_object(id))
    }

    pub fn find_object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        if self.id == id {
            return Some(self);
        }
        self.objects
            .values_mut()
            .flat_map(|group| group.values_mut())
            .find_map(|entry| match entry {
                ObjectEntry::Child(child) => child.find_object_mut(id),
                ObjectEntry::Own => None,
            })
    }

    /// Direct children, excluding the root's own entry.
    pub fn children(&self) -> impl Iterator<Item = &Object> {
        self.objects
            .values()
            .flat_map(|group| group.values())
            .filter_map(|entry| match entry {
                ObjectEntry::Child(child) => Some(child),
                ObjectEntry::Own => None,
            })
    }

    /// Every descendant identity, depth first. The root's own entry adds its
    /// identity once and is not descended into.
    pub fn object_ids(&self) -> Vec<ObjectId> {
        let mut ids = Vec::new();
        self.collect_object_ids(&mut ids);
        ids
    }

    fn collect_object_ids(&self, ids: &mut Vec<ObjectId>) {
        for entry in self.objects.values().flat_map(|group| group.values()) {
            match entry {
                ObjectEntry::Own => ids.push(self.id),
                ObjectEntry::Child(child) => {
                    ids.push(child.id);
                    child.collect_object_ids(ids);
                }
            }
        }
    }

    /// Distinct object types present among descendants.
    pub fn object_types(&self) -> Vec<ObjectType> {
        self.object_ids()
            .into_iter()
            .map(ObjectId::object_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn subscriptions(&self) -> &SubscriptionList {
        &self.subscriptions
    }

    pub(crate) fn subscriptions_mut(&mut self) -> &mut SubscriptionList {
        &mut self.subscriptions
    }

    /// Ages every subscription in this subtree. Returns how many expired.
    pub(crate) fn expire_subscriptions(&mut self, elapsed: Duration) -> usize {
        let mut expired = self.subscriptions.expire(elapsed);
        for property in self.properties.values_mut() {
            expired += property.subscriptions_mut().expire(elapsed);
        }
        for entry in self.objects.values_mut().flat_map(|group| group.values_mut()) {
            if let ObjectEntry::Child(child) = entry {
                expired += child.expire_subscriptions(elapsed);
            }
        }
        expired
    }

    /// Property names mapped to readable values, for operators.
    pub fn dump_properties(&self) -> BTreeMap<String, String> {
        self.all_property_ids()
            .into_iter()
            .filter_map(|id| {
                let property = self.get_property(id)?;
                Some((id.to_string(), describe(&property)))
            })
            .collect()
    }
}

pub(crate) fn describe(property: &Property) -> String {
    match (property.id(), property.value()) {
        (PropertyId::ObjectType, Some(PropertyValue::Single(DataValue::Enumerated(raw)))) => {
            u16::try_from(*raw)
                .map(|raw| ObjectType::from_u16(raw).to_string())
                .unwrap_or_else(|_| raw.to_string())
        }
        _ => property.to_string(),
    }
}
