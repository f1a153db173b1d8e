//! Service offerings and the insertion-ordered catalog.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The services a provider can offer. Ordered as the form lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceKey {
    Walking,
    Sitting,
    /// The offerings questions call this `overnight`.
    #[serde(alias = "overnight")]
    Overnights,
    HomeBoarding,
}

impl ServiceKey {
    pub const ALL: [ServiceKey; 4] = [
        ServiceKey::Walking,
        ServiceKey::Sitting,
        ServiceKey::Overnights,
        ServiceKey::HomeBoarding,
    ];

    /// Wire key, e.g. `"homeBoarding"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKey::Walking => "walking",
            ServiceKey::Sitting => "sitting",
            ServiceKey::Overnights => "overnights",
            ServiceKey::HomeBoarding => "homeBoarding",
        }
    }

    /// Look up a wire key, accepting the singular `overnight` too.
    pub fn parse(name: &str) -> Option<ServiceKey> {
        match name {
            "overnight" => Some(ServiceKey::Overnights),
            _ => ServiceKey::ALL.iter().copied().find(|k| k.as_str() == name),
        }
    }

    /// Human label, e.g. `"Home Boarding"`.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceKey::Walking => "Walking",
            ServiceKey::Sitting => "Sitting",
            ServiceKey::Overnights => "Overnights",
            ServiceKey::HomeBoarding => "Home Boarding",
        }
    }

    /// Walking and sitting are priced per visit length; the others are not.
    pub fn has_duration(&self) -> bool {
        matches!(self, ServiceKey::Walking | ServiceKey::Sitting)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price and selection state for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub selected: bool,
    #[serde(default)]
    pub cost: f64,
    /// Visit length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl ServiceOffering {
    pub fn unselected(key: ServiceKey) -> Self {
        Self {
            selected: false,
            cost: 0.0,
            duration: key.has_duration().then_some(0),
        }
    }
}

/// Ordered service catalog. Iteration follows insertion order, which is also
/// the order active services are reported in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceCatalog {
    entries: Vec<(ServiceKey, ServiceOffering)>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four services, unselected, in their canonical order.
    pub fn unselected() -> Self {
        Self {
            entries: ServiceKey::ALL
                .iter()
                .map(|k| (*k, ServiceOffering::unselected(*k)))
                .collect(),
        }
    }

    /// Insert or replace. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: ServiceKey, offering: ServiceOffering) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = offering,
            None => self.entries.push((key, offering)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: ServiceKey, offering: ServiceOffering) -> Self {
        self.insert(key, offering);
        self
    }

    pub fn get(&self, key: ServiceKey) -> Option<&ServiceOffering> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, o)| o)
    }

    pub fn contains(&self, key: ServiceKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ServiceKey, &ServiceOffering)> {
        self.entries.iter().map(|(k, o)| (*k, o))
    }

    /// Keys of selected services, in catalog order.
    pub fn selected_keys(&self) -> Vec<ServiceKey> {
        self.iter()
            .filter(|(_, o)| o.selected)
            .map(|(k, _)| k)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ServiceCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, offering) in &self.entries {
            map.serialize_entry(key, offering)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ServiceCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = ServiceCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from service key to {selected, cost, duration?}")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<ServiceCatalog, A::Error> {
                let mut catalog = ServiceCatalog::new();
                while let Some((key, offering)) =
                    access.next_entry::<ServiceKey, ServiceOffering>()?
                {
                    catalog.insert(key, offering);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
