use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(MapId);
id_newtype!(LayerId);

/// Layer metadata as reported by the map controller.
///
/// Only `id`, `name` and `caption` are interpreted; every other field the controller
/// supplies is carried through untouched in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub id: LayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl LayerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: LayerId(id.into()),
            name: name.into(),
            caption: None,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    #[serde(flatten)]
    pub record: LayerRecord,
    pub visible: bool,
}

impl LayerState {
    pub fn hidden(record: LayerRecord) -> Self {
        Self {
            record,
            visible: false,
        }
    }

    pub fn id(&self) -> &LayerId {
        &self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn caption(&self) -> Option<&str> {
        self.record.caption.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_record_keeps_unknown_controller_fields() {
        let raw = r#"{"id":"L1","name":"Schools","caption":"K-12","geometryType":"Point","zoomMin":4}"#;
        let record: LayerRecord = serde_json::from_str(raw).expect("decode");

        assert_eq!(record.id, LayerId::from("L1"));
        assert_eq!(record.caption.as_deref(), Some("K-12"));
        assert_eq!(record.metadata["geometryType"], "Point");

        let encoded = serde_json::to_value(&record).expect("encode");
        assert_eq!(encoded["zoomMin"], 4);
    }

    #[test]
    fn ids_honor_width_and_alignment() {
        assert_eq!(format!("[{:<6}]", LayerId::from("ab")), "[ab    ]");
        assert_eq!(format!("[{:>4}]", MapId::from("m")), "[   m]");
    }

    #[test]
    fn missing_caption_decodes_as_none() {
        let record: LayerRecord =
            serde_json::from_str(r#"{"id":"L2","name":"Parks"}"#).expect("decode");
        assert!(record.caption.is_none());
        assert!(record.metadata.is_empty());
    }
}
