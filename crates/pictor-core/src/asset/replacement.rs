//! Attributes applied to the replacement node after a successful edit.

use serde_json::{Value, json};
use url::Url;

use super::{AssetId, AssetRecord, AssetSource};

/// Document attributes computed from a processed asset record.
///
/// These are the attributes stamped onto the replacement node: the fallback
/// URL, the responsive source set, the final dimensions, and an optional
/// placeholder for progressive rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementAttributes {
    /// Asset id the replacement node is stamped with.
    pub asset_id: AssetId,
    /// Fallback URL.
    pub src: Url,
    /// Responsive source renditions.
    pub sources: Vec<AssetSource>,
    /// Final pixel width.
    pub width: u64,
    /// Final pixel height.
    pub height: u64,
    /// Low-resolution placeholder, if the service provided one.
    pub placeholder: Option<String>,
}

impl ReplacementAttributes {
    /// Attribute key carrying the asset id on document nodes.
    pub const ASSET_ID_KEY: &'static str = "assetId";

    /// Builds replacement attributes from a processed asset record.
    pub fn from_record(record: &AssetRecord) -> Self {
        Self {
            asset_id: record.id.clone(),
            src: record.url.clone(),
            sources: record.sources.clone(),
            width: record.metadata.width,
            height: record.metadata.height,
            placeholder: record.metadata.blurhash.clone(),
        }
    }

    /// Renders the attributes as document attribute key/value pairs.
    ///
    /// The asset id is not included; it is stamped separately so the
    /// document can index nodes by [`Self::ASSET_ID_KEY`].
    pub fn to_attribute_pairs(&self) -> Vec<(String, Value)> {
        let mut pairs = vec![
            ("src".to_owned(), json!(self.src.as_str())),
            ("width".to_owned(), json!(self.width)),
            ("height".to_owned(), json!(self.height)),
        ];

        if !self.sources.is_empty() {
            let srcset = self
                .sources
                .iter()
                .map(|source| format!("{} {}w", source.url, source.width))
                .collect::<Vec<_>>()
                .join(", ");
            pairs.push(("sources".to_owned(), json!(srcset)));
        }

        if let Some(placeholder) = &self.placeholder {
            pairs.push(("placeholder".to_owned(), json!(placeholder)));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetMetadata, ProcessingStatus};

    fn record() -> AssetRecord {
        AssetRecord {
            id: AssetId::new("img-1"),
            url: "https://assets.example.com/img-1".parse().expect("valid url"),
            sources: vec![AssetSource {
                url: "https://assets.example.com/img-1/w_400"
                    .parse()
                    .expect("valid url"),
                width: 400,
            }],
            metadata: AssetMetadata {
                width: 400,
                height: 200,
                blurhash: Some("LEHV6nWB2yk8".to_owned()),
                metadata_processing_status: Some(ProcessingStatus::Success),
            },
            updated_at: None,
        }
    }

    #[test]
    fn test_from_record() {
        let attrs = ReplacementAttributes::from_record(&record());

        assert_eq!(attrs.asset_id.as_str(), "img-1");
        assert_eq!(attrs.width, 400);
        assert_eq!(attrs.height, 200);
        assert_eq!(attrs.sources.len(), 1);
        assert_eq!(attrs.placeholder.as_deref(), Some("LEHV6nWB2yk8"));
    }

    #[test]
    fn test_attribute_pairs() {
        let attrs = ReplacementAttributes::from_record(&record());
        let pairs = attrs.to_attribute_pairs();

        let srcset = pairs
            .iter()
            .find(|(key, _)| key == "sources")
            .map(|(_, value)| value.clone())
            .expect("srcset present");
        assert_eq!(srcset, "https://assets.example.com/img-1/w_400 400w");

        assert!(pairs.iter().any(|(key, _)| key == "placeholder"));
    }
}
