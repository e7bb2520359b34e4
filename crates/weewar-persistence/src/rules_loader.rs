//! Loads a `RulesDocument` from its RON wire format. `spec.md` §6 "Rules
//! data format". Building the composite-key indexes the engine actually
//! queries is `weewar-rules-engine::loader`'s job; this module only
//! gets the raw document off the wire.

use weewar_contracts::rules_data::RulesDocument;

use crate::error::{PersistenceError, FORMAT_VERSION};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RulesDocumentFile {
    pub format_version: u32,
    pub document: RulesDocument,
}

impl RulesDocumentFile {
    #[must_use]
    pub fn new(document: RulesDocument) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            document,
        }
    }
}

/// Unknown fields in `document` are tolerated: every table in
/// `RulesDocument` that a designer might omit already carries
/// `#[serde(default)]`, so an older or partial rules file still loads.
pub fn load_rules_document(ron_str: &str) -> Result<RulesDocument, PersistenceError> {
    let file: RulesDocumentFile = ron::from_str(ron_str)?;
    if file.format_version > FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: file.format_version,
            max: FORMAT_VERSION,
        });
    }
    Ok(file.document)
}

pub fn save_rules_document(document: &RulesDocument) -> Result<String, PersistenceError> {
    let file = RulesDocumentFile::new(document.clone());
    Ok(ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default())?)
}
