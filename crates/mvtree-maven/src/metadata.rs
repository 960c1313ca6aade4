//! Version listings from `maven-metadata.xml`.
//!
//! Range requests need every published version of an artifact. A local
//! repository may keep an artifact-level metadata file next to the version
//! directories; when present, its `<versions>` list is authoritative.

use quick_xml::events::Event;
use quick_xml::Reader;

/// The parts of an artifact-level metadata file a range lookup reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionListing {
    /// `artifactId` the file claims to describe, if it names one.
    pub artifact_id: Option<String>,
    /// Listed versions, first occurrence kept.
    pub versions: Vec<String>,
}

impl VersionListing {
    /// Whether the file belongs to `artifact`. Files without an
    /// `artifactId` are trusted.
    pub fn describes(&self, artifact: &str) -> bool {
        self.artifact_id.as_deref().map_or(true, |a| a == artifact)
    }
}

pub fn parse_version_listing(xml: &str) -> miette::Result<VersionListing> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut listing = VersionListing::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text.clear();
            }
            Ok(Event::Text(ref e)) => {
                text = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                match path.join(">").as_str() {
                    "metadata>artifactId" => listing.artifact_id = Some(text.clone()),
                    "metadata>versioning>versions>version" => {
                        if !text.is_empty() && !listing.versions.contains(&text) {
                            listing.versions.push(text.clone());
                        }
                    }
                    _ => {}
                }
                path.pop();
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(mvtree_util::errors::MvtreeError::Repository {
                    message: format!("malformed maven-metadata.xml: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(listing)
}
