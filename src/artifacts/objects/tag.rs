//! Annotated tag object
//!
//! ## Format
//!
//! ```text
//! object <target-sha>
//! type <target-type>
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```
//!
//! Only the target is needed: revisions naming a tag are peeled to the
//! object it points to.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    target: ObjectId,
    target_type: ObjectType,
    name: String,
}

impl Tag {
    pub fn deserialize(body: &[u8]) -> anyhow::Result<Self> {
        let content = String::from_utf8_lossy(body);

        let mut target = None;
        let mut target_type = None;
        let mut name = String::new();

        for line in content.lines() {
            if line.is_empty() {
                break;
            }
            match line.split_once(' ') {
                Some(("object", value)) => target = Some(ObjectId::try_parse(value.to_string())?),
                Some(("type", value)) => target_type = Some(ObjectType::try_from(value)?),
                Some(("tag", value)) => name = value.to_string(),
                _ => {}
            }
        }

        Ok(Tag {
            target: target.context("Invalid tag object: missing object line")?,
            target_type: target_type.context("Invalid tag object: missing type line")?,
            name,
        })
    }

    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn target_type(&self) -> ObjectType {
        self.target_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
