//! Loose object database
//!
//! Objects live under `.git/objects/<xx>/<38 hex>` as zlib-compressed
//! `<type> <size>\0<body>` records. Every read is checked against the SHA-1
//! the object is filed under.

use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Upper bound on tag-to-tag indirections followed while peeling
const MAX_PEEL_DEPTH: usize = 16;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

// TODO: read packfiles so that cloned or gc'ed repositories can be compared
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Compare two trees (or the trees of two commits) and collect the changed files
    pub fn tree_diff(
        &self,
        old_oid: Option<&ObjectId>,
        new_oid: Option<&ObjectId>,
    ) -> anyhow::Result<TreeDiff<'_>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_oids(old_oid, new_oid, "")?;
        Ok(tree_diff)
    }

    /// Read an object and split it into its type and body
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(object_id.to_path());
        let content = self.read_object(object_path)?;

        let digest = Sha1::digest(&content);
        let actual = ObjectId::from_raw(&digest)?;
        if &actual != object_id {
            anyhow::bail!("Corrupt object {object_id}: content hashes to {actual}");
        }

        let (object_type, body) = ObjectType::split_object(&content)?;
        let body_start = content.len() - body.len();

        Ok((object_type, content.slice(body_start..)))
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Bytes>> {
        let (object_type, body) = self.load(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(body)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, body) = self.load(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(&body[..])?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, body) = self.load(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_id.clone(), &body)?)),
            _ => Ok(None),
        }
    }

    /// Follow annotated tags until reaching a non-tag object
    ///
    /// # Returns
    ///
    /// The commit the object peels to, or `None` when it peels to a tree or blob
    /// or when the chain ends at an object that is not in the database
    pub fn peel_to_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let mut current = object_id.clone();

        for _ in 0..MAX_PEEL_DEPTH {
            if !self.contains(&current) {
                tracing::debug!(object = %current, "dangling object id");
                return Ok(None);
            }

            let (object_type, body) = self.load(&current)?;
            match object_type {
                ObjectType::Commit => return Ok(Some(current)),
                ObjectType::Tag => current = Tag::deserialize(&body)?.target().clone(),
                ObjectType::Blob | ObjectType::Tree => return Ok(None),
            }
        }

        anyhow::bail!("Tag chain starting at {object_id} is too deep")
    }

    /// Raw body of a commit object, including any signature headers
    pub fn read_raw_commit(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        match self.load(object_id)? {
            (ObjectType::Commit, body) => Ok(body),
            (other, _) => anyhow::bail!("object {object_id} is a {other}, not a commit"),
        }
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    /// Find all objects whose OID starts with the given prefix.
    ///
    /// Used to resolve abbreviated OIDs to their full form. Several matches
    /// mean the prefix is ambiguous.
    ///
    /// Prefixes of two or more characters only scan their fan-out directory.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        let dir_names = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dir_names {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let full_oid = format!("{}{}", dir_name, entry?.file_name().to_string_lossy());

                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.load(object_id)?;
        Ok(object_type)
    }

    /// Write a loose object; used by unit tests to seed a database
    #[cfg(test)]
    pub(crate) fn store(&self, object_type: ObjectType, body: &[u8]) -> anyhow::Result<ObjectId> {
        use std::io::Write;

        let mut content = format!("{} {}\0", object_type, body.len()).into_bytes();
        content.extend_from_slice(body);

        let oid = ObjectId::from_raw(&Sha1::digest(&content))?;
        let object_path = self.path.join(oid.to_path());
        std::fs::create_dir_all(object_path.parent().context("Invalid object path")?)?;

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&content)?;
        std::fs::write(object_path, encoder.finish()?)?;

        Ok(oid)
    }
}
