use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Split a decompressed loose object into its type and body
    ///
    /// The header has the form `<type> <size>\0`; the declared size must match
    /// the length of the body that follows it.
    pub fn split_object(content: &[u8]) -> anyhow::Result<(ObjectType, &[u8])> {
        let header_end = content
            .iter()
            .position(|byte| *byte == b'\0')
            .context("Invalid object: missing header terminator")?;
        let header = std::str::from_utf8(&content[..header_end])
            .context("Invalid object: header is not valid UTF-8")?;
        let (object_type, size) = header
            .split_once(' ')
            .context("Invalid object: malformed header")?;
        let size = size
            .parse::<usize>()
            .with_context(|| format!("Invalid object: bad size {size}"))?;

        let body = &content[header_end + 1..];
        if body.len() != size {
            anyhow::bail!(
                "Invalid object: declared size {} but found {} bytes",
                size,
                body.len()
            );
        }

        Ok((ObjectType::try_from(object_type)?, body))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            "tag" => Ok(ObjectType::Tag),
            _ => Err(anyhow::anyhow!("Invalid object type {value}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
