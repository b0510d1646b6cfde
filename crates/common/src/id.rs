//! ID generation utilities.

use uuid::Uuid;

/// Generator for collision-free media names.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new random UUID v4.
    #[must_use]
    pub fn generate_uuid_v4(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Generate a stored file name for an upload with the given extension.
    ///
    /// The extension is lowercased; the stem is a random UUID, so two
    /// uploads never share a name even when submitted concurrently.
    #[must_use]
    pub fn media_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.generate_uuid_v4(), extension.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_v4() {
        let id_gen = IdGenerator::new();
        let id = id_gen.generate_uuid_v4();

        assert_eq!(id.len(), 36); // UUID with hyphens
        assert_ne!(id, id_gen.generate_uuid_v4());
    }

    #[test]
    fn test_media_file_name() {
        let id_gen = IdGenerator::new();
        let name = id_gen.media_file_name("PNG");

        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 36 + 4);
        assert_ne!(name, id_gen.media_file_name("png"));
    }
}
