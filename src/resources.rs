//! Resource resolution at the compiler boundary
//!
//! Shader and texture references in a document are strings relative to the
//! document. The compiler turns them into engine paths with
//! [`ResourceResolver::resolve_relative_path`] and asks the resolver for a
//! handle. Loading itself is the resolver's business.

use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Handle to a shader known to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShaderHandle(pub u64);

/// Handle to a texture known to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TextureHandle(pub u64);

/// What kind of resource a reference points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Shader,
    Texture,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Shader => f.write_str("shader"),
            ResourceKind::Texture => f.write_str("texture"),
        }
    }
}

/// Resolver failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("{kind} `{path}` not found")]
    NotFound { kind: ResourceKind, path: String },
    #[error("failed to load {kind} `{path}`: {reason}")]
    LoadFailed {
        kind: ResourceKind,
        path: String,
        reason: String,
    },
}

/// Engine path rule for references found in a document
///
/// A reference starting with `/` is relative to the asset root and loses the
/// slash. Anything else is relative to the directory of `base_path`.
pub fn make_full_path(reference: &str, base_path: &str) -> String {
    if let Some(rooted) = reference.strip_prefix('/') {
        return rooted.to_string();
    }
    match base_path.rfind('/') {
        Some(index) => format!("{}{}", &base_path[..=index], reference),
        None => reference.to_string(),
    }
}

/// Collaborator that turns document references into loaded resources
///
/// Calls happen synchronously while the document is being compiled and may
/// block. Implementations must not compile material documents themselves.
pub trait ResourceResolver {
    fn resolve_relative_path(&self, reference: &str, base_path: &str) -> String {
        make_full_path(reference, base_path)
    }

    fn load_shader(&mut self, path: &str) -> Result<ShaderHandle, ResourceError>;

    fn load_texture(&mut self, path: &str) -> Result<TextureHandle, ResourceError>;
}

/// Resolver that hands out one handle per distinct path
///
/// When an asset root is configured together with `check_exists`, a path
/// that does not name an existing file under the root is rejected.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    root: Option<PathBuf>,
    check_exists: bool,
    shaders: HashMap<String, ShaderHandle>,
    textures: HashMap<String, TextureHandle>,
    shader_paths: Vec<String>,
    texture_paths: Vec<String>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that verifies paths against files under `root`
    pub fn with_root(root: impl Into<PathBuf>, check_exists: bool) -> Self {
        Self {
            root: Some(root.into()),
            check_exists,
            ..Self::default()
        }
    }

    pub fn shader_path(&self, handle: ShaderHandle) -> Option<&str> {
        self.shader_paths.get(handle.0 as usize).map(String::as_str)
    }

    pub fn texture_path(&self, handle: TextureHandle) -> Option<&str> {
        self.texture_paths
            .get(handle.0 as usize)
            .map(String::as_str)
    }

    pub fn shader_count(&self) -> usize {
        self.shader_paths.len()
    }

    pub fn texture_count(&self) -> usize {
        self.texture_paths.len()
    }

    fn verify(&self, kind: ResourceKind, path: &str) -> Result<(), ResourceError> {
        if !self.check_exists {
            return Ok(());
        }
        let full = match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        };
        if full.is_file() {
            Ok(())
        } else {
            Err(ResourceError::NotFound {
                kind,
                path: path.to_string(),
            })
        }
    }
}

impl ResourceResolver for AssetRegistry {
    fn load_shader(&mut self, path: &str) -> Result<ShaderHandle, ResourceError> {
        if let Some(handle) = self.shaders.get(path) {
            return Ok(*handle);
        }
        self.verify(ResourceKind::Shader, path)?;
        let handle = ShaderHandle(self.shader_paths.len() as u64);
        debug!("registered shader `{}` as {:?}", path, handle);
        self.shader_paths.push(path.to_string());
        self.shaders.insert(path.to_string(), handle);
        Ok(handle)
    }

    fn load_texture(&mut self, path: &str) -> Result<TextureHandle, ResourceError> {
        if let Some(handle) = self.textures.get(path) {
            return Ok(*handle);
        }
        self.verify(ResourceKind::Texture, path)?;
        let handle = TextureHandle(self.texture_paths.len() as u64);
        debug!("registered texture `{}` as {:?}", path, handle);
        self.texture_paths.push(path.to_string());
        self.textures.insert(path.to_string(), handle);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_full_path() {
        assert_eq!(
            make_full_path("lit.glsl", "materials/wood.mat"),
            "materials/lit.glsl"
        );
        assert_eq!(
            make_full_path("../tex/wood.png", "materials/wood.mat"),
            "materials/../tex/wood.png"
        );
        assert_eq!(
            make_full_path("/shaders/lit.glsl", "materials/wood.mat"),
            "shaders/lit.glsl"
        );
        assert_eq!(make_full_path("lit.glsl", "wood.mat"), "lit.glsl");
        assert_eq!(make_full_path("lit.glsl", ""), "lit.glsl");
    }

    #[test]
    fn test_registry_interns_paths() {
        let mut registry = AssetRegistry::new();
        let a = registry.load_shader("a.glsl").unwrap();
        let b = registry.load_shader("b.glsl").unwrap();
        let a_again = registry.load_shader("a.glsl").unwrap();
        let t = registry.load_texture("a.glsl").unwrap();

        assert_eq!(a, ShaderHandle(0));
        assert_eq!(b, ShaderHandle(1));
        assert_eq!(a_again, a);
        assert_eq!(t, TextureHandle(0));
        assert_eq!(registry.shader_count(), 2);
        assert_eq!(registry.texture_count(), 1);
        assert_eq!(registry.shader_path(b), Some("b.glsl"));
        assert_eq!(registry.texture_path(TextureHandle(7)), None);
    }

    #[test]
    fn test_registry_checks_existence() {
        let root = std::env::temp_dir().join("matlang-registry-missing-root");
        let mut registry = AssetRegistry::with_root(&root, true);
        let err = registry.load_texture("nope.png").unwrap_err();
        assert_eq!(
            err,
            ResourceError::NotFound {
                kind: ResourceKind::Texture,
                path: "nope.png".into()
            }
        );
        assert_eq!(err.to_string(), "texture `nope.png` not found");
    }
}
