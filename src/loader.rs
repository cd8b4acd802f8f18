//! Asynchronous model loading
//!
//! The model adapter only knows the [`ModelLoader`] trait. [`ObjLoader`] is the
//! bundled implementation, reading Wavefront OBJ files with `tobj`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::future::{FutureExt, LocalBoxFuture};

use crate::color::Color;
use crate::gfx::picking::Aabb;
use crate::gfx::scene::{Geometry, Mesh, ObjectRef, SceneObject};

/// Resolves a model source to a scene object, asynchronously
pub trait ModelLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, anyhow::Result<ObjectRef>>;
}

/// Loads OBJ models from the file system, relative to an optional base directory
#[derive(Debug, Clone, Default)]
pub struct ObjLoader {
    base_dir: Option<PathBuf>,
}

impl ObjLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(src),
            None => PathBuf::from(src),
        }
    }
}

impl ModelLoader for ObjLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, anyhow::Result<ObjectRef>> {
        let path = self.resolve(src);
        async move { load_obj_model(&path) }.boxed_local()
    }
}

/// Reads an OBJ file into a group with one mesh child per model in the file
pub fn load_obj_model(path: &Path) -> anyhow::Result<ObjectRef> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("failed to read OBJ file {}", path.display()))?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("no materials for {}: {e}", path.display());
        Vec::new()
    });

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let mut group = SceneObject::group(name);

    for model in models {
        let vertices: Vec<[f32; 3]> = model
            .mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        if vertices.is_empty() {
            log::debug!("skipping empty mesh `{}`", model.name);
            continue;
        }

        let color = model
            .mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|material| material.diffuse)
            .map(Color::from)
            .unwrap_or(Color::WHITE);

        let mesh = SceneObject::mesh(
            model.name.clone(),
            Mesh {
                geometry: Geometry::Imported {
                    vertex_count: vertices.len(),
                    triangle_count: model.mesh.indices.len() / 3,
                },
                color,
                receive_shadow: false,
            },
        )
        .with_bounds(Aabb::from_vertices(&vertices));

        group.add_child(mesh.into_ref());
    }

    log::info!(
        "loaded {} with {} meshes",
        path.display(),
        group.children.len()
    );
    Ok(group.into_ref())
}
