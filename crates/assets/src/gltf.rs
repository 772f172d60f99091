//! glTF 2.0 import for `.glb` containers and `.gltf` files with external
//! buffers.
//!
//! Only what the scene draws is decoded: triangle primitives with positions,
//! normals and the first texture coordinate set, plus base color factors and
//! textures. Node transforms are baked into the vertices.

use crate::AssetError;
use crate::model::{AssetId, ModelData, ModelMaterial, ModelMesh, ModelVertex, TextureData};
use glam::{Mat3, Mat4, Quat, Vec3};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const BYTE: u32 = 5120;
const UNSIGNED_BYTE: u32 = 5121;
const SHORT: u32 = 5122;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;
const FLOAT: u32 = 5126;

const MODE_TRIANGLES: u32 = 4;
const MAX_NODE_DEPTH: usize = 64;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<SceneDef>,
    #[serde(default)]
    nodes: Vec<NodeDef>,
    #[serde(default)]
    meshes: Vec<MeshDef>,
    #[serde(default)]
    accessors: Vec<AccessorDef>,
    #[serde(default)]
    buffer_views: Vec<BufferViewDef>,
    #[serde(default)]
    buffers: Vec<BufferDef>,
    #[serde(default)]
    materials: Vec<MaterialDef>,
    #[serde(default)]
    textures: Vec<TextureDef>,
    #[serde(default)]
    images: Vec<ImageDef>,
}

#[derive(Debug, Deserialize)]
struct SceneDef {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct NodeDef {
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    matrix: Option<[f32; 16]>,
    translation: Option<[f32; 3]>,
    rotation: Option<[f32; 4]>,
    scale: Option<[f32; 3]>,
}

#[derive(Debug, Deserialize)]
struct MeshDef {
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<PrimitiveDef>,
}

#[derive(Debug, Deserialize)]
struct PrimitiveDef {
    #[serde(default)]
    attributes: BTreeMap<String, usize>,
    indices: Option<usize>,
    material: Option<usize>,
    mode: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessorDef {
    buffer_view: Option<usize>,
    #[serde(default)]
    byte_offset: usize,
    component_type: u32,
    #[serde(default)]
    normalized: bool,
    count: usize,
    #[serde(rename = "type")]
    kind: String,
    sparse: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BufferViewDef {
    buffer: usize,
    #[serde(default)]
    byte_offset: usize,
    byte_length: usize,
    byte_stride: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BufferDef {
    byte_length: usize,
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaterialDef {
    name: Option<String>,
    pbr_metallic_roughness: Option<PbrDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PbrDef {
    base_color_factor: Option<[f32; 4]>,
    base_color_texture: Option<TextureRef>,
}

#[derive(Debug, Deserialize)]
struct TextureRef {
    index: usize,
}

#[derive(Debug, Deserialize)]
struct TextureDef {
    source: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageDef {
    uri: Option<String>,
    buffer_view: Option<usize>,
}

fn parse_err(msg: impl Into<String>) -> AssetError {
    AssetError::GltfParse(msg.into())
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, AssetError> {
    bytes
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| AssetError::Glb(format!("truncated at byte {offset}")))
}

/// Split a GLB container into its JSON chunk and optional binary chunk.
fn split_glb(bytes: &[u8]) -> Result<(&[u8], Option<&[u8]>), AssetError> {
    if read_u32(bytes, 0)? != GLB_MAGIC {
        return Err(AssetError::Glb("bad magic".into()));
    }
    let version = read_u32(bytes, 4)?;
    if version != 2 {
        return Err(AssetError::Unsupported(format!("GLB version {version}")));
    }
    let total = read_u32(bytes, 8)? as usize;
    if total > bytes.len() {
        return Err(AssetError::Glb(format!(
            "declared length {total} exceeds file size {}",
            bytes.len()
        )));
    }
    let bytes = &bytes[..total];

    let mut json = None;
    let mut bin = None;
    let mut offset = 12;
    while offset + 8 <= total {
        let len = read_u32(bytes, offset)? as usize;
        let kind = read_u32(bytes, offset + 4)?;
        let start = offset + 8;
        let chunk = bytes
            .get(start..start + len)
            .ok_or_else(|| AssetError::Glb(format!("chunk at byte {offset} overruns file")))?;
        match kind {
            CHUNK_JSON if json.is_none() => json = Some(chunk),
            CHUNK_BIN if bin.is_none() => bin = Some(chunk),
            _ => tracing::debug!(kind, len, "skipping GLB chunk"),
        }
        offset = start + len;
    }
    let json = json.ok_or_else(|| AssetError::Glb("missing JSON chunk".into()))?;
    Ok((json, bin))
}

fn read_external(base_dir: Option<&Path>, uri: &str) -> Result<Vec<u8>, AssetError> {
    if uri.starts_with("data:") {
        return Err(AssetError::Unsupported("data URIs".into()));
    }
    let path = base_dir.unwrap_or_else(|| Path::new(".")).join(uri);
    tracing::debug!(path = %path.display(), "reading external glTF resource");
    Ok(std::fs::read(path)?)
}

/// Resolved layout of one accessor inside its buffer view.
struct AccessorView<'b> {
    bytes: &'b [u8],
    start: usize,
    stride: usize,
    count: usize,
    component_type: u32,
    component_size: usize,
    components: usize,
    normalized: bool,
}

impl AccessorView<'_> {
    fn offset(&self, element: usize, component: usize) -> usize {
        self.start + element * self.stride + component * self.component_size
    }

    fn float(&self, element: usize, component: usize) -> f32 {
        let o = self.offset(element, component);
        let b = &self.bytes[o..o + self.component_size];
        match (self.component_type, self.normalized) {
            (FLOAT, _) => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            (UNSIGNED_BYTE, true) => b[0] as f32 / 255.0,
            (UNSIGNED_BYTE, false) => b[0] as f32,
            (BYTE, true) => (b[0] as i8 as f32 / 127.0).max(-1.0),
            (BYTE, false) => b[0] as i8 as f32,
            (UNSIGNED_SHORT, true) => u16::from_le_bytes([b[0], b[1]]) as f32 / 65535.0,
            (UNSIGNED_SHORT, false) => u16::from_le_bytes([b[0], b[1]]) as f32,
            (SHORT, true) => (i16::from_le_bytes([b[0], b[1]]) as f32 / 32767.0).max(-1.0),
            (SHORT, false) => i16::from_le_bytes([b[0], b[1]]) as f32,
            _ => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
        }
    }

    fn index(&self, element: usize) -> u32 {
        let o = self.offset(element, 0);
        let b = &self.bytes[o..o + self.component_size];
        match self.component_type {
            UNSIGNED_BYTE => b[0] as u32,
            UNSIGNED_SHORT => u16::from_le_bytes([b[0], b[1]]) as u32,
            _ => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        }
    }
}

fn component_size(component_type: u32) -> Option<usize> {
    match component_type {
        BYTE | UNSIGNED_BYTE => Some(1),
        SHORT | UNSIGNED_SHORT => Some(2),
        UNSIGNED_INT | FLOAT => Some(4),
        _ => None,
    }
}

fn component_count(kind: &str) -> Option<usize> {
    match kind {
        "SCALAR" => Some(1),
        "VEC2" => Some(2),
        "VEC3" => Some(3),
        "VEC4" | "MAT2" => Some(4),
        "MAT3" => Some(9),
        "MAT4" => Some(16),
        _ => None,
    }
}

struct Importer<'a> {
    doc: &'a Document,
    buffers: Vec<Cow<'a, [u8]>>,
    base_dir: Option<&'a Path>,
}

impl<'a> Importer<'a> {
    fn new(doc: &'a Document, bin: Option<&'a [u8]>, base_dir: Option<&'a Path>) -> Result<Self, AssetError> {
        let mut buffers = Vec::with_capacity(doc.buffers.len());
        for (i, def) in doc.buffers.iter().enumerate() {
            let data = match (&def.uri, bin) {
                (Some(uri), _) => Cow::Owned(read_external(base_dir, uri)?),
                (None, Some(bin)) if i == 0 => Cow::Borrowed(bin),
                (None, _) => {
                    return Err(parse_err(format!("buffer {i} has no uri and no GLB binary chunk")));
                }
            };
            if data.len() < def.byte_length {
                return Err(parse_err(format!(
                    "buffer {i} holds {} bytes, expected {}",
                    data.len(),
                    def.byte_length
                )));
            }
            buffers.push(data);
        }
        Ok(Self {
            doc,
            buffers,
            base_dir,
        })
    }

    fn view_bytes(&self, view_index: usize) -> Result<(&[u8], Option<usize>), AssetError> {
        let view = self
            .doc
            .buffer_views
            .get(view_index)
            .ok_or_else(|| parse_err(format!("buffer view {view_index} does not exist")))?;
        let buffer = self
            .buffers
            .get(view.buffer)
            .ok_or_else(|| parse_err(format!("buffer {} does not exist", view.buffer)))?;
        let bytes = view
            .byte_offset
            .checked_add(view.byte_length)
            .and_then(|end| buffer.get(view.byte_offset..end))
            .ok_or_else(|| parse_err(format!("buffer view {view_index} overruns its buffer")))?;
        Ok((bytes, view.byte_stride))
    }

    fn accessor(&self, index: usize) -> Result<AccessorView<'_>, AssetError> {
        let acc = self
            .doc
            .accessors
            .get(index)
            .ok_or_else(|| parse_err(format!("accessor {index} does not exist")))?;
        if acc.sparse.is_some() {
            return Err(AssetError::Unsupported(format!("sparse accessor {index}")));
        }
        let view_index = acc
            .buffer_view
            .ok_or_else(|| AssetError::Unsupported(format!("accessor {index} without buffer view")))?;
        let component_size = component_size(acc.component_type)
            .ok_or_else(|| parse_err(format!("accessor {index} component type {}", acc.component_type)))?;
        let components = component_count(&acc.kind)
            .ok_or_else(|| parse_err(format!("accessor {index} type {:?}", acc.kind)))?;
        let (bytes, stride) = self.view_bytes(view_index)?;
        let element_size = component_size * components;
        let stride = stride.unwrap_or(element_size);
        if stride < element_size {
            return Err(parse_err(format!(
                "buffer view {view_index} stride {stride} is smaller than accessor {index} elements ({element_size} bytes)"
            )));
        }
        // count <= bytes.len() from here on
        if acc.count > 0 {
            let end = (acc.count - 1)
                .checked_mul(stride)
                .and_then(|span| span.checked_add(acc.byte_offset))
                .and_then(|span| span.checked_add(element_size));
            if end.is_none_or(|end| end > bytes.len()) {
                return Err(parse_err(format!("accessor {index} overruns buffer view {view_index}")));
            }
        }
        Ok(AccessorView {
            bytes,
            start: acc.byte_offset,
            stride,
            count: acc.count,
            component_type: acc.component_type,
            component_size,
            components,
            normalized: acc.normalized,
        })
    }

    /// Read a float vector attribute with exactly `n` components per element.
    fn read_vectors(&self, index: usize, n: usize) -> Result<Vec<f32>, AssetError> {
        let view = self.accessor(index)?;
        if view.components != n {
            return Err(parse_err(format!(
                "accessor {index} has {} components, expected {n}",
                view.components
            )));
        }
        let mut out = Vec::with_capacity(view.count.saturating_mul(n));
        for element in 0..view.count {
            for c in 0..n {
                out.push(view.float(element, c));
            }
        }
        Ok(out)
    }

    fn read_indices(&self, index: usize) -> Result<Vec<u32>, AssetError> {
        let view = self.accessor(index)?;
        if view.components != 1
            || !matches!(view.component_type, UNSIGNED_BYTE | UNSIGNED_SHORT | UNSIGNED_INT)
        {
            return Err(parse_err(format!("accessor {index} is not an index accessor")));
        }
        Ok((0..view.count).map(|i| view.index(i)).collect())
    }

    fn image_bytes(&self, image_index: usize) -> Result<Vec<u8>, AssetError> {
        let image = self
            .doc
            .images
            .get(image_index)
            .ok_or_else(|| parse_err(format!("image {image_index} does not exist")))?;
        match (image.buffer_view, &image.uri) {
            (Some(view), _) => Ok(self.view_bytes(view)?.0.to_vec()),
            (None, Some(uri)) => read_external(self.base_dir, uri),
            (None, None) => Err(parse_err(format!("image {image_index} has no data"))),
        }
    }

    /// Decode every texture. Returns the decoded textures and, per glTF
    /// texture index, the slot it landed in. Undecodable textures leave the
    /// material untextured.
    fn textures(&self) -> (Vec<TextureData>, Vec<Option<usize>>) {
        let mut decoded: Vec<TextureData> = Vec::new();
        let mut by_image: BTreeMap<usize, Option<usize>> = BTreeMap::new();
        let mut slots = Vec::with_capacity(self.doc.textures.len());
        for (t, texture) in self.doc.textures.iter().enumerate() {
            let Some(source) = texture.source else {
                slots.push(None);
                continue;
            };
            if let Some(slot) = by_image.get(&source) {
                slots.push(*slot);
                continue;
            }
            let slot = match self
                .image_bytes(source)
                .and_then(|bytes| Ok(image::load_from_memory(&bytes)?.to_rgba8()))
            {
                Ok(img) => {
                    decoded.push(TextureData {
                        width: img.width(),
                        height: img.height(),
                        rgba: img.into_raw(),
                    });
                    Some(decoded.len() - 1)
                }
                Err(e) => {
                    tracing::warn!(texture = t, image = source, error = %e, "texture skipped");
                    None
                }
            };
            by_image.insert(source, slot);
            slots.push(slot);
        }
        (decoded, slots)
    }

    fn materials(&self, texture_slots: &[Option<usize>]) -> Vec<ModelMaterial> {
        self.doc
            .materials
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let pbr = def.pbr_metallic_roughness.as_ref();
                ModelMaterial {
                    name: def.name.clone().unwrap_or_else(|| format!("material_{i}")),
                    base_color: pbr
                        .and_then(|p| p.base_color_factor)
                        .unwrap_or([1.0, 1.0, 1.0, 1.0]),
                    texture: pbr
                        .and_then(|p| p.base_color_texture.as_ref())
                        .and_then(|t| texture_slots.get(t.index).copied().flatten()),
                }
            })
            .collect()
    }

    fn root_nodes(&self) -> Vec<usize> {
        let doc = self.doc;
        if let Some(scene) = doc
            .scene
            .and_then(|i| doc.scenes.get(i))
            .or_else(|| doc.scenes.first())
        {
            return scene.nodes.clone();
        }
        let children: BTreeSet<usize> = doc
            .nodes
            .iter()
            .flat_map(|n| n.children.iter().copied())
            .collect();
        (0..doc.nodes.len()).filter(|i| !children.contains(i)).collect()
    }

    fn visit(&self, node_index: usize, parent: Mat4, depth: usize, out: &mut Vec<ModelMesh>) -> Result<(), AssetError> {
        if depth > MAX_NODE_DEPTH {
            return Err(parse_err(format!(
                "node hierarchy deeper than {MAX_NODE_DEPTH} at node {node_index}"
            )));
        }
        let node = self
            .doc
            .nodes
            .get(node_index)
            .ok_or_else(|| parse_err(format!("node {node_index} does not exist")))?;
        let world = parent * local_matrix(node);
        if let Some(mesh) = node.mesh {
            self.emit_mesh(mesh, world, out)?;
        }
        for &child in &node.children {
            self.visit(child, world, depth + 1, out)?;
        }
        Ok(())
    }

    fn emit_mesh(&self, mesh_index: usize, world: Mat4, out: &mut Vec<ModelMesh>) -> Result<(), AssetError> {
        let mesh = self
            .doc
            .meshes
            .get(mesh_index)
            .ok_or_else(|| parse_err(format!("mesh {mesh_index} does not exist")))?;
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        let flip_winding = world.determinant() < 0.0;
        let base_name = mesh
            .name
            .clone()
            .unwrap_or_else(|| format!("mesh_{mesh_index}"));

        for (p, prim) in mesh.primitives.iter().enumerate() {
            let mode = prim.mode.unwrap_or(MODE_TRIANGLES);
            if mode != MODE_TRIANGLES {
                tracing::warn!(mesh = mesh_index, primitive = p, mode, "skipping non-triangle primitive");
                continue;
            }
            if let Some(m) = prim.material {
                if m >= self.doc.materials.len() {
                    return Err(parse_err(format!("mesh {mesh_index} references material {m}")));
                }
            }
            let position_accessor = *prim.attributes.get("POSITION").ok_or_else(|| {
                parse_err(format!("mesh {mesh_index} primitive {p} has no POSITION"))
            })?;
            let positions = self.read_vectors(position_accessor, 3)?;
            let count = positions.len() / 3;

            let normals = match prim.attributes.get("NORMAL") {
                Some(&i) => Some(self.read_vectors(i, 3)?),
                None => None,
            };
            let uvs = match prim.attributes.get("TEXCOORD_0") {
                Some(&i) => Some(self.read_vectors(i, 2)?),
                None => None,
            };
            if normals.as_ref().is_some_and(|n| n.len() != count * 3)
                || uvs.as_ref().is_some_and(|u| u.len() != count * 2)
            {
                return Err(parse_err(format!(
                    "mesh {mesh_index} primitive {p} attribute counts disagree"
                )));
            }

            let mut indices = match prim.indices {
                Some(i) => self.read_indices(i)?,
                None => (0..count as u32).collect(),
            };
            if indices.len() % 3 != 0 {
                return Err(parse_err(format!(
                    "mesh {mesh_index} primitive {p} index count {} is not a multiple of 3",
                    indices.len()
                )));
            }
            if let Some(bad) = indices.iter().find(|&&i| i as usize >= count) {
                return Err(parse_err(format!(
                    "mesh {mesh_index} primitive {p} index {bad} out of range"
                )));
            }
            if flip_winding {
                for tri in indices.chunks_exact_mut(3) {
                    tri.swap(1, 2);
                }
            }

            let mut vertices: Vec<ModelVertex> = (0..count)
                .map(|v| {
                    let local = Vec3::new(positions[3 * v], positions[3 * v + 1], positions[3 * v + 2]);
                    let normal = normals
                        .as_ref()
                        .map(|n| (normal_matrix * Vec3::new(n[3 * v], n[3 * v + 1], n[3 * v + 2])).normalize_or_zero())
                        .unwrap_or(Vec3::ZERO);
                    ModelVertex {
                        position: world.transform_point3(local).to_array(),
                        normal: normal.to_array(),
                        uv: uvs.as_ref().map(|u| [u[2 * v], u[2 * v + 1]]).unwrap_or([0.0, 0.0]),
                    }
                })
                .collect();
            if normals.is_none() {
                compute_normals(&mut vertices, &indices);
            }

            out.push(ModelMesh {
                name: format!("{base_name}_{p}"),
                vertices,
                indices,
                material: prim.material,
            });
        }
        Ok(())
    }
}

fn local_matrix(node: &NodeDef) -> Mat4 {
    if let Some(m) = node.matrix {
        return Mat4::from_cols_array(&m);
    }
    let translation = node.translation.map(Vec3::from).unwrap_or(Vec3::ZERO);
    let rotation = node.rotation.map(Quat::from_array).unwrap_or(Quat::IDENTITY);
    let scale = node.scale.map(Vec3::from).unwrap_or(Vec3::ONE);
    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// Area-weighted smooth normals for meshes that ship without them.
fn compute_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut acc = vec![Vec3::ZERO; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from(vertices[a].position);
        let pb = Vec3::from(vertices[b].position);
        let pc = Vec3::from(vertices[c].position);
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    for (v, n) in vertices.iter_mut().zip(acc) {
        v.normal = n.normalize_or_zero().to_array();
    }
}

/// Parse a `.glb` or `.gltf` document from memory.
///
/// `base_dir` resolves external buffer and image URIs.
pub fn parse_model(bytes: &[u8], name: &str, base_dir: Option<&Path>) -> Result<ModelData, AssetError> {
    let _span = tracing::info_span!("parse_model", name).entered();

    let (json, bin) = if bytes.starts_with(b"glTF") {
        split_glb(bytes)?
    } else {
        (bytes, None)
    };
    let doc: Document = serde_json::from_slice(json)?;
    let importer = Importer::new(&doc, bin, base_dir)?;

    let (textures, texture_slots) = importer.textures();
    let materials = importer.materials(&texture_slots);

    let mut meshes = Vec::new();
    if doc.nodes.is_empty() {
        for mesh in 0..doc.meshes.len() {
            importer.emit_mesh(mesh, Mat4::IDENTITY, &mut meshes)?;
        }
    } else {
        for root in importer.root_nodes() {
            importer.visit(root, Mat4::IDENTITY, 0, &mut meshes)?;
        }
    }
    meshes.retain(|m| !m.indices.is_empty());
    if meshes.is_empty() {
        return Err(AssetError::Empty);
    }

    let model = ModelData {
        id: AssetId::of_bytes(bytes),
        name: name.to_string(),
        meshes,
        materials,
        textures,
    };
    tracing::debug!(
        id = %model.id,
        meshes = model.meshes.len(),
        vertices = model.vertex_count(),
        triangles = model.triangle_count(),
        materials = model.materials.len(),
        textures = model.textures.len(),
        "model parsed"
    );
    Ok(model)
}
