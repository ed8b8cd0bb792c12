//! Named uniforms packed into one uniform buffer block.
//!
//! Programs declare their uniforms as an ordered list of `(name, kind)` pairs.
//! [`UniformLayout`] assigns byte offsets following the WGSL uniform address
//! space rules, so the list must mirror the field order of the shader's
//! uniform struct. Dotted names such as `dirLight.direction` are plain names
//! here; the WGSL struct spells them with underscores.

use cgmath::{Matrix4, Point3, Vector2, Vector3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Mat4,
    Vec3,
    Vec2,
    Int,
    UInt,
    Float,
}

impl UniformKind {
    pub fn size(self) -> usize {
        match self {
            UniformKind::Mat4 => 64,
            UniformKind::Vec3 => 12,
            UniformKind::Vec2 => 8,
            UniformKind::Int | UniformKind::UInt | UniformKind::Float => 4,
        }
    }

    pub fn align(self) -> usize {
        match self {
            UniformKind::Mat4 | UniformKind::Vec3 => 16,
            UniformKind::Vec2 => 8,
            UniformKind::Int | UniformKind::UInt | UniformKind::Float => 4,
        }
    }
}

/// A value that can be written to a uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Mat4([[f32; 4]; 4]),
    Vec3([f32; 3]),
    Vec2([f32; 2]),
    Int(i32),
    UInt(u32),
    Float(f32),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Mat4(_) => UniformKind::Mat4,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::UInt(_) => UniformKind::UInt,
            UniformValue::Float(_) => UniformKind::Float,
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            UniformValue::Mat4(m) => bytemuck::cast_slice(m),
            UniformValue::Vec3(v) => bytemuck::cast_slice(v),
            UniformValue::Vec2(v) => bytemuck::cast_slice(v),
            UniformValue::Int(i) => bytemuck::bytes_of(i),
            UniformValue::UInt(u) => bytemuck::bytes_of(u),
            UniformValue::Float(f) => bytemuck::bytes_of(f),
        }
    }
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(m: Matrix4<f32>) -> Self {
        UniformValue::Mat4(m.into())
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(v: Vector3<f32>) -> Self {
        UniformValue::Vec3(v.into())
    }
}

impl From<Point3<f32>> for UniformValue {
    fn from(p: Point3<f32>) -> Self {
        UniformValue::Vec3(p.into())
    }
}

impl From<Vector2<f32>> for UniformValue {
    fn from(v: Vector2<f32>) -> Self {
        UniformValue::Vec2(v.into())
    }
}

impl From<i32> for UniformValue {
    fn from(i: i32) -> Self {
        UniformValue::Int(i)
    }
}

impl From<u32> for UniformValue {
    fn from(u: u32) -> Self {
        UniformValue::UInt(u)
    }
}

impl From<f32> for UniformValue {
    fn from(f: f32) -> Self {
        UniformValue::Float(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformField {
    pub name: String,
    pub kind: UniformKind,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: usize,
}

impl UniformLayout {
    pub fn new(fields: &[(&str, UniformKind)]) -> Self {
        let mut offset: usize = 0;
        let fields = fields
            .iter()
            .map(|(name, kind)| {
                offset = offset.next_multiple_of(kind.align());
                let field = UniformField {
                    name: name.to_string(),
                    kind: *kind,
                    offset,
                };
                offset += kind.size();
                field
            })
            .collect();
        Self {
            fields,
            // Uniform buffer bindings need 16-byte multiples.
            size: offset.next_multiple_of(16).max(16),
        }
    }

    /// Look a field up by name.
    pub fn find(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    /// Size in bytes of the whole block.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Why a uniform write was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformMiss {
    UnknownName,
    KindMismatch {
        expected: UniformKind,
        found: UniformKind,
    },
}

/// CPU copy of a uniform block. Values persist until overwritten.
#[derive(Clone, Debug)]
pub struct UniformBlock {
    layout: UniformLayout,
    data: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let data = vec![0; layout.size()];
        Self { layout, data }
    }

    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), UniformMiss> {
        let field = self.layout.find(name).ok_or(UniformMiss::UnknownName)?;
        if field.kind != value.kind() {
            return Err(UniformMiss::KindMismatch {
                expected: field.kind,
                found: value.kind(),
            });
        }
        let bytes = value.bytes();
        self.data[field.offset..field.offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
