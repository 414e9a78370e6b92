use glam::{Mat4, Vec3};
use std::fmt;

/// Type of a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Int,
    Float,
    Vec3,
    Mat4,
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniformKind::Int => "i32",
            UniformKind::Float => "f32",
            UniformKind::Vec3 => "vec3<f32>",
            UniformKind::Mat4 => "mat4x4<f32>",
        };
        f.write_str(name)
    }
}

/// A host-side value destined for a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    /// Little-endian bytes as laid out in a uniform buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Int(v) => v.to_le_bytes().to_vec(),
            UniformValue::Float(v) => v.to_le_bytes().to_vec(),
            UniformValue::Vec3(v) => v.to_array().iter().flat_map(|c| c.to_le_bytes()).collect(),
            UniformValue::Mat4(m) => m
                .to_cols_array()
                .iter()
                .flat_map(|c| c.to_le_bytes())
                .collect(),
        }
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

/// Ordered collection of named uniform values.
///
/// Setting a name that is already present overwrites it in place, so the
/// order of first insertion is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformSet {
    entries: Vec<(String, UniformValue)>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn extend(&mut self, other: &UniformSet) {
        for (name, value) in &other.entries {
            self.set(name.clone(), *value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A value that serialises itself into a [`UniformSet`] under a name prefix.
///
/// Fields land at `"{prefix}.{field}"`, matching the shader-side struct member.
pub trait UniformWriter {
    fn write_uniforms(&self, prefix: &str, set: &mut UniformSet);
}

pub(crate) fn field(prefix: &str, name: &str) -> String {
    format!("{prefix}.{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut set = UniformSet::new();
        set.set("a", 1.0_f32);
        set.set("b", 2);
        set.set("a", 3.0_f32);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a"), Some(&UniformValue::Float(3.0)));
        let names: Vec<_> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn extend_merges_by_name() {
        let mut base = UniformSet::new().with("viewPos", Vec3::ZERO).with("x", 1);
        let other = UniformSet::new().with("x", 2).with("y", 3);
        base.extend(&other);
        assert_eq!(base.get("x"), Some(&UniformValue::Int(2)));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn bytes_match_kind_size() {
        assert_eq!(UniformValue::Int(7).to_bytes(), 7_i32.to_le_bytes().to_vec());
        assert_eq!(UniformValue::Vec3(Vec3::ONE).to_bytes().len(), 12);
        assert_eq!(UniformValue::Mat4(Mat4::IDENTITY).to_bytes().len(), 64);
        assert_eq!(UniformValue::from(Mat4::IDENTITY).kind(), UniformKind::Mat4);
    }
}
