//! Named-uniform storage for a single uniform block.
//!
//! A [`UniformLayout`] maps fully qualified member names (`"spotLight.cutOff"`,
//! `"pointLights[2].linear"`) to byte offsets computed with the WGSL rules for
//! the uniform address space. A [`UniformBlock`] holds the staging bytes for
//! one layout and accepts writes by name.

use crate::uniform::{UniformKind, UniformSet, UniformValue};
use std::collections::{BTreeMap, HashSet};

/// Errors from writing a named uniform.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("no uniform named `{0}` in this block")]
    UnknownName(String),
    #[error("uniform `{name}` is {expected}, got {found}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

/// Location of one member inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub offset: u32,
    pub kind: UniformKind,
}

fn align_of(kind: UniformKind) -> u32 {
    match kind {
        UniformKind::Int | UniformKind::Float => 4,
        UniformKind::Vec3 | UniformKind::Mat4 => 16,
    }
}

fn size_of(kind: UniformKind) -> u32 {
    match kind {
        UniformKind::Int | UniformKind::Float => 4,
        UniformKind::Vec3 => 12,
        UniformKind::Mat4 => 64,
    }
}

fn round_up(align: u32, value: u32) -> u32 {
    value.div_ceil(align) * align
}

/// Member list of a shader-side struct.
#[derive(Debug, Clone, Default)]
pub struct StructLayout {
    members: Vec<(String, UniformSlot)>,
    size: u32,
}

impl StructLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, name: &str, kind: UniformKind) -> Self {
        let offset = round_up(align_of(kind), self.size);
        self.members
            .push((name.to_string(), UniformSlot { offset, kind }));
        self.size = offset + size_of(kind);
        self
    }

    /// Size once padded to the 16-byte struct alignment of the uniform space.
    pub fn padded_size(&self) -> u32 {
        round_up(16, self.size)
    }
}

/// Name to slot mapping for one uniform block.
#[derive(Debug, Clone, Default)]
pub struct UniformLayout {
    slots: BTreeMap<String, UniformSlot>,
    size: u32,
}

impl UniformLayout {
    pub fn builder() -> UniformLayoutBuilder {
        UniformLayoutBuilder::default()
    }

    pub fn slot(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }

    /// Block size in bytes, a multiple of 16.
    pub fn size(&self) -> u32 {
        self.size
    }
}

#[derive(Debug, Default)]
pub struct UniformLayoutBuilder {
    slots: BTreeMap<String, UniformSlot>,
    cursor: u32,
}

impl UniformLayoutBuilder {
    pub fn member(mut self, name: &str, kind: UniformKind) -> Self {
        let offset = round_up(align_of(kind), self.cursor);
        self.slots
            .insert(name.to_string(), UniformSlot { offset, kind });
        self.cursor = offset + size_of(kind);
        self
    }

    pub fn structure(mut self, name: &str, layout: &StructLayout) -> Self {
        let base = round_up(16, self.cursor);
        self.insert_struct(name, base, layout);
        self.cursor = base + layout.padded_size();
        self
    }

    pub fn structure_array(mut self, name: &str, count: u32, layout: &StructLayout) -> Self {
        let base = round_up(16, self.cursor);
        let stride = layout.padded_size();
        for i in 0..count {
            self.insert_struct(&format!("{name}[{i}]"), base + i * stride, layout);
        }
        self.cursor = base + count * stride;
        self
    }

    pub fn build(self) -> UniformLayout {
        UniformLayout {
            slots: self.slots,
            size: round_up(16, self.cursor.max(16)),
        }
    }

    fn insert_struct(&mut self, prefix: &str, base: u32, layout: &StructLayout) {
        for (member, slot) in &layout.members {
            self.slots.insert(
                format!("{prefix}.{member}"),
                UniformSlot {
                    offset: base + slot.offset,
                    kind: slot.kind,
                },
            );
        }
    }
}

/// Staging bytes for one uniform block, written by name.
///
/// Values persist between writes, so a block always holds the most recent
/// value for every member.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    label: String,
    layout: UniformLayout,
    bytes: Vec<u8>,
    reported: HashSet<String>,
}

impl UniformBlock {
    pub fn new(label: impl Into<String>, layout: UniformLayout) -> Self {
        let bytes = vec![0; layout.size() as usize];
        Self {
            label: label.into(),
            layout,
            bytes,
            reported: HashSet::new(),
        }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write one value. On error the block is left untouched.
    pub fn write(&mut self, name: &str, value: &UniformValue) -> Result<(), UniformError> {
        let slot = self
            .layout
            .slot(name)
            .ok_or_else(|| UniformError::UnknownName(name.to_string()))?;
        if slot.kind != value.kind() {
            return Err(UniformError::KindMismatch {
                name: name.to_string(),
                expected: slot.kind,
                found: value.kind(),
            });
        }
        let data = value.to_bytes();
        let start = slot.offset as usize;
        self.bytes[start..start + data.len()].copy_from_slice(&data);
        Ok(())
    }

    /// Write every entry of `set`. Failed writes are skipped; each distinct
    /// failing name is logged once. Returns the number of failed writes.
    pub fn apply(&mut self, set: &UniformSet) -> usize {
        let mut failures = 0;
        for (name, value) in set.iter() {
            if let Err(err) = self.write(name, value) {
                failures += 1;
                if self.reported.insert(name.to_string()) {
                    tracing::warn!(block = %self.label, "{err}");
                }
            }
        }
        failures
    }

    pub fn read(&self, name: &str) -> Option<UniformValue> {
        let slot = self.layout.slot(name)?;
        let start = slot.offset as usize;
        let f32_at = |i: usize| {
            let o = start + i * 4;
            f32::from_le_bytes([
                self.bytes[o],
                self.bytes[o + 1],
                self.bytes[o + 2],
                self.bytes[o + 3],
            ])
        };
        Some(match slot.kind {
            UniformKind::Int => UniformValue::Int(i32::from_le_bytes([
                self.bytes[start],
                self.bytes[start + 1],
                self.bytes[start + 2],
                self.bytes[start + 3],
            ])),
            UniformKind::Float => UniformValue::Float(f32_at(0)),
            UniformKind::Vec3 => UniformValue::Vec3(glam::Vec3::new(f32_at(0), f32_at(1), f32_at(2))),
            UniformKind::Mat4 => {
                let mut cols = [0.0; 16];
                for (i, c) in cols.iter_mut().enumerate() {
                    *c = f32_at(i);
                }
                UniformValue::Mat4(glam::Mat4::from_cols_array(&cols))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn light_struct() -> StructLayout {
        StructLayout::new()
            .member("position", UniformKind::Vec3)
            .member("constant", UniformKind::Float)
            .member("ambient", UniformKind::Vec3)
            .member("linear", UniformKind::Float)
    }

    #[test]
    fn scalars_pack_into_vec3_tail() {
        let s = light_struct();
        assert_eq!(s.members[1].1.offset, 12);
        assert_eq!(s.members[2].1.offset, 16);
        assert_eq!(s.members[3].1.offset, 28);
        assert_eq!(s.padded_size(), 32);
    }

    #[test]
    fn arrays_use_padded_stride() {
        let layout = UniformLayout::builder()
            .member("model", UniformKind::Mat4)
            .member("count", UniformKind::Int)
            .structure_array("lights", 2, &light_struct())
            .member("tail", UniformKind::Float)
            .build();
        assert_eq!(layout.slot("count").unwrap().offset, 64);
        assert_eq!(layout.slot("lights[0].position").unwrap().offset, 80);
        assert_eq!(layout.slot("lights[1].linear").unwrap().offset, 80 + 32 + 28);
        assert_eq!(layout.slot("tail").unwrap().offset, 144);
        assert_eq!(layout.size(), 160);
    }

    #[test]
    fn write_then_read_back() {
        let layout = UniformLayout::builder()
            .member("view", UniformKind::Mat4)
            .member("viewPos", UniformKind::Vec3)
            .build();
        let mut block = UniformBlock::new("test", layout);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        block.write("view", &m.into()).unwrap();
        block.write("viewPos", &Vec3::new(4.0, 5.0, 6.0).into()).unwrap();
        assert_eq!(block.read("view"), Some(UniformValue::Mat4(m)));
        assert_eq!(
            block.read("viewPos"),
            Some(UniformValue::Vec3(Vec3::new(4.0, 5.0, 6.0)))
        );
    }

    #[test]
    fn unknown_and_mismatched_writes_are_noops() {
        let layout = UniformLayout::builder()
            .member("shininess", UniformKind::Float)
            .build();
        let mut block = UniformBlock::new("test", layout);
        let before = block.bytes().to_vec();

        assert_eq!(
            block.write("missing", &UniformValue::Float(1.0)),
            Err(UniformError::UnknownName("missing".into()))
        );
        assert!(matches!(
            block.write("shininess", &UniformValue::Int(32)),
            Err(UniformError::KindMismatch { .. })
        ));
        assert_eq!(block.bytes(), &before[..]);
    }

    #[test]
    fn apply_counts_failures_and_keeps_going() {
        let layout = UniformLayout::builder()
            .member("a", UniformKind::Float)
            .member("b", UniformKind::Int)
            .build();
        let mut block = UniformBlock::new("test", layout);
        let set = UniformSet::new()
            .with("a", 2.0_f32)
            .with("nope", 1)
            .with("b", 9);
        assert_eq!(block.apply(&set), 1);
        assert_eq!(block.apply(&set), 1);
        assert_eq!(block.read("b"), Some(UniformValue::Int(9)));
        assert_eq!(block.read("a"), Some(UniformValue::Float(2.0)));
    }

    #[test]
    fn empty_layout_still_has_minimum_size() {
        assert_eq!(UniformLayout::builder().build().size(), 16);
    }
}
