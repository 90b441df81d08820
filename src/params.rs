use glam::{Vec2, Vec3, Vec4};

/// One named value in a parameter tree.
///
/// Only the numeric kinds have a uniform representation; the remaining kinds
/// exist so a parameter tree shared with UI or serialization code can be
/// bound wholesale, with non-uniform entries skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Bool(bool),
    Text(String),
    Group(UniformGroup),
}

/// An ordered tree of named parameter values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UniformGroup {
    entries: Vec<(String, UniformValue)>,
}

impl UniformGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: UniformValue) {
        self.entries.push((name.into(), value));
    }

    pub fn entries(&self) -> impl Iterator<Item = &(String, UniformValue)> {
        self.entries.iter()
    }
}
