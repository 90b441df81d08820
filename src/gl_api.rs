//! The native graphics driver as a caller-supplied seam.
//!
//! Every method mirrors one raw driver call, with the external API's handle
//! conventions preserved exactly: object handles are opaque `u32`s where `0`
//! means invalid/unallocated, and name lookups return an `i32` location where
//! `-1` means not found. Implementations are expected to be thin FFI
//! pass-throughs; all state checking lives in [`ShaderProgram`].
//!
//! [`ShaderProgram`]: crate::ShaderProgram

use crate::stage::StageKind;

/// Opaque identifier for a native shader or program object.
pub type GlHandle = u32;

/// The driver's "no object" handle.
pub const NULL_HANDLE: GlHandle = 0;

/// Resolved location of a uniform or attribute name.
pub type GlLocation = i32;

/// The driver's "no such name" location.
pub const LOCATION_NOT_FOUND: GlLocation = -1;

/// One entry of a program's active-uniform or active-attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    pub name: String,
    pub size: i32,
}

/// Pre-link program parameters for the geometry stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramParameter {
    GeometryInputType,
    GeometryOutputType,
    GeometryOutputCount,
}

/// Raw driver calls needed by [`ShaderProgram`](crate::ShaderProgram).
///
/// The trait is object-safe on purpose: the wrapper holds an `Rc<dyn GlApi>`
/// and shares it into the handle objects that issue deletions on drop.
pub trait GlApi {
    fn create_shader(&self, kind: StageKind) -> GlHandle;
    fn shader_source(&self, shader: GlHandle, source: &str);
    fn compile_shader(&self, shader: GlHandle);
    fn compile_succeeded(&self, shader: GlHandle) -> bool;
    fn shader_info_log(&self, shader: GlHandle) -> String;
    fn delete_shader(&self, shader: GlHandle);

    fn create_program(&self) -> GlHandle;
    fn attach_shader(&self, program: GlHandle, shader: GlHandle);
    fn detach_shader(&self, program: GlHandle, shader: GlHandle);
    fn link_program(&self, program: GlHandle);
    fn link_succeeded(&self, program: GlHandle) -> bool;
    fn program_info_log(&self, program: GlHandle) -> String;
    fn delete_program(&self, program: GlHandle);
    fn use_program(&self, program: GlHandle);
    fn program_parameter(&self, program: GlHandle, parameter: ProgramParameter, value: i32);
    fn max_geometry_output_vertices(&self) -> i32;
    fn dispatch_compute(&self, groups_x: u32, groups_y: u32, groups_z: u32);

    fn uniform_location(&self, program: GlHandle, name: &str) -> GlLocation;
    fn attribute_location(&self, program: GlHandle, name: &str) -> GlLocation;
    fn bind_attribute_location(&self, program: GlHandle, location: u32, name: &str);
    fn active_uniforms(&self, program: GlHandle) -> Vec<ActiveVariable>;
    fn active_attributes(&self, program: GlHandle) -> Vec<ActiveVariable>;

    fn set_uniform_1i(&self, location: GlLocation, v0: i32);
    fn set_uniform_2i(&self, location: GlLocation, v0: i32, v1: i32);
    fn set_uniform_3i(&self, location: GlLocation, v0: i32, v1: i32, v2: i32);
    fn set_uniform_4i(&self, location: GlLocation, v0: i32, v1: i32, v2: i32, v3: i32);
    fn set_uniform_1f(&self, location: GlLocation, v0: f32);
    fn set_uniform_2f(&self, location: GlLocation, v0: f32, v1: f32);
    fn set_uniform_3f(&self, location: GlLocation, v0: f32, v1: f32, v2: f32);
    fn set_uniform_4f(&self, location: GlLocation, v0: f32, v1: f32, v2: f32, v3: f32);

    /// Array forms; `values` is the flat component stream, so the element
    /// count is `values.len()` divided by the component width.
    fn set_uniform_1iv(&self, location: GlLocation, values: &[i32]);
    fn set_uniform_2iv(&self, location: GlLocation, values: &[i32]);
    fn set_uniform_3iv(&self, location: GlLocation, values: &[i32]);
    fn set_uniform_4iv(&self, location: GlLocation, values: &[i32]);
    fn set_uniform_1fv(&self, location: GlLocation, values: &[f32]);
    fn set_uniform_2fv(&self, location: GlLocation, values: &[f32]);
    fn set_uniform_3fv(&self, location: GlLocation, values: &[f32]);
    fn set_uniform_4fv(&self, location: GlLocation, values: &[f32]);

    /// Column-major matrix data, 9 floats per element.
    fn set_uniform_matrix3(&self, location: GlLocation, values: &[f32]);
    /// Column-major matrix data, 16 floats per element.
    fn set_uniform_matrix4(&self, location: GlLocation, values: &[f32]);

    /// Constant vertex-attribute values.
    fn set_attribute_1f(&self, location: GlLocation, v0: f32);
    fn set_attribute_2f(&self, location: GlLocation, v0: f32, v1: f32);
    fn set_attribute_3f(&self, location: GlLocation, v0: f32, v1: f32, v2: f32);
    fn set_attribute_4f(&self, location: GlLocation, v0: f32, v1: f32, v2: f32, v3: f32);

    /// Select texture unit `unit` (the driver adds its unit-zero base).
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: GlHandle);
}
