//! **shader-wrangler** is a thin wrapper around a native shader program: it
//! loads vertex/fragment/geometry/compute source (optionally from files, with
//! a `#pragma include` preprocessor), compiles and links the stages into a
//! program object, and exposes setters for uniform and attribute bindings.
//!
//! The native graphics driver is not linked in; it is supplied by the caller
//! as a [`GlApi`] implementation whose methods mirror the raw driver calls
//! one-to-one (opaque `u32` handles, `0` = unallocated; `i32` locations,
//! `-1` = not found). File access for includes likewise goes through a
//! user-driven [`IncludeProvider`], which enables virtual file systems,
//! include search paths, and dependency tracking by build systems;
//! [`FsIncludeProvider`] is the plain file-system implementation.
//!
//! [`ShaderProgram`] is a value type: cloning it shares the underlying
//! driver objects, and the native resources are released exactly once, when
//! the last copy drops or unloads them. Everything assumes the single
//! graphics-context thread.
//!
//! # Example
//!
//! Expanding includes through an in-memory provider:
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::path::{Path, PathBuf};
//!
//! use shader_wrangler::{
//!     preprocess, BoxedIncludeError, IncludeProvider, ResolvedIncludePath,
//! };
//!
//! struct MemoryIncludes(HashMap<PathBuf, String>);
//!
//! impl IncludeProvider for MemoryIncludes {
//!     fn resolve(
//!         &self,
//!         path: &str,
//!         from_dir: &Path,
//!     ) -> Result<ResolvedIncludePath, BoxedIncludeError> {
//!         Ok(ResolvedIncludePath(from_dir.join(path)))
//!     }
//!
//!     fn read(&mut self, path: &ResolvedIncludePath) -> Result<String, BoxedIncludeError> {
//!         self.0.get(&path.0).cloned().ok_or_else(|| "no such include".into())
//!     }
//! }
//!
//! let mut includes = MemoryIncludes(HashMap::new());
//! includes.0.insert(PathBuf::from("lights.glsl"), "vec3 lambert();".to_string());
//!
//! let expanded = preprocess(
//!     "#pragma include \"lights.glsl\"\nvoid main() {}",
//!     Path::new(""),
//!     &mut includes,
//! );
//! assert_eq!(expanded, "vec3 lambert();\nvoid main() {}\n");
//! ```
//!
//! Driving a program against a real driver looks like this (not runnable
//! here, since it needs a live graphics context):
//!
//! ```rust,ignore
//! let gl: Rc<dyn GlApi> = Rc::new(MyGlDriver::new(context));
//! let mut shader = ShaderProgram::new(gl);
//! shader.load("shaders/phong.vert", "shaders/phong.frag")?;
//! shader.bind();
//! shader.set_uniform_mat4("model_view", &model_view);
//! shader.set_uniform_vec3("light_dir", light_dir);
//! ```

mod diagnostics;
mod error;
mod gl_api;
mod handle;
mod include_provider;
mod params;
mod preprocessor;
mod program;
mod stage;


pub use crate::error::ShaderError;
pub use crate::gl_api::{
    ActiveVariable, GlApi, GlHandle, GlLocation, ProgramParameter, LOCATION_NOT_FOUND,
    NULL_HANDLE,
};
pub use crate::include_provider::{
    BoxedIncludeError, FsIncludeProvider, IncludeProvider, ResolvedIncludePath,
};
pub use crate::params::{UniformGroup, UniformValue};
pub use crate::preprocessor::{preprocess, MAX_INCLUDE_DEPTH};
pub use crate::program::{ShaderProgram, DEFAULT_ATTRIBUTES};
pub use crate::stage::StageKind;
