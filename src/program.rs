//! The shader-program wrapper itself.
//!
//! Lifecycle: stages are set up (preprocessed and compiled) one by one, then
//! linked into the program object. `loaded` tracks whether driver-side
//! objects exist, not whether they linked successfully; a program that failed
//! to link can still be bound, it just renders incorrectly. Callers detect
//! failure through the returned `Result`s.
//!
//! All operations assume the single graphics-context thread; handles are
//! `Rc`-shared and the uniform-location cache uses interior mutability.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::diagnostics;
use crate::error::ShaderError;
use crate::gl_api::{GlApi, GlHandle, GlLocation, ProgramParameter, LOCATION_NOT_FOUND, NULL_HANDLE};
use crate::handle::{ProgramHandle, StageHandle};
use crate::include_provider::{FsIncludeProvider, IncludeProvider};
use crate::params::{UniformGroup, UniformValue};
use crate::preprocessor::preprocess;
use crate::stage::StageKind;

/// Conventional vertex-attribute bindings applied by [`ShaderProgram::bind_defaults`].
pub const DEFAULT_ATTRIBUTES: [(u32, &str); 4] = [
    (0, "position"),
    (1, "color"),
    (2, "normal"),
    (3, "texcoord"),
];

/// A native shader program plus its compiled stages.
///
/// Cloning shares the underlying driver objects; the native resources are
/// released when the last copy drops or unloads them.
#[derive(Clone)]
pub struct ShaderProgram {
    gl: Rc<dyn GlApi>,
    stages: HashMap<StageKind, Rc<StageHandle>>,
    program: Option<Rc<ProgramHandle>>,
    sources: HashMap<StageKind, String>,
    uniform_locations: RefCell<HashMap<String, GlLocation>>,
    loaded: bool,
}

impl ShaderProgram {
    pub fn new(gl: Rc<dyn GlApi>) -> Self {
        ShaderProgram {
            gl,
            stages: HashMap::new(),
            program: None,
            sources: HashMap::new(),
            uniform_locations: RefCell::new(HashMap::new()),
            loaded: false,
        }
    }

    /// Set up vertex and fragment stages from `prefix.vert` / `prefix.frag`,
    /// bind the default attributes, and link.
    pub fn load_prefixed(&mut self, prefix: &str) -> Result<(), ShaderError> {
        let vertex = format!("{}.vert", prefix);
        let fragment = format!("{}.frag", prefix);
        self.load(&vertex, &fragment)
    }

    /// Set up both stages from files, bind the default attributes, and link.
    ///
    /// A stage that fails to compile has already been reported; linking
    /// proceeds with whatever did compile.
    pub fn load(
        &mut self,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        let _ = self.setup_stage_from_file(StageKind::Vertex, vertex);
        let _ = self.setup_stage_from_file(StageKind::Fragment, fragment);
        self.bind_defaults();
        self.link()
    }

    /// [`load`](Self::load) with an additional geometry stage.
    pub fn load_with_geometry(
        &mut self,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
        geometry: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        let _ = self.setup_stage_from_file(StageKind::Vertex, vertex);
        let _ = self.setup_stage_from_file(StageKind::Fragment, fragment);
        let _ = self.setup_stage_from_file(StageKind::Geometry, geometry);
        self.bind_defaults();
        self.link()
    }

    /// Read a stage's source from a file and set it up. Includes resolve
    /// relative to the file's own directory.
    pub fn setup_stage_from_file(
        &mut self,
        kind: StageKind,
        path: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        let path = path.as_ref();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                log::error!("couldn't load {} shader from {:?}: {}", kind, path, err);
                return Err(ShaderError::SourceNotFound {
                    stage: kind,
                    path: path.to_path_buf(),
                });
            }
        };
        // Includes need an absolute root to traverse from.
        let source_dir = path
            .canonicalize()
            .ok()
            .and_then(|absolute| absolute.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        self.setup_stage(kind, &source, &source_dir, &mut FsIncludeProvider)
    }

    /// Set up a stage from in-memory source, resolving includes against
    /// `include_dir` on the file system.
    pub fn setup_stage_from_source(
        &mut self,
        kind: StageKind,
        source: &str,
        include_dir: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        self.setup_stage(kind, source, include_dir.as_ref(), &mut FsIncludeProvider)
    }

    /// Set up a stage from in-memory source with a custom include provider.
    pub fn setup_stage_with_provider(
        &mut self,
        kind: StageKind,
        source: &str,
        include_dir: &Path,
        provider: &mut dyn IncludeProvider,
    ) -> Result<(), ShaderError> {
        self.setup_stage(kind, source, include_dir, provider)
    }

    fn setup_stage(
        &mut self,
        kind: StageKind,
        source: &str,
        include_dir: &Path,
        provider: &mut dyn IncludeProvider,
    ) -> Result<(), ShaderError> {
        self.unload();

        let program = self.ensure_program();

        let shader = self.gl.create_shader(kind);
        if shader == NULL_HANDLE {
            log::error!("failed creating {} shader object", kind);
            return Err(ShaderError::StageCreationFailed { stage: kind });
        }

        // The expanded text is kept around to cross-reference diagnostics.
        let expanded = preprocess(source, include_dir, provider);
        self.sources.insert(kind, expanded.clone());

        self.gl.shader_source(shader, &expanded);
        self.gl.compile_shader(shader);

        if !self.gl.compile_succeeded(shader) {
            let info_log = self.gl.shader_info_log(shader);
            log::error!("{} shader failed to compile", kind);
            if !info_log.is_empty() {
                log::error!("{} shader reports:\n{}", kind, info_log);
                log::error!("{}", diagnostics::annotate_info_log(kind, &info_log, &expanded));
            }
            self.gl.delete_shader(shader);
            return Err(ShaderError::CompileFailed {
                stage: kind,
                log: info_log,
            });
        }

        log::debug!("{} shader compiled", kind);
        let info_log = self.gl.shader_info_log(shader);
        if !info_log.is_empty() {
            log::warn!("{} shader reports:\n{}", kind, info_log);
        }

        self.stages
            .insert(kind, StageHandle::new(self.gl.clone(), program, kind, shader));
        Ok(())
    }

    /// Attach every compiled stage and link the program.
    ///
    /// The program is marked loaded whether or not linking succeeded:
    /// `loaded` tracks resource allocation on the driver, and a failed-link
    /// program is still a bindable object. The `Result` carries correctness.
    pub fn link(&mut self) -> Result<(), ShaderError> {
        if self.stages.is_empty() {
            log::error!("trying to link a program with no shader stages");
            return Err(ShaderError::NoStages);
        }

        let program = self.ensure_program();
        for stage in self.stages.values() {
            log::debug!(
                "attaching {} shader to program {}",
                stage.kind(),
                program.raw()
            );
            self.gl.attach_shader(program.raw(), stage.raw());
        }

        self.gl.link_program(program.raw());
        let linked = self.gl.link_succeeded(program.raw());
        self.loaded = true;

        if linked {
            log::debug!("program {} linked", program.raw());
            Ok(())
        } else {
            let info_log = self.gl.program_info_log(program.raw());
            log::error!("program failed to link");
            if !info_log.is_empty() {
                log::error!("program reports:\n{}", info_log);
            }
            Err(ShaderError::LinkFailed { log: info_log })
        }
    }

    /// Release this copy's share of every driver object and reset to empty.
    ///
    /// Other live copies keep the native objects alive; the last one out
    /// triggers the actual deletions.
    pub fn unload(&mut self) {
        if self.loaded {
            self.stages.clear();
            self.program = None;
            self.sources.clear();
            self.uniform_locations.borrow_mut().clear();
        }
        self.loaded = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn bind(&self) {
        if let (true, Some(program)) = (self.loaded, &self.program) {
            self.gl.use_program(program.raw());
        }
    }

    pub fn unbind(&self) {
        self.gl.use_program(NULL_HANDLE);
    }

    pub fn dispatch_compute(&self, groups_x: u32, groups_y: u32, groups_z: u32) {
        self.gl.dispatch_compute(groups_x, groups_y, groups_z);
    }

    pub fn set_geometry_input_type(&mut self, primitive: u32) {
        let program = self.ensure_program();
        self.gl
            .program_parameter(program.raw(), ProgramParameter::GeometryInputType, primitive as i32);
    }

    pub fn set_geometry_output_type(&mut self, primitive: u32) {
        let program = self.ensure_program();
        self.gl
            .program_parameter(program.raw(), ProgramParameter::GeometryOutputType, primitive as i32);
    }

    pub fn set_geometry_output_count(&mut self, count: i32) {
        let program = self.ensure_program();
        self.gl
            .program_parameter(program.raw(), ProgramParameter::GeometryOutputCount, count);
    }

    pub fn max_geometry_output_vertices(&self) -> i32 {
        self.gl.max_geometry_output_vertices()
    }

    /// Resolve a uniform name, memoizing the driver query.
    ///
    /// Failed lookups are cached as well, so repeatedly setting a uniform the
    /// compiler optimized away costs one driver round-trip total.
    pub fn uniform_location(&self, name: &str) -> GlLocation {
        if !self.loaded {
            return LOCATION_NOT_FOUND;
        }
        let program = match &self.program {
            Some(program) => program.raw(),
            None => return LOCATION_NOT_FOUND,
        };
        *self
            .uniform_locations
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| self.gl.uniform_location(program, name))
    }

    pub fn attribute_location(&self, name: &str) -> GlLocation {
        match &self.program {
            Some(program) => self.gl.attribute_location(program.raw(), name),
            None => LOCATION_NOT_FOUND,
        }
    }

    /// Bind an attribute name to a location; takes effect at the next link.
    pub fn bind_attribute(&self, location: u32, name: &str) {
        if let Some(program) = &self.program {
            self.gl.bind_attribute_location(program.raw(), location, name);
        }
    }

    /// Bind the conventional `position`/`color`/`normal`/`texcoord` names to
    /// locations 0 through 3.
    pub fn bind_defaults(&self) {
        if self.stages.is_empty() {
            log::error!("binding default attributes, but no shader stages are set up yet");
            return;
        }
        for &(location, name) in DEFAULT_ATTRIBUTES.iter() {
            self.bind_attribute(location, name);
        }
    }

    fn active_uniform(&self, name: &str) -> Option<GlLocation> {
        if !self.loaded {
            return None;
        }
        match self.uniform_location(name) {
            LOCATION_NOT_FOUND => None,
            location => Some(location),
        }
    }

    pub fn set_uniform_1i(&self, name: &str, v0: i32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_1i(location, v0);
        }
    }

    pub fn set_uniform_2i(&self, name: &str, v0: i32, v1: i32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_2i(location, v0, v1);
        }
    }

    pub fn set_uniform_3i(&self, name: &str, v0: i32, v1: i32, v2: i32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_3i(location, v0, v1, v2);
        }
    }

    pub fn set_uniform_4i(&self, name: &str, v0: i32, v1: i32, v2: i32, v3: i32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_4i(location, v0, v1, v2, v3);
        }
    }

    pub fn set_uniform_1f(&self, name: &str, v0: f32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_1f(location, v0);
        }
    }

    pub fn set_uniform_2f(&self, name: &str, v0: f32, v1: f32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_2f(location, v0, v1);
        }
    }

    pub fn set_uniform_3f(&self, name: &str, v0: f32, v1: f32, v2: f32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_3f(location, v0, v1, v2);
        }
    }

    pub fn set_uniform_4f(&self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_4f(location, v0, v1, v2, v3);
        }
    }

    pub fn set_uniform_vec2(&self, name: &str, v: Vec2) {
        self.set_uniform_2f(name, v.x, v.y);
    }

    pub fn set_uniform_vec3(&self, name: &str, v: Vec3) {
        self.set_uniform_3f(name, v.x, v.y, v.z);
    }

    pub fn set_uniform_vec4(&self, name: &str, v: Vec4) {
        self.set_uniform_4f(name, v.x, v.y, v.z, v.w);
    }

    pub fn set_uniform_1iv(&self, name: &str, values: &[i32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_1iv(location, values);
        }
    }

    pub fn set_uniform_2iv(&self, name: &str, values: &[i32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_2iv(location, values);
        }
    }

    pub fn set_uniform_3iv(&self, name: &str, values: &[i32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_3iv(location, values);
        }
    }

    pub fn set_uniform_4iv(&self, name: &str, values: &[i32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_4iv(location, values);
        }
    }

    pub fn set_uniform_1fv(&self, name: &str, values: &[f32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_1fv(location, values);
        }
    }

    pub fn set_uniform_2fv(&self, name: &str, values: &[f32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_2fv(location, values);
        }
    }

    pub fn set_uniform_3fv(&self, name: &str, values: &[f32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_3fv(location, values);
        }
    }

    pub fn set_uniform_4fv(&self, name: &str, values: &[f32]) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_4fv(location, values);
        }
    }

    pub fn set_uniform_mat3(&self, name: &str, m: &Mat3) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_matrix3(location, &m.to_cols_array());
        }
    }

    pub fn set_uniform_mat4(&self, name: &str, m: &Mat4) {
        if let Some(location) = self.active_uniform(name) {
            self.gl.set_uniform_matrix4(location, &m.to_cols_array());
        }
    }

    /// Bind `texture` to texture unit `unit` and point the sampler uniform
    /// `name` at that unit.
    pub fn set_uniform_texture(&self, name: &str, target: u32, texture: GlHandle, unit: u32) {
        if !self.loaded {
            return;
        }
        self.gl.active_texture(unit);
        self.gl.bind_texture(target, texture);
        self.set_uniform_1i(name, unit as i32);
        self.gl.active_texture(0);
    }

    /// Walk a parameter tree and set every entry with a uniform
    /// representation; other kinds are skipped.
    pub fn set_uniforms(&self, parameters: &UniformGroup) {
        for (name, value) in parameters.entries() {
            match value {
                UniformValue::Int(v) => self.set_uniform_1i(name, *v),
                UniformValue::Float(v) => self.set_uniform_1f(name, *v),
                UniformValue::Vec2(v) => self.set_uniform_vec2(name, *v),
                UniformValue::Vec3(v) => self.set_uniform_vec3(name, *v),
                UniformValue::Vec4(v) => self.set_uniform_vec4(name, *v),
                UniformValue::Group(group) => self.set_uniforms(group),
                UniformValue::Bool(_) | UniformValue::Text(_) => {}
            }
        }
    }

    pub fn set_attribute_1f(&self, location: GlLocation, v0: f32) {
        if self.loaded {
            self.gl.set_attribute_1f(location, v0);
        }
    }

    pub fn set_attribute_2f(&self, location: GlLocation, v0: f32, v1: f32) {
        if self.loaded {
            self.gl.set_attribute_2f(location, v0, v1);
        }
    }

    pub fn set_attribute_3f(&self, location: GlLocation, v0: f32, v1: f32, v2: f32) {
        if self.loaded {
            self.gl.set_attribute_3f(location, v0, v1, v2);
        }
    }

    pub fn set_attribute_4f(&self, location: GlLocation, v0: f32, v1: f32, v2: f32, v3: f32) {
        if self.loaded {
            self.gl.set_attribute_4f(location, v0, v1, v2, v3);
        }
    }

    /// Log the program's active uniforms and their resolved locations.
    pub fn log_active_uniforms(&self) {
        let program = match &self.program {
            Some(program) => program.raw(),
            None => return,
        };
        let uniforms = self.gl.active_uniforms(program);
        log::info!("{} uniforms", uniforms.len());
        for (index, uniform) in uniforms.iter().enumerate() {
            log::info!(
                "[{}] {} @ index {}",
                index,
                uniform.name,
                self.uniform_location(&uniform.name)
            );
        }
    }

    /// Log the program's active attributes and their resolved locations.
    pub fn log_active_attributes(&self) {
        let program = match &self.program {
            Some(program) => program.raw(),
            None => return,
        };
        let attributes = self.gl.active_attributes(program);
        log::info!("{} attributes", attributes.len());
        for (index, attribute) in attributes.iter().enumerate() {
            log::info!(
                "[{}] {} @ index {}",
                index,
                attribute.name,
                self.attribute_location(&attribute.name)
            );
        }
    }

    /// The fully expanded source text a stage was compiled from.
    pub fn stage_source(&self, kind: StageKind) -> Option<&str> {
        self.sources.get(&kind).map(String::as_str)
    }

    /// Raw program handle; [`NULL_HANDLE`] when none has been allocated.
    pub fn raw_program(&self) -> GlHandle {
        self.program
            .as_ref()
            .map(|program| program.raw())
            .unwrap_or(NULL_HANDLE)
    }

    /// Raw handle of a compiled stage; [`NULL_HANDLE`] when absent.
    pub fn raw_stage(&self, kind: StageKind) -> GlHandle {
        self.stages
            .get(&kind)
            .map(|stage| stage.raw())
            .unwrap_or(NULL_HANDLE)
    }

    fn ensure_program(&mut self) -> Rc<ProgramHandle> {
        match &self.program {
            Some(program) => program.clone(),
            None => {
                log::debug!("creating program object");
                let program = ProgramHandle::new(self.gl.clone(), self.gl.create_program());
                self.program = Some(program.clone());
                program
            }
        }
    }
}

impl PartialEq for ShaderProgram {
    fn eq(&self, other: &Self) -> bool {
        self.raw_program() == other.raw_program()
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.raw_program())
            .field("stages", &self.stages.keys().collect::<Vec<_>>())
            .field("loaded", &self.loaded)
            .finish()
    }
}
