//! Shared ownership of native driver objects.
//!
//! Program and stage handles are process-wide resources referenced by every
//! value-copy of a [`ShaderProgram`](crate::ShaderProgram). Each handle object
//! owns exactly one native object and issues the driver-side deletion when
//! its last `Rc` owner drops, so N wrapper copies released in any order free
//! the native resource exactly once. A stage keeps its program handle alive,
//! which guarantees the detach call always targets a live program.

use std::rc::Rc;

use crate::gl_api::{GlApi, GlHandle};
use crate::stage::StageKind;

/// Shared owner of a native program object.
pub struct ProgramHandle {
    gl: Rc<dyn GlApi>,
    raw: GlHandle,
}

impl ProgramHandle {
    pub(crate) fn new(gl: Rc<dyn GlApi>, raw: GlHandle) -> Rc<Self> {
        Rc::new(ProgramHandle { gl, raw })
    }

    pub fn raw(&self) -> GlHandle {
        self.raw
    }
}

impl Drop for ProgramHandle {
    fn drop(&mut self) {
        log::debug!("deleting program {}", self.raw);
        self.gl.delete_program(self.raw);
    }
}

/// Shared owner of a native shader-stage object.
pub struct StageHandle {
    gl: Rc<dyn GlApi>,
    program: Rc<ProgramHandle>,
    kind: StageKind,
    raw: GlHandle,
}

impl StageHandle {
    pub(crate) fn new(
        gl: Rc<dyn GlApi>,
        program: Rc<ProgramHandle>,
        kind: StageKind,
        raw: GlHandle,
    ) -> Rc<Self> {
        Rc::new(StageHandle {
            gl,
            program,
            kind,
            raw,
        })
    }

    pub fn raw(&self) -> GlHandle {
        self.raw
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }
}

impl Drop for StageHandle {
    fn drop(&mut self) {
        log::debug!(
            "detaching and deleting {} shader {} from program {}",
            self.kind,
            self.raw,
            self.program.raw()
        );
        self.gl.detach_shader(self.program.raw(), self.raw);
        self.gl.delete_shader(self.raw);
    }
}
