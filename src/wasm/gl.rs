//! Thin owning wrappers around WebGL2 objects.

use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use crate::error::{ShaderStage, VizError};

pub fn context(canvas: &HtmlCanvasElement) -> Result<GL, VizError> {
    let ctx = canvas.get_context("webgl2")?.ok_or(VizError::NoContext)?;
    ctx.dyn_into::<GL>().map_err(|_| VizError::NoContext)
}

/// Ask the browser to drop the context's GPU resources now rather than at GC.
pub fn lose_context(gl: &GL) {
    match gl.get_extension("WEBGL_lose_context") {
        Ok(Some(ext)) => ext.unchecked_into::<WebglLoseContext>().lose_context(),
        _ => log::debug!("WEBGL_lose_context unavailable"),
    }
}

fn compile(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader, VizError> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(VizError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        return Ok(shader);
    }
    let log = gl.get_shader_info_log(&shader).unwrap_or_default();
    log::error!("{stage} shader compile error: {log}");
    gl.delete_shader(Some(&shader));
    Err(VizError::ShaderCompile { stage, log })
}

/// A linked program together with its shaders.
pub struct Program {
    gl: GL,
    program: WebGlProgram,
    shaders: [WebGlShader; 2],
}

impl Program {
    pub fn link(gl: &GL, vertex: &str, fragment: &str) -> Result<Self, VizError> {
        let vs = compile(gl, ShaderStage::Vertex, vertex)?;
        let fs = match compile(gl, ShaderStage::Fragment, fragment) {
            Ok(fs) => fs,
            Err(err) => {
                gl.delete_shader(Some(&vs));
                return Err(err);
            }
        };

        let Some(program) = gl.create_program() else {
            gl.delete_shader(Some(&vs));
            gl.delete_shader(Some(&fs));
            return Err(VizError::Allocation("program"));
        };
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);

        // Built before the status check so Drop cleans up on failure too.
        let linked = Self {
            gl: gl.clone(),
            program,
            shaders: [vs, fs],
        };
        let ok = gl
            .get_program_parameter(&linked.program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !ok {
            let log = gl.get_program_info_log(&linked.program).unwrap_or_default();
            log::error!("program link error: {log}");
            return Err(VizError::ProgramLink(log));
        }
        Ok(linked)
    }

    pub fn bind(&self) {
        self.gl.use_program(Some(&self.program));
    }

    pub fn uniform(&self, name: &str) -> Option<WebGlUniformLocation> {
        let loc = self.gl.get_uniform_location(&self.program, name);
        if loc.is_none() {
            log::debug!("uniform {name} is inactive");
        }
        loc
    }

    pub fn attrib(&self, name: &'static str) -> Result<u32, VizError> {
        let loc = self.gl.get_attrib_location(&self.program, name);
        u32::try_from(loc).map_err(|_| VizError::MissingAttribute(name))
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.gl.delete_program(Some(&self.program));
        for shader in &self.shaders {
            self.gl.delete_shader(Some(shader));
        }
    }
}

/// A static vertex or index buffer.
pub struct Buffer {
    gl: GL,
    buffer: WebGlBuffer,
    target: u32,
}

impl Buffer {
    pub fn vertices(gl: &GL, data: &[f32]) -> Result<Self, VizError> {
        let buffer = gl.create_buffer().ok_or(VizError::Allocation("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let array = js_sys::Float32Array::from(data);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
        Ok(Self {
            gl: gl.clone(),
            buffer,
            target: GL::ARRAY_BUFFER,
        })
    }

    pub fn indices(gl: &GL, data: &[u32]) -> Result<Self, VizError> {
        let buffer = gl.create_buffer().ok_or(VizError::Allocation("buffer"))?;
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&buffer));
        let array = js_sys::Uint32Array::from(data);
        gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &array, GL::STATIC_DRAW);
        Ok(Self {
            gl: gl.clone(),
            buffer,
            target: GL::ELEMENT_ARRAY_BUFFER,
        })
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(self.target, Some(&self.buffer));
    }

    /// Bind as the source of a float attribute with `size` components.
    pub fn attribute(&self, location: u32, size: i32) {
        self.bind();
        self.gl.enable_vertex_attrib_array(location);
        self.gl
            .vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, 0, 0);
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.gl.delete_buffer(Some(&self.buffer));
    }
}

pub struct VertexArray {
    gl: GL,
    vao: WebGlVertexArrayObject,
}

impl VertexArray {
    pub fn new(gl: &GL) -> Result<Self, VizError> {
        let vao = gl
            .create_vertex_array()
            .ok_or(VizError::Allocation("vertex array"))?;
        Ok(Self { gl: gl.clone(), vao })
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(&self.vao));
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(None);
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(Some(&self.vao));
    }
}
