use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, HtmlElement, MouseEvent, WebGl2RenderingContext as GL, WebGlUniformLocation,
    Window,
};

use super::dom::{self, Listener};
use super::gl::{self, Buffer, Program, VertexArray};
use super::render::AnimationLoop;
use crate::ambient::{
    plane_model, projection, AmbientSceneConfig, ParallaxCamera, ParticleField, PlaneMesh,
    GRID_FRAGMENT_SHADER, GRID_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER, PARTICLE_VERTEX_SHADER,
};
use crate::cylinder::backing_size;
use crate::error::VizError;
use crate::frame::FrameClock;

/// Fixed full-page background: tilted grid plane plus particle field.
#[wasm_bindgen]
pub struct AmbientSceneLayer {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl AmbientSceneLayer {
    /// Inject the scene's canvas into `container`. Returns nothing (and logs
    /// a warning) when WebGL2 or the shaders are unavailable.
    pub fn mount(container: HtmlElement) -> Option<AmbientSceneLayer> {
        match Self::try_mount(&container, AmbientSceneConfig::default()) {
            Ok(layer) => Some(layer),
            Err(err) => {
                log::warn!("ambient scene disabled: {err}");
                None
            }
        }
    }

    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            log::debug!("ambient scene unmounted");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.mounted.is_some()
    }
}

impl AmbientSceneLayer {
    pub fn try_mount(container: &HtmlElement, cfg: AmbientSceneConfig) -> Result<Self, VizError> {
        let window = dom::window()?;
        let document = window.document().ok_or(VizError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| VizError::Allocation("canvas"))?;
        for (property, value) in [
            ("position", "fixed"),
            ("inset", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("z-index", "-1"),
            ("pointer-events", "none"),
        ] {
            dom::set_style(&canvas, property, value);
        }
        container.append_child(&canvas)?;

        match Mounted::new(window, canvas.clone(), cfg) {
            Ok(mounted) => {
                log::debug!("ambient scene mounted");
                Ok(Self {
                    mounted: Some(mounted),
                })
            }
            Err(err) => {
                canvas.remove();
                Err(err)
            }
        }
    }
}

struct Mesh {
    vao: VertexArray,
    _buffers: Vec<Buffer>,
    count: i32,
}

struct Pass {
    program: Program,
    model_view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
}

impl Pass {
    fn new(gl: &GL, vertex: &str, fragment: &str) -> Result<Self, VizError> {
        let program = Program::link(gl, vertex, fragment)?;
        Ok(Self {
            model_view: program.uniform("u_model_view"),
            projection: program.uniform("u_projection"),
            time: program.uniform("u_time"),
            program,
        })
    }
}

struct Scene {
    gl: GL,
    canvas: HtmlCanvasElement,
    cfg: AmbientSceneConfig,
    camera: Rc<RefCell<ParallaxCamera>>,
    grid: Pass,
    particles: Pass,
    plane: Mesh,
    points: Mesh,
    time: f32,
}

impl Scene {
    fn build(
        gl: GL,
        canvas: HtmlCanvasElement,
        cfg: AmbientSceneConfig,
        camera: Rc<RefCell<ParallaxCamera>>,
    ) -> Result<Self, VizError> {
        let grid = Pass::new(&gl, GRID_VERTEX_SHADER, GRID_FRAGMENT_SHADER)?;
        let particles = Pass::new(&gl, PARTICLE_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER)?;

        let mesh = PlaneMesh::new(cfg.plane_size, cfg.plane_segments);
        let vao = VertexArray::new(&gl)?;
        vao.bind();
        let positions = Buffer::vertices(&gl, &mesh.positions)?;
        positions.attribute(grid.program.attrib("a_position")?, 3);
        let uvs = Buffer::vertices(&gl, &mesh.uvs)?;
        uvs.attribute(grid.program.attrib("a_uv")?, 2);
        let indices = Buffer::indices(&gl, &mesh.indices)?;
        vao.unbind();
        let plane = Mesh {
            vao,
            _buffers: vec![positions, uvs, indices],
            count: mesh.indices.len() as i32,
        };

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let field = ParticleField::generate(&cfg, &mut fastrand::Rng::with_seed(seed));
        let vao = VertexArray::new(&gl)?;
        vao.bind();
        let positions = Buffer::vertices(&gl, &field.positions)?;
        positions.attribute(particles.program.attrib("a_position")?, 3);
        let colors = Buffer::vertices(&gl, &field.colors)?;
        colors.attribute(particles.program.attrib("a_color")?, 3);
        vao.unbind();
        let points = Mesh {
            vao,
            _buffers: vec![positions, colors],
            count: field.len() as i32,
        };

        Ok(Self {
            gl,
            canvas,
            cfg,
            camera,
            grid,
            particles,
            plane,
            points,
            time: 0.0,
        })
    }

    fn draw(&mut self) {
        self.time += self.cfg.time_step;
        let view = {
            let mut camera = self.camera.borrow_mut();
            camera.step(&self.cfg);
            camera.view(&self.cfg)
        };
        let aspect = self.canvas.width() as f32 / self.canvas.height().max(1) as f32;
        let proj = projection(&self.cfg, aspect).to_cols_array();

        let gl = &self.gl;
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.disable(GL::CULL_FACE);
        gl.depth_mask(false);
        gl.enable(GL::BLEND);

        // Grid plane, normal alpha blending, both faces.
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        let model_view = (view * plane_model(&self.cfg)).to_cols_array();
        self.grid.program.bind();
        gl.uniform_matrix4fv_with_f32_array(self.grid.model_view.as_ref(), false, &model_view);
        gl.uniform_matrix4fv_with_f32_array(self.grid.projection.as_ref(), false, &proj);
        gl.uniform1f(self.grid.time.as_ref(), self.time);
        self.plane.vao.bind();
        gl.draw_elements_with_i32(GL::TRIANGLES, self.plane.count, GL::UNSIGNED_INT, 0);

        // Particles, additive.
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        let model_view = view.to_cols_array();
        self.particles.program.bind();
        gl.uniform_matrix4fv_with_f32_array(self.particles.model_view.as_ref(), false, &model_view);
        gl.uniform_matrix4fv_with_f32_array(self.particles.projection.as_ref(), false, &proj);
        gl.uniform1f(self.particles.time.as_ref(), self.time);
        self.points.vao.bind();
        gl.draw_arrays(GL::POINTS, 0, self.points.count);

        gl.bind_vertex_array(None);
    }
}

fn resize(window: &Window, canvas: &HtmlCanvasElement, gl: &GL, cfg: &AmbientSceneConfig) {
    let (css_w, css_h) = dom::viewport_size(window);
    let (w, h) = backing_size(css_w, css_h, window.device_pixel_ratio(), cfg.max_pixel_ratio);
    canvas.set_width(w);
    canvas.set_height(h);
    gl.viewport(0, 0, w as i32, h as i32);
}

struct Mounted {
    animation: Option<AnimationLoop>,
    _listeners: [Listener; 2],
    canvas: HtmlCanvasElement,
    gl: GL,
}

impl Mounted {
    fn new(
        window: Window,
        canvas: HtmlCanvasElement,
        cfg: AmbientSceneConfig,
    ) -> Result<Self, VizError> {
        let gl = gl::context(&canvas)?;
        let camera = Rc::new(RefCell::new(ParallaxCamera::new(&cfg)));

        resize(&window, &canvas, &gl, &cfg);
        let on_resize = {
            let (window, canvas, gl, cfg) =
                (window.clone(), canvas.clone(), gl.clone(), cfg.clone());
            Listener::new(&window.clone(), "resize", true, move |_| {
                resize(&window, &canvas, &gl, &cfg)
            })?
        };
        let on_pointer = {
            let (window, camera) = (window.clone(), Rc::clone(&camera));
            Listener::new(&window.clone(), "mousemove", true, move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (w, h) = dom::viewport_size(&window);
                camera
                    .borrow_mut()
                    .pointer_moved(event.client_x() as f64, event.client_y() as f64, w, h);
            })?
        };

        let mut scene = Scene::build(gl.clone(), canvas.clone(), cfg, camera)?;
        let animation =
            AnimationLoop::start(&window, FrameClock::unthrottled(), move |_| scene.draw())?;

        Ok(Self {
            animation: Some(animation),
            _listeners: [on_resize, on_pointer],
            canvas,
            gl,
        })
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        drop(self.animation.take());
        gl::lose_context(&self.gl);
        self.canvas.remove();
    }
}
