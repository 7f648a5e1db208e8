use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, HtmlElement, WebGl2RenderingContext as GL, WebGlUniformLocation, Window,
};

use super::dom::{self, Listener};
use super::gl::{self, Buffer, Program, VertexArray};
use super::render::AnimationLoop;
use crate::cylinder::{CylinderGridConfig, FRAGMENT_SHADER, VERTEX_SHADER};
use crate::error::VizError;
use crate::frame::FrameClock;
use crate::scroll::container_progress;

const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

/// Transparent cylindrical grid overlay filling its container.
#[wasm_bindgen]
pub struct CylinderGridLayer {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl CylinderGridLayer {
    /// Mount into `container`. Returns nothing (and logs a warning) when the
    /// overlay cannot run here; the rest of the page is unaffected.
    pub fn mount(container: HtmlElement) -> Option<CylinderGridLayer> {
        match Self::try_mount(&container, CylinderGridConfig::default()) {
            Ok(layer) => Some(layer),
            Err(err) => {
                log::warn!("cylinder grid disabled: {err}");
                None
            }
        }
    }

    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            log::debug!("cylinder grid unmounted");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.mounted.is_some()
    }
}

impl CylinderGridLayer {
    pub fn try_mount(container: &HtmlElement, cfg: CylinderGridConfig) -> Result<Self, VizError> {
        let window = dom::window()?;
        let document = window.document().ok_or(VizError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| VizError::Allocation("canvas"))?;
        dom::set_style(&canvas, "display", "block");
        dom::set_style(&canvas, "width", "100%");
        dom::set_style(&canvas, "height", "100%");
        dom::set_style(&canvas, "pointer-events", "none");
        container.append_child(&canvas)?;

        match Mounted::new(window, container.clone(), canvas.clone(), cfg) {
            Ok(mounted) => {
                log::debug!("cylinder grid mounted");
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

struct Uniforms {
    resolution: Option<WebGlUniformLocation>,
    scroll: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
}

/// GPU objects the draw callback owns; released when the loop is dropped.
struct Scene {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: Program,
    vao: VertexArray,
    _quad: Buffer,
    uniforms: Uniforms,
    progress: Rc<Cell<f32>>,
}

impl Scene {
    fn draw(&self, now_ms: f64) {
        let gl = &self.gl;
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        self.program.bind();
        self.vao.bind();
        gl.uniform2f(
            self.uniforms.resolution.as_ref(),
            self.canvas.width() as f32,
            self.canvas.height() as f32,
        );
        gl.uniform1f(self.uniforms.scroll.as_ref(), self.progress.get());
        gl.uniform1f(self.uniforms.time.as_ref(), (now_ms * 0.001) as f32);
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
    }
}

fn upload_config(gl: &GL, program: &Program, cfg: &CylinderGridConfig) {
    let u = |name: &str| program.uniform(name);
    gl.uniform2f(u("u_band").as_ref(), cfg.band_bottom, cfg.band_top);
    gl.uniform1f(u("u_curve_exp").as_ref(), cfg.curve_exponent);
    gl.uniform2f(u("u_scale").as_ref(), cfg.scale_edge, cfg.scale_center);
    gl.uniform1f(u("u_scroll_factor").as_ref(), cfg.scroll_factor);
    gl.uniform1f(u("u_cell").as_ref(), cfg.cell_size_px);
    gl.uniform2f(u("u_line").as_ref(), cfg.line_width, cfg.line_width_edge);
    gl.uniform1f(u("u_edge_fade_exp").as_ref(), cfg.edge_fade_exponent);
    gl.uniform1f(u("u_depth_edge").as_ref(), cfg.depth_edge);
    gl.uniform1f(u("u_boundary_fade").as_ref(), cfg.boundary_fade);
    gl.uniform1f(u("u_opacity").as_ref(), cfg.base_opacity);
    gl.uniform2f(u("u_breathe").as_ref(), cfg.breathe_rate, cfg.breathe_depth);
    gl.uniform3f(u("u_color").as_ref(), cfg.color.x, cfg.color.y, cfg.color.z);
}

fn resize(window: &Window, canvas: &HtmlCanvasElement, gl: &GL, cfg: &CylinderGridConfig) {
    let (w, h) = cfg.backing_size(
        canvas.client_width() as f64,
        canvas.client_height() as f64,
        window.device_pixel_ratio(),
    );
    canvas.set_width(w);
    canvas.set_height(h);
    gl.viewport(0, 0, w as i32, h as i32);
}

fn sample_scroll(window: &Window, container: &HtmlElement, progress: &Cell<f32>) {
    let (_, viewport_h) = dom::viewport_size(window);
    let rect = container.get_bounding_client_rect();
    progress.set(container_progress(viewport_h, rect.top(), rect.height()));
}

struct Mounted {
    animation: Option<AnimationLoop>,
    _listeners: [Listener; 2],
    canvas: HtmlCanvasElement,
}

impl Mounted {
    fn new(
        window: Window,
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        cfg: CylinderGridConfig,
    ) -> Result<Self, VizError> {
        let gl = gl::context(&canvas)?;
        let program = Program::link(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        program.bind();

        let vao = VertexArray::new(&gl)?;
        vao.bind();
        let quad = Buffer::vertices(&gl, &QUAD)?;
        quad.attribute(program.attrib("a_position")?, 2);
        vao.unbind();

        let uniforms = Uniforms {
            resolution: program.uniform("u_resolution"),
            scroll: program.uniform("u_scroll"),
            time: program.uniform("u_time"),
        };
        upload_config(&gl, &program, &cfg);

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        resize(&window, &canvas, &gl, &cfg);
        let on_resize = {
            let (window, canvas, gl, cfg) =
                (window.clone(), canvas.clone(), gl.clone(), cfg.clone());
            Listener::new(&window.clone(), "resize", true, move |_| {
                resize(&window, &canvas, &gl, &cfg)
            })?
        };

        let progress = Rc::new(Cell::new(0.0));
        sample_scroll(&window, &container, &progress);
        let on_scroll = {
            let (window, progress) = (window.clone(), Rc::clone(&progress));
            Listener::new(&window.clone(), "scroll", true, move |_| {
                sample_scroll(&window, &container, &progress)
            })?
        };

        let scene = Scene {
            gl,
            canvas: canvas.clone(),
            program,
            vao,
            _quad: quad,
            uniforms,
            progress,
        };
        let animation = AnimationLoop::start(
            &window,
            FrameClock::throttled(cfg.frame_interval_ms),
            move |now| scene.draw(now),
        )?;

        Ok(Self {
            animation: Some(animation),
            _listeners: [on_resize, on_scroll],
            canvas,
        })
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        // Cancels the pending frame and frees the GPU objects held by the
        // draw callback before the canvas goes away.
        drop(self.animation.take());
        self.canvas.remove();
    }
}
